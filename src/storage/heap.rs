use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{FileOrgError, Result};
use crate::storage::block::Block;
use crate::storage::{FileOrganization, OrgKind};
use crate::types::{Key, Record};

/// Location of a slot inside a [`HeapFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    /// Index of the block in the chain.
    pub block: usize,
    /// Index of the slot within the block.
    pub slot: usize,
}

/// Unordered chain of blocks with tombstone reuse.
///
/// New records go into the oldest freed slot, otherwise to the tail block,
/// otherwise to a freshly allocated block. Slot reuse does not re-check the block
/// budget, so a larger record written over a smaller one can overfill its block.
/// Blocks are never released, so the block count only grows.
#[derive(Debug)]
pub struct HeapFile {
    block_size: usize,
    blocks: Vec<Block>,
    free_slots: VecDeque<SlotAddress>,
}

impl HeapFile {
    /// Creates a heap file holding one empty block.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            blocks: vec![Block::new(block_size)],
            free_slots: VecDeque::new(),
        }
    }

    /// Stores `record` and returns where it landed.
    pub fn insert(&mut self, record: Record) -> Result<SlotAddress> {
        let size = record.size_hint();
        if size > self.block_size {
            return Err(FileOrgError::RecordTooLarge {
                size,
                capacity: self.block_size,
            });
        }

        if let Some(address) = self.free_slots.pop_front() {
            let previous = self.blocks[address.block].overwrite(address.slot, record);
            debug_assert!(previous.is_none(), "free list pointed at a live slot");
            trace!(block = address.block, slot = address.slot, "heap.slot.reused");
            return Ok(address);
        }

        let tail = self.blocks.len() - 1;
        if !self.blocks[tail].is_full(size) {
            let slot = self.blocks[tail].slot_count();
            self.blocks[tail].push_unchecked(record);
            return Ok(SlotAddress { block: tail, slot });
        }

        let mut block = Block::new(self.block_size);
        block.push_unchecked(record);
        self.blocks.push(block);
        let address = SlotAddress {
            block: self.blocks.len() - 1,
            slot: 0,
        };
        debug!(block = address.block, "heap.block.allocated");
        Ok(address)
    }

    /// Returns the first live record with `key`, scanning blocks then slots in order.
    pub fn select(&self, key: &Key) -> Option<&Record> {
        self.locate(key)
            .and_then(|address| self.blocks[address.block].get(address.slot))
    }

    /// Tombstones the first live record with `key` and queues its slot for reuse.
    ///
    /// Returns `false` when no record matches.
    pub fn delete(&mut self, key: &Key) -> bool {
        let Some(address) = self.locate(key) else {
            return false;
        };
        self.blocks[address.block].tombstone(address.slot);
        self.free_slots.push_back(address);
        trace!(block = address.block, slot = address.slot, "heap.slot.freed");
        true
    }

    /// Address of the first live record with `key`.
    pub fn locate(&self, key: &Key) -> Option<SlotAddress> {
        self.blocks.iter().enumerate().find_map(|(block, b)| {
            b.position(key).map(|slot| SlotAddress { block, slot })
        })
    }

    /// Number of allocated blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of live records across every block.
    pub fn live_records(&self) -> usize {
        self.blocks.iter().map(Block::live_count).sum()
    }

    /// Tombstoned slots waiting for reuse, oldest first.
    pub fn free_slots(&self) -> impl Iterator<Item = &SlotAddress> {
        self.free_slots.iter()
    }

    /// Blocks in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Configured block budget.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl FileOrganization for HeapFile {
    fn kind(&self) -> OrgKind {
        OrgKind::Heap
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        HeapFile::insert(self, record).map(|_| ())
    }

    fn select(&self, key: &Key) -> Option<&Record> {
        HeapFile::select(self, key)
    }

    fn block_count(&self) -> usize {
        HeapFile::block_count(self)
    }
}
