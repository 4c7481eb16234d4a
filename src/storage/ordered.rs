use std::mem;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{FileOrgError, Result};
use crate::storage::block::Block;
use crate::storage::options::OrderedPlacement;
use crate::storage::{FileOrganization, OrgKind};
use crate::types::{Key, Record};

/// Where [`OrderedFile::insert`] put a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Placed into the block at this index.
    Block(usize),
    /// Parked in the extension area until the next merge.
    Extension,
}

/// Outcome of [`OrderedFile::merge_extension`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Extension records folded into the main file.
    pub merged: usize,
    /// Live records after the merge.
    pub records: usize,
    /// Blocks after the merge.
    pub blocks: usize,
}

/// Key-ordered block chain with an unordered extension area.
///
/// Between merges only the placement policy's guarantees hold; after
/// [`merge_extension`](Self::merge_extension) the concatenated keys are
/// non-decreasing, every block respects its budget, and the extension is empty.
#[derive(Debug)]
pub struct OrderedFile {
    block_size: usize,
    placement: OrderedPlacement,
    blocks: Vec<Block>,
    extension: Vec<Record>,
}

impl OrderedFile {
    /// Creates an ordered file with one empty block and the default placement policy.
    pub fn new(block_size: usize) -> Self {
        Self::with_placement(block_size, OrderedPlacement::default())
    }

    /// Creates an ordered file using `placement` for inserts.
    pub fn with_placement(block_size: usize, placement: OrderedPlacement) -> Self {
        Self {
            block_size,
            placement,
            blocks: vec![Block::new(block_size)],
            extension: Vec::new(),
        }
    }

    /// Places `record` according to the configured policy.
    pub fn insert(&mut self, record: Record) -> Placement {
        let placed = match self.placement {
            OrderedPlacement::LastKey => self.place_before_last_key(record),
            OrderedPlacement::Sorted => self.place_sorted(record),
        };
        match placed {
            Ok(idx) => Placement::Block(idx),
            Err(record) => {
                self.extension.push(record);
                Placement::Extension
            }
        }
    }

    // First non-empty block whose last key is greater than the new key takes the
    // record, then re-sorts. The block budget is not re-checked here.
    fn place_before_last_key(&mut self, record: Record) -> std::result::Result<usize, Record> {
        let target = self
            .blocks
            .iter()
            .position(|block| block.last_key().is_some_and(|last| record.key() < last));
        match target {
            Some(idx) => {
                let block = &mut self.blocks[idx];
                block.push_unchecked(record);
                block.sort_by_key();
                Ok(idx)
            }
            None => Err(record),
        }
    }

    // Binary search for the covering block; insert only when the budget allows.
    fn place_sorted(&mut self, record: Record) -> std::result::Result<usize, Record> {
        let key = record.key();
        let idx = self
            .blocks
            .partition_point(|block| block.last_key().is_some_and(|last| last <= key));
        let tail = self.blocks.len() - 1;
        let idx = idx.min(tail);
        let block = &mut self.blocks[idx];
        let in_range = idx == tail || block.last_key().map_or(true, |last| key < last);
        if in_range && !block.is_full(record.size_hint()) {
            block.insert_sorted(record);
            Ok(idx)
        } else {
            Err(record)
        }
    }

    /// Folds the extension into the main file: sort everything by key and repack
    /// into fresh blocks, opening a new block whenever the current one is full.
    pub fn merge_extension(&mut self) -> Result<MergeStats> {
        if let Some(size) = self
            .blocks
            .iter()
            .flat_map(Block::records)
            .chain(self.extension.iter())
            .map(Record::size_hint)
            .find(|size| *size > self.block_size)
        {
            return Err(FileOrgError::RecordTooLarge {
                size,
                capacity: self.block_size,
            });
        }

        let merged = self.extension.len();
        let mut all: Vec<Record> = mem::take(&mut self.blocks)
            .into_iter()
            .flat_map(Block::into_records)
            .collect();
        all.append(&mut self.extension);
        all.sort_by(|a, b| a.key().cmp(b.key()));

        let records = all.len();
        let mut blocks = vec![Block::new(self.block_size)];
        for record in all {
            let tail = blocks.len() - 1;
            if blocks[tail].is_full(record.size_hint()) {
                let mut block = Block::new(self.block_size);
                block.push_unchecked(record);
                blocks.push(block);
            } else {
                blocks[tail].push_unchecked(record);
            }
        }
        self.blocks = blocks;

        let stats = MergeStats {
            merged,
            records,
            blocks: self.blocks.len(),
        };
        info!(
            merged = stats.merged,
            records = stats.records,
            blocks = stats.blocks,
            "ordered.merge.completed"
        );
        Ok(stats)
    }

    /// Looks `key` up in the blocks, then in the unmerged extension.
    pub fn select(&self, key: &Key) -> Option<&Record> {
        let found = self
            .blocks
            .iter()
            .flat_map(Block::records)
            .find(|r| r.key() == key);
        if found.is_some() {
            return found;
        }
        let pending = self.extension.iter().find(|r| r.key() == key);
        if pending.is_some() {
            debug!(key = %key, "ordered.select.extension_hit");
        }
        pending
    }

    /// Records waiting in the extension area.
    pub fn extension_len(&self) -> usize {
        self.extension.len()
    }

    /// Number of blocks in the main file.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in file order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Keys of the main file's live records in block order, extension excluded.
    pub fn keys(&self) -> Vec<Key> {
        self.blocks
            .iter()
            .flat_map(Block::records)
            .map(|r| r.key().clone())
            .collect()
    }

    /// Active placement policy.
    pub fn placement(&self) -> OrderedPlacement {
        self.placement
    }
}

impl FileOrganization for OrderedFile {
    fn kind(&self) -> OrgKind {
        OrgKind::Ordered
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        OrderedFile::insert(self, record);
        Ok(())
    }

    fn select(&self, key: &Key) -> Option<&Record> {
        OrderedFile::select(self, key)
    }

    fn block_count(&self) -> usize {
        OrderedFile::block_count(self)
    }
}
