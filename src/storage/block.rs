use std::cmp::Ordering;

use crate::types::{Key, Record};

/// Fixed-capacity container of record slots; the unit of simulated I/O.
///
/// A slot is either a live record or a tombstone (`None`) left behind by a delete.
/// Capacity is measured with [`Record::size_hint`], and only live slots count
/// towards it.
#[derive(Clone, Debug)]
pub struct Block {
    capacity: usize,
    slots: Vec<Option<Record>>,
    used: usize,
}

impl Block {
    /// Creates an empty block with the given size budget.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            used: 0,
        }
    }

    /// Size budget of the block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Summed size proxy of the live slots.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Whether a candidate of `record_size` would push the block past its budget.
    pub fn is_full(&self, record_size: usize) -> bool {
        self.used + record_size > self.capacity
    }

    /// Appends `record` when it fits and reports whether it did.
    pub fn add_record(&mut self, record: Record) -> bool {
        let size = record.size_hint();
        if self.is_full(size) {
            return false;
        }
        self.used += size;
        self.slots.push(Some(record));
        true
    }

    /// Number of slots, tombstones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live records.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` when the block holds no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw slot view, tombstones included.
    pub fn slots(&self) -> &[Option<Record>] {
        &self.slots
    }

    /// Live records in slot order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().flatten()
    }

    /// Key of the first live record.
    pub fn first_key(&self) -> Option<&Key> {
        self.records().next().map(Record::key)
    }

    /// Key of the last live record.
    pub fn last_key(&self) -> Option<&Key> {
        self.slots.iter().rev().flatten().next().map(Record::key)
    }

    /// Position of the first live record matching `key`.
    pub fn position(&self, key: &Key) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|r| r.key() == key))
    }

    /// Live record at `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<&Record> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Replaces the live record at `slot` with a tombstone and returns it.
    pub(crate) fn tombstone(&mut self, slot: usize) -> Option<Record> {
        let removed = self.slots.get_mut(slot)?.take()?;
        self.used -= removed.size_hint();
        Some(removed)
    }

    /// Writes `record` into an existing slot, returning what was there.
    ///
    /// The size budget is not consulted; callers decide whether the write fits.
    pub(crate) fn overwrite(&mut self, slot: usize, record: Record) -> Option<Record> {
        let size = record.size_hint();
        let previous = self.slots[slot].replace(record);
        if let Some(prev) = &previous {
            self.used -= prev.size_hint();
        }
        self.used += size;
        previous
    }

    /// Appends `record` without checking the budget.
    pub(crate) fn push_unchecked(&mut self, record: Record) {
        self.used += record.size_hint();
        self.slots.push(Some(record));
    }

    /// Inserts `record` keeping live keys ordered; later equal keys stay after earlier ones.
    pub(crate) fn insert_sorted(&mut self, record: Record) {
        let at = self
            .slots
            .partition_point(|slot| slot.as_ref().is_some_and(|r| r.key() <= record.key()));
        self.used += record.size_hint();
        self.slots.insert(at, Some(record));
    }

    /// Stable sort of the slots by key; tombstones sink to the end.
    pub(crate) fn sort_by_key(&mut self) {
        self.slots.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.key().cmp(b.key()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    /// Consumes the block, yielding its live records in slot order.
    pub(crate) fn into_records(self) -> impl Iterator<Item = Record> {
        self.slots.into_iter().flatten()
    }
}
