use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Sink for the access counters a simulation run produces.
///
/// The harness calls these hooks once per workload operation; block accesses are the
/// I/O cost proxy reported per organization.
pub trait AccessMetrics: Send + Sync {
    /// Records `count` simulated block accesses.
    fn blocks_accessed(&self, count: u64);

    /// Records an insert.
    fn record_inserted(&self);

    /// Records a point lookup and whether it found a record.
    fn record_selected(&self, hit: bool);

    /// Records a delete and whether it removed a record.
    fn record_deleted(&self, hit: bool);

    /// Records an extension merge that folded `records` pending records.
    fn extension_merged(&self, records: u64);
}

/// Counter-based implementation of [`AccessMetrics`] backed by relaxed atomics.
#[derive(Default)]
pub struct CounterMetrics {
    /// Simulated block accesses.
    pub blocks_accessed: AtomicU64,

    /// Inserts performed.
    pub inserts: AtomicU64,

    /// Lookups performed.
    pub selects: AtomicU64,

    /// Lookups that found a record.
    pub select_hits: AtomicU64,

    /// Deletes attempted.
    pub deletes: AtomicU64,

    /// Deletes that removed a record.
    pub delete_hits: AtomicU64,

    /// Extension merges performed.
    pub merges: AtomicU64,

    /// Records folded in by extension merges.
    pub merged_records: AtomicU64,
}

impl CounterMetrics {
    /// Copies the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blocks_accessed: self.blocks_accessed.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            selects: self.selects.load(Ordering::Relaxed),
            select_hits: self.select_hits.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            delete_hits: self.delete_hits.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            merged_records: self.merged_records.load(Ordering::Relaxed),
        }
    }
}

impl AccessMetrics for CounterMetrics {
    fn blocks_accessed(&self, count: u64) {
        self.blocks_accessed.fetch_add(count, Ordering::Relaxed);
    }

    fn record_inserted(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_selected(&self, hit: bool) {
        self.selects.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.select_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_deleted(&self, hit: bool) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.delete_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn extension_merged(&self, records: u64) {
        self.merges.fetch_add(1, Ordering::Relaxed);
        self.merged_records.fetch_add(records, Ordering::Relaxed);
    }
}

/// Plain copy of [`CounterMetrics`] taken at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Simulated block accesses.
    pub blocks_accessed: u64,
    /// Inserts performed.
    pub inserts: u64,
    /// Lookups performed.
    pub selects: u64,
    /// Lookups that found a record.
    pub select_hits: u64,
    /// Deletes attempted.
    pub deletes: u64,
    /// Deletes that removed a record.
    pub delete_hits: u64,
    /// Extension merges performed.
    pub merges: u64,
    /// Records folded in by extension merges.
    pub merged_records: u64,
}
