//! Workload harness.
//!
//! Drives each file organization through the scripted workload and counts one
//! block access per operation:
//!
//! * heap: insert every record, look up the first `select_count`, delete the first
//!   `delete_count`;
//! * ordered: insert every record, merge the extension, then charge one access per
//!   record left in the extension afterwards (none, once the merge has run);
//! * hash: insert every record, look up the first `select_count`.
//!
//! The harness only ever sees counters and final block counts.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::storage::{
    AccessMetrics, CounterMetrics, FileOrganization, HashFile, HeapFile, MergeStats,
    MetricsSnapshot, OrderedFile, OrgKind, SimOptions,
};
use crate::types::Record;

mod report;

pub use report::{Report, ReportRow};

/// Counters collected for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgRun {
    /// Which organization ran.
    pub kind: OrgKind,
    /// Simulated block accesses.
    pub blocks_accessed: u64,
    /// Blocks (or buckets) in use at the end of the run.
    pub total_blocks: usize,
    /// Full counter set.
    pub metrics: MetricsSnapshot,
    /// Merge outcome, for the ordered file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeStats>,
}

impl OrgRun {
    fn finish<O: FileOrganization + ?Sized>(
        org: &O,
        metrics: &CounterMetrics,
        merge: Option<MergeStats>,
    ) -> Self {
        let snapshot = metrics.snapshot();
        let run = Self {
            kind: org.kind(),
            blocks_accessed: snapshot.blocks_accessed,
            total_blocks: org.block_count(),
            metrics: snapshot,
            merge,
        };
        info!(
            org = %run.kind,
            blocks_accessed = run.blocks_accessed,
            total_blocks = run.total_blocks,
            "sim.run.completed"
        );
        run
    }
}

/// Heap workload: load, look up the leading records, delete the leading records.
pub fn simulate_heap(records: &[Record], opts: &SimOptions) -> Result<OrgRun> {
    let metrics = CounterMetrics::default();
    let mut heap = HeapFile::new(opts.block_size);
    load(&mut heap, records, &metrics)?;
    lookup(&heap, records, opts.select_count, &metrics);
    for record in records.iter().take(opts.delete_count) {
        let hit = heap.delete(record.key());
        metrics.record_deleted(hit);
        metrics.blocks_accessed(1);
    }
    Ok(OrgRun::finish(&heap, &metrics, None))
}

/// Ordered workload: load, merge the extension, charge what the extension still holds.
pub fn simulate_ordered(records: &[Record], opts: &SimOptions) -> Result<OrgRun> {
    let metrics = CounterMetrics::default();
    let mut file = OrderedFile::with_placement(opts.block_size, opts.ordered_placement);
    load(&mut file, records, &metrics)?;
    let stats = file.merge_extension()?;
    metrics.extension_merged(stats.merged as u64);
    metrics.blocks_accessed(file.extension_len() as u64);
    Ok(OrgRun::finish(&file, &metrics, Some(stats)))
}

/// Hash workload: load, then look up the leading records.
pub fn simulate_hash(records: &[Record], opts: &SimOptions) -> Result<OrgRun> {
    let metrics = CounterMetrics::default();
    let mut file = HashFile::with_overflow(opts.block_size, opts.num_buckets, opts.hash_overflow)?;
    load(&mut file, records, &metrics)?;
    lookup(&file, records, opts.select_count, &metrics);
    Ok(OrgRun::finish(&file, &metrics, None))
}

/// Runs heap, ordered and hash in that order and assembles the result table.
pub fn run_simulations(records: &[Record], opts: &SimOptions) -> Result<Report> {
    opts.validate()?;
    debug!(records = records.len(), block_size = opts.block_size, "sim.start");
    let runs = vec![
        simulate_heap(records, opts)?,
        simulate_ordered(records, opts)?,
        simulate_hash(records, opts)?,
    ];
    Ok(Report::new(records.len(), opts.clone(), runs))
}

fn load<O: FileOrganization + ?Sized>(
    org: &mut O,
    records: &[Record],
    metrics: &dyn AccessMetrics,
) -> Result<()> {
    for record in records {
        org.insert(record.clone())?;
        metrics.record_inserted();
        metrics.blocks_accessed(1);
    }
    Ok(())
}

fn lookup<O: FileOrganization + ?Sized>(
    org: &O,
    records: &[Record],
    count: usize,
    metrics: &dyn AccessMetrics,
) {
    for record in records.iter().take(count) {
        let hit = org.select(record.key()).is_some();
        metrics.record_selected(hit);
        metrics.blocks_accessed(1);
    }
}
