//! Block model and the three file organizations.
//!
//! Every organization owns its blocks outright and exposes insert and point lookup;
//! the heap file also deletes. None of them count accesses themselves: the
//! simulation harness in [`crate::sim`] does that around each call.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::types::{Key, Record};

/// Fixed-capacity record container.
pub mod block;

mod hash;
mod heap;
mod metrics;
mod options;
mod ordered;
mod rowhash;

pub use block::Block;
pub use hash::{HashFile, HashPlacement};
pub use heap::{HeapFile, SlotAddress};
pub use metrics::{AccessMetrics, CounterMetrics, MetricsSnapshot};
pub use options::{
    HashOverflow, OrderedPlacement, SimOptions, DEFAULT_BLOCK_SIZE, DEFAULT_DELETE_COUNT,
    DEFAULT_NUM_BUCKETS, DEFAULT_SELECT_COUNT,
};
pub use ordered::{MergeStats, OrderedFile, Placement};
pub use rowhash::key_hash64;

/// The organization strategies the simulator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgKind {
    /// Unordered block chain with slot reuse.
    Heap,
    /// Key-ordered blocks plus an extension area.
    Ordered,
    /// Static hash buckets.
    Hash,
}

impl OrgKind {
    /// All kinds in reporting order.
    pub const ALL: [OrgKind; 3] = [OrgKind::Heap, OrgKind::Ordered, OrgKind::Hash];

    /// Human-readable name used in result tables.
    pub fn label(self) -> &'static str {
        match self {
            OrgKind::Heap => "Fixed Heap",
            OrgKind::Ordered => "Ordered File",
            OrgKind::Hash => "Static Hash",
        }
    }
}

impl fmt::Display for OrgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operations every file organization supports.
pub trait FileOrganization {
    /// Which strategy this is.
    fn kind(&self) -> OrgKind;

    /// Stores a record.
    fn insert(&mut self, record: Record) -> Result<()>;

    /// Point lookup by key; `None` on a miss.
    fn select(&self, key: &Key) -> Option<&Record>;

    /// Blocks (or buckets) currently in use.
    fn block_count(&self) -> usize;
}
