use serde::Serialize;

use crate::error::{FileOrgError, Result};

/// Default block budget in size-proxy units.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;
/// Default number of home buckets in the hash file.
pub const DEFAULT_NUM_BUCKETS: usize = 10;
/// Default number of leading records looked up after loading.
pub const DEFAULT_SELECT_COUNT: usize = 10;
/// Default number of leading records deleted from the heap file.
pub const DEFAULT_DELETE_COUNT: usize = 5;

/// Insert placement policy for [`super::OrderedFile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderedPlacement {
    /// The first block whose last key is greater than the new key takes the record
    /// and is re-sorted, with no budget check. Anything else goes to the extension.
    #[default]
    LastKey,
    /// Binary search for the covering block and insert in order only when the
    /// block has room; anything else goes to the extension.
    Sorted,
}

/// Overflow policy for [`super::HashFile`] when a home bucket is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashOverflow {
    /// Push a new bucket onto the end of the bucket array.
    #[default]
    AppendBucket,
    /// Link an overflow bucket to the home bucket.
    Chain,
}

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimOptions {
    /// Block budget in size-proxy units. The hash file reads it as records per bucket.
    pub block_size: usize,
    /// Home buckets in the hash file.
    pub num_buckets: usize,
    /// Leading records looked up after the load phase.
    pub select_count: usize,
    /// Leading records deleted from the heap file.
    pub delete_count: usize,
    /// Placement policy for the ordered file.
    pub ordered_placement: OrderedPlacement,
    /// Overflow policy for the hash file.
    pub hash_overflow: HashOverflow,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            num_buckets: DEFAULT_NUM_BUCKETS,
            select_count: DEFAULT_SELECT_COUNT,
            delete_count: DEFAULT_DELETE_COUNT,
            ordered_placement: OrderedPlacement::default(),
            hash_overflow: HashOverflow::default(),
        }
    }
}

impl SimOptions {
    /// Sets the block budget.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the number of home buckets.
    pub fn num_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = num_buckets;
        self
    }

    /// Sets how many leading records are looked up.
    pub fn select_count(mut self, count: usize) -> Self {
        self.select_count = count;
        self
    }

    /// Sets how many leading records the heap workload deletes.
    pub fn delete_count(mut self, count: usize) -> Self {
        self.delete_count = count;
        self
    }

    /// Selects the ordered-file placement policy.
    pub fn ordered_placement(mut self, placement: OrderedPlacement) -> Self {
        self.ordered_placement = placement;
        self
    }

    /// Selects the hash-file overflow policy.
    pub fn hash_overflow(mut self, overflow: HashOverflow) -> Self {
        self.hash_overflow = overflow;
        self
    }

    /// Rejects settings no organization can run with.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FileOrgError::InvalidConfig(
                "block_size must be greater than zero".into(),
            ));
        }
        if self.num_buckets == 0 {
            return Err(FileOrgError::InvalidConfig(
                "num_buckets must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
