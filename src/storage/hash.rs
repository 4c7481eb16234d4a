use tracing::debug;

use crate::error::{FileOrgError, Result};
use crate::storage::options::HashOverflow;
use crate::storage::rowhash::key_hash64;
use crate::storage::{FileOrganization, OrgKind};
use crate::types::{Key, Record};

/// Where [`HashFile::insert`] put a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPlacement {
    /// Stored in its home bucket.
    Home(usize),
    /// Home bucket was full; stored alone in a bucket appended at this array index.
    Appended(usize),
    /// Home bucket was full; stored in the overflow chain hanging off `home`.
    Chained {
        /// Home bucket index.
        home: usize,
        /// Position of the overflow bucket in the chain, starting at 0.
        depth: usize,
    },
}

/// Static hash file: a fixed bucket array addressed by key hash.
///
/// Each bucket holds at most `bucket_capacity` records. What happens once the home
/// bucket is full depends on [`HashOverflow`]: with `AppendBucket` the record goes
/// into a new bucket pushed onto the end of the array, which lookups only reach if
/// `hash(key)` happens to equal that new index. With `Chain` the overflow bucket is
/// linked to its home bucket and lookups follow it.
#[derive(Debug)]
pub struct HashFile {
    bucket_capacity: usize,
    num_buckets: usize,
    overflow: HashOverflow,
    buckets: Vec<Vec<Record>>,
    chains: Vec<Vec<Vec<Record>>>,
}

impl HashFile {
    /// Creates a hash file with the default overflow policy.
    pub fn new(bucket_capacity: usize, num_buckets: usize) -> Result<Self> {
        Self::with_overflow(bucket_capacity, num_buckets, HashOverflow::default())
    }

    /// Creates a hash file with an explicit overflow policy.
    pub fn with_overflow(
        bucket_capacity: usize,
        num_buckets: usize,
        overflow: HashOverflow,
    ) -> Result<Self> {
        if num_buckets == 0 {
            return Err(FileOrgError::InvalidConfig(
                "hash file needs at least one bucket".into(),
            ));
        }
        Ok(Self {
            bucket_capacity,
            num_buckets,
            overflow,
            buckets: vec![Vec::new(); num_buckets],
            chains: vec![Vec::new(); num_buckets],
        })
    }

    /// Home bucket index for `key`.
    ///
    /// Integers map to `k mod num_buckets`; text maps through SipHash-1-3 with
    /// zero keys, so placement is stable across runs.
    pub fn hash(&self, key: &Key) -> usize {
        match key {
            Key::Int(k) => k.rem_euclid(self.num_buckets as i64) as usize,
            Key::Text(s) => (key_hash64(s.as_bytes()) % self.num_buckets as u64) as usize,
        }
    }

    /// Stores `record` in its home bucket, or overflows per the configured policy.
    pub fn insert(&mut self, record: Record) -> HashPlacement {
        let home = self.hash(record.key());
        if self.buckets[home].len() < self.bucket_capacity {
            self.buckets[home].push(record);
            return HashPlacement::Home(home);
        }

        match self.overflow {
            HashOverflow::AppendBucket => {
                self.buckets.push(vec![record]);
                let idx = self.buckets.len() - 1;
                debug!(home, bucket = idx, "hash.bucket.appended");
                HashPlacement::Appended(idx)
            }
            HashOverflow::Chain => {
                let capacity = self.bucket_capacity;
                let chain = &mut self.chains[home];
                match chain.iter().position(|b| b.len() < capacity) {
                    Some(depth) => {
                        chain[depth].push(record);
                        HashPlacement::Chained { home, depth }
                    }
                    None => {
                        chain.push(vec![record]);
                        let depth = chain.len() - 1;
                        debug!(home, depth, "hash.chain.extended");
                        HashPlacement::Chained { home, depth }
                    }
                }
            }
        }
    }

    /// Scans the home bucket of `key` (and its chain, when chaining).
    pub fn select(&self, key: &Key) -> Option<&Record> {
        let home = self.hash(key);
        let found = self.buckets.get(home)?.iter().find(|r| r.key() == key);
        if found.is_some() || self.overflow == HashOverflow::AppendBucket {
            return found;
        }
        self.chains[home]
            .iter()
            .flatten()
            .find(|r| r.key() == key)
    }

    /// Buckets in use: the array length plus any chained overflow buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() + self.chains.iter().map(Vec::len).sum::<usize>()
    }

    /// Records held in the bucket at array index `idx`.
    pub fn bucket(&self, idx: usize) -> Option<&[Record]> {
        self.buckets.get(idx).map(Vec::as_slice)
    }

    /// Number of home buckets fixed at construction.
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// Maximum records per bucket.
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Active overflow policy.
    pub fn overflow(&self) -> HashOverflow {
        self.overflow
    }
}

impl FileOrganization for HashFile {
    fn kind(&self) -> OrgKind {
        OrgKind::Hash
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        HashFile::insert(self, record);
        Ok(())
    }

    fn select(&self, key: &Key) -> Option<&Record> {
        HashFile::select(self, key)
    }

    fn block_count(&self) -> usize {
        self.bucket_count()
    }
}
