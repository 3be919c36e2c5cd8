//! Published directory snapshot
//!
//! The sync task is the only writer. It builds a complete [`Snapshot`] off to
//! the side and swaps the shared `Arc` in one step; readers clone the `Arc`
//! and keep a consistent view for as long as they hold it, even if a newer
//! snapshot is published meanwhile.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::domain::{BranchRecord, ProviderTable};

/// One immutable, queryable version of the directory
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    records: Vec<BranchRecord>,
    index: HashMap<String, usize>,
    providers: Arc<ProviderTable>,
    source_file: Option<String>,
}

impl Snapshot {
    /// The pre-sync snapshot: no records, just the provider table
    pub fn empty(providers: Arc<ProviderTable>) -> Self {
        Self {
            version: 0,
            records: Vec::new(),
            index: HashMap::new(),
            providers,
            source_file: None,
        }
    }

    fn build(
        version: u64,
        records: Vec<BranchRecord>,
        providers: Arc<ProviderTable>,
        source_file: Option<String>,
    ) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // first occurrence of a duplicated key wins
            index.entry(record.bsb.clone()).or_insert(position);
        }

        Self {
            version,
            records,
            index,
            providers,
            source_file,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// All records in directory file order
    pub fn records(&self) -> &[BranchRecord] {
        &self.records
    }

    pub fn providers(&self) -> &Arc<ProviderTable> {
        &self.providers
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Exact-match lookup by BSB
    pub fn lookup(&self, bsb: &str) -> Option<&BranchRecord> {
        self.index.get(bsb).map(|&position| &self.records[position])
    }

    pub fn health(&self) -> Health {
        Health {
            record_count: self.records.len(),
            provider_count: self.providers.len(),
        }
    }
}

/// Counts used to decide readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub record_count: usize,
    pub provider_count: usize,
}

impl Health {
    /// Ready once both records and providers are loaded
    pub fn is_healthy(&self) -> bool {
        self.record_count > 0 && self.provider_count > 0
    }
}

/// Holder of the currently visible [`Snapshot`]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create a store holding the empty pre-sync snapshot
    pub fn new(providers: ProviderTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty(Arc::new(providers)))),
        }
    }

    /// The currently visible snapshot. The lock is held only to clone the
    /// `Arc`, never while a snapshot is being built.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Publish `records` as the next snapshot, superseding the current one.
    ///
    /// The provider table is carried over from the current snapshot.
    pub fn publish(&self, records: Vec<BranchRecord>, source_file: Option<String>) -> Arc<Snapshot> {
        let previous = self.current();
        let next = Arc::new(Snapshot::build(
            previous.version + 1,
            records,
            previous.providers.clone(),
            source_file,
        ));

        *self.current.write() = next.clone();

        info!(
            version = next.version,
            records = next.records.len(),
            source_file = ?next.source_file,
            "Published directory snapshot"
        );
        next
    }

    pub fn lookup(&self, bsb: &str) -> Option<BranchRecord> {
        self.current().lookup(bsb).cloned()
    }

    pub fn health(&self) -> Health {
        self.current().health()
    }
}
