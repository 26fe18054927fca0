use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::Entry;

/// Persistence trait for the dictionary.
///
/// The engine operates exclusively through this trait, enabling pluggable
/// backends ([`MemoryStore`](crate::MemoryStore) for tests and ephemeral
/// hosts, [`FileStore`](crate::FileStore) for a persisted dictionary).
///
/// Concurrency contract: `bulk_load` and `clear` are mutually exclusive and
/// whole-operation atomic with respect to every read: a concurrent
/// `prefix_keys`/`resolve_any`/`count` sees the store fully before or fully
/// after a mutation, never mid-way. Reads run concurrently with each other
/// and never block on one another.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert every entry, extending both indexes, atomically as a unit.
    /// Returns the number of entries now present. On [`StoreError::Write`]
    /// the prior state is fully intact (no partial insert).
    async fn bulk_load(&self, entries: Vec<Entry>) -> Result<usize, StoreError>;

    /// Remove all entries and both indexes. Idempotent.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Current number of entries.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Every distinct normalized source phrase that begins with `term + " "`
    /// (the term is the first word), case-insensitive. Empty set if none.
    async fn prefix_keys(&self, term: &str) -> Result<BTreeSet<String>, StoreError>;

    /// Every stored entry whose normalized source phrase case-insensitively
    /// equals any phrase in the input set, in ascending identity order. One
    /// entry per stored identity: duplicates sharing a phrase all appear.
    async fn resolve_any(&self, phrases: &HashSet<String>) -> Result<Vec<Entry>, StoreError>;
}
