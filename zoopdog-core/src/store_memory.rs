use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::index::EntryIndex;
use crate::store::EntryStore;
use crate::types::Entry;

/// In-memory entry store.
///
/// A single `RwLock` around the arena + indexes gives the required policy for
/// free: mutations hold the write half for the whole operation, reads share
/// the read half and never block each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<EntryIndex>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the total number of entries. A bulk load that would exceed the
    /// quota is rejected whole, before any mutation: the in-memory analog of
    /// the persistence layer running out of space.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            index: RwLock::new(EntryIndex::new()),
            quota: Some(quota),
        }
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn bulk_load(&self, entries: Vec<Entry>) -> Result<usize, StoreError> {
        let mut index = self.index.write().await;
        if let Some(quota) = self.quota {
            if index.len() + entries.len() > quota {
                return Err(StoreError::Write(format!(
                    "quota exceeded: {} existing + {} new entries over the {} limit",
                    index.len(),
                    entries.len(),
                    quota
                )));
            }
        }
        let added = entries.len();
        for entry in entries {
            index.insert(entry);
        }
        debug!(added, total = index.len(), "bulk load committed");
        Ok(index.len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        index.clear();
        debug!("store cleared");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.index.read().await.len())
    }

    async fn prefix_keys(&self, term: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.index.read().await.prefix_keys(term))
    }

    async fn resolve_any(&self, phrases: &HashSet<String>) -> Result<Vec<Entry>, StoreError> {
        Ok(self.index.read().await.resolve(phrases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bulk_load_then_count() {
        let store = MemoryStore::new();
        let n = store
            .bulk_load(vec![Entry::new("con chó", "dog"), Entry::new("con mèo", "cat")])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = MemoryStore::new();
        store
            .bulk_load(vec![Entry::new("con chó", "dog")])
            .await
            .unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn quota_rejects_whole_load_and_keeps_prior_state() {
        let store = MemoryStore::with_quota(2);
        store
            .bulk_load(vec![Entry::new("con chó", "dog")])
            .await
            .unwrap();

        let err = store
            .bulk_load(vec![Entry::new("con mèo", "cat"), Entry::new("con gà", "chicken")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));

        // nothing from the failed load is visible
        assert_eq!(store.count().await.unwrap(), 1);
        let hits = store
            .resolve_any(&HashSet::from(["con mèo".to_string()]))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn reads_run_concurrently() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store
            .bulk_load(vec![Entry::new("con chó", "dog"), Entry::new("con chó con", "puppy")])
            .await
            .unwrap();

        let a = store.clone();
        let b = store.clone();
        let (keys, hits) = tokio::join!(
            async move { a.prefix_keys("con").await },
            async move {
                b.resolve_any(&HashSet::from(["con chó".to_string()])).await
            }
        );
        assert_eq!(keys.unwrap().len(), 2);
        assert_eq!(hits.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn round_trip_every_loaded_entry() {
        let store = MemoryStore::new();
        let entries = vec![
            Entry::new("con chó", "dog"),
            Entry::new("con chó con", "puppy"),
            Entry::new("con mèo", "cat"),
        ];
        store.bulk_load(entries.clone()).await.unwrap();
        for entry in entries {
            let hits = store
                .resolve_any(&HashSet::from([entry.source.clone()]))
                .await
                .unwrap();
            assert_eq!(hits, vec![entry]);
        }
    }
}
