use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::index::EntryIndex;
use crate::store::EntryStore;
use crate::types::Entry;

/// Entry store persisted as a JSON snapshot of the arena.
///
/// The full index lives in memory; the snapshot holds only the arena (both
/// indexes are derived and rebuilt on open). Mutations stage a new index,
/// persist its arena with write-temp-then-rename, and only then swap the
/// staged index in, so a failed write leaves both the file and the visible
/// in-memory state untouched.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    index: RwLock<EntryIndex>,
}

impl FileStore {
    /// Open the store at `path`, rebuilding both indexes from an existing
    /// snapshot. A missing file is an empty store; an unreadable or corrupt
    /// snapshot is [`StoreError::Read`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let index = match fs::read(&path).await {
            Ok(bytes) => {
                let arena: Vec<Entry> = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Read(format!("corrupt snapshot {}: {e}", path.display()))
                })?;
                info!(entries = arena.len(), path = %path.display(), "snapshot loaded");
                EntryIndex::from_arena(arena)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => EntryIndex::new(),
            Err(e) => {
                return Err(StoreError::Read(format!(
                    "read snapshot {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(Self {
            path,
            index: RwLock::new(index),
        })
    }

    async fn persist(&self, arena: &[Entry]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(arena)
            .map_err(|e| StoreError::Write(format!("encode snapshot: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Write(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Write(format!("rename into {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl EntryStore for FileStore {
    async fn bulk_load(&self, entries: Vec<Entry>) -> Result<usize, StoreError> {
        let mut index = self.index.write().await;
        let mut staged = index.clone();
        let added = entries.len();
        for entry in entries {
            staged.insert(entry);
        }
        self.persist(staged.arena()).await?;
        *index = staged;
        debug!(added, total = index.len(), "bulk load committed");
        Ok(index.len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            // clearing an already-empty store is still a clear
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StoreError::Write(format!(
                    "remove snapshot {}: {e}",
                    self.path.display()
                )))
            }
        }
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

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("con chó", "dog"),
            Entry::new("con chó con", "puppy"),
            Entry::new("con mèo", "cat"),
        ]
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");

        let store = FileStore::open(&path).await.unwrap();
        store.bulk_load(entries()).await.unwrap();
        drop(store);

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.prefix_keys("con").await.unwrap().len(), 3);
        let hits = store
            .resolve_any(&HashSet::from(["Con Chó".to_string()]))
            .await
            .unwrap();
        assert_eq!(hits, vec![Entry::new("con chó", "dog")]);
    }

    #[tokio::test]
    async fn missing_snapshot_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("missing.json")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        store.clear().await.unwrap(); // idempotent even with no file
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_open_as_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, b"not json").unwrap();
        let err = FileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Read(_)));
    }

    #[tokio::test]
    async fn failed_persist_leaves_prior_state_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");

        let store = FileStore::open(&path).await.unwrap();
        store.bulk_load(entries()).await.unwrap();

        // kill the directory out from under the store: the next persist fails
        drop(dir);
        let err = store
            .bulk_load(vec![Entry::new("con gà", "chicken")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));

        // visible state is still the pre-failure content
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store
            .resolve_any(&HashSet::from(["con gà".to_string()]))
            .await
            .unwrap()
            .is_empty());
    }
}
