//! Bulk dictionary loading: the bundled-resource → store routine the host
//! runs at install time and on explicit reload.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::info;

use zoopdog_core::{Entry, EntryStore};

/// One record of the bundled dictionary file (vnedict format).
#[derive(Debug, Deserialize)]
struct RawEntry {
    vn: String,
    en: String,
}

/// Read and parse the dictionary file. An empty array is a valid result,
/// distinct from any error.
pub async fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("read dictionary {}", path.display()))?;
    let raw: Vec<RawEntry> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse dictionary {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|record| Entry::new(record.vn, record.en))
        .collect())
}

/// Install-time hook: populate the store from the dictionary file only if it
/// is empty. Returns the number of entries present afterwards.
pub async fn seed_if_empty<S: EntryStore>(store: &S, path: &Path) -> Result<usize> {
    let count = store.count().await?;
    if count > 0 {
        info!(count, "store already populated");
        return Ok(count);
    }
    info!("store empty, loading dictionary");
    let entries = load_entries(path).await?;
    let total = store.bulk_load(entries).await?;
    info!(total, "committed entries");
    Ok(total)
}

/// Drop everything and load the dictionary file afresh. The file is parsed
/// before the clear so a bad file cannot wipe the store.
pub async fn reload<S: EntryStore>(store: &S, path: &Path) -> Result<usize> {
    let entries = load_entries(path).await?;
    store.clear().await?;
    let total = store.bulk_load(entries).await?;
    info!(total, "reload complete");
    Ok(total)
}
