//! Stdio JSON service for the lookup overlay.
//!
//! Stdout carries responses, so logs go to stderr. Paths come from the
//! environment: `ZOOPDOG_DATA_DIR` (default `.`) holds the entry snapshot and
//! preferences; `ZOOPDOG_DICT` (default `<data dir>/vnedict.json`) is the
//! bundled dictionary used for seeding and `reload-db`.

mod loader;
mod prefs;
mod router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zoopdog_core::FileStore;

use crate::prefs::PrefStore;
use crate::router::Router;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let data_dir = std::env::var_os("ZOOPDOG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let dict_path = std::env::var_os("ZOOPDOG_DICT")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("vnedict.json"));

    let store = Arc::new(FileStore::open(data_dir.join("entries.json")).await?);
    // install-time analog: a fresh store gets the bundled dictionary; an
    // unreadable dictionary leaves an empty store that reload-db can fix
    if let Err(e) = loader::seed_if_empty(store.as_ref(), &dict_path).await {
        warn!(error = %e, "seeding skipped");
    }
    let prefs = PrefStore::open(data_dir.join("prefs.json")).await?;

    let router = Router::new(store, prefs, dict_path);
    info!("serving on stdio");
    router::serve(
        &router,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
