//! User preferences: the global on/off toggle and the pronunciation dialect.
//!
//! This is external mutable configuration; the search core never touches it.
//! Persisted as a small JSON file with write-temp-then-rename, like the entry
//! store snapshot. A missing file means defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

pub const DEFAULT_DIALECT: &str = "hanoi";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_dialect")]
    pub dialect: String,
}

fn default_active() -> bool {
    true
}

fn default_dialect() -> String {
    DEFAULT_DIALECT.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            active: default_active(),
            dialect: default_dialect(),
        }
    }
}

#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    current: RwLock<Preferences>,
}

impl PrefStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse preferences {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => return Err(e).context(format!("read preferences {}", path.display())),
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub async fn active(&self) -> bool {
        self.current.read().await.active
    }

    /// Flip the on/off toggle, persist, and return the new status.
    pub async fn toggle_active(&self) -> Result<bool> {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.active = !next.active;
        self.save(&next).await?;
        info!(active = next.active, "toggled");
        *current = next;
        Ok(current.active)
    }

    pub async fn dialect(&self) -> String {
        self.current.read().await.dialect.clone()
    }

    pub async fn set_dialect(&self, dialect: &str) -> Result<()> {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.dialect = dialect.to_string();
        self.save(&next).await?;
        info!(dialect, "dialect set");
        *current = next;
        Ok(())
    }

    async fn save(&self, prefs: &Preferences) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(prefs).context("encode preferences")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename into {}", self.path.display()))
    }
}
