//! Typed request/response dispatch over the overlay wire protocol.
//!
//! One request per line of JSON in, one response line out. Tags follow the
//! original protocol names (`initial-search`, `second-search`, `reload-db`,
//! …). Store failures come back as `error` responses carrying the message;
//! they never kill the serve loop.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use zoopdog_core::{Entry, EntryStore, MatchEngine};

use crate::loader;
use crate::prefs::{PrefStore, DEFAULT_DIALECT};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    InitialSearch { term: String },
    SecondSearch { candidates: Vec<String> },
    ReloadDb,
    CheckGloballyOn,
    ToggleActive,
    GetDialect,
    SetDialect { dialect: Option<String> },
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    Range { range: usize },
    Results { results: Vec<Entry> },
    ReloadComplete { count: usize },
    GloballyOn { status: bool },
    Dialect { dialect: String },
    DialectSet { dialect: String },
    Error { message: String },
}

pub struct Router<S> {
    engine: MatchEngine<S>,
    store: Arc<S>,
    prefs: PrefStore,
    dict_path: PathBuf,
}

impl<S> Router<S>
where
    S: EntryStore,
{
    pub fn new(store: Arc<S>, prefs: PrefStore, dict_path: PathBuf) -> Self {
        Self {
            engine: MatchEngine::new(store.clone()),
            store,
            prefs,
            dict_path,
        }
    }

    /// Dispatch one request; failures become `error` responses.
    pub async fn dispatch(&self, request: Request) -> Response {
        match self.handle(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "request failed");
                Response::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn handle(&self, request: Request) -> anyhow::Result<Response> {
        match request {
            Request::InitialSearch { term } => {
                let range = self.engine.max_phrase_length(&term).await?;
                Ok(Response::Range { range })
            }
            Request::SecondSearch { candidates } => {
                let candidates: HashSet<String> = candidates.into_iter().collect();
                let results = self.engine.resolve_ranked(&candidates).await?;
                Ok(Response::Results { results })
            }
            Request::ReloadDb => {
                let count = loader::reload(self.store.as_ref(), &self.dict_path).await?;
                Ok(Response::ReloadComplete { count })
            }
            Request::CheckGloballyOn => Ok(Response::GloballyOn {
                status: self.prefs.active().await,
            }),
            Request::ToggleActive => {
                let status = self.prefs.toggle_active().await?;
                Ok(Response::GloballyOn { status })
            }
            Request::GetDialect => Ok(Response::Dialect {
                dialect: self.prefs.dialect().await,
            }),
            Request::SetDialect { dialect } => {
                let dialect = dialect.unwrap_or_else(|| DEFAULT_DIALECT.to_string());
                self.prefs.set_dialect(&dialect).await?;
                Ok(Response::DialectSet { dialect })
            }
        }
    }
}

/// Serve newline-delimited JSON until the reader closes. Malformed lines get
/// an `error` response and the loop keeps going.
pub async fn serve<S, R, W>(router: &Router<S>, reader: R, mut writer: W) -> anyhow::Result<()>
where
    S: EntryStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!(?request, "dispatch");
                router.dispatch(request).await
            }
            Err(e) => {
                warn!(error = %e, "malformed request");
                Response::Error {
                    message: format!("malformed request: {e}"),
                }
            }
        };
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }
    Ok(())
}
