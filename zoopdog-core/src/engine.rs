use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::StoreError;
use crate::store::EntryStore;
use crate::types::{word_count, Entry};

/// Two-phase longest-match engine.
///
/// Stateless between calls; all state lives in the entry store. Each phase is
/// a single store call (phase 2 adds an in-memory sort), so the store's
/// atomicity contract is the only concurrency the engine needs.
pub struct MatchEngine<S> {
    store: Arc<S>,
}

impl<S> MatchEngine<S>
where
    S: EntryStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Phase 1: the maximum number of words a phrase starting with `term`
    /// could span, given what the dictionary holds.
    ///
    /// This bounds how many further words candidate generation needs to
    /// gather. It must never under-report (that loses matches); over-
    /// reporting just means extra candidates resolve to nothing. With no key
    /// extending the term the length is 1; a single-word match is still
    /// attempted downstream.
    pub async fn max_phrase_length(&self, term: &str) -> Result<usize, StoreError> {
        let keys = self.store.prefix_keys(term).await?;
        let range = keys.iter().map(|key| word_count(key)).max().unwrap_or(1);
        debug!(term, keys = keys.len(), range, "phase 1");
        Ok(range)
    }

    /// Phase 2: resolve the candidate phrases and rank the hits by
    /// specificity: descending source-phrase word count, longer match first.
    ///
    /// The sort is stable and `resolve_any` returns insertion order, so
    /// equal-length hits keep ascending insertion order. An empty candidate
    /// set is a normal call and yields an empty sequence without touching
    /// the store.
    pub async fn resolve_ranked(
        &self,
        candidates: &HashSet<String>,
    ) -> Result<Vec<Entry>, StoreError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let mut results = self.store.resolve_any(candidates).await?;
        results.sort_by_key(|entry| Reverse(word_count(&entry.source)));
        debug!(candidates = candidates.len(), hits = results.len(), "phase 2");
        Ok(results)
    }
}
