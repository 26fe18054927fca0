use thiserror::Error;

/// Errors surfaced by the entry store and propagated unchanged by the engine.
///
/// Both kinds carry a human-readable message for the router to forward. The
/// core reports failures and never retries; any retry policy belongs to the
/// caller. There is deliberately no "empty input" kind: empty candidate sets
/// and empty prefix results are normal outcomes, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A bulk load or clear could not complete against the persistence layer
    /// (quota exceeded, snapshot write failed). The store's prior state is
    /// intact after this error.
    #[error("store write failed: {0}")]
    Write(String),

    /// A query could not complete (snapshot unreadable or corrupt).
    #[error("store read failed: {0}")]
    Read(String),
}
