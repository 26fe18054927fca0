use serde::{Deserialize, Serialize};

// ─── Scalar aliases ───────────────────────────────────────────

/// Store-generated identity: a monotonically increasing handle into the
/// append-only entry arena. Has no semantic meaning and is never exposed
/// through the router.
pub type EntryId = u64;

// ─── Entry ────────────────────────────────────────────────────

/// One dictionary definition: source phrase → target phrase.
///
/// A source phrase is a space-separated sequence of one or more words.
/// Entries are immutable; multiple entries may share the same source phrase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub source: String,
    pub target: String,
}

impl Entry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ─── Phrase helpers ───────────────────────────────────────────

/// Case-fold a phrase for comparison. Original casing stays in storage.
pub fn normalize(phrase: &str) -> String {
    phrase.to_lowercase()
}

/// Number of whitespace-separated words in a phrase.
pub fn word_count(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}
