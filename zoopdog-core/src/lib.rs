//! Longest-match dictionary lookup core.
//!
//! A persisted bilingual entry store plus the two-phase search engine that
//! sits on top of it:
//!
//! 1. Phase 1 ([`MatchEngine::max_phrase_length`]) bounds how many words a
//!    phrase starting at a given word could possibly span.
//! 2. Phase 2 ([`MatchEngine::resolve_ranked`]) resolves a batch of candidate
//!    phrases and ranks the hits longest-first.
//!
//! The store is behind the [`EntryStore`] trait, enabling pluggable backends
//! ([`MemoryStore`] for tests and ephemeral hosts, [`FileStore`] for a
//! persisted dictionary).

pub mod engine;
pub mod error;
pub mod index;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod types;

pub use engine::MatchEngine;
pub use error::StoreError;
pub use store::EntryStore;
pub use store_file::FileStore;
pub use store_memory::MemoryStore;
pub use types::{normalize, word_count, Entry, EntryId};
