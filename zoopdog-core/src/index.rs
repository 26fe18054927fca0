use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{normalize, Entry, EntryId};

/// The arena plus the two derived indexes every backend keeps in memory.
///
/// Invariant: `exact` and `sorted` always describe exactly the source phrases
/// in `arena`; every mutation path updates all three together. Identity is
/// the arena position, so ids are monotone and ascending id order is
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct EntryIndex {
    /// Append-only between clears; `EntryId` = position.
    arena: Vec<Entry>,
    /// Normalized source phrase → ids sharing it, in insertion order.
    exact: HashMap<String, Vec<EntryId>>,
    /// Normalized source phrases, range-scanned for prefix queries.
    sorted: BTreeSet<String>,
}

impl EntryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both indexes from a persisted arena snapshot.
    pub fn from_arena(arena: Vec<Entry>) -> Self {
        let mut index = Self::new();
        for entry in arena {
            index.insert(entry);
        }
        index
    }

    pub fn insert(&mut self, entry: Entry) -> EntryId {
        let id = self.arena.len() as EntryId;
        let key = normalize(&entry.source);
        self.exact.entry(key.clone()).or_default().push(id);
        self.sorted.insert(key);
        self.arena.push(entry);
        id
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.exact.clear();
        self.sorted.clear();
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All distinct normalized source phrases whose first word is `term`,
    /// i.e. that begin with `term + " "`. Case-insensitive; the single-word
    /// phrase equal to `term` itself does not qualify.
    pub fn prefix_keys(&self, term: &str) -> BTreeSet<String> {
        let needle = format!("{} ", normalize(term));
        self.sorted
            .range(needle.clone()..)
            .take_while(|key| key.starts_with(&needle))
            .cloned()
            .collect()
    }

    /// Every entry whose normalized source phrase equals any input phrase,
    /// in ascending id (insertion) order. Duplicate identities sharing a
    /// phrase all appear.
    pub fn resolve(&self, phrases: &HashSet<String>) -> Vec<Entry> {
        let mut ids: Vec<EntryId> = phrases
            .iter()
            .filter_map(|phrase| self.exact.get(&normalize(phrase)))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| self.arena[id as usize].clone())
            .collect()
    }

    /// The raw arena, for snapshot serialization.
    pub fn arena(&self) -> &[Entry] {
        &self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntryIndex {
        EntryIndex::from_arena(vec![
            Entry::new("con chó", "dog"),
            Entry::new("con chó con", "puppy"),
            Entry::new("con mèo", "cat"),
        ])
    }

    #[test]
    fn insert_assigns_monotone_ids() {
        let mut index = EntryIndex::new();
        assert_eq!(index.insert(Entry::new("a", "x")), 0);
        assert_eq!(index.insert(Entry::new("b", "y")), 1);
        assert_eq!(index.insert(Entry::new("a", "z")), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn prefix_keys_requires_following_space() {
        let index = sample();
        let keys = index.prefix_keys("con");
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["con chó", "con chó con", "con mèo"]
        );
        // "chó" is a later word, never a prefix hit
        assert!(index.prefix_keys("chó").is_empty());
        // the phrase equal to the term alone does not qualify
        let single = EntryIndex::from_arena(vec![Entry::new("con", "lone")]);
        assert!(single.prefix_keys("con").is_empty());
    }

    #[test]
    fn prefix_keys_is_case_insensitive() {
        let index = sample();
        assert_eq!(index.prefix_keys("CON"), index.prefix_keys("con"));
    }

    #[test]
    fn resolve_is_case_insensitive_and_id_ordered() {
        let index = sample();
        let upper: HashSet<String> = ["Con Chó con".to_string(), "CON MÈO".to_string()].into();
        let lower: HashSet<String> = ["con chó con".to_string(), "con mèo".to_string()].into();
        let got = index.resolve(&upper);
        assert_eq!(got, index.resolve(&lower));
        // arena order, not input-set order
        assert_eq!(got[0].target, "puppy");
        assert_eq!(got[1].target, "cat");
    }

    #[test]
    fn resolve_returns_every_identity_sharing_a_phrase() {
        let index = EntryIndex::from_arena(vec![
            Entry::new("con chó", "dog"),
            Entry::new("con chó", "hound"),
        ]);
        let got = index.resolve(&HashSet::from(["con chó".to_string()]));
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].target, "dog");
        assert_eq!(got[1].target, "hound");
    }

    #[test]
    fn clear_drops_arena_and_both_indexes() {
        let mut index = sample();
        index.clear();
        assert!(index.is_empty());
        assert!(index.prefix_keys("con").is_empty());
        assert!(index
            .resolve(&HashSet::from(["con chó".to_string()]))
            .is_empty());
    }
}
