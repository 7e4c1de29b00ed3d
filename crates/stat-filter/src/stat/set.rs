//! Stat sets: lookup tables from textual identifiers to stats.

use std::collections::HashMap;
use std::fmt;

use strsim::levenshtein;

use super::StatRef;

/// Maximum Levenshtein distance to consider an identifier as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Resolves textual stat identifiers to stats.
///
/// This is the only capability the compact JSON decoder needs from a stat
/// set, so callers with their own registries can implement it directly.
pub trait StatLookup<T> {
    /// Finds the stat with the given identifier.
    fn find(&self, identifier: &str) -> Option<StatRef<T>>;
}

impl<T> StatLookup<T> for [StatRef<T>] {
    fn find(&self, identifier: &str) -> Option<StatRef<T>> {
        self.iter()
            .find(|s| s.identifier_name() == identifier)
            .cloned()
    }
}

impl<T> StatLookup<T> for Vec<StatRef<T>> {
    fn find(&self, identifier: &str) -> Option<StatRef<T>> {
        self.as_slice().find(identifier)
    }
}

impl<T> StatLookup<T> for HashMap<String, StatRef<T>> {
    fn find(&self, identifier: &str) -> Option<StatRef<T>> {
        self.get(identifier).cloned()
    }
}

/// A named group of stats, in display order.
pub struct StatGroup<T> {
    /// Group name (e.g. "Scoring").
    pub name: String,
    /// Stats in this group.
    pub stats: Vec<StatRef<T>>,
}

/// An ordered collection of stat groups.
///
/// Lookup walks the groups in order and returns the first stat whose
/// identifier matches.
pub struct StatSet<T> {
    groups: Vec<StatGroup<T>>,
}

impl<T> Default for StatSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StatSet<T> {
    /// Creates an empty stat set.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Adds a group of stats, returning the updated set.
    pub fn with_group(mut self, name: impl Into<String>, stats: Vec<StatRef<T>>) -> Self {
        self.groups.push(StatGroup {
            name: name.into(),
            stats,
        });
        self
    }

    /// Adds a stat to the named group, creating the group if needed.
    pub fn insert(&mut self, group: &str, stat: StatRef<T>) {
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.stats.push(stat),
            None => self.groups.push(StatGroup {
                name: group.to_string(),
                stats: vec![stat],
            }),
        }
    }

    /// Returns the groups in order.
    pub fn groups(&self) -> &[StatGroup<T>] {
        &self.groups
    }

    /// Iterates over every stat in group order.
    pub fn iter(&self) -> impl Iterator<Item = &StatRef<T>> {
        self.groups.iter().flat_map(|g| g.stats.iter())
    }

    /// Returns the total number of stats across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.stats.len()).sum()
    }

    /// Returns true if the set holds no stats.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Suggests the closest known identifier for an unknown one.
    ///
    /// Comparison ignores case. Returns `None` for exact matches and for
    /// identifiers that are not within a small edit distance of any known stat.
    pub fn suggest(&self, identifier: &str) -> Option<&str> {
        let query = identifier.to_lowercase();

        let (best, distance) = self
            .iter()
            .map(|s| s.identifier_name())
            .filter(|name| !name.is_empty())
            .map(|name| (name, levenshtein(&query, &name.to_lowercase())))
            .min_by_key(|(_, d)| *d)?;

        if best != identifier && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best)
        } else {
            None
        }
    }
}

impl<T> fmt::Debug for StatGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identifiers: Vec<&str> = self.stats.iter().map(|s| s.identifier_name()).collect();
        f.debug_struct("StatGroup")
            .field("name", &self.name)
            .field("stats", &identifiers)
            .finish()
    }
}

impl<T> fmt::Debug for StatSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatSet")
            .field("groups", &self.groups)
            .finish()
    }
}

impl<T> StatLookup<T> for StatSet<T> {
    fn find(&self, identifier: &str) -> Option<StatRef<T>> {
        self.iter()
            .find(|s| s.identifier_name() == identifier)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::stat::{FnStat, StatValue};

    fn stat(id: &str) -> StatRef<f64> {
        Arc::new(FnStat::new(id, id.to_uppercase(), |v: &f64| StatValue::Number(*v)))
    }

    fn sample_set() -> StatSet<f64> {
        StatSet::new()
            .with_group("Scoring", vec![stat("total"), stat("auto")])
            .with_group("Penalties", vec![stat("penalty"), stat("total")])
    }

    #[test]
    fn test_find_first_match_in_group_order() {
        let set = sample_set();
        let found = set.find("total").unwrap();
        assert_eq!(found.identifier_name(), "total");

        // First "total" lives in the first group.
        let first = &set.groups()[0].stats[0];
        assert!(Arc::ptr_eq(&found, first));
    }

    #[test]
    fn test_find_missing_returns_none() {
        assert!(sample_set().find("endgame").is_none());
    }

    #[test]
    fn test_len_counts_all_groups() {
        let set = sample_set();
        assert_eq!(set.len(), 4);
        assert!(!set.is_empty());
        assert!(StatSet::<f64>::new().is_empty());
    }

    #[test]
    fn test_insert_appends_to_existing_group() {
        let mut set = StatSet::new();
        set.insert("Scoring", stat("total"));
        set.insert("Scoring", stat("auto"));
        set.insert("Other", stat("rank"));

        assert_eq!(set.groups().len(), 2);
        assert_eq!(set.groups()[0].stats.len(), 2);
    }

    #[test]
    fn test_debug_lists_groups_and_identifiers() {
        let set = StatSet::new().with_group("Scoring", vec![stat("total"), stat("auto")]);
        assert_eq!(
            format!("{set:?}"),
            r#"StatSet { groups: [StatGroup { name: "Scoring", stats: ["total", "auto"] }] }"#
        );
    }

    #[test]
    fn test_suggest_close_identifier() {
        let set = sample_set();
        assert_eq!(set.suggest("totl"), Some("total"));
        assert_eq!(set.suggest("PENALTY"), Some("penalty"));
        assert_eq!(set.suggest("total"), None);
        assert_eq!(set.suggest("completely-different"), None);
    }

    #[test]
    fn test_slice_and_map_lookups() {
        let stats = vec![stat("a"), stat("b")];
        assert!(stats.find("b").is_some());
        assert!(stats.find("c").is_none());

        let map: HashMap<String, StatRef<f64>> =
            stats.iter().map(|s| (s.identifier_name().to_string(), s.clone())).collect();
        assert!(map.find("a").is_some());
    }
}
