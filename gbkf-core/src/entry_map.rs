//! Insertion-ordered collections keyed by entry key.

use std::collections::{HashMap, HashSet};

use crate::entry::KeyedEntry;

/// Decoded container body: key to the entries stored under it.
///
/// Keys iterate in first-appearance order; entries under one key keep the
/// order in which they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedEntries {
    index: HashMap<String, usize>,
    groups: Vec<(String, Vec<KeyedEntry>)>,
}

impl KeyedEntries {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` under `key`, creating the key if it is new.
    pub fn push(&mut self, key: String, entry: KeyedEntry) {
        if let Some(&slot) = self.index.get(&key) {
            self.groups[slot].1.push(entry);
            return;
        }
        self.index.insert(key.clone(), self.groups.len());
        self.groups.push((key, vec![entry]));
    }

    /// Entries stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[KeyedEntry]> {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Whether `key` has at least one entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    /// Key and entry list pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[KeyedEntry])> {
        self.groups
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the map holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all keys.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|(_, entries)| entries.len()).sum()
    }
}

impl IntoIterator for KeyedEntries {
    type Item = (String, Vec<KeyedEntry>);
    type IntoIter = std::vec::IntoIter<(String, Vec<KeyedEntry>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Set of keys remembering the order of first insertion.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    order: Vec<String>,
    lookup: HashSet<String>,
}

impl KeySet {
    /// Inserts `key`; returns `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.lookup.contains(key) {
            return false;
        }
        self.lookup.insert(key.to_owned());
        self.order.push(key.to_owned());
        true
    }

    /// Whether `key` was inserted.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains(key)
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no key was inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.lookup.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_keep_first_appearance_order() {
        let mut entries = KeyedEntries::new();
        entries.push("zz".into(), KeyedEntry::from_values(1, vec![1u8]));
        entries.push("aa".into(), KeyedEntry::from_values(2, vec![2u8]));
        entries.push("zz".into(), KeyedEntry::from_values(3, vec![3u8]));

        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["zz", "aa"]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.entry_count(), 3);

        let ids: Vec<u32> = entries
            .get("zz")
            .unwrap()
            .iter()
            .map(|e| e.instance_id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(entries.get("bb").is_none());
        assert!(entries.contains_key("aa"));
    }

    #[test]
    fn test_into_iter_yields_groups() {
        let mut entries = KeyedEntries::new();
        entries.push("k".into(), KeyedEntry::from_values(1, vec![true]));
        let groups: Vec<_> = entries.into_iter().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "k");
    }

    #[test]
    fn test_key_set() {
        let mut keys = KeySet::default();
        assert!(keys.insert("b"));
        assert!(keys.insert("a"));
        assert!(!keys.insert("b"));
        assert_eq!(keys.as_slice(), &["b".to_owned(), "a".to_owned()]);
        assert!(keys.contains("a"));
        keys.clear();
        assert!(keys.is_empty());
        assert_eq!(keys.len(), 0);
    }
}
