use std::collections::HashMap;
use std::hash::Hash;

/// Value counts that remember the order in which each value was first seen.
///
/// Ties are always resolved in favour of the value encountered first, so a
/// given dataset produces the same mode on every run.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Hash + Eq + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Most frequent value, first-seen on ties. `None` for an empty table.
    pub fn mode(&self) -> Option<&K> {
        self.mode_entry().map(|(key, _)| key)
    }

    /// Most frequent value together with its count.
    pub fn mode_entry(&self) -> Option<(&K, usize)> {
        let mut best: Option<(&K, usize)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, top)| *count > top) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// All values with their counts, most frequent first, first-seen on ties.
    pub fn sorted_by_count(&self) -> Vec<(K, usize)> {
        let mut entries = self.entries.clone();
        // sort_by is stable, so equal counts keep insertion order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Hash + Eq + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}
