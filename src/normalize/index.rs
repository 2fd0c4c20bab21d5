//! Canonical-key lookup index with substring fallback.

use hashbrown::HashMap;

use super::normalize_key;

/// Result of resolving a label against a [`NameIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMatch {
    /// Position of the matched label in the order the index was built from
    pub position: usize,
    /// False when the match came from the substring fallback
    pub exact: bool,
}

/// Lookup index over an ordered list of labels.
///
/// Exact canonical matches win. Otherwise the first label (in build order) whose key
/// contains the query key, or is contained by it, is returned. Blank keys never match.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_key: HashMap<String, usize>,
    keys: Vec<String>,
}

impl NameIndex {
    pub fn build<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = labels
            .into_iter()
            .map(|label| normalize_key(label.as_ref()))
            .collect();

        let mut by_key = HashMap::with_capacity(keys.len());
        for (position, key) in keys.iter().enumerate().filter(|(_, k)| !k.is_empty()) {
            // Duplicate labels resolve to their first occurrence
            by_key.entry(key.clone()).or_insert(position);
        }

        Self { by_key, keys }
    }

    pub fn resolve(&self, label: &str) -> Option<IndexMatch> {
        self.resolve_key(&normalize_key(label))
    }

    /// Same as [`NameIndex::resolve`] for an already canonical key
    pub fn resolve_key(&self, key: &str) -> Option<IndexMatch> {
        if key.is_empty() {
            return None;
        }

        if let Some(&position) = self.by_key.get(key) {
            return Some(IndexMatch {
                position,
                exact: true,
            });
        }

        self.keys
            .iter()
            .position(|candidate| {
                !candidate.is_empty() && (candidate.contains(key) || key.contains(candidate.as_str()))
            })
            .map(|position| IndexMatch {
                position,
                exact: false,
            })
    }

    pub fn key(&self, position: usize) -> Option<&str> {
        self.keys.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
