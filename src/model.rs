// src/model.rs

use std::collections::HashMap;

/// A single line of a Contents index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// File path, the first whitespace-delimited token
    pub path: String,
    /// Everything after the first whitespace run, if the line had any
    pub packages: Option<String>,
}

/// Maps a grouping key to the number of index entries it was seen in
pub type PackageCount = HashMap<String, u64>;

/// Package counts ordered by count descending, ties by ascending key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedResult {
    pub entries: Vec<(String, u64)>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` highest-count entries, or all of them when `n` exceeds the length.
    pub fn top(&self, n: usize) -> &[(String, u64)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}
