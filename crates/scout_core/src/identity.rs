use std::collections::HashSet;

use crate::{IssueRecord, UserRecord, VideoRecord};

/// A record with a deduplication key.
pub trait Identified {
    /// The identity used for dedup and diffing; `None` if the record has none.
    fn identity(&self) -> Option<&str>;
}

impl Identified for UserRecord {
    fn identity(&self) -> Option<&str> {
        Some(self.username.as_str()).filter(|name| !name.is_empty())
    }
}

impl Identified for IssueRecord {
    fn identity(&self) -> Option<&str> {
        Some(self.key.as_str()).filter(|key| !key.is_empty())
    }
}

impl Identified for VideoRecord {
    fn identity(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(self.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Ordered collection that keeps the first record seen for each identity.
///
/// Later records with an identity already present are discarded, never merged.
/// Records without an identity are rejected.
#[derive(Debug, Clone)]
pub struct FirstSeen<R> {
    seen: HashSet<String>,
    items: Vec<R>,
}

impl<R> Default for FirstSeen<R> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }
}

impl<R: Identified> FirstSeen<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` unless its identity was already seen. Returns whether it was kept.
    pub fn push(&mut self, record: R) -> bool {
        let Some(identity) = record.identity() else {
            return false;
        };
        if self.seen.contains(identity) {
            return false;
        }
        self.seen.insert(identity.to_string());
        self.items.push(record);
        true
    }

    /// Pushes every record in order; returns how many were kept.
    pub fn extend<I: IntoIterator<Item = R>>(&mut self, records: I) -> usize {
        records
            .into_iter()
            .map(|record| self.push(record))
            .filter(|kept| *kept)
            .count()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<R> {
        self.items
    }
}

impl<R: Identified> FromIterator<R> for FirstSeen<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut merged = Self::new();
        merged.extend(iter);
        merged
    }
}

/// Keeps the first record per identity, preserving order.
pub fn dedupe_first_seen<R, I>(records: I) -> Vec<R>
where
    R: Identified,
    I: IntoIterator<Item = R>,
{
    records.into_iter().collect::<FirstSeen<R>>().into_vec()
}
