// src/datum.rs
//! The crawl datum value payload and its metadata sidecar
//!
//! A `CrawlDatum` is the per-record value stored in a crawl database:
//! fetch-scheduling state, scoring, and an auxiliary metadata map. The
//! conversion pass treats everything except the metadata map as opaque.

use crate::key::MetaKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Database-side fetch status of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    /// Known but never fetched.
    #[default]
    Unfetched,
    /// Successfully fetched.
    Fetched,
    /// Permanently failed; no further fetches scheduled.
    Gone,
    /// Temporary redirect recorded at fetch time.
    RedirTemp,
    /// Permanent redirect recorded at fetch time.
    RedirPerm,
    /// Re-fetched and found unmodified.
    NotModified,
}

/// The value payload associated with each record key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlDatum {
    pub status: FetchStatus,
    /// Next scheduled fetch time, epoch milliseconds.
    pub fetch_time: u64,
    /// Fetch attempts since the last success.
    pub retries_since_fetch: u8,
    /// Seconds between scheduled re-fetches.
    pub fetch_interval: u32,
    pub score: f32,
    /// Last modification time reported by the server, epoch milliseconds.
    pub modified_time: u64,
    /// Content signature from the last fetch, if any.
    pub signature: Option<Vec<u8>>,
    pub metadata: MetadataMap,
}

impl CrawlDatum {
    pub fn new(status: FetchStatus, fetch_interval: u32) -> Self {
        Self {
            status,
            fetch_interval,
            ..Self::default()
        }
    }
}

/// Auxiliary key-value sidecar attached to each datum.
///
/// Values are opaque byte strings; keys carry their own encoding tag (see
/// [`MetaKey`]). Backed by an ordered map so serialized output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataMap(BTreeMap<MetaKey, Vec<u8>>);

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert an entry, returning the previous value stored under an equal
    /// key, if any.
    pub fn insert(&mut self, key: MetaKey, value: impl Into<Vec<u8>>) -> Option<Vec<u8>> {
        self.0.insert(key, value.into())
    }

    pub fn get(&self, key: &MetaKey) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &MetaKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetaKey, &[u8])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl IntoIterator for MetadataMap {
    type Item = (MetaKey, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<MetaKey, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(MetaKey, Vec<u8>)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (MetaKey, Vec<u8>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
