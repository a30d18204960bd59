//! Lookup results and statistics

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::CacheEntry;

/// Outcome of a semantic cache lookup
///
/// `similarity` is the best score observed among candidates. It is present on
/// every hit and on a miss that had at least one candidate; it is absent when
/// there was nothing to compare against or the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub hit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<CacheEntry>,
}

impl QueryResult {
    /// A hit on `entry` with the given score
    pub fn hit(entry: CacheEntry, similarity: f32) -> Self {
        Self {
            hit: true,
            response: Some(entry.response().to_string()),
            similarity: Some(similarity),
            entry: Some(entry),
        }
    }

    /// A miss, carrying the best score seen if any candidate existed
    pub fn miss(similarity: Option<f32>) -> Self {
        Self {
            hit: false,
            response: None,
            similarity,
            entry: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

/// Aggregate view of the entries under one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of stored entries
    pub total_entries: usize,
    /// Smallest entry timestamp (epoch ms)
    pub oldest_entry: Option<u64>,
    /// Largest entry timestamp (epoch ms)
    pub newest_entry: Option<u64>,
}

impl CacheStats {
    /// Aggregate a set of entries
    pub fn from_entries(entries: &[CacheEntry]) -> Self {
        Self {
            total_entries: entries.len(),
            oldest_entry: entries.iter().map(CacheEntry::timestamp).min(),
            newest_entry: entries.iter().map(CacheEntry::timestamp).max(),
        }
    }
}

/// In-process lookup counters of one engine
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    fail_open: AtomicU64,
}

impl CacheCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A lookup that failed and was answered with a miss
    pub fn record_fail_open(&self) {
        self.fail_open.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fail_open: self.fail_open.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub hits: u64,
    /// Misses, including fail-open lookups
    pub misses: u64,
    pub fail_open: u64,
}

impl CounterSnapshot {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}
