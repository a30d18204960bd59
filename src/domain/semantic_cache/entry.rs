//! Cache entry and its storage identity

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Opaque caller data carried alongside an entry
pub type EntryMetadata = HashMap<String, serde_json::Value>;

/// Storage key of a prompt
///
/// A non-cryptographic 64-bit hash of the prompt bytes, rendered as 16 hex
/// characters. Identical prompts always share a key, so saving the same
/// prompt twice replaces the earlier entry.
pub fn entry_key(prompt: &str) -> String {
    format!("{:016x}", xxh3_64(prompt.as_bytes()))
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// A stored prompt, its embedding and the response to replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    prompt: String,
    embedding: Vec<f32>,
    response: String,
    /// Creation time, epoch milliseconds
    timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<EntryMetadata>,
}

impl CacheEntry {
    /// Create a new entry stamped with the current time
    pub fn new(prompt: impl Into<String>, embedding: Vec<f32>, response: impl Into<String>) -> Self {
        Self::with_timestamp(prompt, embedding, response, now_millis())
    }

    /// Create an entry with an explicit creation time
    pub fn with_timestamp(
        prompt: impl Into<String>,
        embedding: Vec<f32>,
        response: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            embedding,
            response: response.into(),
            timestamp,
            metadata: None,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: EntryMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Storage key of this entry
    pub fn key(&self) -> String {
        entry_key(&self.prompt)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn metadata(&self) -> Option<&EntryMetadata> {
        self.metadata.as_ref()
    }

    /// Age of the entry at `now`, saturating at zero for future timestamps
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the entry has reached `max_age_ms` at `now`
    pub fn is_expired(&self, max_age_ms: u64, now: u64) -> bool {
        self.age_ms(now) >= max_age_ms
    }
}
