use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single cached API payload with its expiry metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub body: Vec<u8>,
    #[serde(default)]
    pub etag: String,
    pub modified: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl CacheEntry {
    /// Build an entry that expires `ttl` from now
    pub fn new(body: Vec<u8>, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            body,
            etag: String::new(),
            modified: now,
            expires: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires
    }
}

/// Errors that can occur during cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
}
