//! Cache File Format
//!
//! The cache file is append-only JSON Lines: one [`CacheRecord`] per line.
//! A record is only ever appended, never rewritten, so a crash mid-append can
//! at worst leave one torn trailing line, which the loader skips.

use crate::dispatch::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};

/// Default cache file name, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "matrix.txt";

/// A single persisted cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Hex SHA-256 key of the solved problem.
    pub fingerprint: Fingerprint,
    /// The rendered reply, without its trailing newline.
    pub solution: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
