use crate::search::types::Position;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Cache key for one exact (maze text, start, goal) triple.
///
/// SHA-256 over a domain-separated, length-prefixed encoding, so two
/// different triples cannot be made to share an input byte string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn of(maze_text: &str, start: Position, goal: Position) -> Self {
        let (start, goal) = (start.to_string(), goal.to_string());
        let mut hasher = Sha256::new();
        hasher.update(b"MAZE:v1");
        for field in [maze_text, start.as_str(), goal.as_str()] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
