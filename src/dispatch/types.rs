use crate::search::types::SearchError;

use std::sync::atomic::{AtomicU64, Ordering};

/// Why a request produced no reply.
///
/// `Clone` because one failed solve is fanned out to every waiter on the
/// same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no path found")]
    NoPathFound,

    #[error("failed to persist solution: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SearchError> for DispatchError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoSolution => DispatchError::NoPathFound,
            other => DispatchError::BadRequest(other.to_string()),
        }
    }
}

/// What every waiter on a fingerprint eventually receives.
pub type Outcome = Result<String, DispatchError>;

/// Running counters, reported periodically by the server.
#[derive(Debug, Default)]
pub struct DispatchStats {
    pub requests: AtomicU64,
    pub cache_hits: AtomicU64,
    pub solves: AtomicU64,
    pub joined: AtomicU64,
    pub failures: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub solves: u64,
    pub joined: u64,
    pub failures: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            solves: self.solves.load(Ordering::Relaxed),
            joined: self.joined.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
