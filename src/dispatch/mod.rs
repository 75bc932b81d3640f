//! Request Dispatch Module
//!
//! The orchestration core between the transport and the search engine.
//!
//! ## Architecture Overview
//! - **Canonicalization**: Requests are parsed into a `SearchProblem` and keyed by a SHA-256 `Fingerprint`
//!   of the exact maze text and endpoints.
//! - **Memoization**: Solved fingerprints are answered from the `ResultCache` without searching.
//! - **Deduplication**: At most one solve per fingerprint runs at a time. Concurrent callers wait on
//!   that fingerprint's completion signal, so unrelated problems never block each other.
//! - **Failure fan-out**: A failed solve releases every waiter with the same error and is not cached.
//!
//! ## Submodules
//! - **`dispatcher`**: The `Dispatcher` and its in-flight tracking.
//! - **`fingerprint`**: Cache key derivation.
//! - **`request`**: Line-level request parsing.
//! - **`types`**: Errors, outcomes and counters.

pub mod dispatcher;
pub mod fingerprint;
pub mod request;
pub mod types;
