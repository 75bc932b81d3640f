//! Result Storage Module
//!
//! Implements the persistent memo of solved problems.
//!
//! ## Core Concepts
//! - **Keying**: Entries are keyed by the problem `Fingerprint`, never by anything lossy.
//! - **Durability**: Every write is appended to the cache file and synced before it becomes readable.
//! - **Access**: `ResultCache` serves lookups from an in-memory `DashMap` loaded at startup.
//! - **Growth**: Entries are never mutated or evicted once written.

pub mod cache;
pub mod protocol;

#[cfg(test)]
mod tests;
