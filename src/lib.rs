//! Maze Solving Server Library
//!
//! This library crate defines the modules that make up the server.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`search`**: The generic graph search engine. One frontier-driven loop with
//!   pluggable ordering strategies (uniform cost, A*, depth-first), the grid
//!   search space and path rendering.
//! - **`storage`**: The persistent result cache. An in-memory index backed by an
//!   append-only JSON-lines file that survives restarts.
//! - **`dispatch`**: Request handling. Parses requests, fingerprints problems and
//!   guarantees at most one concurrent solve per fingerprint.
//! - **`server`**: The TCP front end. Frames requests, writes replies and spawns a
//!   task per connection.
//! - **`config`**: Startup configuration from the command line and environment.

pub mod config;
pub mod dispatch;
pub mod search;
pub mod server;
pub mod storage;
