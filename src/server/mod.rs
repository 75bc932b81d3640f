//! Transport Module
//!
//! Line-oriented TCP front end for the dispatcher.
//!
//! ## Protocol
//! - A client sends maze rows, a start line and a goal line, then the `end` marker.
//! - Carriage returns are dropped, so CRLF clients work unchanged.
//! - On success the server writes the rendered path plus `\n` and closes.
//! - On any failure the server closes without writing anything.
//!
//! ## Submodules
//! - **`connection`**: Reading one request and writing one reply on a stream.
//! - **`listener`**: The accept loop and the periodic stats reporter.

pub mod connection;
pub mod listener;
