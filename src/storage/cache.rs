use super::protocol::{CacheRecord, StorageError};
use crate::dispatch::fingerprint::Fingerprint;

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable append-only destination for encoded cache records.
pub trait RecordLog: Send {
    /// Bytes currently in the log.
    fn committed_len(&mut self) -> io::Result<u64>;

    /// Write `bytes` at the end and make them durable.
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Drop everything past `len`.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl RecordLog for File {
    fn committed_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()?;
        self.sync_data()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }
}

/// A [`RecordLog`] plus whether its tail may hold a partial record.
struct LogWriter {
    sink: Box<dyn RecordLog>,
    torn: bool,
}

impl LogWriter {
    /// Append one newline-terminated record. A failed append is rolled back
    /// so the next record never lands on the same line as a fragment.
    fn append_record(&mut self, line: &[u8]) -> io::Result<()> {
        if self.torn {
            self.sink.append(b"\n")?;
            self.torn = false;
        }

        let committed = self.sink.committed_len()?;
        let result = self.sink.append(line);
        if result.is_err() {
            if let Err(e) = self.sink.truncate(committed) {
                tracing::error!("Failed to roll back partial cache record: {}", e);
                self.torn = true;
            }
        }
        result
    }
}

/// Memoized solutions keyed by problem fingerprint.
///
/// Reads go straight to the in-memory `DashMap`. Writes are appended to the
/// backing log and synced before they become visible in memory.
pub struct ResultCache {
    entries: DashMap<Fingerprint, String>,
    log: Option<Mutex<LogWriter>>,
    path: Option<PathBuf>,
}

impl ResultCache {
    /// A cache with no backing file.
    pub fn in_memory() -> Self {
        Self {
            entries: DashMap::new(),
            log: None,
            path: None,
        }
    }

    /// An empty cache persisting to `log`.
    pub fn with_log(log: Box<dyn RecordLog>) -> Self {
        Self {
            entries: DashMap::new(),
            log: Some(Mutex::new(LogWriter {
                sink: log,
                torn: false,
            })),
            path: None,
        }
    }

    /// Open (creating if needed) the cache file at `path` and load every
    /// record from it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open cache file {}", path.display()))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read cache file {}", path.display()))?;

        let entries = DashMap::new();
        let mut skipped = 0usize;
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CacheRecord>(line) {
                Ok(record) => {
                    entries.insert(record.fingerprint, record.solution);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping unreadable cache line {}: {}", lineno + 1, e);
                }
            }
        }

        // A torn final record has no newline; terminate it so the next
        // append starts on a fresh line.
        if !contents.is_empty() && !contents.ends_with('\n') {
            file.write_all(b"\n")?;
            file.sync_data()?;
        }

        tracing::info!(
            "Loaded {} cached solutions from {} ({} skipped)",
            entries.len(),
            path.display(),
            skipped
        );

        Ok(Self {
            entries,
            log: Some(Mutex::new(LogWriter {
                sink: Box::new(file),
                torn: false,
            })),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn exists(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<String> {
        self.entries
            .get(fingerprint)
            .map(|entry| entry.value().clone())
    }

    /// Persist `solution` under `fingerprint`, then publish it in memory.
    ///
    /// Blocks on file I/O; async callers should run it on a blocking thread.
    /// On error nothing is published.
    pub fn put(&self, fingerprint: Fingerprint, solution: String) -> Result<(), StorageError> {
        if let Some(log) = &self.log {
            let record = CacheRecord {
                fingerprint: fingerprint.clone(),
                solution: solution.clone(),
            };
            let mut line = serde_json::to_vec(&record)?;
            line.push(b'\n');

            let mut writer = log.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            writer.append_record(&line)?;
        }

        tracing::debug!("Cached solution for {}", fingerprint.short());
        self.entries.insert(fingerprint, solution);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
