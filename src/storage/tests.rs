//! Storage Module Tests
//!
//! Validates the in-memory memo and its append-only backing file.
//!
//! ## Test Scopes
//! - **ResultCache (memory)**: exists/get/put semantics.
//! - **ResultCache (file)**: Reload after restart, torn-line recovery, last-write-wins.
//! - **Fingerprint**: Determinism and sensitivity to every field.

#[cfg(test)]
mod tests {
    use crate::dispatch::fingerprint::Fingerprint;
    use crate::search::types::Position;
    use crate::storage::cache::{RecordLog, ResultCache};
    use crate::storage::protocol::{CacheRecord, StorageError};
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Cache file path inside a fresh directory removed on drop.
    fn temp_cache_path() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.txt");
        (dir, path)
    }

    /// In-memory log whose next append can be made to fail partway through.
    #[derive(Clone, Default)]
    struct MemoryLog {
        bytes: Arc<Mutex<Vec<u8>>>,
        fail_after: Arc<Mutex<Option<usize>>>,
        refuse_truncate: bool,
    }

    impl MemoryLog {
        fn fail_next_append_after(&self, written: usize) {
            *self.fail_after.lock().unwrap() = Some(written);
        }

        fn records(&self) -> Vec<Result<CacheRecord, serde_json::Error>> {
            let bytes = self.bytes.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(serde_json::from_str)
                .collect()
        }
    }

    impl RecordLog for MemoryLog {
        fn committed_len(&mut self) -> io::Result<u64> {
            Ok(self.bytes.lock().unwrap().len() as u64)
        }

        fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
            let mut buf = self.bytes.lock().unwrap();
            match self.fail_after.lock().unwrap().take() {
                Some(written) => {
                    buf.extend_from_slice(&bytes[..written.min(bytes.len())]);
                    Err(io::Error::other("no space left on device"))
                }
                None => {
                    buf.extend_from_slice(bytes);
                    Ok(())
                }
            }
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            if self.refuse_truncate {
                return Err(io::Error::other("truncate refused"));
            }
            self.bytes.lock().unwrap().truncate(len as usize);
            Ok(())
        }
    }

    fn fp(maze: &str) -> Fingerprint {
        Fingerprint::of(maze, Position::new(0, 0), Position::new(1, 1))
    }

    // ============================================================
    // FINGERPRINT TESTS
    // ============================================================

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Fingerprint::of("1,1\n1,1", Position::new(0, 0), Position::new(1, 1));
        let b = Fingerprint::of("1,1\n1,1", Position::new(0, 0), Position::new(1, 1));

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_distinguishes_every_field() {
        let base = Fingerprint::of("1,1\n1,1", Position::new(0, 0), Position::new(1, 1));

        assert_ne!(base, Fingerprint::of("1,1\n1,2", Position::new(0, 0), Position::new(1, 1)));
        assert_ne!(base, Fingerprint::of("1,1\n1,1", Position::new(0, 1), Position::new(1, 1)));
        assert_ne!(base, Fingerprint::of("1,1\n1,1", Position::new(0, 0), Position::new(1, 0)));
    }

    #[test]
    fn test_fingerprint_swapping_endpoints_changes_key() {
        let forward = Fingerprint::of("1,1", Position::new(0, 0), Position::new(0, 1));
        let backward = Fingerprint::of("1,1", Position::new(0, 1), Position::new(0, 0));

        assert_ne!(forward, backward);
    }

    // ============================================================
    // IN-MEMORY CACHE TESTS
    // ============================================================

    #[test]
    fn test_put_then_get() {
        let cache = ResultCache::in_memory();
        let key = fp("1,1\n1,1");

        assert!(cache.path().is_none());
        assert!(!cache.exists(&key));
        assert_eq!(cache.get(&key), None);

        cache.put(key.clone(), "Down (1),Right (2)".to_string()).unwrap();

        assert!(cache.exists(&key));
        assert_eq!(cache.get(&key).as_deref(), Some("Down (1),Right (2)"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_same_key_last_write_wins() {
        let cache = ResultCache::in_memory();
        let key = fp("1");

        cache.put(key.clone(), "first".to_string()).unwrap();
        cache.put(key.clone(), "second".to_string()).unwrap();

        assert_eq!(cache.get(&key).as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_solution_is_a_valid_entry() {
        let cache = ResultCache::in_memory();
        let key = fp("1");

        cache.put(key.clone(), String::new()).unwrap();

        assert!(cache.exists(&key));
        assert_eq!(cache.get(&key).as_deref(), Some(""));
    }

    // ============================================================
    // FILE-BACKED CACHE TESTS
    // ============================================================

    #[test]
    fn test_entries_survive_reopen() {
        let (_dir, path) = temp_cache_path();
        let key_a = fp("1,1\n1,1");
        let key_b = fp("2,2\n2,2");

        {
            let cache = ResultCache::open(&path).unwrap();
            assert!(cache.is_empty());
            cache.put(key_a.clone(), "Down (1)".to_string()).unwrap();
            cache.put(key_b.clone(), "Right (2)".to_string()).unwrap();
        }

        let reopened = ResultCache::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&key_a).as_deref(), Some("Down (1)"));
        assert_eq!(reopened.get(&key_b).as_deref(), Some("Right (2)"));
    }

    #[test]
    fn test_file_is_json_lines() {
        let (_dir, path) = temp_cache_path();
        let key = fp("1");

        let cache = ResultCache::open(&path).unwrap();
        cache.put(key.clone(), "Up (3)".to_string()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: CacheRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.fingerprint, key);
        assert_eq!(record.solution, "Up (3)");
    }

    #[test]
    fn test_torn_trailing_line_is_skipped_and_recovered() {
        let (_dir, path) = temp_cache_path();
        let good = fp("1");
        let later = fp("2");

        {
            let mut file = std::fs::File::create(&path).unwrap();
            let record = CacheRecord {
                fingerprint: good.clone(),
                solution: "Left (1)".to_string(),
            };
            writeln!(file, "{}", serde_json::to_string(&record).unwrap()).unwrap();
            write!(file, "{{\"fingerprint\":\"abc").unwrap();
        }

        let cache = ResultCache::open(&path).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&good).as_deref(), Some("Left (1)"));

        // The next append must not be glued onto the torn line.
        cache.put(later.clone(), "Right (9)".to_string()).unwrap();
        drop(cache);

        let reopened = ResultCache::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&later).as_deref(), Some("Right (9)"));
    }

    #[test]
    fn test_duplicate_keys_on_disk_last_wins() {
        let (_dir, path) = temp_cache_path();
        let key = fp("1");

        {
            let cache = ResultCache::open(&path).unwrap();
            cache.put(key.clone(), "old".to_string()).unwrap();
            cache.put(key.clone(), "new".to_string()).unwrap();
        }

        let reopened = ResultCache::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(&key).as_deref(), Some("new"));
    }

    #[test]
    fn test_open_fails_for_directory_path() {
        let dir = TempDir::new().unwrap();
        assert!(ResultCache::open(dir.path()).is_err());
    }

    // ============================================================
    // FAILED APPEND TESTS
    // ============================================================

    #[test]
    fn test_partial_append_is_rolled_back() {
        // ARRANGE
        let log = MemoryLog::default();
        let cache = ResultCache::with_log(Box::new(log.clone()));
        let (first, failed, after) = (fp("1"), fp("2"), fp("3"));
        cache.put(first.clone(), "Down (1)".to_string()).unwrap();

        // ACT: The second record is cut off after a few bytes
        log.fail_next_append_after(10);
        let result = cache.put(failed.clone(), "Up (2)".to_string());
        cache.put(after.clone(), "Left (3)".to_string()).unwrap();

        // ASSERT: No fragment remains and the later record is intact
        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(!cache.exists(&failed));
        let keys: Vec<Fingerprint> = log
            .records()
            .into_iter()
            .map(|record| record.unwrap().fingerprint)
            .collect();
        assert_eq!(keys, vec![first, after]);
    }

    #[test]
    fn test_unrecoverable_fragment_is_fenced_off_with_newline() {
        // ARRANGE
        let log = MemoryLog {
            refuse_truncate: true,
            ..MemoryLog::default()
        };
        let cache = ResultCache::with_log(Box::new(log.clone()));

        // ACT
        log.fail_next_append_after(10);
        assert!(cache.put(fp("1"), "Down (1)".to_string()).is_err());
        cache.put(fp("2"), "Right (2)".to_string()).unwrap();

        // ASSERT: The fragment sits on its own line; the next record parses
        let records = log.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_err());
        assert_eq!(records[1].as_ref().unwrap().fingerprint, fp("2"));
        assert!(cache.exists(&fp("2")));
    }
}
