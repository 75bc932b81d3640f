//! Process configuration.
//!
//! The port comes from the single CLI argument; everything else comes from
//! the environment with sensible defaults.

use crate::search::solver::Algorithm;
use crate::storage::protocol::DEFAULT_CACHE_FILE;

use std::path::PathBuf;

pub const ENV_CACHE_PATH: &str = "MAZE_CACHE_PATH";
pub const ENV_ALGORITHM: &str = "MAZE_ALGORITHM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub cache_path: PathBuf,
    pub algorithm: Algorithm,
}

impl Config {
    /// Resolve from `std::env::args()` and the process environment.
    pub fn from_env() -> Option<Self> {
        Self::resolve(std::env::args(), |key| std::env::var(key).ok())
    }

    /// `args` includes the program name, as `std::env::args()` does.
    /// Returns `None` unless there is exactly one argument and it is a port.
    pub fn resolve<I, F>(args: I, env: F) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let [_, port] = args.as_slice() else {
            return None;
        };
        let port = port.trim().parse::<u16>().ok()?;

        let cache_path = env(ENV_CACHE_PATH)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE));

        let algorithm = match env(ENV_ALGORITHM) {
            Some(name) => name.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to {}", e, Algorithm::default());
                Algorithm::default()
            }),
            None => Algorithm::default(),
        };

        Some(Self {
            port,
            cache_path,
            algorithm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_single_port_argument() {
        let config = Config::resolve(args(&["maze-server", "5400"]), env_of(&[])).unwrap();

        assert_eq!(config.port, 5400);
        assert_eq!(config.cache_path, PathBuf::from(DEFAULT_CACHE_FILE));
        assert_eq!(config.algorithm, Algorithm::BestFirst);
    }

    #[test]
    fn test_wrong_argument_count_or_port_is_rejected() {
        assert!(Config::resolve(args(&["maze-server"]), env_of(&[])).is_none());
        assert!(Config::resolve(args(&["maze-server", "1", "2"]), env_of(&[])).is_none());
        assert!(Config::resolve(args(&["maze-server", "port"]), env_of(&[])).is_none());
        assert!(Config::resolve(args(&["maze-server", "70000"]), env_of(&[])).is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let env = env_of(&[(ENV_CACHE_PATH, "/tmp/solutions.jsonl"), (ENV_ALGORITHM, "astar")]);

        let config = Config::resolve(args(&["maze-server", "8080"]), env).unwrap();

        assert_eq!(config.cache_path, PathBuf::from("/tmp/solutions.jsonl"));
        assert_eq!(config.algorithm, Algorithm::AStar);
    }

    #[test]
    fn test_unknown_algorithm_falls_back_to_default() {
        let env = env_of(&[(ENV_ALGORITHM, "simulated-annealing")]);

        let config = Config::resolve(args(&["maze-server", "8080"]), env).unwrap();

        assert_eq!(config.algorithm, Algorithm::BestFirst);
    }
}
