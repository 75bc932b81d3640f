use super::engine::{AStar, BestFirst, DepthFirst, Strategy, search};
use super::space::SearchSpace;
use super::types::{SearchError, SearchProblem, Solution};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search variant selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    BestFirst,
    AStar,
    DepthFirst,
}

impl Algorithm {
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Algorithm::BestFirst => Box::new(BestFirst),
            Algorithm::AStar => Box::new(AStar),
            Algorithm::DepthFirst => Box::new(DepthFirst),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::BestFirst => "best-first",
            Algorithm::AStar => "astar",
            Algorithm::DepthFirst => "dfs",
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-first" | "bestfirst" | "uniform-cost" | "ucs" => Ok(Algorithm::BestFirst),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "dfs" | "depth-first" => Ok(Algorithm::DepthFirst),
            other => Err(format!("unknown search algorithm: {}", other)),
        }
    }
}

/// Anything that can turn a problem into a solved search tree.
pub trait Solve: Send + Sync {
    fn solve(&self, problem: &SearchProblem) -> Result<Solution, SearchError>;
}

/// Runs one fixed [`Strategy`] to completion per call. No retries.
pub struct Solver {
    strategy: Box<dyn Strategy>,
}

impl Solver {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            strategy: algorithm.strategy(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl Solve for Solver {
    fn solve(&self, problem: &SearchProblem) -> Result<Solution, SearchError> {
        let space = SearchSpace::new(problem);
        search(&space, self.strategy.as_ref())
    }
}
