use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accumulated or per-step traversal cost.
pub type Cost = u64;

/// A grid coordinate, `row` first. Written on the wire as `row,col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc)
    }

    pub fn manhattan(self, other: Position) -> u64 {
        ((self.row - other.row).unsigned_abs() + (self.col - other.col).unsigned_abs()) as u64
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SearchError::InvalidPosition(s.to_string()));
        };
        let row = row
            .parse()
            .map_err(|_| SearchError::InvalidPosition(s.to_string()))?;
        let col = col
            .parse()
            .map_err(|_| SearchError::InvalidPosition(s.to_string()))?;
        Ok(Self::new(row, col))
    }
}

/// One of the four moves between orthogonally adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    Left,
    Right,
}

impl Direction {
    /// Neighbor enumeration order. Tie-breaking in the search depends on it.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` offset of this move.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (1, 0),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The move that leads from `from` to `to`, if they are orthogonal neighbors.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.row - from.row, to.col - from.col);
        Self::ALL.into_iter().find(|d| d.delta() == delta)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Down => "Down",
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Down" => Ok(Direction::Down),
            "Up" => Ok(Direction::Up),
            "Left" => Ok(Direction::Left),
            "Right" => Ok(Direction::Right),
            other => Err(SearchError::InvalidDirection(other.to_string())),
        }
    }
}

/// A single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Walkable; entering the cell costs this much.
    Open(Cost),
    Wall,
}

/// Rectangular grid of cells, parsed from comma-separated rows.
///
/// Any negative value marks a wall; every other value is the cost of
/// stepping onto that cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Maze {
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, SearchError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(SearchError::InvalidMaze("maze is empty".to_string()));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(SearchError::InvalidMaze(format!(
                "row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }

        let height = rows.len();
        Ok(Self {
            cells: rows.into_iter().flatten().collect(),
            rows: height,
            cols,
        })
    }

    pub fn parse(text: &str) -> Result<Self, SearchError> {
        let rows = text
            .lines()
            .enumerate()
            .map(|(r, line)| {
                line.split(',')
                    .map(str::trim)
                    .map(|value| match value.parse::<i64>() {
                        Ok(cost) if cost < 0 => Ok(Cell::Wall),
                        Ok(cost) => Ok(Cell::Open(cost as Cost)),
                        Err(_) => Err(SearchError::InvalidMaze(format!(
                            "row {}: bad cell {:?}",
                            r, value
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `p`, or `None` when it falls outside the grid.
    pub fn index(&self, p: Position) -> Option<usize> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        let (r, c) = (p.row as usize, p.col as usize);
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    pub fn cell(&self, p: Position) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Step cost of `p`, or `None` for walls and out-of-bounds positions.
    pub fn cost(&self, p: Position) -> Option<Cost> {
        match self.cell(p)? {
            Cell::Open(cost) => Some(cost),
            Cell::Wall => None,
        }
    }

    /// Cheapest walkable cell; zero when the maze has no walkable cells.
    pub fn min_cost(&self) -> Cost {
        self.cells
            .iter()
            .filter_map(|cell| match cell {
                Cell::Open(cost) => Some(*cost),
                Cell::Wall => None,
            })
            .min()
            .unwrap_or(0)
    }
}

/// A maze with validated endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProblem {
    pub maze: Maze,
    pub start: Position,
    pub goal: Position,
}

impl SearchProblem {
    pub fn new(maze: Maze, start: Position, goal: Position) -> Result<Self, SearchError> {
        for p in [start, goal] {
            match maze.cell(p) {
                None => return Err(SearchError::OutOfBounds(p)),
                Some(Cell::Wall) => return Err(SearchError::Blocked(p)),
                Some(Cell::Open(_)) => {}
            }
        }
        Ok(Self { maze, start, goal })
    }
}

/// Index of a node inside its [`SearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A discovered position, the cost of reaching it, and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Position,
    pub cost: Cost,
    pub parent: Option<NodeId>,
}

/// Arena holding every node discovered during one solve.
///
/// Parents are indices into the arena, so the predecessor links can only
/// point at nodes that were pushed earlier.
#[derive(Debug, Default, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) -> NodeId {
        debug_assert!(node.parent.is_none_or(|p| p.0 < self.nodes.len()));
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes from the root to `id`, inclusive.
    pub fn path_to(&self, id: NodeId) -> Vec<SearchNode> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current);
            path.push(*node);
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// A finished search: the arena plus the node that reached the goal.
#[derive(Debug, Clone)]
pub struct Solution {
    pub tree: SearchTree,
    pub terminal: NodeId,
    /// Number of nodes expanded before the goal was popped.
    pub expanded: usize,
}

impl Solution {
    pub fn terminal(&self) -> &SearchNode {
        self.tree.get(self.terminal)
    }

    pub fn total_cost(&self) -> Cost {
        self.terminal().cost
    }

    pub fn path(&self) -> Vec<SearchNode> {
        self.tree.path_to(self.terminal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no path from start to goal")]
    NoSolution,

    #[error("position {0} is outside the maze")]
    OutOfBounds(Position),

    #[error("position {0} is a wall")]
    Blocked(Position),

    #[error("invalid maze: {0}")]
    InvalidMaze(String),

    #[error("invalid position: {0:?}")]
    InvalidPosition(String),

    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
}
