use super::types::{Cost, Direction, Position, SearchNode, SearchProblem};

/// Walkable view of a [`SearchProblem`]: where to start, where to go next,
/// and when to stop.
pub struct SearchSpace<'a> {
    problem: &'a SearchProblem,
}

impl<'a> SearchSpace<'a> {
    pub fn new(problem: &'a SearchProblem) -> Self {
        Self { problem }
    }

    pub fn goal(&self) -> Position {
        self.problem.goal
    }

    /// Root of the search tree: the start cell, reached for free.
    pub fn initial_state(&self) -> SearchNode {
        SearchNode {
            position: self.problem.start,
            cost: 0,
            parent: None,
        }
    }

    /// Append the walkable orthogonal neighbors of `p` into `buf`, paired
    /// with the cost of stepping onto them. The caller clears `buf`.
    ///
    /// Order is always down, up, left, right.
    pub fn neighbors(&self, p: Position, buf: &mut Vec<(Position, Cost)>) {
        for direction in Direction::ALL {
            let next = p.step(direction);
            if let Some(cost) = self.problem.maze.cost(next) {
                buf.push((next, cost));
            }
        }
    }

    pub fn is_goal(&self, node: &SearchNode) -> bool {
        node.position == self.problem.goal
    }

    /// Flat cell index used for the per-solve cost tables.
    pub fn index(&self, p: Position) -> Option<usize> {
        self.problem.maze.index(p)
    }

    pub fn cell_count(&self) -> usize {
        self.problem.maze.len()
    }

    /// Lower bound on the cost of any single step.
    pub fn min_step_cost(&self) -> Cost {
        self.problem.maze.min_cost()
    }
}
