//! Frontier-driven graph search.
//!
//! A single loop drives every variant. The only thing a [`Strategy`] decides
//! is where a freshly discovered node sits in the open frontier.

use super::space::SearchSpace;
use super::types::{Cost, NodeId, SearchError, SearchNode, SearchTree, Solution};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier ordering key. Wide enough that no cost sum or discovery count
/// can wrap it.
pub type Priority = u128;

/// Frontier ordering policy. Lower priorities are expanded first; equal
/// priorities are expanded in discovery order.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `discovered` counts every node pushed so far in this solve.
    fn priority(&self, space: &SearchSpace<'_>, node: &SearchNode, discovered: u64) -> Priority;
}

/// Uniform-cost search: cheapest accumulated cost first.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestFirst;

impl Strategy for BestFirst {
    fn name(&self) -> &'static str {
        "best-first"
    }

    fn priority(&self, _space: &SearchSpace<'_>, node: &SearchNode, _discovered: u64) -> Priority {
        Priority::from(node.cost)
    }
}

/// A*: accumulated cost plus Manhattan distance scaled by the cheapest step.
///
/// No step costs less than the cheapest walkable cell, so the estimate never
/// overshoots.
#[derive(Debug, Default, Clone, Copy)]
pub struct AStar;

impl Strategy for AStar {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn priority(&self, space: &SearchSpace<'_>, node: &SearchNode, _discovered: u64) -> Priority {
        let distance = Priority::from(node.position.manhattan(space.goal()));
        let estimate = distance * Priority::from(space.min_step_cost());
        Priority::from(node.cost) + estimate
    }
}

/// Depth-first: the most recently discovered node is expanded next.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthFirst;

impl Strategy for DepthFirst {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn priority(&self, _space: &SearchSpace<'_>, _node: &SearchNode, discovered: u64) -> Priority {
        Priority::from(u64::MAX - discovered)
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
struct FrontierEntry {
    priority: Priority,
    seq: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest priority, then the oldest.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    seq: u64,
}

impl Frontier {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, strategy: &dyn Strategy, space: &SearchSpace<'_>, tree: &SearchTree, id: NodeId) {
        let priority = strategy.priority(space, tree.get(id), self.seq);
        self.heap.push(FrontierEntry {
            priority,
            seq: self.seq,
            node: id,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }
}

/// Run `strategy` over `space` until the goal is popped or the frontier
/// runs dry.
pub fn search(space: &SearchSpace<'_>, strategy: &dyn Strategy) -> Result<Solution, SearchError> {
    let cells = space.cell_count();
    // Best cost a position has been discovered at, and the cost it was expanded at.
    let mut recorded: Vec<Option<Cost>> = vec![None; cells];
    let mut closed: Vec<Option<Cost>> = vec![None; cells];

    let mut tree = SearchTree::new();
    let mut frontier = Frontier::new();
    let mut nbuf = Vec::with_capacity(4);
    let mut expanded = 0usize;

    let root = space.initial_state();
    let root_idx = space
        .index(root.position)
        .ok_or(SearchError::OutOfBounds(root.position))?;
    recorded[root_idx] = Some(0);
    let root_id = tree.push(root);
    frontier.push(strategy, space, &tree, root_id);

    while let Some(current_id) = frontier.pop() {
        let current = *tree.get(current_id);

        if space.is_goal(&current) {
            tracing::trace!(
                strategy = strategy.name(),
                expanded,
                discovered = tree.len(),
                cost = current.cost,
                "goal reached"
            );
            return Ok(Solution {
                tree,
                terminal: current_id,
                expanded,
            });
        }

        let Some(ci) = space.index(current.position) else {
            continue;
        };
        if closed[ci].is_some_and(|c| c <= current.cost) {
            continue;
        }
        closed[ci] = Some(current.cost);
        expanded += 1;

        nbuf.clear();
        space.neighbors(current.position, &mut nbuf);

        for &(next, step) in nbuf.iter() {
            let Some(ni) = space.index(next) else {
                continue;
            };
            let candidate = current.cost.saturating_add(step);
            if recorded[ni].is_some_and(|best| candidate >= best) {
                continue;
            }
            recorded[ni] = Some(candidate);

            let id = tree.push(SearchNode {
                position: next,
                cost: candidate,
                parent: Some(current_id),
            });
            frontier.push(strategy, space, &tree, id);
        }
    }

    tracing::trace!(
        strategy = strategy.name(),
        expanded,
        discovered = tree.len(),
        "frontier exhausted"
    );
    Err(SearchError::NoSolution)
}
