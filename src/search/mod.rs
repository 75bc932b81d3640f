//! Search Engine Module
//!
//! Finds cheapest paths through cost-weighted mazes.
//!
//! ## Overview
//! A maze is a rectangular grid of per-cell step costs with walls. A
//! `SearchProblem` pairs a maze with validated start and goal cells; the
//! engine explores it from the start until the goal is popped off the
//! frontier.
//!
//! ## Responsibilities
//! - **Modelling**: Parsing mazes and positions, validating endpoints.
//! - **Expansion**: Enumerating walkable neighbors in a fixed order so results are reproducible.
//! - **Traversal**: One frontier loop shared by uniform-cost, A* and depth-first variants.
//! - **Rendering**: Turning the predecessor chain into the `Direction (cost)` wire format.
//!
//! ## Submodules
//! - **`types`**: Positions, mazes, problems and the node arena.
//! - **`space`**: The `SearchSpace` view (initial state, neighbors, goal test).
//! - **`engine`**: The frontier loop and the `Strategy` variants.
//! - **`solver`**: The `Solve` entry point that pins one variant.
//! - **`render`**: Path rendering and its inverse.

pub mod engine;
pub mod render;
pub mod solver;
pub mod space;
pub mod types;
