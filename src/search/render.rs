//! Wire rendering of solved paths: `Down (1),Right (2),...`.

use super::types::{Cost, Direction, Position, Solution};

use regex::Regex;
use std::sync::LazyLock;

pub const SEPARATOR: &str = ",";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Down|Up|Left|Right) \((\d+)\)$").expect("token pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("non-adjacent step from {from} to {to}")]
    InvalidStep { from: Position, to: Position },

    #[error("invalid direction token: {0:?}")]
    InvalidToken(String),
}

/// Render the solution as comma-separated `Direction (cumulativeCost)` tokens
/// in start-to-goal order. A zero-length path renders as an empty string.
pub fn render_path(solution: &Solution) -> Result<String, RenderError> {
    let mut tokens = Vec::new();
    let mut current = solution.terminal();

    while let Some(parent_id) = current.parent {
        let parent = solution.tree.get(parent_id);
        let direction = Direction::between(parent.position, current.position).ok_or(
            RenderError::InvalidStep {
                from: parent.position,
                to: current.position,
            },
        )?;
        tokens.push(format!("{} ({})", direction, current.cost));
        current = parent;
    }

    tokens.reverse();
    Ok(tokens.join(SEPARATOR))
}

/// Parse a rendered reply back into its moves.
pub fn parse_directions(reply: &str) -> Result<Vec<(Direction, Cost)>, RenderError> {
    let reply = reply.trim_end_matches('\n');
    if reply.is_empty() {
        return Ok(Vec::new());
    }

    reply
        .split(SEPARATOR)
        .map(|token| -> Result<(Direction, Cost), RenderError> {
            let caps = TOKEN
                .captures(token)
                .ok_or_else(|| RenderError::InvalidToken(token.to_string()))?;
            let direction = caps[1]
                .parse()
                .map_err(|_| RenderError::InvalidToken(token.to_string()))?;
            let cost = caps[2]
                .parse()
                .map_err(|_| RenderError::InvalidToken(token.to_string()))?;
            Ok((direction, cost))
        })
        .collect()
}

/// Positions visited when following `moves` from `start`, including `start`.
pub fn replay(start: Position, moves: &[(Direction, Cost)]) -> Vec<Position> {
    let mut positions = Vec::with_capacity(moves.len() + 1);
    positions.push(start);
    let mut current = start;
    for &(direction, _) in moves {
        current = current.step(direction);
        positions.push(current);
    }
    positions
}
