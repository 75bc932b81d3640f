use super::fingerprint::Fingerprint;
use super::types::DispatchError;
use crate::search::types::{Maze, Position, SearchProblem};

/// A parsed, validated request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Maze rows exactly as received, joined by `\n`.
    pub maze_text: String,
    pub problem: SearchProblem,
}

impl Request {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.maze_text, self.problem.start, self.problem.goal)
    }
}

/// Split request lines into maze rows, a start line and a goal line.
///
/// The last line is the goal, the one before it the start, everything
/// earlier is the maze. Trailing blank lines are ignored.
pub fn parse_request<S: AsRef<str>>(lines: &[S]) -> Result<Request, DispatchError> {
    let mut lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.len() < 2 {
        return Err(DispatchError::BadRequest(format!(
            "expected maze rows, start and goal; got {} line(s)",
            lines.len()
        )));
    }

    let (maze_lines, endpoints) = lines.split_at(lines.len() - 2);
    let start: Position = endpoints[0].parse()?;
    let goal: Position = endpoints[1].parse()?;

    let maze_text = maze_lines.join("\n");
    let maze = Maze::parse(&maze_text)?;
    let problem = SearchProblem::new(maze, start, goal)?;

    Ok(Request { maze_text, problem })
}
