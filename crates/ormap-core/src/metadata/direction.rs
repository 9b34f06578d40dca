//! Relation direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction in which a property navigates a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the relation's source entity (outgoing).
    From,
    /// From the relation's target entity (incoming).
    To,
}

impl Direction {
    /// The opposite direction.
    pub fn inverse(self) -> Self {
        match self {
            Direction::From => Direction::To,
            Direction::To => Direction::From,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::From => f.write_str("FROM"),
            Direction::To => f.write_str("TO"),
        }
    }
}
