//! Error types for route planning.

use std::fmt;

use thiserror::Error;

use crate::network::Position;

/// Result type for route planning.
pub type RouteResult<T> = Result<T, RouteError>;

/// Which end of a route query a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionRole {
    /// The route start.
    Start,
    /// The route target.
    Target,
}

impl fmt::Display for PositionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionRole::Start => write!(f, "start"),
            PositionRole::Target => write!(f, "target"),
        }
    }
}

/// Errors that can occur while planning a route.
///
/// An unreachable target is not an error; planning returns `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The position does not lie on any lane section of the network.
    #[error("Invalid {role} position {position}: no lane section contains it")]
    InvalidPosition {
        role: PositionRole,
        position: Position,
    },
}
