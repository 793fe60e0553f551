//! CLI error type.

use thiserror::Error;

use lanenav::network::NetworkError;
use lanenav::routing::RouteError;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The road network could not be loaded.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A route query was rejected.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A command-line argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
