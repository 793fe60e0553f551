//! Error types for loading and validating road networks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::RoadId;

/// Result type for road network operations.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur while loading or validating a road network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Failed to read the network file.
    #[error("Failed to read road network {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The network description is not valid JSON for the model.
    #[error("Failed to parse road network: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two roads share the same id.
    #[error("Duplicate road id '{0}'")]
    DuplicateRoad(RoadId),

    /// A road has no lane sections.
    #[error("Road '{0}' has no lane sections")]
    NoLaneSections(RoadId),

    /// A lane section ends before it starts.
    #[error("Road '{road}' lane section {section}: end s {end_s} is before start s {s}")]
    InvalidSectionBounds {
        road: RoadId,
        section: usize,
        s: f64,
        end_s: f64,
    },
}
