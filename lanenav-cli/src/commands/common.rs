//! Common helpers shared across CLI commands.

use std::path::Path;

use lanenav::network::{Position, RoadNetwork};

use crate::error::CliError;

/// Parse a position given as `road:lane:s`.
///
/// The road id may itself contain colons; lane and s are taken from the
/// right.
pub fn parse_position(value: &str) -> Result<Position, String> {
    let mut parts = value.rsplitn(3, ':');
    let (Some(s), Some(lane), Some(road)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected road:lane:s, got '{}'", value));
    };
    if road.is_empty() {
        return Err(format!("missing road id in '{}'", value));
    }
    let lane: i32 = lane
        .parse()
        .map_err(|_| format!("invalid lane id '{}'", lane))?;
    let s: f64 = s
        .parse()
        .map_err(|_| format!("invalid s offset '{}'", s))?;
    if !s.is_finite() {
        return Err(format!("invalid s offset '{}'", s));
    }
    Ok(Position::new(road, lane, s))
}

/// Load a road network file.
pub fn load_network(path: &Path) -> Result<RoadNetwork, CliError> {
    Ok(RoadNetwork::load(path)?)
}
