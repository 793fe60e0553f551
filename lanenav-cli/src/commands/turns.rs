//! `lanenav turns`: preview the turn forecast ahead of a position.

use std::path::Path;

use glam::Vec3;
use lanenav::forecast::{DriveMode, ForecastInput, IntersectionForecaster};
use lanenav::network::{LaneWalker, Position};
use lanenav::routing::{PositionRole, PreferredConnections, RouteError, RoutePlanner};

use super::common::load_network;
use crate::error::CliError;

/// List the intersections within `range` meters and classify each one.
///
/// With a target, ambiguous links follow the planned route; otherwise the
/// first link target is taken.
pub fn run(
    path: &Path,
    at: &Position,
    to: Option<&Position>,
    wrong_way: bool,
    range: f64,
) -> Result<(), CliError> {
    if range.is_nan() || range <= 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "range must be positive, got {}",
            range
        )));
    }

    let planner = RoutePlanner::new(load_network(path)?);
    let network = planner.network();

    let lane = network
        .locate(at)
        .ok_or_else(|| RouteError::InvalidPosition {
            role: PositionRole::Start,
            position: at.clone(),
        })?;

    let preferred = match to {
        Some(target) => match planner.plan(at, target)? {
            Some(route) => route.preferred_connections,
            None => {
                println!("No route to {}, following first link targets", target);
                PreferredConnections::new()
            }
        },
        None => PreferredConnections::new(),
    };

    let walker = LaneWalker::new(network, &preferred);
    let intersections = walker.intersections_ahead(&lane, wrong_way, at.s, range);
    tracing::debug!(
        lane = %lane,
        junctions = preferred.len(),
        intersections = intersections.len(),
        "Walked lanes ahead"
    );
    if intersections.is_empty() {
        println!("No intersections within {:.0} m of {}", range, at);
        return Ok(());
    }

    let forecaster = IntersectionForecaster::with_defaults(network);
    println!("Intersections ahead of {}:", at);
    for intersection in &intersections {
        let input = ForecastInput {
            intersections: std::slice::from_ref(intersection),
            lane: &lane,
            wrong_way,
            s: at.s,
            preferred: &preferred,
            position: Vec3::ZERO,
            mode: DriveMode::Manual,
        };
        let (direction, _) = forecaster.forecast(&input);
        let junction = intersection
            .junction
            .as_ref()
            .map(|j| j.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>8.1} m  junction {:<8} {}",
            intersection.distance, junction, direction
        );
    }

    Ok(())
}
