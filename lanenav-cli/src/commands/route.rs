//! `lanenav route`: plan a route between two positions.

use std::path::Path;

use lanenav::network::Position;
use lanenav::routing::RoutePlanner;

use super::common::load_network;
use crate::error::CliError;

/// Plan a route and print its lanes, junction choices and length.
pub fn run(path: &Path, from: &Position, to: &Position) -> Result<(), CliError> {
    let planner = RoutePlanner::new(load_network(path)?);

    let Some(route) = planner.plan(from, to)? else {
        println!("No route from {} to {}", from, to);
        return Ok(());
    };

    println!("Route {} -> {}", from, to);
    println!("  Length: {:.1} m", route.length);
    println!("  Lanes:");
    for node in &route.nodes {
        println!("    {}", node);
    }

    if route.preferred_connections.is_empty() {
        println!("  Junctions: none");
    } else {
        println!("  Junctions:");
        for (junction, connection) in route.preferred_connections.iter() {
            println!("    {} via connection {}", junction, connection);
        }
    }

    Ok(())
}
