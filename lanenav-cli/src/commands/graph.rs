//! `lanenav graph`: lane graph statistics.

use std::path::Path;

use lanenav::graph::GraphBuilder;

use super::common::load_network;
use crate::error::CliError;

/// Build the lane graph of a network and print its statistics.
pub fn run(path: &Path) -> Result<(), CliError> {
    let network = load_network(path)?;
    let (graph, report) = GraphBuilder::new(&network).build_with_report();

    println!("Network: {}", path.display());
    println!("  Roads:          {}", network.roads().len());
    println!("  Lanes:          {}", network.lanes().count());
    println!("  Nodes:          {}", graph.node_count());
    println!("  Edges:          {}", report.edges);
    println!("  Junction edges: {}", report.junction_edges);
    println!("  Dangling links: {}", report.dangling.len());

    for link in &report.dangling {
        println!(
            "    {} -> road {} lane {} ({:?})",
            link.source, link.target.road, link.target.lane, link.target.contact_point
        );
    }

    Ok(())
}
