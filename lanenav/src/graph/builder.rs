//! Graph construction from a road network.
//!
//! Every lane contributes one edge per link target at each of its two ends.
//! Leaving a lane through its successor means it was driven towards
//! increasing s, leaving through its predecessor means decreasing s:
//!
//! ```text
//!   predecessor                      successor
//!   <───────── [ s ........ end_s ] ─────────>
//!   source tag: Descending           source tag: Ascending
//! ```
//!
//! The destination tag follows the target's contact point: entering at START
//! continues ascending, entering at END continues descending. Links between
//! lane sections of the same road follow the same rule, so a lane driven
//! ascending through section `i` continues ascending in section `i + 1`.

use super::node::{Edge, JunctionCrossing, Node, TravelTag};
use super::Graph;
use crate::network::{ContactPoint, LaneRef, Link, LinkTarget, RoadNetwork};

/// A link whose target does not resolve to a lane.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingLink {
    /// Node the edge would have started from.
    pub source: Node,
    /// The unresolved target.
    pub target: LinkTarget,
}

/// Summary of a graph build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Edges created.
    pub edges: usize,
    /// Edges crossing a junction.
    pub junction_edges: usize,
    /// Links skipped because their target does not exist.
    pub dangling: Vec<DanglingLink>,
}

/// Builds the lane graph of a [`RoadNetwork`].
///
/// # Example
///
/// ```ignore
/// let (graph, report) = GraphBuilder::new(&network).build_with_report();
/// for link in &report.dangling {
///     eprintln!("dangling: {} -> {}", link.source, link.target.road);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    network: &'a RoadNetwork,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over a network.
    pub fn new(network: &'a RoadNetwork) -> Self {
        Self { network }
    }

    /// Build the graph, discarding the report.
    pub fn build(&self) -> Graph {
        self.build_with_report().0
    }

    /// Build the graph and report what was skipped.
    ///
    /// Dangling targets are logged and skipped; the build never fails.
    pub fn build_with_report(&self) -> (Graph, BuildReport) {
        let mut edges = Vec::new();
        let mut report = BuildReport::default();

        for lane in self.network.lanes() {
            if let Some(link) = &lane.lane.successor {
                self.add_link(&lane, TravelTag::Ascending, link, &mut edges, &mut report);
            }
            if let Some(link) = &lane.lane.predecessor {
                self.add_link(&lane, TravelTag::Descending, link, &mut edges, &mut report);
            }
        }

        report.edges = edges.len();
        report.junction_edges = edges.iter().filter(|e| e.crossing.is_some()).count();

        let graph = Graph::from_edges(edges);

        tracing::info!(
            roads = self.network.roads().len(),
            nodes = graph.node_count(),
            edges = report.edges,
            junction_edges = report.junction_edges,
            dangling = report.dangling.len(),
            "Built lane graph"
        );

        (graph, report)
    }

    fn add_link(
        &self,
        lane: &LaneRef<'_>,
        tag: TravelTag,
        link: &Link,
        edges: &mut Vec<Edge>,
        report: &mut BuildReport,
    ) {
        let key = lane.key();
        let source = Node::from_lane(&key, tag);
        let weight = lane.length();

        for target in &link.targets {
            let Some(resolved) = self.network.resolve_link(&key, target) else {
                tracing::warn!(
                    source = %source,
                    target_road = %target.road,
                    target_lane = target.lane,
                    "Skipping link to unknown lane"
                );
                report.dangling.push(DanglingLink {
                    source: source.clone(),
                    target: target.clone(),
                });
                continue;
            };

            let destination_tag = match target.contact_point {
                ContactPoint::Start => TravelTag::Ascending,
                ContactPoint::End => TravelTag::Descending,
            };

            let crossing = match (&link.junction, &target.connection) {
                (Some(junction), Some(connection)) => Some(JunctionCrossing {
                    junction: junction.clone(),
                    connection: connection.clone(),
                }),
                (Some(junction), None) => {
                    tracing::debug!(
                        source = %source,
                        junction = %junction,
                        "Junction link target has no connection id"
                    );
                    None
                }
                (None, _) => None,
            };

            edges.push(Edge {
                source: source.clone(),
                destination: Node::from_lane(&resolved.key(), destination_tag),
                weight,
                crossing,
            });
        }
    }
}
