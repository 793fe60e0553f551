//! Position-to-position route planning.
//!
//! [`RoutePlanner`] owns a road network together with its lane graph and
//! answers route queries between two [`Position`]s. Each query gets its own
//! [`ShortestPathEngine`], so a planner can serve many queries at once.

use rayon::prelude::*;

use super::connections::PreferredConnections;
use super::dijkstra::ShortestPathEngine;
use super::error::{PositionRole, RouteError, RouteResult};
use crate::graph::{BuildReport, Graph, GraphBuilder, Node};
use crate::network::{LaneKey, Position, RoadNetwork};

/// A planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Lanes to traverse, start and target included.
    pub nodes: Vec<Node>,
    /// Junction choices along the route, in path order.
    pub preferred_connections: PreferredConnections,
    /// Driving distance from the start position to the target position.
    pub length: f64,
}

/// Plans routes over one road network.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    network: RoadNetwork,
    graph: Graph,
}

impl RoutePlanner {
    /// Build the lane graph of `network` and wrap both.
    pub fn new(network: RoadNetwork) -> Self {
        Self::with_report(network).0
    }

    /// Like [`new`](Self::new), also returning the graph build report.
    pub fn with_report(network: RoadNetwork) -> (Self, BuildReport) {
        let (graph, report) = GraphBuilder::new(&network).build_with_report();
        (Self { network, graph }, report)
    }

    /// Wrap a network and a graph that was built from it.
    pub fn from_parts(network: RoadNetwork, graph: Graph) -> Self {
        Self { network, graph }
    }

    /// The road network.
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// The lane graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Plan a route from `start` to `target`.
    ///
    /// Both positions must lie on a lane section of the network. Returns
    /// `Ok(None)` when the target cannot be reached, including a target
    /// behind the start on the start's own lane.
    pub fn plan(&self, start: &Position, target: &Position) -> RouteResult<Option<Route>> {
        let start_lane = self.resolve(start, PositionRole::Start)?;
        let target_lane = self.resolve(target, PositionRole::Target)?;

        let start_node = Node::nominal(&start_lane);
        let target_node = Node::nominal(&target_lane);

        let mut engine = ShortestPathEngine::new(&self.graph);
        engine.set_start(&start_node);

        let Some(nodes) = engine.path_to(&target_node) else {
            tracing::debug!(start = %start, target = %target, "Target unreachable");
            return Ok(None);
        };
        let Some(distance) = engine.shortest_distance(&target_node) else {
            return Ok(None);
        };

        let length = distance + self.s_offset(target, &target_lane)
            - self.s_offset(start, &start_lane);
        if length < 0.0 {
            tracing::debug!(start = %start, target = %target, "Target is behind start");
            return Ok(None);
        }
        let preferred_connections = PreferredConnections::extract(&nodes, &self.graph);

        tracing::debug!(
            start = %start,
            target = %target,
            lanes = nodes.len(),
            junctions = preferred_connections.len(),
            length,
            "Planned route"
        );

        Ok(Some(Route {
            nodes,
            preferred_connections,
            length,
        }))
    }

    /// Plan many routes in parallel.
    ///
    /// Results are returned in query order.
    pub fn plan_batch(&self, queries: &[(Position, Position)]) -> Vec<RouteResult<Option<Route>>> {
        queries
            .par_iter()
            .map(|(start, target)| self.plan(start, target))
            .collect()
    }

    fn resolve(&self, position: &Position, role: PositionRole) -> RouteResult<LaneKey> {
        self.network
            .locate(position)
            .ok_or_else(|| RouteError::InvalidPosition {
                role,
                position: position.clone(),
            })
    }

    /// Distance from the lane's entry end to the position.
    fn s_offset(&self, position: &Position, lane: &LaneKey) -> f64 {
        let Some(lane) = self.network.lane(lane) else {
            return 0.0;
        };
        if position.lane < 0 {
            position.s - lane.start_s()
        } else {
            lane.end_s() - position.s
        }
    }
}
