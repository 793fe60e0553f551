//! Directed lane graph for route planning.
//!
//! The graph is built once from a [`RoadNetwork`](crate::network::RoadNetwork)
//! and never mutated afterwards. Every node is a lane traversed in one
//! direction; every edge is a link from one lane to the next, weighted by the
//! length of the lane being left.
//!
//! Nodes are interned on construction so searches work on dense indices
//! instead of hashing node keys in their inner loop.
//!
//! # Sharing
//!
//! `Graph` is `Send + Sync` and holds no interior mutability. Wrap it in an
//! `Arc` (or borrow it) to run any number of searches concurrently.

mod builder;
mod node;

use std::collections::HashMap;

pub use builder::{BuildReport, DanglingLink, GraphBuilder};
pub use node::{Edge, JunctionCrossing, Node, TravelTag};

/// Dense index of a node within a [`Graph`].
pub type NodeIndex = usize;

/// Immutable lane graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Edges sorted by source node.
    edges: Vec<Edge>,
    /// Interned nodes.
    nodes: Vec<Node>,
    /// Node to dense index.
    index: HashMap<Node, NodeIndex>,
    /// Destination index of each edge, parallel to `edges`.
    destinations: Vec<NodeIndex>,
    /// Outgoing edge indices per node.
    outgoing: Vec<Vec<usize>>,
}

impl Graph {
    /// Build a graph from a set of edges.
    ///
    /// Edges are stably sorted by source node so iteration order does not
    /// depend on how the road network was stored.
    pub fn from_edges(mut edges: Vec<Edge>) -> Self {
        edges.sort_by(|a, b| a.source.cmp(&b.source));

        let mut graph = Graph {
            destinations: Vec::with_capacity(edges.len()),
            ..Default::default()
        };

        for (edge_index, edge) in edges.iter().enumerate() {
            let source = graph.intern(&edge.source);
            let destination = graph.intern(&edge.destination);
            graph.outgoing[source].push(edge_index);
            graph.destinations.push(destination);
        }

        graph.edges = edges;
        graph
    }

    fn intern(&mut self, node: &Node) -> NodeIndex {
        if let Some(&index) = self.index.get(node) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(node.clone());
        self.index.insert(node.clone(), index);
        self.outgoing.push(Vec::new());
        index
    }

    /// All edges, sorted by source node.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of distinct nodes referenced by edges.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the node appears in any edge.
    pub fn contains(&self, node: &Node) -> bool {
        self.index.contains_key(node)
    }

    /// Dense index of a node.
    pub fn node_index(&self, node: &Node) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    /// Node at a dense index.
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Edges leaving `node`.
    pub fn outgoing(&self, node: &Node) -> impl Iterator<Item = &Edge> + '_ {
        self.node_index(node)
            .map(|index| self.outgoing[index].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&edge| &self.edges[edge])
    }

    /// Outgoing edges of a node index as `(destination, weight)` pairs.
    pub(crate) fn neighbors(
        &self,
        index: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.outgoing[index]
            .iter()
            .map(move |&edge| (self.destinations[edge], self.edges[edge].weight))
    }

    /// The edge from `source` to `destination`.
    ///
    /// A consistent network holds at most one edge per ordered node pair. If
    /// several exist, the cheapest one is returned since that is the one a
    /// shortest path search relaxes.
    pub fn edge_between(&self, source: &Node, destination: &Node) -> Option<&Edge> {
        let destination = self.node_index(destination)?;
        let source = self.node_index(source)?;
        self.outgoing[source]
            .iter()
            .filter(|&&edge| self.destinations[edge] == destination)
            .map(|&edge| &self.edges[edge])
            .min_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    /// Number of edges that cross a junction.
    pub fn junction_edge_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.crossing.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(road: &str, lane: i32) -> Node {
        Node::new(road, 0, lane, TravelTag::from_lane_id(lane))
    }

    #[test]
    fn test_from_edges_interns_nodes() {
        let graph = Graph::from_edges(vec![
            Edge::new(node("2", -1), node("3", -1), 5.0),
            Edge::new(node("1", -1), node("2", -1), 10.0),
        ]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains(&node("3", -1)));
        assert!(!graph.contains(&node("4", -1)));
        // Sorted by source.
        assert_eq!(graph.edges()[0].source, node("1", -1));
    }

    #[test]
    fn test_outgoing_and_edge_between() {
        let graph = Graph::from_edges(vec![
            Edge::new(node("1", -1), node("2", -1), 10.0),
            Edge::new(node("1", -1), node("3", -1), 10.0).through("J", "0"),
            Edge::new(node("1", -1), node("3", -1), 7.0).through("J", "1"),
        ]);

        assert_eq!(graph.outgoing(&node("1", -1)).count(), 3);
        assert_eq!(graph.outgoing(&node("9", -1)).count(), 0);

        let edge = graph.edge_between(&node("1", -1), &node("3", -1)).unwrap();
        assert_eq!(edge.weight, 7.0);
        assert!(graph.edge_between(&node("2", -1), &node("1", -1)).is_none());
        assert_eq!(graph.junction_edge_count(), 2);
    }

    #[test]
    fn test_graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
