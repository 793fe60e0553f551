//! Single-source shortest paths over the lane graph.
//!
//! [`ShortestPathEngine`] borrows an immutable [`Graph`] and owns all search
//! state. Each call to [`set_start`](ShortestPathEngine::set_start) discards
//! the previous search and runs Dijkstra to completion from the new start, so
//! later distance and path queries are plain lookups.
//!
//! # Example
//!
//! ```ignore
//! let mut engine = ShortestPathEngine::new(&graph);
//! engine.set_start(&start);
//! if let Some(path) = engine.path_to(&target) {
//!     let preferred = PreferredConnections::extract(&path, &graph);
//! }
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{Graph, Node, NodeIndex};

/// Frontier entry ordered so the max-heap pops the smallest distance.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    node: NodeIndex,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: shorter distance is "greater"; ties pop the lower index.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Search results for one start node.
#[derive(Debug)]
struct SearchState {
    start: Node,
    start_index: Option<NodeIndex>,
    distance: Vec<f64>,
    predecessor: Vec<Option<NodeIndex>>,
    settled: Vec<bool>,
}

/// Dijkstra shortest path search bound to one graph.
///
/// The engine is cheap to create. It is not shared between threads; run one
/// engine per concurrent query against the same borrowed graph.
#[derive(Debug)]
pub struct ShortestPathEngine<'g> {
    graph: &'g Graph,
    state: Option<SearchState>,
}

impl<'g> ShortestPathEngine<'g> {
    /// Create an engine over `graph` with no start selected.
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph, state: None }
    }

    /// The graph this engine searches.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Select the start node and run the search from it.
    ///
    /// A start node that appears in no edge is valid: only the start itself
    /// is then reachable.
    pub fn set_start(&mut self, start: &Node) {
        let node_count = self.graph.node_count();
        let mut state = SearchState {
            start: start.clone(),
            start_index: self.graph.node_index(start),
            distance: vec![f64::INFINITY; node_count],
            predecessor: vec![None; node_count],
            settled: vec![false; node_count],
        };

        if let Some(origin) = state.start_index {
            self.search(&mut state, origin);
        }

        tracing::debug!(
            start = %start,
            reached = state.settled.iter().filter(|&&s| s).count(),
            nodes = node_count,
            "Shortest path search complete"
        );

        self.state = Some(state);
    }

    fn search(&self, state: &mut SearchState, origin: NodeIndex) {
        let mut frontier = BinaryHeap::new();
        state.distance[origin] = 0.0;
        frontier.push(Frontier {
            distance: 0.0,
            node: origin,
        });

        while let Some(Frontier { distance, node }) = frontier.pop() {
            if state.settled[node] {
                continue;
            }
            state.settled[node] = true;

            for (next, weight) in self.graph.neighbors(node) {
                if state.settled[next] {
                    continue;
                }
                let candidate = distance + weight;
                if candidate < state.distance[next] {
                    state.distance[next] = candidate;
                    state.predecessor[next] = Some(node);
                    frontier.push(Frontier {
                        distance: candidate,
                        node: next,
                    });
                }
            }
        }
    }

    /// The current start node, if one was selected.
    pub fn start(&self) -> Option<&Node> {
        self.state.as_ref().map(|state| &state.start)
    }

    /// Shortest distance from the start to `target`.
    ///
    /// Returns `None` when no start is selected or `target` is unreachable.
    pub fn shortest_distance(&self, target: &Node) -> Option<f64> {
        let state = self.state.as_ref()?;
        if *target == state.start {
            return Some(0.0);
        }
        let index = self.graph.node_index(target)?;
        let distance = state.distance[index];
        distance.is_finite().then_some(distance)
    }

    /// Shortest path from the start to `target`, both ends included.
    ///
    /// The path to the start itself is the single start node.
    pub fn path_to(&self, target: &Node) -> Option<Vec<Node>> {
        let state = self.state.as_ref()?;
        if *target == state.start {
            return Some(vec![state.start.clone()]);
        }

        let start_index = state.start_index?;
        let mut current = self.graph.node_index(target)?;
        let mut path = vec![current];
        while current != start_index {
            current = state.predecessor[current]?;
            path.push(current);
        }

        path.reverse();
        path.into_iter()
            .map(|index| self.graph.node(index).cloned())
            .collect()
    }
}
