//! Junction disambiguation for a planned route.
//!
//! A junction link lists every lane reachable through the junction. A planned
//! path settles which one the route takes; [`PreferredConnections`] records
//! that choice as an ordered `junction -> connection` mapping that lane
//! following consults at each ambiguous link.

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Node};
use crate::network::{ConnectionId, JunctionId};

/// Ordered junction to connection mapping for one route.
///
/// Entries keep path order. A route crossing the same junction twice keeps
/// both entries; lookups return the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferredConnections {
    entries: Vec<(JunctionId, ConnectionId)>,
}

impl PreferredConnections {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a junction choice.
    pub fn push(&mut self, junction: JunctionId, connection: ConnectionId) {
        self.entries.push((junction, connection));
    }

    /// Whether `connection` is a preferred choice at `junction`.
    pub fn contains(&self, junction: &JunctionId, connection: &ConnectionId) -> bool {
        self.entries
            .iter()
            .any(|(j, c)| j == junction && c == connection)
    }

    /// First preferred connection for a junction.
    pub fn get(&self, junction: &JunctionId) -> Option<&ConnectionId> {
        self.entries
            .iter()
            .find(|(j, _)| j == junction)
            .map(|(_, c)| c)
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&JunctionId, &ConnectionId)> {
        self.entries.iter().map(|(j, c)| (j, c))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no junction is crossed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extract the junction choices made by a path.
    ///
    /// For each consecutive node pair the connecting edge is looked up;
    /// junction edges contribute their `(junction, connection)` pair, plain
    /// edges contribute nothing. Pairs without an edge are skipped.
    pub fn extract(path: &[Node], graph: &Graph) -> Self {
        let mut preferred = Self::new();

        for pair in path.windows(2) {
            let Some(edge) = graph.edge_between(&pair[0], &pair[1]) else {
                tracing::debug!(
                    from = %pair[0],
                    to = %pair[1],
                    "No edge between consecutive path nodes"
                );
                continue;
            };
            if let Some(crossing) = &edge.crossing {
                preferred.push(crossing.junction.clone(), crossing.connection.clone());
            }
        }

        preferred
    }
}
