//! Graph node and edge types.

use std::cmp::Ordering;
use std::fmt;

use crate::network::{ConnectionId, JunctionId, LaneKey, RoadId};

/// Direction in which a node's lane is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TravelTag {
    /// Traversed towards increasing s.
    Ascending,
    /// Traversed towards decreasing s.
    Descending,
}

impl TravelTag {
    /// Nominal travel tag of a lane id (right-hand lane sign convention).
    ///
    /// Negative lane ids travel ascending, all others descending.
    pub fn from_lane_id(lane: i32) -> Self {
        if lane < 0 {
            TravelTag::Ascending
        } else {
            TravelTag::Descending
        }
    }

    /// Single-letter form used in node labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelTag::Ascending => "A",
            TravelTag::Descending => "D",
        }
    }
}

impl fmt::Display for TravelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lane traversed in one direction.
///
/// Nodes are value objects: equality and hashing are structural over
/// `(road, section, lane, tag)`. Ordering groups by road and section first,
/// then travel tag, then lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Road holding the lane.
    pub road: RoadId,
    /// Lane section index within the road.
    pub section: usize,
    /// Lane id.
    pub lane: i32,
    /// Traversal direction.
    pub tag: TravelTag,
}

impl Node {
    /// Create a node.
    pub fn new(road: impl Into<RoadId>, section: usize, lane: i32, tag: TravelTag) -> Self {
        Self {
            road: road.into(),
            section,
            lane,
            tag,
        }
    }

    /// Node for a lane traversed in the given direction.
    pub fn from_lane(key: &LaneKey, tag: TravelTag) -> Self {
        Self::new(key.road.clone(), key.section, key.lane, tag)
    }

    /// Node for a lane traversed in its nominal direction.
    ///
    /// This is how route query positions map onto the graph.
    pub fn nominal(key: &LaneKey) -> Self {
        Self::from_lane(key, TravelTag::from_lane_id(key.lane))
    }

    /// Lane addressed by this node.
    pub fn lane_key(&self) -> LaneKey {
        LaneKey::new(self.road.clone(), self.section, self.lane)
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.road, self.section, self.tag, self.lane).cmp(&(
            &other.road,
            other.section,
            other.tag,
            other.lane,
        ))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.road, self.section, self.lane, self.tag)
    }
}

/// The junction connection an edge passes through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JunctionCrossing {
    /// Junction id.
    pub junction: JunctionId,
    /// Connection id within the junction.
    pub connection: ConnectionId,
}

/// A directed, weighted transition between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Lane being left.
    pub source: Node,
    /// Lane being entered.
    pub destination: Node,
    /// Cost of the transition: length of the source lane.
    pub weight: f64,
    /// Junction connection, present only for junction links.
    pub crossing: Option<JunctionCrossing>,
}

impl Edge {
    /// Create a plain road-to-road edge.
    pub fn new(source: Node, destination: Node, weight: f64) -> Self {
        Self {
            source,
            destination,
            weight,
            crossing: None,
        }
    }

    /// Attach a junction crossing.
    pub fn through(
        mut self,
        junction: impl Into<JunctionId>,
        connection: impl Into<ConnectionId>,
    ) -> Self {
        self.crossing = Some(JunctionCrossing {
            junction: junction.into(),
            connection: connection.into(),
        });
        self
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.source, self.destination)?;
        if let Some(crossing) = &self.crossing {
            write!(f, " (junction {}/{})", crossing.junction, crossing.connection)?;
        }
        Ok(())
    }
}
