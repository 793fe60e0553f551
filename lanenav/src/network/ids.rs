//! Identifier and position types for the road network.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a road (OpenDRIVE `road@id`).
    RoadId
);

string_id!(
    /// Identifier of a junction (OpenDRIVE `junction@id`).
    JunctionId
);

string_id!(
    /// Identifier of a connection inside a junction (OpenDRIVE `connection@id`).
    ConnectionId
);

/// A point along a road's reference line on a specific lane.
///
/// Used as route query input and to locate the enclosing lane section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Road the position lies on.
    pub road: RoadId,
    /// Lane id (negative = right of the reference line).
    pub lane: i32,
    /// Longitudinal offset along the road's reference line (meters).
    pub s: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(road: impl Into<RoadId>, lane: i32, s: f64) -> Self {
        Self {
            road: road.into(),
            lane,
            s,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{:.2}", self.road, self.lane, self.s)
    }
}

/// Structural address of one lane inside the network.
///
/// A lane id is only unique within its lane section, so the section index
/// is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneKey {
    /// Road holding the lane.
    pub road: RoadId,
    /// Index of the lane section within the road.
    pub section: usize,
    /// Lane id within the section.
    pub lane: i32,
}

impl LaneKey {
    /// Create a new lane key.
    pub fn new(road: impl Into<RoadId>, section: usize, lane: i32) -> Self {
        Self {
            road: road.into(),
            section,
            lane,
        }
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.road, self.section, self.lane)
    }
}
