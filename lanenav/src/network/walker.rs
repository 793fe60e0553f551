//! Lane following along the network.
//!
//! The walker follows a lane in its direction of travel and continues across
//! successor/predecessor links, choosing among ambiguous link targets with the
//! route's [`PreferredConnections`].
//!
//! # Direction of Travel
//!
//! ```text
//! lane id < 0, regular   -> increasing s
//! lane id < 0, wrong way -> decreasing s
//! lane id > 0, regular   -> decreasing s
//! lane id > 0, wrong way -> increasing s
//! lane id = 0            -> center lane, cannot be followed
//! ```
//!
//! Entering a lane at its START contact point continues with increasing s,
//! entering at its END continues with decreasing s.

use std::collections::HashSet;

use super::ids::{JunctionId, LaneKey, Position};
use super::model::{ContactPoint, LaneRef, Link, RoadNetwork};
use crate::routing::PreferredConnections;

/// Maximum number of lane transitions a single walk may take.
///
/// Protects against link cycles of zero-length lanes in malformed networks.
const MAX_LANE_HOPS: usize = 4096;

/// A point reached by walking along lanes.
#[derive(Debug, Clone, PartialEq)]
pub struct LanePoint {
    /// Lane the point lies on.
    pub lane: LaneKey,
    /// Position along the road's reference line.
    pub s: f64,
    /// Whether the walk was travelling towards increasing s on this lane.
    pub increasing_s: bool,
}

/// An upcoming junction crossing with an ambiguous continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Distance along the followed lanes (meters).
    pub distance: f64,
    /// Junction crossed at this point, if the link names one.
    pub junction: Option<JunctionId>,
}

impl Intersection {
    /// Create a new intersection record.
    pub fn new(distance: f64, junction: Option<JunctionId>) -> Self {
        Self { distance, junction }
    }
}

/// Current lane and heading of a walk.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    lane: LaneRef<'a>,
    s: f64,
    increasing_s: bool,
}

impl<'a> Cursor<'a> {
    /// Distance left until the lane's exit in travel direction.
    fn distance_to_exit(&self) -> f64 {
        if self.increasing_s {
            self.lane.end_s() - self.s
        } else {
            self.s - self.lane.start_s()
        }
    }

    /// Link at the lane's exit in travel direction.
    fn exit_link(&self) -> Option<&'a Link> {
        if self.increasing_s {
            self.lane.lane.successor.as_ref()
        } else {
            self.lane.lane.predecessor.as_ref()
        }
    }

    fn point_at(&self, distance: f64) -> LanePoint {
        let s = if self.increasing_s {
            self.s + distance
        } else {
            self.s - distance
        };
        LanePoint {
            lane: self.lane.key(),
            s,
            increasing_s: self.increasing_s,
        }
    }
}

/// Follows lanes through the network along a planned route.
#[derive(Debug, Clone, Copy)]
pub struct LaneWalker<'a> {
    network: &'a RoadNetwork,
    preferred: &'a PreferredConnections,
}

impl<'a> LaneWalker<'a> {
    /// Create a walker over `network` that resolves ambiguous links with
    /// `preferred`.
    pub fn new(network: &'a RoadNetwork, preferred: &'a PreferredConnections) -> Self {
        Self { network, preferred }
    }

    /// Whether a lane is travelled towards increasing s.
    ///
    /// Returns `None` for the center lane.
    pub fn travels_increasing_s(lane_id: i32, wrong_way: bool) -> Option<bool> {
        match lane_id {
            id if id < 0 => Some(!wrong_way),
            id if id > 0 => Some(wrong_way),
            _ => None,
        }
    }

    fn start(&self, lane: &LaneKey, wrong_way: bool, s: f64) -> Option<Cursor<'a>> {
        let lane_ref = self.network.lane(lane)?;
        if s < lane_ref.start_s() || s > lane_ref.end_s() {
            tracing::debug!(lane = %lane, s, "Walk start is outside of lane");
            return None;
        }
        let increasing_s = Self::travels_increasing_s(lane.lane, wrong_way)?;
        Some(Cursor {
            lane: lane_ref,
            s,
            increasing_s,
        })
    }

    /// Step across the exit link of the cursor's lane.
    fn follow(&self, cursor: &Cursor<'a>) -> Option<Cursor<'a>> {
        let link = cursor.exit_link()?;
        let target = link.select(self.preferred)?;
        let Some(next) = self.network.resolve_link(&cursor.lane.key(), target) else {
            tracing::debug!(
                from = %cursor.lane.key(),
                road = %target.road,
                lane = target.lane,
                "Link target cannot be resolved"
            );
            return None;
        };
        let (s, increasing_s) = match target.contact_point {
            ContactPoint::Start => (next.start_s(), true),
            ContactPoint::End => (next.end_s(), false),
        };
        Some(Cursor {
            lane: next,
            s,
            increasing_s,
        })
    }

    /// Locate the point `range` meters ahead of `s` on `lane`.
    ///
    /// Returns `None` when the start is invalid or the lanes end before
    /// `range` is covered.
    pub fn point_ahead(
        &self,
        lane: &LaneKey,
        wrong_way: bool,
        s: f64,
        range: f64,
    ) -> Option<LanePoint> {
        let mut cursor = self.start(lane, wrong_way, s)?;
        let mut remaining = range;

        for _ in 0..MAX_LANE_HOPS {
            let to_exit = cursor.distance_to_exit();
            if remaining <= to_exit {
                return Some(cursor.point_at(remaining));
            }
            remaining -= to_exit;
            cursor = self.follow(&cursor)?;
        }

        tracing::warn!(lane = %lane, range, "Lane walk exceeded hop limit");
        None
    }

    /// Collect the ambiguous junction crossings within `range` meters.
    ///
    /// The result is sorted by distance and restricted to
    /// `0 < distance <= range`.
    pub fn intersections_ahead(
        &self,
        lane: &LaneKey,
        wrong_way: bool,
        s: f64,
        range: f64,
    ) -> Vec<Intersection> {
        let mut intersections = Vec::new();
        let Some(mut cursor) = self.start(lane, wrong_way, s) else {
            return intersections;
        };
        let mut traveled = 0.0;
        let mut remaining = range;

        for _ in 0..MAX_LANE_HOPS {
            let to_exit = cursor.distance_to_exit();
            if let Some(link) = cursor.exit_link() {
                if link.is_ambiguous() {
                    intersections.push(Intersection::new(traveled + to_exit, link.junction.clone()));
                }
            }
            if remaining <= to_exit {
                break;
            }
            traveled += to_exit;
            remaining -= to_exit;
            match self.follow(&cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        intersections.retain(|i| i.distance > 0.0 && i.distance <= range);
        intersections
    }

    /// Distance along the followed lanes from `s` on `lane` to `target`.
    ///
    /// Returns `None` on a dead end, a cycle, or an invalid start.
    pub fn distance_to_target(
        &self,
        lane: &LaneKey,
        wrong_way: bool,
        s: f64,
        target: &Position,
    ) -> Option<f64> {
        let mut cursor = self.start(lane, wrong_way, s)?;
        let mut traveled = 0.0;
        let mut visited = HashSet::new();

        loop {
            if cursor.lane.road.id == target.road
                && cursor.lane.lane.id == target.lane
                && target.s >= cursor.lane.start_s()
                && target.s <= cursor.lane.end_s()
            {
                let along = if cursor.increasing_s {
                    target.s - cursor.s
                } else {
                    cursor.s - target.s
                };
                if along >= 0.0 {
                    return Some(traveled + along);
                }
            }

            if !visited.insert((cursor.lane.key(), cursor.increasing_s)) {
                tracing::debug!(lane = %cursor.lane.key(), "Cycle detected while measuring distance");
                return None;
            }

            traveled += cursor.distance_to_exit();
            cursor = self.follow(&cursor)?;
        }
    }
}
