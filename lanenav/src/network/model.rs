//! Road network data model.
//!
//! The model mirrors the parts of an OpenDRIVE network that routing and turn
//! forecasting read: roads hold ordered lane sections, lane sections hold
//! lanes, lanes hold successor and predecessor links. The network is
//! read-only after load.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{NetworkError, NetworkResult};
use super::geometry::GeometrySegment;
use super::ids::{ConnectionId, JunctionId, LaneKey, Position, RoadId};
use crate::routing::PreferredConnections;

/// Which end of the referenced lane a link attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPoint {
    /// The link enters the target lane at its start (lowest s).
    Start,
    /// The link enters the target lane at its end (highest s).
    End,
}

/// One target of a lane link.
///
/// A target on another road enters the first lane section of that road at
/// START and the last one at END. A target on the linking lane's own road
/// continues into the neighbouring section instead: START enters the next
/// section, END the previous one. `section` overrides both rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// Road holding the target lane.
    pub road: RoadId,
    /// Target lane id.
    pub lane: i32,
    /// End of the target lane the link attaches to.
    pub contact_point: ContactPoint,
    /// Explicit lane section index on the target road.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<usize>,
    /// Junction connection this target belongs to (junction links only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionId>,
}

impl LinkTarget {
    /// Create a plain road-to-road target.
    pub fn new(road: impl Into<RoadId>, lane: i32, contact_point: ContactPoint) -> Self {
        Self {
            road: road.into(),
            lane,
            contact_point,
            section: None,
            connection: None,
        }
    }

    /// Pin the target to a lane section of its road.
    pub fn in_section(mut self, section: usize) -> Self {
        self.section = Some(section);
        self
    }

    /// Attach a junction connection id.
    pub fn with_connection(mut self, connection: impl Into<ConnectionId>) -> Self {
        self.connection = Some(connection.into());
        self
    }
}

/// Successor or predecessor link record of a lane.
///
/// Plain road links have a single target. Junction links list every lane
/// reachable through the junction, one target per admissible connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Junction crossed by this link, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction: Option<JunctionId>,
    /// Reachable lanes.
    #[serde(default)]
    pub targets: Vec<LinkTarget>,
}

impl Link {
    /// Create a plain link to a single lane.
    pub fn road(target: LinkTarget) -> Self {
        Self {
            junction: None,
            targets: vec![target],
        }
    }

    /// Create a junction link.
    pub fn junction(junction: impl Into<JunctionId>, targets: Vec<LinkTarget>) -> Self {
        Self {
            junction: Some(junction.into()),
            targets,
        }
    }

    /// Whether this link crosses a junction.
    pub fn is_junction(&self) -> bool {
        self.junction.is_some()
    }

    /// Whether following this link requires a routing decision.
    pub fn is_ambiguous(&self) -> bool {
        self.targets.len() > 1
    }

    /// Select the target to follow.
    ///
    /// With several targets, the first one whose connection is preferred
    /// wins; without a preferred match the first target is used.
    pub fn select(&self, preferred: &PreferredConnections) -> Option<&LinkTarget> {
        if self.targets.len() > 1 {
            if let Some(junction) = &self.junction {
                let chosen = self.targets.iter().find(|target| {
                    target
                        .connection
                        .as_ref()
                        .is_some_and(|connection| preferred.contains(junction, connection))
                });
                if chosen.is_some() {
                    return chosen;
                }
            }
            tracing::trace!(
                junction = ?self.junction,
                targets = self.targets.len(),
                "No preferred connection, following first link target"
            );
        }
        self.targets.first()
    }
}

/// A lane within a lane section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Lane id: negative right of the reference line, positive left.
    pub id: i32,
    /// Link at the lane's end (highest s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor: Option<Link>,
    /// Link at the lane's start (lowest s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predecessor: Option<Link>,
}

impl Lane {
    /// Create a lane without links.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            successor: None,
            predecessor: None,
        }
    }

    /// Set the successor link.
    pub fn with_successor(mut self, link: Link) -> Self {
        self.successor = Some(link);
        self
    }

    /// Set the predecessor link.
    pub fn with_predecessor(mut self, link: Link) -> Self {
        self.predecessor = Some(link);
        self
    }
}

/// A longitudinal slice of a road holding a fixed set of lanes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneSection {
    /// Start of the section along the reference line.
    pub s: f64,
    /// End of the section along the reference line.
    pub end_s: f64,
    /// Lanes of the section.
    #[serde(default)]
    pub lanes: Vec<Lane>,
}

impl LaneSection {
    /// Create a section spanning `[s, end_s]`.
    pub fn new(s: f64, end_s: f64, lanes: Vec<Lane>) -> Self {
        Self { s, end_s, lanes }
    }

    /// Section length (`end_s - s`).
    pub fn length(&self) -> f64 {
        self.end_s - self.s
    }

    /// Whether `s` lies within `[s, end_s]`.
    pub fn contains_s(&self, s: f64) -> bool {
        self.s <= s && s <= self.end_s
    }

    /// Look up a lane by id.
    pub fn lane(&self, id: i32) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id == id)
    }
}

/// A road: ordered lane sections plus its plan-view geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Road id.
    pub id: RoadId,
    /// Junction this road belongs to (connecting roads only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction: Option<JunctionId>,
    /// Lane sections, ordered by s.
    pub sections: Vec<LaneSection>,
    /// Plan-view geometry, ordered by s.
    #[serde(default)]
    pub geometry: Vec<GeometrySegment>,
}

impl Road {
    /// Create a road with no geometry.
    pub fn new(id: impl Into<RoadId>, sections: Vec<LaneSection>) -> Self {
        Self {
            id: id.into(),
            junction: None,
            sections,
            geometry: Vec::new(),
        }
    }

    /// Set the plan-view geometry.
    pub fn with_geometry(mut self, geometry: Vec<GeometrySegment>) -> Self {
        self.geometry = geometry;
        self
    }

    /// Mark this road as a connecting road of a junction.
    pub fn in_junction(mut self, junction: impl Into<JunctionId>) -> Self {
        self.junction = Some(junction.into());
        self
    }
}

/// A resolved lane together with its enclosing section.
#[derive(Debug, Clone, Copy)]
pub struct LaneRef<'a> {
    /// Road holding the lane.
    pub road: &'a Road,
    /// Index of the section within the road.
    pub section_index: usize,
    /// The enclosing section.
    pub section: &'a LaneSection,
    /// The lane itself.
    pub lane: &'a Lane,
}

impl LaneRef<'_> {
    /// Structural key of this lane.
    pub fn key(&self) -> LaneKey {
        LaneKey::new(self.road.id.clone(), self.section_index, self.lane.id)
    }

    /// Start of the lane (section start).
    pub fn start_s(&self) -> f64 {
        self.section.s
    }

    /// End of the lane (section end).
    pub fn end_s(&self) -> f64 {
        self.section.end_s
    }

    /// Lane length (`end_s - start_s`).
    pub fn length(&self) -> f64 {
        self.section.length()
    }
}

/// Serialized form of a [`RoadNetwork`].
#[derive(Serialize, Deserialize)]
struct RoadList {
    roads: Vec<Road>,
}

impl From<RoadList> for RoadNetwork {
    fn from(list: RoadList) -> Self {
        RoadNetwork::new(list.roads)
    }
}

impl From<RoadNetwork> for RoadList {
    fn from(network: RoadNetwork) -> Self {
        RoadList {
            roads: network.roads,
        }
    }
}

/// The complete road network.
///
/// Roads are indexed by id on construction; the network is immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RoadList", into = "RoadList")]
pub struct RoadNetwork {
    roads: Vec<Road>,
    index: HashMap<RoadId, usize>,
}

impl RoadNetwork {
    /// Create a network from a list of roads.
    ///
    /// With duplicate ids the first road wins lookups; [`validate`](Self::validate)
    /// reports the duplicate.
    pub fn new(roads: Vec<Road>) -> Self {
        let mut index = HashMap::with_capacity(roads.len());
        for (position, road) in roads.iter().enumerate() {
            index.entry(road.id.clone()).or_insert(position);
        }
        Self { roads, index }
    }

    /// All roads, in load order.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Parse and validate a network from JSON.
    pub fn from_json_str(json: &str) -> NetworkResult<Self> {
        let network: RoadNetwork = serde_json::from_str(json)?;
        network.validate()?;
        Ok(network)
    }

    /// Load and validate a network from a JSON file.
    pub fn load(path: &Path) -> NetworkResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            roads = network.roads.len(),
            "Loaded road network"
        );
        Ok(network)
    }

    /// Check structural consistency.
    ///
    /// Dangling link targets are not an error here; the graph builder
    /// reports and skips them.
    pub fn validate(&self) -> NetworkResult<()> {
        let mut seen = HashSet::new();
        for road in &self.roads {
            if !seen.insert(&road.id) {
                return Err(NetworkError::DuplicateRoad(road.id.clone()));
            }
            if road.sections.is_empty() {
                return Err(NetworkError::NoLaneSections(road.id.clone()));
            }
            for (index, section) in road.sections.iter().enumerate() {
                if section.end_s < section.s {
                    return Err(NetworkError::InvalidSectionBounds {
                        road: road.id.clone(),
                        section: index,
                        s: section.s,
                        end_s: section.end_s,
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a road by id.
    pub fn road(&self, id: &RoadId) -> Option<&Road> {
        self.index.get(id).and_then(|&position| self.roads.get(position))
    }

    /// Resolve a lane by its structural key.
    pub fn lane(&self, key: &LaneKey) -> Option<LaneRef<'_>> {
        let road = self.road(&key.road)?;
        let section = road.sections.get(key.section)?;
        let lane = section.lane(key.lane)?;
        Some(LaneRef {
            road,
            section_index: key.section,
            section,
            lane,
        })
    }

    /// Locate the lane section enclosing a position.
    ///
    /// Returns the first section that holds the position's lane and whose
    /// `[s, end_s]` interval contains the position's s.
    pub fn locate(&self, position: &Position) -> Option<LaneKey> {
        let road = self.road(&position.road)?;
        road.sections
            .iter()
            .position(|section| {
                section.lane(position.lane).is_some() && section.contains_s(position.s)
            })
            .map(|index| LaneKey::new(road.id.clone(), index, position.lane))
    }

    /// Resolve the lane a link target points at, ignoring where the link
    /// starts.
    ///
    /// Uses the explicit section if the target names one, otherwise START
    /// enters the first lane section of the target road and END the last.
    pub fn resolve_target(&self, target: &LinkTarget) -> Option<LaneRef<'_>> {
        let road = self.road(&target.road)?;
        let section_index = match (target.section, target.contact_point) {
            (Some(section), _) => section,
            (None, ContactPoint::Start) => 0,
            (None, ContactPoint::End) => road.sections.len().checked_sub(1)?,
        };
        Self::lane_in(road, section_index, target.lane)
    }

    /// Resolve the lane a link of lane `from` points at.
    ///
    /// A target on `from`'s own road without an explicit section continues
    /// into the neighbouring section: START enters `from.section + 1`, END
    /// enters `from.section - 1`. When that neighbour does not exist (a road
    /// linking back onto itself) the plain contact-point rule applies.
    pub fn resolve_link(&self, from: &LaneKey, target: &LinkTarget) -> Option<LaneRef<'_>> {
        if target.section.is_none() && target.road == from.road {
            let neighbour = match target.contact_point {
                ContactPoint::Start => from.section.checked_add(1),
                ContactPoint::End => from.section.checked_sub(1),
            };
            let road = self.road(&target.road)?;
            if let Some(section_index) = neighbour.filter(|&index| index < road.sections.len()) {
                return Self::lane_in(road, section_index, target.lane);
            }
        }
        self.resolve_target(target)
    }

    fn lane_in(road: &Road, section_index: usize, lane: i32) -> Option<LaneRef<'_>> {
        let section = road.sections.get(section_index)?;
        let lane = section.lane(lane)?;
        Some(LaneRef {
            road,
            section_index,
            section,
            lane,
        })
    }

    /// Iterate over every lane of the network.
    pub fn lanes(&self) -> impl Iterator<Item = LaneRef<'_>> {
        self.roads.iter().flat_map(|road| {
            road.sections
                .iter()
                .enumerate()
                .flat_map(move |(section_index, section)| {
                    section.lanes.iter().map(move |lane| LaneRef {
                        road,
                        section_index,
                        section,
                        lane,
                    })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_section_road() -> Road {
        Road::new(
            "1",
            vec![
                LaneSection::new(0.0, 40.0, vec![Lane::new(-1), Lane::new(1)]),
                LaneSection::new(40.0, 100.0, vec![Lane::new(-1), Lane::new(-2)]),
            ],
        )
    }

    #[test]
    fn test_locate_picks_enclosing_section() {
        let network = RoadNetwork::new(vec![two_section_road()]);

        assert_eq!(
            network.locate(&Position::new("1", -1, 10.0)),
            Some(LaneKey::new("1", 0, -1))
        );
        assert_eq!(
            network.locate(&Position::new("1", -2, 70.0)),
            Some(LaneKey::new("1", 1, -2))
        );
        // Boundary belongs to the first matching section.
        assert_eq!(
            network.locate(&Position::new("1", -1, 40.0)),
            Some(LaneKey::new("1", 0, -1))
        );
    }

    #[test]
    fn test_locate_rejects_unknown_positions() {
        let network = RoadNetwork::new(vec![two_section_road()]);

        assert_eq!(network.locate(&Position::new("9", -1, 10.0)), None);
        assert_eq!(network.locate(&Position::new("1", -1, 120.0)), None);
        // Lane 1 only exists in the first section.
        assert_eq!(network.locate(&Position::new("1", 1, 70.0)), None);
    }

    #[test]
    fn test_resolve_target_uses_contact_point() {
        let network = RoadNetwork::new(vec![two_section_road()]);

        let start = network
            .resolve_target(&LinkTarget::new("1", -1, ContactPoint::Start))
            .unwrap();
        assert_eq!(start.section_index, 0);

        let end = network
            .resolve_target(&LinkTarget::new("1", -1, ContactPoint::End))
            .unwrap();
        assert_eq!(end.section_index, 1);
        assert_eq!(end.length(), 60.0);

        assert!(network
            .resolve_target(&LinkTarget::new("1", 1, ContactPoint::End))
            .is_none());
    }

    #[test]
    fn test_resolve_link_within_own_road() {
        let road = Road::new(
            "1",
            vec![
                LaneSection::new(0.0, 30.0, vec![Lane::new(-1)]),
                LaneSection::new(30.0, 60.0, vec![Lane::new(-1)]),
                LaneSection::new(60.0, 100.0, vec![Lane::new(-1)]),
            ],
        );
        let network = RoadNetwork::new(vec![road, Road::new("2", vec![])]);
        let start = LinkTarget::new("1", -1, ContactPoint::Start);
        let end = LinkTarget::new("1", -1, ContactPoint::End);

        // Successor into the next section, predecessor into the previous one.
        let next = network.resolve_link(&LaneKey::new("1", 0, -1), &start).unwrap();
        assert_eq!(next.section_index, 1);
        let previous = network.resolve_link(&LaneKey::new("1", 2, -1), &end).unwrap();
        assert_eq!(previous.section_index, 1);

        // No neighbour: a road looping onto itself uses the contact point.
        let wrapped = network.resolve_link(&LaneKey::new("1", 2, -1), &start).unwrap();
        assert_eq!(wrapped.section_index, 0);

        // Another road and explicit sections are unaffected by the origin.
        let pinned = start.clone().in_section(2);
        assert_eq!(
            network
                .resolve_link(&LaneKey::new("1", 0, -1), &pinned)
                .unwrap()
                .section_index,
            2
        );
        let other = network.resolve_link(&LaneKey::new("2", 0, -1), &start).unwrap();
        assert_eq!(other.section_index, 0);
    }

    #[test]
    fn test_road_lookup_uses_index() {
        let network = RoadNetwork::from_json_str(
            r#"{"roads": [
                {"id": "a", "sections": [{"s": 0.0, "end_s": 1.0}]},
                {"id": "b", "sections": [{"s": 0.0, "end_s": 2.0}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(network.road(&RoadId::new("b")).unwrap().sections[0].end_s, 2.0);
        assert!(network.road(&RoadId::new("c")).is_none());
        assert_eq!(network.roads().len(), 2);

        let json = serde_json::to_string(&network).unwrap();
        assert_eq!(RoadNetwork::from_json_str(&json).unwrap(), network);
    }

    #[test]
    fn test_select_prefers_route_connection() {
        let link = Link::junction(
            "J",
            vec![
                LinkTarget::new("10", -1, ContactPoint::Start).with_connection("0"),
                LinkTarget::new("11", -1, ContactPoint::Start).with_connection("1"),
            ],
        );

        let mut preferred = PreferredConnections::new();
        assert_eq!(link.select(&preferred).unwrap().road.as_str(), "10");

        preferred.push(JunctionId::new("J"), ConnectionId::new("1"));
        assert_eq!(link.select(&preferred).unwrap().road.as_str(), "11");

        assert!(Link::default().select(&preferred).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_networks() {
        let network = RoadNetwork::new(vec![two_section_road(), two_section_road()]);
        assert!(matches!(
            network.validate(),
            Err(NetworkError::DuplicateRoad(_))
        ));

        let mut road = two_section_road();
        road.sections[1].end_s = 10.0;
        let network = RoadNetwork::new(vec![road]);
        assert!(matches!(
            network.validate(),
            Err(NetworkError::InvalidSectionBounds { section: 1, .. })
        ));

        let empty = RoadNetwork::new(vec![Road::new("2", vec![])]);
        assert!(matches!(
            empty.validate(),
            Err(NetworkError::NoLaneSections(_))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "roads": [{
                "id": "1",
                "sections": [{
                    "s": 0.0, "end_s": 50.0,
                    "lanes": [{
                        "id": -1,
                        "successor": {
                            "junction": "J1",
                            "targets": [
                                {"road": "2", "lane": -1, "contact_point": "start", "connection": "0"}
                            ]
                        }
                    }]
                }],
                "geometry": [{"s": 0.0, "length": 50.0, "type": "line"}]
            }]
        }"#;

        let network = RoadNetwork::from_json_str(json).unwrap();
        let lane = network.lane(&LaneKey::new("1", 0, -1)).unwrap();
        let successor = lane.lane.successor.as_ref().unwrap();
        assert!(successor.is_junction());
        assert_eq!(
            successor.targets[0].connection,
            Some(ConnectionId::new("0"))
        );
        assert_eq!(network.lanes().count(), 1);
    }
}
