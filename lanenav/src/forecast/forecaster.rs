//! Per-tick intersection forecasting with hysteresis.
//!
//! Each tick the forecaster looks at the upcoming intersections of the
//! subject's route, classifies the first one that is not straight, and feeds
//! the result through a hysteresis gate before it drives the turn signal
//! (autopilot) or navigation announcements (manual driving).
//!
//! # Approach Gate
//!
//! A reading counts as a steady approach only if it repeats the previous
//! tick's direction and the distance shrinks by at most
//! `max_distance_jump` meters:
//!
//! ```text
//! direction == last_direction && direction != Unknown
//!   && 0 <= distance <= last_distance <= distance + max_distance_jump
//!   && min <= distance <= max
//! ```
//!
//! # Turn Signal
//!
//! ```text
//! Off --[approaching within [0, start_distance], turning]--> Left / Right
//! Left / Right --[last distance in (0, latch_distance)]--> position latched
//! latched --[moved > stop_distance from latched position]--> Off
//! ```

use glam::Vec3;

use super::config::{DriveMode, ForecastConfig};
use super::direction::{classify, Direction};
use super::latch::AnnouncementLatch;
use crate::network::{Intersection, LaneKey, LanePoint, LaneWalker, RoadNetwork};
use crate::routing::PreferredConnections;

/// Distance past an intersection at which its turn is sampled (meters).
const PROBE_OFFSET: f64 = 0.1;

/// A point this close to its lane's start counts as entered from the start.
const FORWARD_ENTRY_TOLERANCE: f64 = 0.2;

/// Commanded turn signal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnSignal {
    /// Signal off.
    #[default]
    Off,
    /// Left indicator.
    Left,
    /// Right indicator.
    Right,
}

/// Output of one forecaster tick for the vehicle-control side.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastEvent {
    /// Set the turn signal.
    TurnSignal(TurnSignal),
    /// Play a navigation announcement.
    Announcement {
        /// Announcement distance that fired.
        position: i32,
        /// Announced direction.
        direction: Direction,
        /// Cue name, e.g. `TurnRightIn200m`.
        cue: String,
    },
}

/// Per-tick input.
#[derive(Debug, Clone)]
pub struct ForecastInput<'a> {
    /// Upcoming intersections, sorted by distance.
    pub intersections: &'a [Intersection],
    /// Lane the subject is on.
    pub lane: &'a LaneKey,
    /// Whether the subject drives against the lane's direction.
    pub wrong_way: bool,
    /// Subject's s on `lane`.
    pub s: f64,
    /// Junction choices of the current route.
    pub preferred: &'a PreferredConnections,
    /// Subject's world position.
    pub position: Vec3,
    /// Who is driving.
    pub mode: DriveMode,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    /// Forecast direction at the selected intersection.
    pub direction: Direction,
    /// Rounded distance to it, `None` without intersections.
    pub distance: Option<i32>,
    /// Events to apply this tick.
    pub events: Vec<ForecastEvent>,
}

/// Direction and distance measured on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LastReading {
    direction: Direction,
    distance: Option<i32>,
}

impl LastReading {
    fn approaching(
        &self,
        direction: Direction,
        distance: Option<i32>,
        min: i32,
        max: i32,
        max_jump: i32,
    ) -> bool {
        let (Some(distance), Some(last)) = (distance, self.distance) else {
            return false;
        };
        direction == self.direction
            && direction != Direction::Unknown
            && distance >= 0
            && distance <= last
            && last <= distance.saturating_add(max_jump)
            && min <= distance
            && distance <= max
    }
}

/// Hysteresis state owned by one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastState {
    last: LastReading,
    intersection_position: Option<Vec3>,
    turn_signal: TurnSignal,
    latches: Vec<AnnouncementLatch>,
}

impl ForecastState {
    /// Create a fresh state with one latch per configured announcement
    /// position.
    pub fn new(config: &ForecastConfig) -> Self {
        let latches = if config.announcements {
            config
                .announcement_positions
                .iter()
                .map(|&position| AnnouncementLatch::new(position))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            last: LastReading {
                direction: Direction::Unknown,
                distance: None,
            },
            intersection_position: None,
            turn_signal: TurnSignal::Off,
            latches,
        }
    }

    /// Direction of the previous tick.
    pub fn last_direction(&self) -> Direction {
        self.last.direction
    }

    /// Rounded distance of the previous tick.
    pub fn last_distance(&self) -> Option<i32> {
        self.last.distance
    }

    /// Latched world position of the intersection being passed.
    pub fn intersection_position(&self) -> Option<Vec3> {
        self.intersection_position
    }

    /// Turn signal state last commanded.
    pub fn turn_signal(&self) -> TurnSignal {
        self.turn_signal
    }

    /// Announcement latches.
    pub fn latches(&self) -> &[AnnouncementLatch] {
        &self.latches
    }

    /// Whether a reading is a steady approach within `[min, max]`.
    pub fn is_approaching(
        &self,
        direction: Direction,
        distance: Option<i32>,
        min: i32,
        max: i32,
        max_jump: i32,
    ) -> bool {
        self.last.approaching(direction, distance, min, max, max_jump)
    }
}

/// Forecasts turn directions at upcoming intersections.
///
/// The forecaster itself is stateless; every subject keeps its own
/// [`ForecastState`].
#[derive(Debug, Clone)]
pub struct IntersectionForecaster<'a> {
    network: &'a RoadNetwork,
    config: ForecastConfig,
}

impl<'a> IntersectionForecaster<'a> {
    /// Create a forecaster.
    pub fn new(network: &'a RoadNetwork, config: ForecastConfig) -> Self {
        Self { network, config }
    }

    /// Create a forecaster with default configuration.
    pub fn with_defaults(network: &'a RoadNetwork) -> Self {
        Self::new(network, ForecastConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// A fresh state matching this forecaster's configuration.
    pub fn new_state(&self) -> ForecastState {
        ForecastState::new(&self.config)
    }

    /// Classify the turn at the point just past an intersection.
    ///
    /// The point's road geometry is read in the direction the lane was
    /// entered: from its start when the point lies within 0.2 m of the lane
    /// start, from its end otherwise.
    pub fn classify_point(&self, point: &LanePoint) -> Direction {
        let Some(lane) = self.network.lane(&point.lane) else {
            return Direction::Unknown;
        };
        let entered_forward = point.s - lane.start_s() <= FORWARD_ENTRY_TOLERANCE;
        classify(&lane.road.geometry, entered_forward).direction
    }

    /// Select the intersection to forecast and classify it.
    ///
    /// Straight intersections are skipped; the first non-straight one is
    /// selected, or the last one if all are straight. Returns the direction
    /// and the unrounded distance, `(Unknown, None)` without intersections.
    pub fn forecast(&self, input: &ForecastInput<'_>) -> (Direction, Option<f64>) {
        let walker = LaneWalker::new(self.network, input.preferred);
        let mut selected = (Direction::Unknown, None);

        for intersection in input.intersections {
            let direction = walker
                .point_ahead(
                    input.lane,
                    input.wrong_way,
                    input.s,
                    intersection.distance + PROBE_OFFSET,
                )
                .map(|point| self.classify_point(&point))
                .unwrap_or(Direction::Unknown);

            selected = (direction, Some(intersection.distance));
            if direction != Direction::Straight {
                break;
            }
        }

        selected
    }

    /// Run one tick for a subject.
    ///
    /// Drives the turn signal under autopilot and announcements in manual
    /// mode, then records this tick's reading for the next one.
    pub fn update(&self, state: &mut ForecastState, input: &ForecastInput<'_>) -> ForecastOutcome {
        let (direction, distance) = self.forecast(input);
        let distance = distance.map(|d| d.round() as i32);
        let mut events = Vec::new();

        if direction != state.last.direction {
            tracing::debug!(
                from = %state.last.direction,
                to = %direction,
                distance = ?distance,
                "Forecast direction changed"
            );
        }

        match input.mode {
            DriveMode::Autopilot if self.config.turn_signal_control => {
                self.update_turn_signal(state, direction, distance, input.position, &mut events);
            }
            DriveMode::Manual if self.config.announcements => {
                self.update_announcements(state, direction, distance, &mut events);
            }
            _ => {}
        }

        state.last = LastReading {
            direction,
            distance,
        };

        ForecastOutcome {
            direction,
            distance,
            events,
        }
    }

    fn update_turn_signal(
        &self,
        state: &mut ForecastState,
        direction: Direction,
        distance: Option<i32>,
        position: Vec3,
        events: &mut Vec<ForecastEvent>,
    ) {
        let approaching = state.is_approaching(
            direction,
            distance,
            0,
            self.config.turn_signal_start_distance,
            self.config.max_distance_jump,
        );

        if approaching {
            let wanted = if direction.is_right() {
                Some(TurnSignal::Right)
            } else if direction.is_left() {
                Some(TurnSignal::Left)
            } else {
                None
            };
            if let Some(signal) = wanted.filter(|&signal| signal != state.turn_signal) {
                tracing::debug!(signal = ?signal, distance = ?distance, "Turn signal on");
                state.turn_signal = signal;
                events.push(ForecastEvent::TurnSignal(signal));
            }
        }

        // Latch on the previous reading so the position is taken just before
        // the intersection is passed.
        if state
            .last
            .distance
            .is_some_and(|last| 0 < last && last < self.config.latch_distance)
        {
            state.intersection_position = Some(position);
        }

        if let Some(latched) = state.intersection_position {
            if latched.distance(position) > self.config.turn_signal_stop_distance {
                tracing::debug!("Intersection passed, turn signal off");
                state.turn_signal = TurnSignal::Off;
                state.intersection_position = None;
                events.push(ForecastEvent::TurnSignal(TurnSignal::Off));
            }
        }
    }

    fn update_announcements(
        &self,
        state: &mut ForecastState,
        direction: Direction,
        distance: Option<i32>,
        events: &mut Vec<ForecastEvent>,
    ) {
        let last = state.last;
        let max_jump = self.config.max_distance_jump;
        let window = self.config.announcement_window;

        for latch in &mut state.latches {
            let position = latch.position();
            let approaching = last.approaching(
                direction,
                distance,
                position.saturating_sub(window),
                position,
                max_jump,
            );
            if let Some(cue) = latch.update(approaching, direction) {
                tracing::info!(cue = %cue, position, "Navigation announcement");
                events.push(ForecastEvent::Announcement {
                    position,
                    direction,
                    cue,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{ContactPoint, GeometrySegment, Lane, LaneSection, Link, LinkTarget, Road};

    /// Road 1 (100 m) ends in junction "J": connection "0" to road 10 (a
    /// right-hand arc), connection "1" to road 11 (straight), connection "2"
    /// to road 12 (a left-hand arc).
    fn junction_network() -> RoadNetwork {
        RoadNetwork::new(vec![
            Road::new(
                "1",
                vec![LaneSection::new(
                    0.0,
                    100.0,
                    vec![Lane::new(-1).with_successor(Link::junction(
                        "J",
                        vec![
                            LinkTarget::new("10", -1, ContactPoint::Start).with_connection("0"),
                            LinkTarget::new("11", -1, ContactPoint::Start).with_connection("1"),
                            LinkTarget::new("12", -1, ContactPoint::Start).with_connection("2"),
                        ],
                    ))],
                )],
            )
            .with_geometry(vec![GeometrySegment::line(0.0, 100.0)]),
            Road::new("10", vec![LaneSection::new(0.0, 20.0, vec![Lane::new(-1)])])
                .in_junction("J")
                .with_geometry(vec![GeometrySegment::arc(0.0, 20.0, -0.1)]),
            Road::new("11", vec![LaneSection::new(0.0, 30.0, vec![Lane::new(-1)])])
                .in_junction("J")
                .with_geometry(vec![GeometrySegment::line(0.0, 30.0)]),
            Road::new("12", vec![LaneSection::new(0.0, 20.0, vec![Lane::new(-1)])])
                .in_junction("J")
                .with_geometry(vec![GeometrySegment::arc(0.0, 20.0, 0.1)]),
        ])
    }

    fn preferred(connection: &str) -> PreferredConnections {
        let mut preferred = PreferredConnections::new();
        preferred.push("J".into(), connection.into());
        preferred
    }

    fn tick(
        forecaster: &IntersectionForecaster<'_>,
        state: &mut ForecastState,
        preferred: &PreferredConnections,
        s: f64,
        mode: DriveMode,
    ) -> ForecastOutcome {
        let lane = LaneKey::new("1", 0, -1);
        let intersections = LaneWalker::new(forecaster.network, preferred)
            .intersections_ahead(&lane, false, s, 1500.0);
        let input = ForecastInput {
            intersections: &intersections,
            lane: &lane,
            wrong_way: false,
            s,
            preferred,
            position: Vec3::new(s as f32, 0.0, 0.0),
            mode,
        };
        forecaster.update(state, &input)
    }

    #[test]
    fn test_forecast_follows_preferred_connection() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let mut state = forecaster.new_state();

        let right = tick(&forecaster, &mut state, &preferred("0"), 10.0, DriveMode::Manual);
        assert_eq!(right.direction, Direction::Right);
        assert_eq!(right.distance, Some(90));

        let mut state = forecaster.new_state();
        let straight = tick(&forecaster, &mut state, &preferred("1"), 10.0, DriveMode::Manual);
        assert_eq!(straight.direction, Direction::Straight);
        assert_eq!(straight.distance, Some(90));
    }

    #[test]
    fn test_no_intersections_is_unknown() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let lane = LaneKey::new("11", 0, -1);
        let preferred = PreferredConnections::new();
        let input = ForecastInput {
            intersections: &[],
            lane: &lane,
            wrong_way: false,
            s: 0.0,
            preferred: &preferred,
            position: Vec3::ZERO,
            mode: DriveMode::Manual,
        };
        assert_eq!(forecaster.forecast(&input), (Direction::Unknown, None));
    }

    #[test]
    fn test_unlocatable_point_is_unknown() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let lane = LaneKey::new("1", 0, -1);
        let preferred = preferred("0");
        // Far beyond the end of road 10, which has no successor.
        let intersections = [Intersection::new(500.0, None)];
        let input = ForecastInput {
            intersections: &intersections,
            lane: &lane,
            wrong_way: false,
            s: 0.0,
            preferred: &preferred,
            position: Vec3::ZERO,
            mode: DriveMode::Manual,
        };
        assert_eq!(forecaster.forecast(&input), (Direction::Unknown, Some(500.0)));
    }

    #[test]
    fn test_announcement_fires_once_and_rearms() {
        let network = junction_network();
        let config = ForecastConfig {
            announcement_positions: vec![90],
            ..Default::default()
        };
        let forecaster = IntersectionForecaster::new(&network, config);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        // First tick has no previous reading.
        assert!(tick(&forecaster, &mut state, &preferred, 8.0, DriveMode::Manual).events.is_empty());

        let fired = tick(&forecaster, &mut state, &preferred, 10.0, DriveMode::Manual);
        assert_eq!(
            fired.events,
            vec![ForecastEvent::Announcement {
                position: 90,
                direction: Direction::Right,
                cue: "TurnRightIn90m".to_string(),
            }]
        );

        // Still inside [85, 90]: no duplicate.
        assert!(tick(&forecaster, &mut state, &preferred, 12.0, DriveMode::Manual).events.is_empty());
        assert!(state.latches()[0].is_announced());

        // Leaving the window re-arms the latch.
        tick(&forecaster, &mut state, &preferred, 16.0, DriveMode::Manual);
        assert!(!state.latches()[0].is_announced());
    }

    #[test]
    fn test_distance_jump_blocks_announcement() {
        let network = junction_network();
        let config = ForecastConfig {
            announcement_positions: vec![90],
            ..Default::default()
        };
        let forecaster = IntersectionForecaster::new(&network, config);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        tick(&forecaster, &mut state, &preferred, 0.0, DriveMode::Manual);
        // 100 -> 88 jumps more than 5 m.
        assert!(tick(&forecaster, &mut state, &preferred, 12.0, DriveMode::Manual).events.is_empty());
    }

    fn announcing(positions: Vec<i32>) -> ForecastConfig {
        ForecastConfig {
            announcement_positions: positions,
            ..Default::default()
        }
    }

    #[test]
    fn test_direction_change_blocks_announcement() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::new(&network, announcing(vec![88]));
        let mut state = forecaster.new_state();
        let (right, left) = (preferred("0"), preferred("2"));

        tick(&forecaster, &mut state, &right, 10.0, DriveMode::Manual);
        // 90 -> 88 is a steady approach, but the direction flipped.
        let flipped = tick(&forecaster, &mut state, &left, 12.0, DriveMode::Manual);
        assert_eq!(flipped.direction, Direction::Left);
        assert!(flipped.events.is_empty());

        let repeated = tick(&forecaster, &mut state, &left, 13.0, DriveMode::Manual);
        assert_eq!(
            repeated.events,
            vec![ForecastEvent::Announcement {
                position: 88,
                direction: Direction::Left,
                cue: "TurnLeftIn88m".to_string(),
            }]
        );
    }

    #[test]
    fn test_growing_distance_blocks_announcement() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::new(&network, announcing(vec![90]));
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        tick(&forecaster, &mut state, &preferred, 12.0, DriveMode::Manual);
        // 88 -> 89 moves away from the intersection.
        assert!(tick(&forecaster, &mut state, &preferred, 11.0, DriveMode::Manual).events.is_empty());
        assert!(!state.latches()[0].is_announced());

        let held = tick(&forecaster, &mut state, &preferred, 11.0, DriveMode::Manual);
        assert_eq!(held.events.len(), 1);
    }

    #[test]
    fn test_announcement_window_is_independent_of_jump_tolerance() {
        let network = junction_network();
        let config = ForecastConfig {
            announcement_window: 20,
            ..announcing(vec![90])
        };
        let forecaster = IntersectionForecaster::new(&network, config);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        tick(&forecaster, &mut state, &preferred, 22.0, DriveMode::Manual);
        // 77 is outside [85, 90] but inside [70, 90].
        let fired = tick(&forecaster, &mut state, &preferred, 23.0, DriveMode::Manual);
        assert_eq!(fired.events.len(), 1);
    }

    #[test]
    fn test_extreme_config_values_do_not_overflow() {
        let network = junction_network();
        let config = ForecastConfig {
            max_distance_jump: i32::MAX,
            announcement_window: i32::MAX,
            ..announcing(vec![i32::MIN, 90])
        };
        let forecaster = IntersectionForecaster::new(&network, config);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        tick(&forecaster, &mut state, &preferred, 0.0, DriveMode::Manual);
        let outcome = tick(&forecaster, &mut state, &preferred, 10.0, DriveMode::Manual);
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn test_direction_change_blocks_turn_signal() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let mut state = forecaster.new_state();
        let (right, left) = (preferred("0"), preferred("2"));

        tick(&forecaster, &mut state, &right, 10.0, DriveMode::Autopilot);
        assert!(tick(&forecaster, &mut state, &left, 11.0, DriveMode::Autopilot).events.is_empty());
        assert_eq!(state.turn_signal(), TurnSignal::Off);

        let on = tick(&forecaster, &mut state, &left, 12.0, DriveMode::Autopilot);
        assert_eq!(on.events, vec![ForecastEvent::TurnSignal(TurnSignal::Left)]);
    }

    #[test]
    fn test_growing_distance_blocks_turn_signal() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        tick(&forecaster, &mut state, &preferred, 12.0, DriveMode::Autopilot);
        assert!(tick(&forecaster, &mut state, &preferred, 10.0, DriveMode::Autopilot).events.is_empty());
        assert_eq!(state.turn_signal(), TurnSignal::Off);

        let on = tick(&forecaster, &mut state, &preferred, 10.0, DriveMode::Autopilot);
        assert_eq!(on.events, vec![ForecastEvent::TurnSignal(TurnSignal::Right)]);
    }

    #[test]
    fn test_turn_signal_on_then_auto_off() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");
        let mut events = Vec::new();

        for step in 0..100 {
            let outcome = tick(&forecaster, &mut state, &preferred, step as f64, DriveMode::Autopilot);
            events.extend(outcome.events);
        }
        assert_eq!(events, vec![ForecastEvent::TurnSignal(TurnSignal::Right)]);
        assert_eq!(state.turn_signal(), TurnSignal::Right);

        // Past the junction: no intersections left, keep driving.
        let lane = LaneKey::new("10", 0, -1);
        let mut off_events = Vec::new();
        for step in 100..200 {
            let input = ForecastInput {
                intersections: &[],
                lane: &lane,
                wrong_way: false,
                s: 0.0,
                preferred: &preferred,
                position: Vec3::new(step as f32, 0.0, 0.0),
                mode: DriveMode::Autopilot,
            };
            off_events.extend(forecaster.update(&mut state, &input).events);
        }

        assert_eq!(off_events, vec![ForecastEvent::TurnSignal(TurnSignal::Off)]);
        assert_eq!(state.turn_signal(), TurnSignal::Off);
        assert!(state.intersection_position().is_none());
    }

    #[test]
    fn test_manual_mode_leaves_turn_signal_alone() {
        let network = junction_network();
        let forecaster = IntersectionForecaster::with_defaults(&network);
        let mut state = forecaster.new_state();
        let preferred = preferred("0");

        for step in 0..100 {
            let outcome = tick(&forecaster, &mut state, &preferred, step as f64, DriveMode::Manual);
            assert!(!outcome
                .events
                .iter()
                .any(|event| matches!(event, ForecastEvent::TurnSignal(_))));
        }
        assert_eq!(state.turn_signal(), TurnSignal::Off);
    }
}
