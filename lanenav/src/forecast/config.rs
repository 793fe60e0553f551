//! Configuration for intersection forecasting.
//!
//! # Example Configuration (JSON)
//!
//! ```json
//! {
//!   "turn_signal_control": true,
//!   "announcements": true,
//!   "turn_signal_start_distance": 100,
//!   "turn_signal_stop_distance": 50,
//!   "announcement_positions": [1000, 500, 200, 100, 10]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Who is driving the subject vehicle.
///
/// The forecaster drives the turn signal under autopilot and gives
/// navigation announcements to a manual driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// The autopilot follows the route.
    Autopilot,
    /// A human drives.
    #[default]
    Manual,
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveMode::Autopilot => write!(f, "autopilot"),
            DriveMode::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for DriveMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "autopilot" | "auto" => Self::Autopilot,
            _ => Self::Manual,
        })
    }
}

/// Configuration for the intersection forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Whether the autopilot may control the turn signal.
    pub turn_signal_control: bool,

    /// Whether navigation announcements are given in manual mode.
    pub announcements: bool,

    /// Distance before the intersection within which the turn signal is
    /// switched on (meters).
    pub turn_signal_start_distance: i32,

    /// Distance past the latched intersection position after which the turn
    /// signal is switched off again (meters).
    pub turn_signal_stop_distance: f32,

    /// Distances before the intersection at which announcements are given
    /// (meters). Each position announces within
    /// `[p - announcement_window, p]`.
    pub announcement_positions: Vec<i32>,

    /// Width of the distance window below each announcement position
    /// (meters).
    pub announcement_window: i32,

    /// Largest distance decrease between two ticks that still counts as a
    /// steady approach (meters).
    pub max_distance_jump: i32,

    /// The intersection position is latched once the previous distance drops
    /// below this value (meters).
    pub latch_distance: i32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            turn_signal_control: true,
            announcements: true,
            turn_signal_start_distance: 100,
            turn_signal_stop_distance: 50.0,
            announcement_positions: vec![1000, 500, 200, 100, 10],
            announcement_window: 5,
            max_distance_jump: 5,
            latch_distance: 5,
        }
    }
}
