//! Turn direction forecasting for upcoming intersections.
//!
//! The forecast runs once per simulation tick for each subject vehicle:
//!
//! 1. Pick the first upcoming intersection whose continuation is not straight
//! 2. Classify its turn from the curvature of the road entered past it
//! 3. Gate the reading through a hysteresis check and derive turn-signal or
//!    announcement events
//!
//! Classification ([`classify`]) is a pure function of road geometry. All
//! temporal behavior lives in [`ForecastState`], which each subject owns.
//!
//! # Example
//!
//! ```ignore
//! let forecaster = IntersectionForecaster::new(&network, ForecastConfig::default());
//! let mut state = forecaster.new_state();
//!
//! // every tick
//! let outcome = forecaster.update(&mut state, &input);
//! for event in outcome.events {
//!     vehicle.apply(event);
//! }
//! ```

mod config;
mod direction;
mod forecaster;
mod latch;

pub use config::{DriveMode, ForecastConfig};
pub use direction::{classify, Classification, ClassificationRule, Direction};
pub use forecaster::{
    ForecastEvent, ForecastInput, ForecastOutcome, ForecastState, IntersectionForecaster,
    TurnSignal,
};
pub use latch::AnnouncementLatch;
