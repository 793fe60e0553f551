//! Lane-level road network model.
//!
//! This module holds the read-only road model that routing and turn
//! forecasting query: roads, lane sections, lanes, links and plan-view
//! geometry. It also provides the [`LaneWalker`], which follows lanes along
//! a planned route.
//!
//! # Structure
//!
//! ```text
//! RoadNetwork
//!   └── Road ─────────── geometry: [GeometrySegment]
//!         └── LaneSection [s, end_s]
//!               └── Lane ── successor / predecessor: Link
//!                                 └── LinkTarget (road, lane, contact point, section, connection)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lanenav::network::{Position, RoadNetwork};
//!
//! let network = RoadNetwork::load(Path::new("town.json"))?;
//! let lane = network.locate(&Position::new("12", -1, 35.0));
//! ```

mod error;
mod geometry;
mod ids;
mod model;
mod walker;

pub use error::{NetworkError, NetworkResult};
pub use geometry::{GeometryKind, GeometrySegment};
pub use ids::{ConnectionId, JunctionId, LaneKey, Position, RoadId};
pub use model::{ContactPoint, Lane, LaneRef, LaneSection, Link, LinkTarget, Road, RoadNetwork};
pub use walker::{Intersection, LanePoint, LaneWalker};
