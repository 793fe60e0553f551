//! lanenav - Lane-level route planning and turn forecasting
//!
//! This library turns a junction-bearing road network into a directed lane
//! graph, plans shortest routes over it, and forecasts the turn direction at
//! upcoming intersections for turn signaling and navigation announcements.
//!
//! # Modules
//!
//! - [`network`]: road model, JSON loading, lane following
//! - [`graph`]: lane-traversal nodes, weighted edges, graph construction
//! - [`routing`]: Dijkstra search, junction disambiguation, route planning
//! - [`forecast`]: curvature classification and hysteresis-gated events
//!
//! # Example
//!
//! ```ignore
//! use lanenav::network::{Position, RoadNetwork};
//! use lanenav::routing::RoutePlanner;
//!
//! let network = RoadNetwork::load(Path::new("town.json"))?;
//! let planner = RoutePlanner::new(network);
//! if let Some(route) = planner.plan(&Position::new("1", -1, 5.0), &Position::new("7", 1, 20.0))? {
//!     println!("{:.1} m through {} junctions", route.length, route.preferred_connections.len());
//! }
//! ```

pub mod forecast;
pub mod graph;
pub mod network;
pub mod routing;

pub use forecast::{Direction, ForecastConfig, IntersectionForecaster};
pub use graph::{Edge, Graph, GraphBuilder, Node, TravelTag};
pub use network::{Position, RoadNetwork};
pub use routing::{PreferredConnections, Route, RoutePlanner, ShortestPathEngine};
