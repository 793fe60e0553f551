//! Route planning over the lane graph.
//!
//! - [`ShortestPathEngine`]: Dijkstra search from one start node
//! - [`PreferredConnections`]: junction choices extracted from a path
//! - [`RoutePlanner`]: position-to-position queries, single or batched
//!
//! # Data Flow
//!
//! ```text
//! Position ──locate──► Node ──ShortestPathEngine──► [Node] ──extract──► PreferredConnections
//!                                                      │
//!                                                      └──► Route { nodes, preferred_connections, length }
//! ```

mod connections;
mod dijkstra;
mod error;
mod planner;

pub use connections::PreferredConnections;
pub use dijkstra::ShortestPathEngine;
pub use error::{PositionRole, RouteError, RouteResult};
pub use planner::{Route, RoutePlanner};
