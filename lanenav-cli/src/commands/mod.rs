//! CLI subcommands.

pub mod common;
pub mod graph;
pub mod route;
pub mod turns;
