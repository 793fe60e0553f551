//! lanenav CLI - inspect lane networks, plan routes, preview turn forecasts.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lanenav::network::Position;
use tracing_subscriber::EnvFilter;

use commands::common::parse_position;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "lanenav", version, about = "Lane-level routing and turn forecasting")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the lane graph and print its statistics
    Graph {
        /// Road network JSON file
        network: PathBuf,
    },
    /// Plan a route between two positions
    Route {
        /// Road network JSON file
        network: PathBuf,
        /// Start position as road:lane:s
        #[arg(long, value_parser = parse_position)]
        from: Position,
        /// Target position as road:lane:s
        #[arg(long, value_parser = parse_position)]
        to: Position,
    },
    /// List upcoming intersections and their turn directions
    Turns {
        /// Road network JSON file
        network: PathBuf,
        /// Current position as road:lane:s
        #[arg(long, value_parser = parse_position)]
        at: Position,
        /// Follow the route to this position at ambiguous links
        #[arg(long, value_parser = parse_position)]
        to: Option<Position>,
        /// Drive against the lane's direction
        #[arg(long)]
        wrong_way: bool,
        /// Look-ahead distance in meters
        #[arg(long, default_value_t = 1000.0)]
        range: f64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Graph { network } => commands::graph::run(&network),
        Commands::Route { network, from, to } => commands::route::run(&network, &from, &to),
        Commands::Turns {
            network,
            at,
            to,
            wrong_way,
            range,
        } => commands::turns::run(&network, &at, to.as_ref(), wrong_way, range),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
