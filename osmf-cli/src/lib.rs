//! Command-line interface for finding OpenStreetMap entities near a point.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod find;
mod fs;
mod render;

pub use error::CliError;
use find::{FindArgs, run_find};

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_OSM_PBF: &str = "osm-pbf";
pub(crate) const ARG_RESOLVE_UNTAGGED_MEMBERS: &str = "resolve-untagged-members";
pub(crate) const ENV_LAT: &str = "OSMF_CMDS_FIND_LAT";
pub(crate) const ENV_LON: &str = "OSMF_CMDS_FIND_LON";
pub(crate) const ENV_RADIUS: &str = "OSMF_CMDS_FIND_RADIUS";
pub(crate) const ENV_OSM_PBF: &str = "OSMF_CMDS_FIND_OSM_PBF";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Find(args) => run_find(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "osmf",
    about = "Find OpenStreetMap entities near a point, ordered by distance",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search an OSM PBF extract around a coordinate.
    Find(FindArgs),
}

#[cfg(test)]
mod tests;
