//! Find command implementation for the CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osmf_core::{MemberResolution, Query, TagFilter, aggregate};
use osmf_data::PbfSource;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::render::{write_json, write_text};
use crate::{
    ARG_LAT, ARG_LON, ARG_OSM_PBF, ARG_RADIUS, ARG_RESOLVE_UNTAGGED_MEMBERS, CliError, ENV_LAT,
    ENV_LON, ENV_OSM_PBF, ENV_RADIUS,
};

/// CLI arguments for the `find` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search an OpenStreetMap PBF extract for nodes, ways and \
                 relations within a radius of a coordinate. Tag filters take \
                 the form tag=value, matching values that contain `value` \
                 ignoring case, or tag= to require the tag with any value. \
                 Repeating a tag accepts any of its values; different tags \
                 must all match. way_area>N and way_area<N restrict results \
                 to closed ways enclosing more or less than N square metres.",
    about = "Find entities within a radius of a coordinate",
    allow_negative_numbers = true
)]
#[ortho_config(prefix = "OSMF")]
pub(crate) struct FindArgs {
    /// Latitude of the query point in decimal degrees.
    #[arg(value_name = ARG_LAT)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the query point in decimal degrees.
    #[arg(value_name = ARG_LON)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres.
    #[arg(value_name = ARG_RADIUS)]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Tag filters (`tag=value` or `tag=`).
    #[arg(value_name = "tag=value")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) tags: Vec<String>,
    /// Path to the OpenStreetMap PBF file.
    #[arg(long = ARG_OSM_PBF, value_name = "path")]
    #[serde(default)]
    pub(crate) osm_pbf: Option<Utf8PathBuf>,
    /// Also print tags with empty values.
    #[arg(short = 'v', long)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) verbose: bool,
    /// Print results as a JSON array.
    #[arg(long)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) json: bool,
    /// Resolve way and relation distances through untagged member nodes.
    #[arg(long = ARG_RESOLVE_UNTAGGED_MEMBERS)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) resolve_untagged_members: bool,
}

impl FindArgs {
    pub(crate) fn into_config(self) -> Result<FindConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FindConfig::try_from(merged)
    }
}

/// How results are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// `name: value` blocks; `verbose` also prints empty tag values.
    Text { verbose: bool },
    Json,
}

/// Resolved `find` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FindConfig {
    pub(crate) query: Query,
    pub(crate) osm_pbf: Utf8PathBuf,
    pub(crate) format: OutputFormat,
    pub(crate) resolution: MemberResolution,
}

impl FindConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.osm_pbf, ARG_OSM_PBF)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match crate::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl TryFrom<FindArgs> for FindConfig {
    type Error = CliError;

    fn try_from(args: FindArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingPositional {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingPositional {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        let radius = args.radius.ok_or(CliError::MissingPositional {
            field: ARG_RADIUS,
            env: ENV_RADIUS,
        })?;
        let osm_pbf = args.osm_pbf.ok_or(CliError::MissingArgument {
            field: ARG_OSM_PBF,
            env: ENV_OSM_PBF,
        })?;
        let filter = TagFilter::parse(&args.tags)?;
        let query = Query::new(lat, lon, radius, filter)?;
        let format = if args.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text {
                verbose: args.verbose,
            }
        };
        let resolution = if args.resolve_untagged_members {
            MemberResolution::UntaggedNodes
        } else {
            MemberResolution::Filtered
        };
        Ok(Self {
            query,
            osm_pbf,
            format,
            resolution,
        })
    }
}

pub(super) fn run_find(args: FindArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_find_with(args, &mut stdout)
}

pub(super) fn run_find_with(args: FindArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_find_config(args)?;
    execute_find(&config, writer)
}

fn resolve_find_config(args: FindArgs) -> Result<FindConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(super) fn execute_find(config: &FindConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let source = PbfSource::new(config.osm_pbf.as_std_path(), config.resolution);
    let extraction = source.extract_with_summary(&config.query)?;
    let results = aggregate(&extraction.graph, &config.query);
    debug!(
        "{} results from {} extracted entities",
        results.len(),
        extraction.graph.len()
    );
    match config.format {
        OutputFormat::Text { verbose } => {
            write_text(writer, &results, verbose).map_err(CliError::WriteOutput)
        }
        OutputFormat::Json => write_json(writer, &results),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FindConfig, CliError> {
    let merged = FindArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FindConfig::try_from(merged)
}
