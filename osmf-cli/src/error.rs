//! Error types emitted by the CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osmf_core::{QueryError, TagFilterError};
use osmf_data::PbfSourceError;
use thiserror::Error;

/// Errors emitted by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A required positional argument is missing after configuration merging.
    #[error("missing <{field}> argument (or set {env})")]
    MissingPositional {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A tag filter argument was malformed.
    #[error("invalid tag filter: {0}")]
    TagFilter(#[from] TagFilterError),
    /// The query point or radius was invalid.
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),
    /// Reading the OSM extract failed.
    #[error("failed to extract entities: {0}")]
    Extract(#[from] PbfSourceError),
    /// Serializing the results failed.
    #[error("failed to serialize results: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the results failed.
    #[error("failed to write results: {0}")]
    WriteOutput(#[source] std::io::Error),
}
