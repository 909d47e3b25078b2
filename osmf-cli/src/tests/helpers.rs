//! Test helpers for materialising PBF fixtures and CLI invocations.

use super::*;
use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A temporary directory holding a decoded copy of the Berlin sample extract.
pub(super) struct SampleDataset {
    _dir: TempDir,
    root: Utf8PathBuf,
    pbf: Utf8PathBuf,
}

impl SampleDataset {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let encoded_path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/berlin.osm.pbf.b64");
        let encoded = fs::read_to_string(&encoded_path).unwrap_or_else(|err| {
            panic!("failed to read base64 fixture {encoded_path:?}: {err}");
        });
        let cleaned: String = encoded
            .chars()
            .filter(|ch| !ch.is_ascii_whitespace())
            .collect();
        let decoded = general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .unwrap_or_else(|err| panic!("failed to decode base64 fixture: {err}"));
        let pbf = root.join("berlin.osm.pbf");
        write_utf8(&pbf, &decoded);
        Self {
            _dir: dir,
            root,
            pbf,
        }
    }

    pub(super) fn pbf(&self) -> &Utf8Path {
        &self.pbf
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}

/// Parse a `find` invocation into its arguments.
pub(super) fn parse_find(arguments: &[&str]) -> Result<FindArgs, CliError> {
    let mut invocation = vec!["osmf", "find"];
    invocation.extend_from_slice(arguments);
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Find(args) => Ok(args),
    }
}
