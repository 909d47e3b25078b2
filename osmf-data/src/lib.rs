//! Extraction of OpenStreetMap entities for proximity queries.
//!
//! Responsibilities:
//! - Read OSM PBF files and build the entity graph for one query.
//! - Apply the query's bounding box and tag filter while decoding, so the
//!   graph only holds candidates and their resolvable members.
//!
//! Boundaries:
//! - Do not encode distance or ranking rules (live in `osmf-core`).
//! - Each extraction reads the file afresh; nothing is cached between
//!   queries.
//!
//! Invariants:
//! - Admission uses `osmf_core::Admission`, so extraction and aggregation
//!   agree on the bounding rectangle.
//! - No global mutable state.

mod extract;

pub use extract::{CategoryCounts, Extraction, ExtractionSummary, PbfSource, PbfSourceError};
