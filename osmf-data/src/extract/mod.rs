use std::path::{Path, PathBuf};

use geo::{Coord, Rect};
use log::{debug, warn};
use osmf_core::{Admission, Category, EntityGraph, EntitySource, MemberResolution, Query};
use osmpbf::ElementReader;
use thiserror::Error;

mod accumulator;

use accumulator::EntityAccumulator;

/// Element counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
}

impl CategoryCounts {
    fn record(&mut self, category: Category) {
        match category {
            Category::Node => self.nodes += 1,
            Category::Way => self.ways += 1,
            Category::Relation => self.relations += 1,
        }
    }

    fn combine(self, other: Self) -> Self {
        Self {
            nodes: self.nodes + other.nodes,
            ways: self.ways + other.ways,
            relations: self.relations + other.relations,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

/// Statistics gathered while extracting a graph from a PBF file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionSummary {
    /// Elements decoded from the file, including dense-node entries.
    pub scanned: CategoryCounts,
    /// Elements admitted into the graph.
    pub kept: CategoryCounts,
    /// Nodes skipped because their coordinate is outside the WGS84 range.
    pub invalid_nodes: u64,
    /// Bounding box covering every valid scanned node, if any.
    /// Coordinates are WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl ExtractionSummary {
    fn combine(mut self, other: Self) -> Self {
        self.scanned = self.scanned.combine(other.scanned);
        self.kept = self.kept.combine(other.kept);
        self.invalid_nodes += other.invalid_nodes;
        if let Some(bounds) = other.bounds {
            self.include_bounds(bounds);
        }
        self
    }

    fn include_bounds(&mut self, bounds: Rect<f64>) {
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(bounds.min().x),
                    y: existing.min().y.min(bounds.min().y),
                };
                let max = Coord {
                    x: existing.max().x.max(bounds.max().x),
                    y: existing.max().y.max(bounds.max().y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(bounds),
        }
    }
}

/// Graph extracted for a query together with the extraction statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub graph: EntityGraph,
    pub summary: ExtractionSummary,
}

/// Errors returned when extracting entities from an OSM PBF file.
#[derive(Debug, Error)]
pub enum PbfSourceError {
    #[error("failed to open OSM PBF file at {path:?}")]
    Open {
        #[source]
        source: osmpbf::Error,
        path: PathBuf,
    },
    #[error("failed to decode OSM PBF data at {path:?}")]
    Decode {
        #[source]
        source: osmpbf::Error,
        path: PathBuf,
    },
}

/// An [`EntitySource`] backed by an OSM PBF file.
///
/// # Examples
/// ```no_run
/// use osmf_core::{EntitySource, MemberResolution, Query, TagFilter};
/// use osmf_data::PbfSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = PbfSource::new("berlin.osm.pbf", MemberResolution::Filtered);
/// let query = Query::new(52.52, 13.405, 500.0, TagFilter::parse(["amenity=cafe"])?)?;
/// let graph = source.extract(&query)?;
/// println!("Extracted {} entities", graph.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbfSource {
    path: PathBuf,
    resolution: MemberResolution,
}

impl PbfSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, resolution: MemberResolution) -> Self {
        Self {
            path: path.into(),
            resolution,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn resolution(&self) -> MemberResolution {
        self.resolution
    }

    /// Decode the file in parallel and keep the entities admitted by `query`.
    pub fn extract_with_summary(&self, query: &Query) -> Result<Extraction, PbfSourceError> {
        let reader =
            ElementReader::from_path(&self.path).map_err(|source| PbfSourceError::Open {
                source,
                path: self.path.clone(),
            })?;
        let admission = Admission::new(query, self.resolution);

        let accumulator = reader
            .par_map_reduce(
                |element| {
                    let mut accumulator = EntityAccumulator::default();
                    accumulator.process_element(&admission, element);
                    accumulator
                },
                EntityAccumulator::default,
                EntityAccumulator::combine,
            )
            .map_err(|source| PbfSourceError::Decode {
                source,
                path: self.path.clone(),
            })?;

        let extraction = accumulator.into_extraction();
        let summary = &extraction.summary;
        if summary.invalid_nodes > 0 {
            warn!(
                "Skipped {} nodes with coordinates outside the WGS84 range in {:?}",
                summary.invalid_nodes, self.path
            );
        }
        debug!(
            "Extracted {} of {} elements from {:?} ({} nodes, {} ways, {} relations kept)",
            summary.kept.total(),
            summary.scanned.total(),
            self.path,
            summary.kept.nodes,
            summary.kept.ways,
            summary.kept.relations
        );
        Ok(extraction)
    }
}

impl EntitySource for PbfSource {
    type Error = PbfSourceError;

    fn extract(&self, query: &Query) -> Result<EntityGraph, Self::Error> {
        self.extract_with_summary(query)
            .map(|extraction| extraction.graph)
    }
}
