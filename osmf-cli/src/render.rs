//! Text and JSON presentation of ranked results.

use std::io::{self, Write};

use osmf_core::{Category, Distance, EntityKey, Nearby, Tags};
use serde::Serialize;

use crate::CliError;

const OSM_BASE_URL: &str = "https://www.openstreetmap.org";

/// Browse link for an entity. Negative IDs link to their absolute value.
pub(crate) fn osm_link(key: EntityKey) -> String {
    format!("{OSM_BASE_URL}/{}/{}", key.category, key.id.unsigned_abs())
}

/// Write one block per result, separated by blank lines.
///
/// Tags follow the `meta:` lines in name order. Tags with empty values are
/// only written when `verbose` is set.
pub(crate) fn write_text(
    writer: &mut dyn Write,
    results: &[Nearby<'_>],
    verbose: bool,
) -> io::Result<()> {
    for (index, nearby) in results.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        let entity = nearby.entity;
        writeln!(writer, "meta:distance: {}", nearby.distance)?;
        writeln!(writer, "meta:id: {}", entity.id())?;
        writeln!(writer, "meta:type: {}", entity.category())?;
        writeln!(writer, "meta:link: {}", osm_link(entity.key()))?;
        for (name, value) in entity.tags() {
            if !value.is_empty() {
                writeln!(writer, "{name}: {value}")?;
            } else if verbose {
                writeln!(writer, "{name}:")?;
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DistanceField {
    Meters(u64),
    Unknown(&'static str),
}

impl From<Distance> for DistanceField {
    fn from(distance: Distance) -> Self {
        match distance {
            Distance::Meters(meters) => Self::Meters(meters),
            Distance::Unknown => Self::Unknown("unknown"),
        }
    }
}

#[derive(Debug, Serialize)]
struct NearbyRecord<'a> {
    distance: DistanceField,
    id: i64,
    #[serde(rename = "type")]
    category: Category,
    link: String,
    tags: &'a Tags,
}

impl<'a> From<&Nearby<'a>> for NearbyRecord<'a> {
    fn from(nearby: &Nearby<'a>) -> Self {
        let entity = nearby.entity;
        Self {
            distance: nearby.distance.into(),
            id: entity.id(),
            category: entity.category(),
            link: osm_link(entity.key()),
            tags: entity.tags(),
        }
    }
}

/// Write the results as a pretty-printed JSON array.
pub(crate) fn write_json(writer: &mut dyn Write, results: &[Nearby<'_>]) -> Result<(), CliError> {
    let records: Vec<NearbyRecord<'_>> = results.iter().map(NearbyRecord::from).collect();
    let payload = serde_json::to_string_pretty(&records).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
