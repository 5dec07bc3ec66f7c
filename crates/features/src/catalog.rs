//! apt.dat style feature catalog parsing.
//!
//! The catalog is a line-oriented text format where the first token of each
//! line is a record code:
//!
//! ```text
//! 1    2999 0 0 VOBL Kempegowda International      airport header
//! 100  45.00 1 0 0.00 0 0 0 09L 13.20 77.70 ...      runway (lat, lon at 9, 10)
//!                                                   blank line ends the group
//! 16 / 17 ...                                       seaplane base / heliport
//! ```
//!
//! Each airport is placed at the first end of its first runway. Anything
//! that does not fit this layout is logged and skipped; parsing never fails
//! on content.

use std::io::Read;
use std::path::Path;

use terrain_common::TerrainResult;
use tracing::{debug, info, warn};

use crate::store::{Feature, FeatureStore};

/// Counters reported after a catalog has been parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    /// Lines read.
    pub lines: usize,
    /// Features inserted into the store.
    pub features: usize,
    /// Lines skipped because they did not fit the record layout.
    pub skipped: usize,
}

/// Record group currently being read.
enum Group {
    None,
    Airport(Pending),
    Ignored,
}

struct Pending {
    id: String,
    name: String,
    coord: Option<(f64, f64)>,
}

/// Parse a catalog file into `store`.
pub fn parse_catalog_file(path: impl AsRef<Path>, store: &mut FeatureStore) -> TerrainResult<CatalogSummary> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let summary = parse_catalog(file, store)?;
    info!(
        path = %path.display(),
        lines = summary.lines,
        features = summary.features,
        skipped = summary.skipped,
        "Parsed feature catalog"
    );
    Ok(summary)
}

/// Parse catalog bytes from a reader. Invalid UTF-8 is replaced, not
/// rejected.
pub fn parse_catalog<R: Read>(mut reader: R, store: &mut FeatureStore) -> TerrainResult<CatalogSummary> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(parse_catalog_str(&String::from_utf8_lossy(&bytes), store))
}

/// Parse catalog text into `store`.
pub fn parse_catalog_str(text: &str, store: &mut FeatureStore) -> CatalogSummary {
    let mut summary = CatalogSummary::default();
    let mut group = Group::None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        summary.lines += 1;
        let tokens: Vec<&str> = line.trim().split(' ').filter(|t| !t.is_empty()).collect();

        let Some(code) = tokens.first() else {
            flush(&mut group, store, &mut summary);
            continue;
        };

        match *code {
            "1" => {
                if !matches!(group, Group::None) {
                    warn!(line = line_no, "New header before end of previous record group");
                    summary.skipped += 1;
                    continue;
                }
                let Some(id) = tokens.get(4) else {
                    warn!(line = line_no, "Airport header without identifier");
                    summary.skipped += 1;
                    continue;
                };
                group = Group::Airport(Pending {
                    id: id.to_string(),
                    name: tokens[5..].join(" "),
                    coord: None,
                });
            }
            "16" | "17" => {
                // The open airport keeps its coordinate; only later runways are ignored.
                flush(&mut group, store, &mut summary);
                group = Group::Ignored;
            }
            "100" => match &mut group {
                Group::Ignored => {}
                Group::None => {
                    warn!(line = line_no, "Runway record outside an airport header");
                    summary.skipped += 1;
                }
                Group::Airport(pending) => {
                    if pending.coord.is_some() {
                        continue;
                    }
                    match runway_coord(&tokens) {
                        Some(coord) => pending.coord = Some(coord),
                        None => {
                            warn!(line = line_no, id = %pending.id, "Unparsable runway coordinates");
                            summary.skipped += 1;
                        }
                    }
                }
            },
            _ => {}
        }
    }

    flush(&mut group, store, &mut summary);
    summary
}

fn runway_coord(tokens: &[&str]) -> Option<(f64, f64)> {
    let lat = tokens.get(9)?.parse::<f64>().ok()?;
    let lon = tokens.get(10)?.parse::<f64>().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}

/// End the current group, storing its feature if it found a coordinate.
fn flush(group: &mut Group, store: &mut FeatureStore, summary: &mut CatalogSummary) {
    if let Group::Airport(pending) = std::mem::replace(group, Group::None) {
        if let Some((lat, lon)) = pending.coord {
            debug!(id = %pending.id, lat, lon, "Feature");
            store.insert(Feature::new(lat, lon, pending.id, pending.name));
            summary.features += 1;
        }
    }
}
