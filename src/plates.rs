//! Plate-boundary polylines from GeoJSON.
//!
//! The built-in dataset is a simplified digitisation of the trenches, troughs
//! and collision zones around the Philippine Sea Plate. Any GeoJSON
//! FeatureCollection of `LineString`/`MultiLineString` features (such as the
//! PB2002 boundaries file) can replace it.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::canvas::{Clip, FigureCanvas};
use crate::palette::Rgb;
use crate::region::BoundingRegion;

const BUILTIN_BOUNDARIES: &str = include_str!("../data/plate_boundaries.geojson");

#[derive(Debug, Error)]
pub enum PlateDataError {
    #[error("cannot read plate boundaries {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plate boundaries are not valid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feature {index}: {reason}")]
    Geometry { index: usize, reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlateBoundary {
    pub name: String,
    /// Vertices as (lon, lat)
    pub points: Vec<(f64, f64)>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// The built-in boundaries.
pub fn builtin_boundaries() -> Result<Vec<PlateBoundary>, PlateDataError> {
    parse_geojson(BUILTIN_BOUNDARIES)
}

/// Built-in boundaries, or the ones in `path` when given.
pub fn load_boundaries(path: Option<&Path>) -> Result<Vec<PlateBoundary>, PlateDataError> {
    match path {
        None => builtin_boundaries(),
        Some(path) => {
            tracing::info!(path = %path.display(), "reading plate boundaries");
            let text = std::fs::read_to_string(path).map_err(|source| PlateDataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_geojson(&text)
        }
    }
}

/// Parse a FeatureCollection. A MultiLineString becomes one boundary per
/// part; features of other geometry types are skipped.
pub fn parse_geojson(text: &str) -> Result<Vec<PlateBoundary>, PlateDataError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let mut boundaries = Vec::new();

    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let props = feature.properties.unwrap_or_default();
        let property = |keys: [&str; 2]| keys.iter().find_map(|k| props.get(*k).and_then(Value::as_str));
        let name = property(["Name", "name"]).unwrap_or("").to_string();

        let parts: Vec<Vec<(f64, f64)>> = match geometry.kind.as_str() {
            "LineString" => vec![parse_line(&geometry.coordinates, index)?],
            "MultiLineString" => match &geometry.coordinates {
                Value::Array(lines) => lines
                    .iter()
                    .map(|line| parse_line(line, index))
                    .collect::<Result<_, _>>()?,
                _ => {
                    return Err(PlateDataError::Geometry {
                        index,
                        reason: "MultiLineString coordinates must be an array".to_string(),
                    })
                }
            },
            other => {
                tracing::debug!(index, geometry = other, "skipping non-line feature");
                continue;
            }
        };

        for points in parts {
            boundaries.push(PlateBoundary {
                name: name.clone(),
                points,
            });
        }
    }

    Ok(boundaries)
}

fn parse_line(value: &Value, index: usize) -> Result<Vec<(f64, f64)>, PlateDataError> {
    let invalid = |reason: &str| PlateDataError::Geometry {
        index,
        reason: reason.to_string(),
    };

    let positions = value.as_array().ok_or_else(|| invalid("line coordinates must be an array"))?;
    if positions.len() < 2 {
        return Err(invalid("a line needs at least two positions"));
    }

    positions
        .iter()
        .map(|pos| {
            let pair = pos.as_array().ok_or_else(|| invalid("position must be an array"))?;
            match (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(invalid("position needs numeric longitude and latitude")),
            }
        })
        .collect()
}

/// Whether a segment can touch the region. Segments that jump across the
/// antimeridian are dropped rather than drawn across the whole map.
fn segment_visible(a: (f64, f64), b: (f64, f64), region: &BoundingRegion) -> bool {
    if (a.0 - b.0).abs() > 180.0 {
        return false;
    }
    a.0.max(b.0) >= region.min_lon()
        && a.0.min(b.0) <= region.max_lon()
        && a.1.max(b.1) >= region.min_lat()
        && a.1.min(b.1) <= region.max_lat()
}

/// Draw the boundaries as lines of `width_px`, clipped to the map area.
/// Returns the number of boundaries with at least one visible segment.
pub fn paint_boundaries(canvas: &mut FigureCanvas, boundaries: &[PlateBoundary], color: Rgb, width_px: f64) -> usize {
    let geom = *canvas.geometry();
    let mut drawn = 0;

    for boundary in boundaries {
        let mut visible = false;
        for pair in boundary.points.windows(2) {
            if !segment_visible(pair[0], pair[1], &geom.region) {
                continue;
            }
            let from = geom.project(pair[0].0, pair[0].1);
            let to = geom.project(pair[1].0, pair[1].1);
            canvas.draw_line(from, to, color, width_px, Clip::Map);
            visible = true;
        }
        if visible {
            drawn += 1;
        }
    }

    drawn
}
