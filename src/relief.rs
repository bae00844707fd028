//! Topography/bathymetry: loading a relief grid and painting the shaded
//! relief layer.
//!
//! Grids arrive as ERDDAP-style CSV (`latitude,longitude,<value>` with an
//! optional units row under the header), either straight from NOAA's
//! `etopo180` griddap service or from a local file.

use std::io::Read;
use std::path::PathBuf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Clip, FigureCanvas};
use crate::fetch::{FetchError, HttpClient};
use crate::grid::Grid;
use crate::palette::{shade_color, Palette, Rgb};
use crate::region::BoundingRegion;

pub const DEFAULT_ERDDAP_URL: &str = "https://coastwatch.pfeg.noaa.gov/erddap";

#[derive(Debug, Error)]
pub enum ReliefError {
    #[error("relief download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("cannot read relief file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed relief CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("relief CSV has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("relief CSV row {row}: cannot parse '{value}' as a number")]
    InvalidNumber { row: usize, value: String },

    #[error("relief grid needs at least 2x2 nodes, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("relief grid {axis} spacing is irregular")]
    Irregular { axis: &'static str },
}

/// Where the relief grid comes from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReliefSource {
    /// ERDDAP griddap subset query
    Erddap {
        base_url: String,
        dataset: String,
        variable: String,
        /// Take every n-th node of the source grid
        stride: u32,
    },
    /// Local CSV in the ERDDAP layout
    File { path: PathBuf },
}

impl Default for ReliefSource {
    /// ETOPO1 decimated to 5 arc-minutes.
    fn default() -> Self {
        ReliefSource::Erddap {
            base_url: DEFAULT_ERDDAP_URL.to_string(),
            dataset: "etopo180".to_string(),
            variable: "altitude".to_string(),
            stride: 5,
        }
    }
}

impl ReliefSource {
    /// `erddap` selects the default remote grid, anything else is a file path.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("erddap") {
            Self::default()
        } else {
            ReliefSource::File { path: PathBuf::from(s) }
        }
    }

    /// Griddap CSV query covering `region`, padded by one node so bilinear
    /// sampling reaches the frame edges.
    pub fn erddap_url(base_url: &str, dataset: &str, variable: &str, stride: u32, region: &BoundingRegion) -> String {
        let pad = stride.max(1) as f64 / 60.0;
        format!(
            "{}/griddap/{}.csv?{}%5B({}):{}:({})%5D%5B({}):{}:({})%5D",
            base_url.trim_end_matches('/'),
            dataset,
            variable,
            (region.min_lat() - pad).max(-90.0),
            stride.max(1),
            (region.max_lat() + pad).min(90.0),
            (region.min_lon() - pad).max(-180.0),
            stride.max(1),
            (region.max_lon() + pad).min(180.0),
        )
    }

    pub fn load(&self, region: &BoundingRegion, http: &HttpClient) -> Result<ReliefGrid, ReliefError> {
        match self {
            ReliefSource::Erddap { base_url, dataset, variable, stride } => {
                let url = Self::erddap_url(base_url, dataset, variable, *stride, region);
                tracing::info!(%url, "downloading relief grid");
                let body = http.get_text(&url)?;
                ReliefGrid::from_csv(body.as_bytes())
            }
            ReliefSource::File { path } => {
                tracing::info!(path = %path.display(), "reading relief grid");
                let file = std::fs::File::open(path).map_err(|source| ReliefError::Io {
                    path: path.clone(),
                    source,
                })?;
                ReliefGrid::from_csv(file)
            }
        }
    }
}

/// Regular lon/lat grid of elevations in metres (negative below sea level).
/// Row 0 is the northernmost latitude.
#[derive(Clone, Debug)]
pub struct ReliefGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
    values: Grid<f32>,
}

impl ReliefGrid {
    /// Parse an ERDDAP-style CSV: header with `latitude`, `longitude` and one
    /// value column, optionally followed by a units row. Missing or
    /// unparseable values (`NaN`, empty) become NaN nodes.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, ReliefError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let lat_col = find("latitude").ok_or(ReliefError::MissingColumn("latitude"))?;
        let lon_col = find("longitude").ok_or(ReliefError::MissingColumn("longitude"))?;
        let value_col = (0..headers.len())
            .find(|&i| i != lat_col && i != lon_col)
            .ok_or(ReliefError::MissingColumn("elevation"))?;

        let mut nodes: Vec<(f64, f64, f32)> = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let lat_text = record.get(lat_col).unwrap_or("");
            let lon_text = record.get(lon_col).unwrap_or("");

            // ERDDAP puts units (degrees_north, ...) in the first data row
            if idx == 0 && lat_text.parse::<f64>().is_err() {
                continue;
            }

            let row = idx + 2;
            let lat = parse_coord(lat_text, row)?;
            let lon = parse_coord(lon_text, row)?;
            let value = record
                .get(value_col)
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(f32::NAN);
            nodes.push((lon, lat, value));
        }

        Self::from_nodes(&nodes)
    }

    /// Assemble a grid from scattered `(lon, lat, value)` nodes lying on a
    /// regular lattice. Nodes absent from the input are NaN.
    pub fn from_nodes(nodes: &[(f64, f64, f32)]) -> Result<Self, ReliefError> {
        let mut lons: Vec<f64> = nodes.iter().map(|n| n.0).collect();
        let mut lats: Vec<f64> = nodes.iter().map(|n| n.1).collect();
        lons.sort_by(|a, b| a.total_cmp(b));
        lons.dedup();
        lats.sort_by(|a, b| b.total_cmp(a));
        lats.dedup();

        if lons.len() < 2 || lats.len() < 2 {
            return Err(ReliefError::TooSmall {
                width: lons.len(),
                height: lats.len(),
            });
        }
        check_regular(&lons, "longitude")?;
        check_regular(&lats, "latitude")?;

        let mut values = Grid::new_with(lons.len(), lats.len(), f32::NAN);
        for &(lon, lat, v) in nodes {
            let x = lons.partition_point(|&l| l < lon);
            let y = lats.partition_point(|&l| l > lat);
            values.set(x, y, v);
        }

        Ok(Self { lons, lats, values })
    }

    pub fn width(&self) -> usize {
        self.values.width
    }

    pub fn height(&self) -> usize {
        self.values.height
    }

    /// Whether a position lies within the grid's extent.
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        let (lon0, lon1) = (self.lons[0], self.lons[self.lons.len() - 1]);
        let (lat1, lat0) = (self.lats[0], self.lats[self.lats.len() - 1]);
        lon >= lon0 && lon <= lon1 && lat >= lat0 && lat <= lat1
    }

    /// Bilinear elevation at a position; NaN outside the grid.
    pub fn elevation_at(&self, lon: f64, lat: f64) -> f32 {
        if !self.covers(lon, lat) {
            return f32::NAN;
        }
        let dlon = self.lons[1] - self.lons[0];
        let dlat = self.lats[0] - self.lats[1];
        let fx = (lon - self.lons[0]) / dlon;
        let fy = (self.lats[0] - lat) / dlat;
        self.values.sample_bilinear(fx, fy)
    }
}

fn parse_coord(text: &str, row: usize) -> Result<f64, ReliefError> {
    text.parse::<f64>().map_err(|_| ReliefError::InvalidNumber {
        row,
        value: text.to_string(),
    })
}

fn check_regular(axis: &[f64], name: &'static str) -> Result<(), ReliefError> {
    let step = (axis[1] - axis[0]).abs();
    let tolerance = step * 1e-3;
    if axis.windows(2).all(|w| ((w[1] - w[0]).abs() - step).abs() <= tolerance) {
        Ok(())
    } else {
        Err(ReliefError::Irregular { axis: name })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ShadingError {
    #[error("shading {0} is not a finite number")]
    NotFinite(&'static str),

    #[error("min_shade {min} must not exceed max_shade {max}")]
    ShadeOrder { min: f64, max: f64 },
}

/// Hillshade parameters. Deserialized through [`ShadingSpec`] so a config file
/// cannot produce an inverted brightness range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShadingSpec", into = "ShadingSpec")]
pub struct Shading {
    enabled: bool,
    /// Vertical exaggeration applied to slopes before lighting
    exaggeration: f64,
    /// Brightness clamp for faces turned away from / towards the light
    min_shade: f64,
    max_shade: f64,
}

impl Shading {
    pub fn new(exaggeration: f64, min_shade: f64, max_shade: f64) -> Result<Self, ShadingError> {
        for (name, value) in [
            ("exaggeration", exaggeration),
            ("min_shade", min_shade),
            ("max_shade", max_shade),
        ] {
            if !value.is_finite() {
                return Err(ShadingError::NotFinite(name));
            }
        }
        if min_shade > max_shade {
            return Err(ShadingError::ShadeOrder { min: min_shade, max: max_shade });
        }

        Ok(Self { enabled: true, exaggeration, min_shade, max_shade })
    }

    /// Plain palette colours, no lighting.
    pub fn flat() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            enabled: true,
            exaggeration: 5.0,
            min_shade: 0.45,
            max_shade: 1.35,
        }
    }
}

/// Serialized form of [`Shading`]; missing fields keep their defaults.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingSpec {
    pub enabled: bool,
    pub exaggeration: f64,
    pub min_shade: f64,
    pub max_shade: f64,
}

impl Default for ShadingSpec {
    fn default() -> Self {
        Shading::default().into()
    }
}

impl TryFrom<ShadingSpec> for Shading {
    type Error = ShadingError;

    fn try_from(spec: ShadingSpec) -> Result<Self, Self::Error> {
        let shading = Shading::new(spec.exaggeration, spec.min_shade, spec.max_shade)?;
        Ok(Shading { enabled: spec.enabled, ..shading })
    }
}

impl From<Shading> for ShadingSpec {
    fn from(s: Shading) -> Self {
        Self {
            enabled: s.enabled,
            exaggeration: s.exaggeration,
            min_shade: s.min_shade,
            max_shade: s.max_shade,
        }
    }
}

/// Paint the relief layer into the map area. Returns the per-pixel elevation
/// raster (map-area sized, NaN where the grid has no data) for the layers
/// that trace features off it.
pub fn paint_relief(canvas: &mut FigureCanvas, grid: &ReliefGrid, palette: &Palette, shading: &Shading) -> Grid<f32> {
    let geom = *canvas.geometry();
    let width = geom.map_width as usize;
    let height = geom.map_height as usize;

    // Resample through the inverse projection, one row per task
    let mut elevation = Grid::new_with(width, height, f32::NAN);
    elevation
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let py = geom.map_top as f64 + row as f64 + 0.5;
            for (col, cell) in out.iter_mut().enumerate() {
                let px = geom.map_left as f64 + col as f64 + 0.5;
                let (lon, lat) = geom.unproject(px, py);
                *cell = grid.elevation_at(lon, lat);
            }
        });

    let mut colors: Vec<Option<Rgb>> = vec![None; width * height];
    colors.par_chunks_mut(width).enumerate().for_each(|(row, out)| {
        let py = geom.map_top as f64 + row as f64 + 0.5;
        let (_, lat) = geom.unproject(geom.map_left as f64, py);
        let metres_per_px = geom.km_per_pixel(lat) * 1000.0;
        for (col, cell) in out.iter_mut().enumerate() {
            let h = *elevation.get(col, row);
            if h.is_nan() {
                continue;
            }
            let base = palette.sample(h as f64);
            *cell = Some(if shading.enabled {
                shade_color(base, hillshade(&elevation, col, row, metres_per_px, shading))
            } else {
                base
            });
        }
    });

    for (idx, color) in colors.into_iter().enumerate() {
        if let Some(c) = color {
            let x = geom.map_left as i64 + (idx % width) as i64;
            let y = geom.map_top as i64 + (idx / width) as i64;
            canvas.put(x, y, c, Clip::Map);
        }
    }

    elevation
}

/// Lambert brightness of a pixel lit from the north-west, normalised so that
/// flat ground keeps its palette colour.
fn hillshade(elevation: &Grid<f32>, x: usize, y: usize, metres_per_px: f64, shading: &Shading) -> f64 {
    let normal = surface_normal(elevation, x, y, metres_per_px, shading.exaggeration);
    let light = normalize_vec3(-1.0, -1.0, std::f64::consts::SQRT_2);
    let diffuse = normal[0] * light[0] + normal[1] * light[1] + normal[2] * light[2];
    (diffuse.max(0.0) / light[2]).clamp(shading.min_shade, shading.max_shade)
}

/// Surface normal from central differences in screen axes (x east, y south).
fn surface_normal(elevation: &Grid<f32>, x: usize, y: usize, metres_per_px: f64, exaggeration: f64) -> [f64; 3] {
    let sample = |sx: usize, sy: usize| {
        let h = *elevation.get(sx, sy);
        if h.is_nan() { *elevation.get(x, y) } else { h }
    };
    let x_left = x.saturating_sub(1);
    let x_right = (x + 1).min(elevation.width - 1);
    let y_up = y.saturating_sub(1);
    let y_down = (y + 1).min(elevation.height - 1);

    let span_x = ((x_right - x_left).max(1)) as f64 * metres_per_px;
    let span_y = ((y_down - y_up).max(1)) as f64 * metres_per_px;
    let dzdx = (sample(x_right, y) - sample(x_left, y)) as f64 / span_x * exaggeration;
    let dzdy = (sample(x, y_down) - sample(x, y_up)) as f64 / span_y * exaggeration;

    normalize_vec3(-dzdx, -dzdy, 1.0)
}

fn normalize_vec3(x: f64, y: f64, z: f64) -> [f64; 3] {
    let len = (x * x + y * y + z * z).sqrt();
    [x / len, y / len, z / len]
}
