//! Recent seismicity: the USGS summary feed, filtered to the map region and
//! plotted as depth-coloured circles with a colorbar.
//!
//! The stage is best-effort. Every fallible step (fetch, parse, colour
//! scale) runs before the first pixel is drawn, so an error leaves the map
//! exactly as it was.

use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::canvas::{Clip, FigureCanvas, Layer, LayerKind, MarkerStyle, Symbol};
use crate::decorations::{draw_colorbar, ColorbarSpec};
use crate::fetch::{is_remote, FetchError, HttpClient};
use crate::palette::{ColorScale, Palette, Rgb, ScaleError, BLACK};
use crate::projection::MapGeometry;
use crate::region::BoundingRegion;

/// Magnitude 4.5+ events of the past 30 days
pub const DEFAULT_FEED_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_month.csv";

pub const COLORBAR_LABEL: &str = "Depth (km)";

#[derive(Debug, Error)]
pub enum SeismicityError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feed: {0}")]
    Csv(#[from] csv::Error),

    #[error("depth colour scale: {0}")]
    Scale(#[from] ScaleError),
}

/// One feed row; other columns are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RecentEarthquakeRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Hypocentre depth in kilometres
    pub depth: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeismicityOutcome {
    /// Events inside the region were plotted
    Plotted { fetched: usize, plotted: usize },
    /// The feed was valid but nothing fell inside the region
    Empty { fetched: usize },
}

/// Parse feed rows by column name.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<RecentEarthquakeRecord>, SeismicityError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr.deserialize().collect::<Result<Vec<RecentEarthquakeRecord>, _>>()?;
    Ok(records)
}

/// Download (or read) and parse the feed.
pub fn fetch_records(feed: &str, http: &HttpClient) -> Result<Vec<RecentEarthquakeRecord>, SeismicityError> {
    if is_remote(feed) {
        tracing::info!(url = feed, "downloading seismicity feed");
        let body = http.get_text(feed)?;
        parse_records(body.as_bytes())
    } else {
        tracing::info!(path = feed, "reading seismicity feed");
        let file = std::fs::File::open(feed).map_err(|source| SeismicityError::Io {
            path: PathBuf::from(feed),
            source,
        })?;
        parse_records(file)
    }
}

/// Keep the records inside the region, boundaries included.
pub fn filter_to_region(records: Vec<RecentEarthquakeRecord>, region: &BoundingRegion) -> Vec<RecentEarthquakeRecord> {
    records
        .into_iter()
        .filter(|r| region.contains(r.longitude, r.latitude))
        .collect()
}

/// 0.15 cm circle with a hairline black outline
pub fn event_marker(geom: &MapGeometry, fill: Rgb) -> MarkerStyle {
    MarkerStyle {
        symbol: Symbol::Circle,
        size: geom.cm(0.15),
        fill,
        outline: Some((BLACK, geom.pt(0.1).max(1.0))),
    }
}

/// Plot already-filtered records and their colorbar onto the canvas.
pub fn plot_records(canvas: &mut FigureCanvas, records: &[RecentEarthquakeRecord], scale: &ColorScale) {
    let geom = *canvas.geometry();
    for record in records {
        let style = event_marker(&geom, scale.color_for(record.depth));
        let center = geom.project(record.longitude, record.latitude);
        canvas.draw_marker(center, &style, Clip::Map);
    }
    canvas.push_layer(Layer::new(LayerKind::Seismicity).with_features(records.len()), None);

    draw_colorbar(canvas, scale, &ColorbarSpec::default(), COLORBAR_LABEL);
    canvas.push_layer(Layer::new(LayerKind::Colorbar), None);
}

/// The whole stage: fetch, filter, colour and plot. On success the canvas
/// carries a seismicity layer and a colorbar (unless nothing was inside the
/// region); on error it is untouched.
pub fn plot_recent_seismicity(
    canvas: &mut FigureCanvas,
    feed: &str,
    http: &HttpClient,
) -> Result<SeismicityOutcome, SeismicityError> {
    let region = canvas.geometry().region;
    let records = fetch_records(feed, http)?;
    let fetched = records.len();

    let inside = filter_to_region(records, &region);
    tracing::info!(fetched, inside = inside.len(), "seismicity records");
    if inside.is_empty() {
        tracing::info!("no recent earthquakes inside the region; skipping seismicity layer");
        return Ok(SeismicityOutcome::Empty { fetched });
    }

    let scale = ColorScale::depth(&Palette::seis())?;
    plot_records(canvas, &inside, &scale);

    Ok(SeismicityOutcome::Plotted {
        fetched,
        plotted: inside.len(),
    })
}
