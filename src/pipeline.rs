//! The rendering pipeline: setup, static layers, best-effort seismicity,
//! furniture and output, in that order, on one canvas.

use std::path::PathBuf;
use std::time::Instant;

use crate::canvas::{FigureCanvas, LayerKind};
use crate::catalog::{HISTORICAL_EVENTS, VOLCANOES};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::fetch::HttpClient;
use crate::layers::{coastline_layer, historical_layer, plate_layer, relief_layer, volcano_layer};
use crate::output::{add_map_furniture, write_png};
use crate::plates::load_boundaries;
use crate::projection::{MapGeometry, Projection};
use crate::seismicity::{plot_recent_seismicity, SeismicityOutcome};

/// What a completed run produced
#[derive(Clone, Debug)]
pub struct RunReport {
    pub output: PathBuf,
    /// Committed layers in drawing order
    pub layers: Vec<LayerKind>,
    /// Legend labels in registration order
    pub legend: Vec<String>,
    /// Historical-earthquake labels with their positions
    pub annotations: Vec<(String, f64, f64)>,
    pub seismicity: Option<SeismicityOutcome>,
    /// The printed warning when the seismicity stage failed
    pub warning: Option<String>,
}

/// Canvas for the configured region, projection and resolution.
pub fn setup_canvas(config: &MapConfig) -> Result<FigureCanvas, MapError> {
    let projection = Projection::parse(&config.projection)?;
    let geometry = MapGeometry::new(config.region, projection, config.dpi)?;
    tracing::info!(
        region = %config.region,
        projection = %config.projection,
        width = geometry.canvas_width,
        height = geometry.canvas_height,
        "canvas ready"
    );
    Ok(FigureCanvas::new(geometry)?)
}

/// Relief, coastline/frame/title, plate boundaries, historical earthquakes
/// and volcanoes. Any failure is fatal.
pub fn render_static_layers(canvas: &mut FigureCanvas, config: &MapConfig, http: &HttpClient) -> Result<(), MapError> {
    let start = Instant::now();
    let region = canvas.geometry().region;

    let relief = config.relief.load(&region, http)?;
    tracing::info!(width = relief.width(), height = relief.height(), "relief grid loaded");
    let boundaries = load_boundaries(config.plates.as_deref())?;

    let elevation = relief_layer(canvas, &relief, &config.shading);
    coastline_layer(canvas, &elevation, &config.title);
    plate_layer(canvas, &boundaries);
    historical_layer(canvas, &HISTORICAL_EVENTS);
    volcano_layer(canvas, &VOLCANOES);

    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "static layers drawn");
    Ok(())
}

/// Run the whole figure and write it to `config.output`.
pub fn run(config: &MapConfig) -> Result<RunReport, MapError> {
    let mut canvas = setup_canvas(config)?;
    let http = HttpClient::new(&config.fetch)?;

    render_static_layers(&mut canvas, config, &http)?;

    let (seismicity, warning) = match plot_recent_seismicity(&mut canvas, &config.feed, &http) {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            let warning = format!("USGS Data Warning: {e}");
            tracing::warn!(error = %e, "seismicity layer skipped");
            println!("{warning}");
            (None, Some(warning))
        }
    };

    add_map_furniture(&mut canvas, config.scale_bar_km);

    let layers = canvas.layer_kinds();
    let legend = canvas.legend_entries().iter().map(|e| e.label.clone()).collect();
    let annotations = canvas
        .layers()
        .iter()
        .flat_map(|l| l.annotations.iter())
        .map(|a| (a.text.clone(), a.lon, a.lat))
        .collect();

    write_png(canvas, &config.output).map_err(|source| MapError::Write {
        path: config.output.clone(),
        source,
    })?;
    println!("Plotting complete: {}", config.output.display());

    Ok(RunReport {
        output: config.output.clone(),
        layers,
        legend,
        annotations,
        seismicity,
        warning,
    })
}
