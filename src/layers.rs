//! The static map layers, drawn in a fixed order before the seismicity
//! overlay: relief, coastline with frame and title, plate boundaries,
//! historical earthquakes, volcanoes.
//!
//! Each function draws onto the canvas and commits exactly one layer record.

use crate::canvas::{Annotation, Clip, FigureCanvas, HAlign, Layer, LayerKind, LegendSymbol, MarkerStyle, Symbol, TextStyle, VAlign};
use crate::catalog::{HistoricalEvent, Volcano};
use crate::coastline::paint_coastline;
use crate::frame::{draw_frame, draw_title};
use crate::grid::Grid;
use crate::palette::{Palette, BLACK, RED, YELLOW};
use crate::plates::{paint_boundaries, PlateBoundary};
use crate::projection::MapGeometry;
use crate::relief::{paint_relief, ReliefGrid, Shading};

pub const PLATE_LABEL: &str = "Plate Boundaries";
pub const HISTORICAL_LABEL: &str = "Major Historical EQ";
pub const VOLCANO_LABEL: &str = "Active Volcanoes";

/// Plate boundary pen width, in points
const PLATE_PEN_PT: f64 = 2.0;
/// Shoreline pen width, in points
const COAST_PEN_PT: f64 = 0.5;
const LABEL_PT: f64 = 8.0;
/// Horizontal distance from a star to the start of its label
const LABEL_OFFSET_CM: f64 = 0.4;

/// 0.6 cm yellow star, 1 pt black outline
pub fn historical_marker(geom: &MapGeometry) -> MarkerStyle {
    MarkerStyle {
        symbol: Symbol::Star,
        size: geom.cm(0.6),
        fill: YELLOW,
        outline: Some((BLACK, geom.pt(1.0).max(1.0))),
    }
}

/// 0.4 cm red triangle, 1 pt black outline
pub fn volcano_marker(geom: &MapGeometry) -> MarkerStyle {
    MarkerStyle {
        symbol: Symbol::Triangle,
        size: geom.cm(0.4),
        fill: RED,
        outline: Some((BLACK, geom.pt(1.0).max(1.0))),
    }
}

/// Shaded relief. Returns the map-area elevation raster for the coastline.
pub fn relief_layer(canvas: &mut FigureCanvas, grid: &ReliefGrid, shading: &Shading) -> Grid<f32> {
    let palette = Palette::geo();
    let elevation = paint_relief(canvas, grid, &palette, shading);
    let painted = elevation.iter().filter(|(_, _, h)| !h.is_nan()).count();
    tracing::debug!(palette = palette.name(), shaded = shading.enabled(), painted, total = elevation.width * elevation.height, "relief pixels");
    canvas.push_layer(Layer::new(LayerKind::Relief).with_features(1), None);
    elevation
}

/// Shorelines, the map frame and the title.
pub fn coastline_layer(canvas: &mut FigureCanvas, elevation: &Grid<f32>, title: &str) {
    let pen = canvas.geometry().pt(COAST_PEN_PT);
    let pixels = paint_coastline(canvas, elevation, BLACK, pen);
    draw_frame(canvas);
    draw_title(canvas, title);
    tracing::debug!(pixels, "shoreline pixels");
    canvas.push_layer(Layer::new(LayerKind::Coastline).with_features(pixels), None);
}

pub fn plate_layer(canvas: &mut FigureCanvas, boundaries: &[PlateBoundary]) {
    let width = canvas.geometry().pt(PLATE_PEN_PT);
    let drawn = paint_boundaries(canvas, boundaries, RED, width);
    tracing::debug!(drawn, total = boundaries.len(), "plate boundaries drawn");
    canvas.push_layer(
        Layer::new(LayerKind::PlateBoundaries)
            .with_label(PLATE_LABEL)
            .with_features(drawn),
        Some(LegendSymbol::Line { color: RED, width }),
    );
}

/// Stars with their labels to the right. Labels are placed at a fixed offset
/// from the marker so they never cover it.
pub fn historical_layer(canvas: &mut FigureCanvas, events: &[HistoricalEvent]) {
    let geom = *canvas.geometry();
    let style = historical_marker(&geom);
    let text = TextStyle::new(LABEL_PT).bold();
    let offset = geom.cm(LABEL_OFFSET_CM);

    let mut annotations = Vec::with_capacity(events.len());
    for event in events {
        let (x, y) = geom.project(event.longitude, event.latitude);
        canvas.draw_marker((x, y), &style, Clip::Map);
        canvas.draw_text(event.label, (x + offset, y), HAlign::Left, VAlign::Middle, &text, Clip::Map);
        annotations.push(Annotation {
            text: event.label.to_string(),
            lon: event.longitude,
            lat: event.latitude,
        });
    }

    let mut layer = Layer::new(LayerKind::HistoricalEvents)
        .with_label(HISTORICAL_LABEL)
        .with_features(events.len());
    layer.annotations = annotations;
    canvas.push_layer(layer, Some(LegendSymbol::Marker(style)));
}

pub fn volcano_layer(canvas: &mut FigureCanvas, volcanoes: &[Volcano]) {
    let geom = *canvas.geometry();
    let style = volcano_marker(&geom);
    for volcano in volcanoes {
        let center = geom.project(volcano.longitude, volcano.latitude);
        canvas.draw_marker(center, &style, Clip::Map);
    }
    canvas.push_layer(
        Layer::new(LayerKind::Volcanoes)
            .with_label(VOLCANO_LABEL)
            .with_features(volcanoes.len()),
        Some(LegendSymbol::Marker(style)),
    );
}
