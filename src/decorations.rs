//! Map furniture drawn after the data layers: the depth colorbar, the
//! distance scale bar and the legend box.

use crate::canvas::{Clip, FigureCanvas, HAlign, LegendEntry, LegendSymbol, TextStyle, VAlign};
use crate::palette::{ColorScale, BLACK, WHITE};
use crate::scale::{bar_segments, format_distance, MapScale};

/// Vertical colorbar geometry, in centimetres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorbarSpec {
    /// Gap between the map's right edge and the bar
    pub offset_cm: f64,
    pub length_cm: f64,
    pub width_cm: f64,
    /// Annotation interval in scale units
    pub annotation_interval: f64,
}

impl Default for ColorbarSpec {
    fn default() -> Self {
        Self {
            offset_cm: 1.0,
            length_cm: 6.0,
            width_cm: 0.5,
            annotation_interval: 100.0,
        }
    }
}

const COLORBAR_PT: f64 = 8.0;
const SCALE_BAR_PT: f64 = 8.0;
const LEGEND_PT: f64 = 9.0;

/// Vertical colorbar right of the map, centred on the map's mid-height. The
/// scale minimum sits at the bottom.
pub fn draw_colorbar(canvas: &mut FigureCanvas, scale: &ColorScale, spec: &ColorbarSpec, label: &str) {
    let geom = *canvas.geometry();
    let left = (geom.map_left + geom.map_width) as f64 + geom.cm(spec.offset_cm);
    let width = geom.cm(spec.width_cm);
    let length = geom.cm(spec.length_cm);
    let mid = geom.map_top as f64 + geom.map_height as f64 / 2.0;
    let top = mid - length / 2.0;
    let bottom = mid + length / 2.0;
    let range = scale.max() - scale.min();

    let y_for = |value: f64| bottom - (value - scale.min()) / range * length;

    for (lo, hi, color) in scale.slices() {
        let y0 = y_for(lo).round() as i64;
        let y1 = y_for(hi.min(scale.max())).round() as i64;
        canvas.fill_rect(left.round() as i64, y1, (left + width).round() as i64, y0, color, Clip::Canvas);
    }

    let pen = geom.pt(0.5).round().max(1.0) as i64;
    canvas.stroke_rect(
        left.round() as i64,
        top.round() as i64,
        (left + width).round() as i64,
        bottom.round() as i64,
        BLACK,
        pen,
        Clip::Canvas,
    );

    let style = TextStyle::new(COLORBAR_PT);
    let tick = geom.cm(0.1);
    if spec.annotation_interval > 0.0 {
        let first = (scale.min() / spec.annotation_interval).ceil() as i64;
        let last = (scale.max() / spec.annotation_interval + 1e-9).floor() as i64;
        for i in first..=last {
            let value = i as f64 * spec.annotation_interval;
            let y = y_for(value);
            canvas.draw_line((left + width, y), (left + width + tick, y), BLACK, pen as f64, Clip::Canvas);
            canvas.draw_text(
                &format_tick(value),
                (left + width + tick * 2.0, y),
                HAlign::Left,
                VAlign::Middle,
                &style,
                Clip::Canvas,
            );
        }
    }

    canvas.draw_text(
        label,
        ((geom.map_left + geom.map_width) as f64 + geom.cm(spec.offset_cm / 2.0), top - geom.cm(0.3)),
        HAlign::Left,
        VAlign::Bottom,
        &style,
        Clip::Canvas,
    );
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

/// Fancy distance bar in the bottom-left corner of the map: alternating
/// black and white segments, labelled at both ends. Returns the bar length in
/// pixels.
pub fn draw_scale_bar(canvas: &mut FigureCanvas, length_km: f64, offset_cm: (f64, f64)) -> f64 {
    let geom = *canvas.geometry();
    let left = geom.map_left as f64 + geom.cm(offset_cm.0);
    let bottom = (geom.map_top + geom.map_height) as f64 - geom.cm(offset_cm.1);
    let height = geom.cm(0.15).max(2.0);
    let top = bottom - height;

    let (_, lat) = geom.unproject(left, bottom - height / 2.0);
    let scale = MapScale::at_latitude(&geom, lat);
    let length_px = scale.pixels_for(length_km);

    let edges = bar_segments(length_km);
    for (i, pair) in edges.windows(2).enumerate() {
        let x0 = (left + scale.pixels_for(pair[0])).round() as i64;
        let x1 = (left + scale.pixels_for(pair[1])).round() as i64;
        let color = if i % 2 == 0 { BLACK } else { WHITE };
        canvas.fill_rect(x0, top.round() as i64, x1, bottom.round() as i64, color, Clip::Map);
    }
    let pen = geom.pt(0.5).round().max(1.0) as i64;
    canvas.stroke_rect(
        left.round() as i64,
        top.round() as i64,
        (left + length_px).round() as i64,
        bottom.round() as i64,
        BLACK,
        pen,
        Clip::Map,
    );

    let style = TextStyle::new(SCALE_BAR_PT);
    let label_y = bottom + geom.pt(2.0);
    canvas.draw_text(&format_distance(0.0), (left, label_y), HAlign::Center, VAlign::Top, &style, Clip::Map);
    canvas.draw_text(
        &format_distance(length_km),
        (left + length_px, label_y),
        HAlign::Center,
        VAlign::Top,
        &style,
        Clip::Map,
    );

    length_px
}

/// Legend box in the top-left corner of the map listing `entries` in order.
/// Returns the box as `(x0, y0, x1, y1)` canvas pixels, or `None` when there
/// is nothing to list.
pub fn draw_legend(canvas: &mut FigureCanvas, entries: &[LegendEntry], offset_cm: f64) -> Option<(i64, i64, i64, i64)> {
    if entries.is_empty() {
        return None;
    }
    let geom = *canvas.geometry();
    let style = TextStyle::new(LEGEND_PT);
    let padding = geom.cm(0.2);
    let symbol_col = geom.cm(0.8);
    let gap = geom.cm(0.2);

    let text_height = canvas.measure_text("X", &style).1 as f64;
    let tallest_marker = entries
        .iter()
        .map(|e| match e.symbol {
            LegendSymbol::Marker(m) => m.size,
            LegendSymbol::Line { width, .. } => width,
        })
        .fold(0.0, f64::max);
    let row_height = text_height.max(tallest_marker) + geom.cm(0.15);
    let label_width = entries
        .iter()
        .map(|e| canvas.measure_text(&e.label, &style).0)
        .max()
        .unwrap_or(0) as f64;

    let x0 = geom.map_left as f64 + geom.cm(offset_cm);
    let y0 = geom.map_top as f64 + geom.cm(offset_cm);
    let x1 = x0 + padding * 2.0 + symbol_col + gap + label_width;
    let y1 = y0 + padding * 2.0 + row_height * entries.len() as f64;
    let bounds = (x0.round() as i64, y0.round() as i64, x1.round() as i64, y1.round() as i64);

    canvas.fill_rect(bounds.0, bounds.1, bounds.2, bounds.3, WHITE, Clip::Canvas);
    let pen = geom.pt(0.5).round().max(1.0) as i64;
    canvas.stroke_rect(bounds.0, bounds.1, bounds.2, bounds.3, BLACK, pen, Clip::Canvas);

    for (row, entry) in entries.iter().enumerate() {
        let cy = y0 + padding + row_height * (row as f64 + 0.5);
        let symbol_x = x0 + padding;
        match entry.symbol {
            LegendSymbol::Line { color, width } => {
                canvas.draw_line(
                    (symbol_x + symbol_col * 0.1, cy),
                    (symbol_x + symbol_col * 0.9, cy),
                    color,
                    width,
                    Clip::Canvas,
                );
            }
            LegendSymbol::Marker(marker) => {
                canvas.draw_marker((symbol_x + symbol_col / 2.0, cy), &marker, Clip::Canvas);
            }
        }
        canvas.draw_text(
            &entry.label,
            (symbol_x + symbol_col + gap, cy),
            HAlign::Left,
            VAlign::Middle,
            &style,
            Clip::Canvas,
        );
    }

    Some(bounds)
}
