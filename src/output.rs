//! Final furniture and PNG serialization.

use std::path::Path;

use crate::canvas::{FigureCanvas, Layer, LayerKind};
use crate::decorations::{draw_legend, draw_scale_bar};

/// Scale bar offset from the map's bottom-left corner, in centimetres
const SCALE_BAR_OFFSET_CM: (f64, f64) = (1.0, 1.0);
/// Legend offset from the map's top-left corner, in centimetres
const LEGEND_OFFSET_CM: f64 = 0.2;

/// Distance scale bar and the legend box for every registered label.
pub fn add_map_furniture(canvas: &mut FigureCanvas, scale_bar_km: f64) {
    let length_px = draw_scale_bar(canvas, scale_bar_km, SCALE_BAR_OFFSET_CM);
    tracing::debug!(scale_bar_km, length_px, "scale bar");
    canvas.push_layer(Layer::new(LayerKind::ScaleBar).with_features(1), None);

    let entries = canvas.legend_entries().to_vec();
    draw_legend(canvas, &entries, LEGEND_OFFSET_CM);
    canvas.push_layer(Layer::new(LayerKind::Legend).with_features(entries.len()), None);
}

/// Write the canvas as PNG, replacing any existing file. The parent
/// directory must already exist.
pub fn write_png(canvas: FigureCanvas, path: &Path) -> Result<(), image::ImageError> {
    let img = canvas.into_image();
    img.save_with_format(path, image::ImageFormat::Png)
}
