//! The figure canvas: one raster plus the ordered record of layers drawn on it.
//!
//! Every stage receives the canvas explicitly and appends its layer in call
//! order; later layers paint over earlier ones. Map-layer drawing is clipped
//! to the map frame, decorations may use the whole canvas.

use image::{Rgb, RgbImage};
use imageproc::drawing::{self, Canvas};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rusttype::Scale;

use crate::font::{self, FontError, Fonts};
use crate::palette::{self, Rgb as Color};
use crate::projection::MapGeometry;

/// What a layer depicts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Relief,
    Coastline,
    PlateBoundaries,
    HistoricalEvents,
    Volcanoes,
    Seismicity,
    Colorbar,
    ScaleBar,
    Legend,
}

/// A text label placed at a geographic position.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub lon: f64,
    pub lat: f64,
}

/// One committed layer
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    /// Legend label, if the layer registered one
    pub label: Option<String>,
    /// Number of features drawn (markers, polylines, ...)
    pub features: usize,
    pub annotations: Vec<Annotation>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            label: None,
            features: 0,
            annotations: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_features(mut self, features: usize) -> Self {
        self.features = features;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Star,
    Triangle,
    Circle,
}

/// Marker appearance; `size` is the diameter of the circumscribing circle in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub symbol: Symbol,
    pub size: f64,
    pub fill: Color,
    /// Outline colour and pen width in pixels
    pub outline: Option<(Color, f64)>,
}

/// How a legend entry is drawn next to its label
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegendSymbol {
    Line { color: Color, width: f64 },
    Marker(MarkerStyle),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub symbol: LegendSymbol,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clip {
    /// Only inside the map frame
    Map,
    /// Anywhere on the canvas
    Canvas,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Text style: size in points, weight and colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: false,
            color: palette::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

pub struct FigureCanvas {
    geometry: MapGeometry,
    image: RgbImage,
    fonts: Fonts,
    layers: Vec<Layer>,
    legend: Vec<LegendEntry>,
}

impl FigureCanvas {
    /// A blank white canvas laid out for `geometry`.
    pub fn new(geometry: MapGeometry) -> Result<Self, FontError> {
        let image = RgbImage::from_pixel(geometry.canvas_width, geometry.canvas_height, Rgb(palette::WHITE));
        Ok(Self {
            geometry,
            image,
            fonts: Fonts::embedded()?,
            layers: Vec::new(),
            legend: Vec::new(),
        })
    }

    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.iter().any(|l| l.kind == kind)
    }

    pub fn legend_entries(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Commit a layer. A labelled layer also gets a legend entry.
    pub fn push_layer(&mut self, layer: Layer, legend_symbol: Option<LegendSymbol>) {
        if let (Some(label), Some(symbol)) = (&layer.label, legend_symbol) {
            self.legend.push(LegendEntry {
                label: label.clone(),
                symbol,
            });
        }
        self.layers.push(layer);
    }

    // -------------------------------------------------------------------------
    // Shapes
    // -------------------------------------------------------------------------

    /// Clip rectangle `(x0, y0, x1, y1)`, upper bounds exclusive.
    fn clip_bounds(&self, clip: Clip) -> (i64, i64, i64, i64) {
        match clip {
            Clip::Map => {
                let g = &self.geometry;
                (
                    g.map_left as i64,
                    g.map_top as i64,
                    (g.map_left + g.map_width) as i64,
                    (g.map_top + g.map_height) as i64,
                )
            }
            Clip::Canvas => (0, 0, self.image.width() as i64, self.image.height() as i64),
        }
    }

    fn target(&mut self, clip: Clip) -> ClippedImage<'_> {
        let bounds = self.clip_bounds(clip);
        ClippedImage { image: &mut self.image, bounds }
    }

    pub fn put(&mut self, x: i64, y: i64, color: Color, clip: Clip) {
        let (x0, y0, x1, y1) = self.clip_bounds(clip);
        if x >= x0 && y >= y0 && x < x1 && y < y1 {
            self.image.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }

    /// Filled axis-aligned rectangle, corners inclusive of `x0,y0` and exclusive of `x1,y1`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color, clip: Clip) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        if left == right || top == bottom {
            return;
        }
        let rect = Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32);
        drawing::draw_filled_rect_mut(&mut self.target(clip), rect, Rgb(color));
    }

    /// Rectangle outline `width` pixels thick, drawn inward from the edge.
    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color, width: i64, clip: Clip) {
        let w = width.max(1);
        self.fill_rect(x0, y0, x1, y0 + w, color, clip);
        self.fill_rect(x0, y1 - w, x1, y1, color, clip);
        self.fill_rect(x0, y0, x0 + w, y1, color, clip);
        self.fill_rect(x1 - w, y0, x1, y1, color, clip);
    }

    /// Filled disc around the pixel containing `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color, clip: Clip) {
        let center = (cx.floor() as i32, cy.floor() as i32);
        let radius = radius.round().max(0.0) as i32;
        drawing::draw_filled_circle_mut(&mut self.target(clip), center, radius, Rgb(color));
    }

    /// Line segment `width` pixels wide. Pens under two pixels draw a
    /// hairline; wider pens get round caps.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64, clip: Clip) {
        if width < 2.0 {
            let start = (from.0 as f32, from.1 as f32);
            let end = (to.0 as f32, to.1 as f32);
            drawing::draw_line_segment_mut(&mut self.target(clip), start, end, Rgb(color));
            return;
        }

        let half = width / 2.0;
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = dx.hypot(dy);
        if len > 0.0 {
            let (nx, ny) = (-dy / len * half, dx / len * half);
            let body = [
                (from.0 + nx, from.1 + ny),
                (to.0 + nx, to.1 + ny),
                (to.0 - nx, to.1 - ny),
                (from.0 - nx, from.1 - ny),
            ];
            self.fill_polygon(&body, color, clip);
        }
        self.fill_circle(from.0, from.1, half, color, clip);
        self.fill_circle(to.0, to.1, half, color, clip);
    }

    pub fn draw_polyline(&mut self, points: &[(f64, f64)], color: Color, width: f64, clip: Clip) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color, width, clip);
        }
    }

    /// Filled polygon. Vertices are snapped to pixels; a polygon that
    /// collapses to fewer than three distinct vertices draws nothing.
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color, clip: Clip) {
        let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
        for &(x, y) in points {
            let p = Point::new(x.round() as i32, y.round() as i32);
            if poly.last() != Some(&p) {
                poly.push(p);
            }
        }
        // imageproc expects an open ring
        while poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() < 3 {
            return;
        }
        drawing::draw_polygon_mut(&mut self.target(clip), &poly, Rgb(color));
    }

    /// Draw a marker centred at canvas coordinates.
    pub fn draw_marker(&mut self, center: (f64, f64), style: &MarkerStyle, clip: Clip) {
        let radius = style.size / 2.0;
        match style.symbol {
            Symbol::Circle => {
                if let Some((color, pen)) = style.outline {
                    let pen = pen.max(1.0);
                    self.fill_circle(center.0, center.1, radius + pen / 2.0, color, clip);
                    self.fill_circle(center.0, center.1, (radius - pen / 2.0).max(0.5), style.fill, clip);
                } else {
                    self.fill_circle(center.0, center.1, radius, style.fill, clip);
                }
            }
            Symbol::Star => self.draw_outlined(&star_outline(center, radius), style, clip),
            Symbol::Triangle => self.draw_outlined(&triangle_outline(center, radius), style, clip),
        }
    }

    fn draw_outlined(&mut self, outline: &[(f64, f64)], style: &MarkerStyle, clip: Clip) {
        self.fill_polygon(outline, style.fill, clip);
        if let (Some((color, pen)), Some(&first)) = (style.outline, outline.first()) {
            let mut closed = outline.to_vec();
            closed.push(first);
            self.draw_polyline(&closed, color, pen, clip);
        }
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    fn text_scale(&self, style: &TextStyle) -> Scale {
        font::scale_for_height(self.geometry.pt(style.size_pt))
    }

    /// Rendered `(width, height)` of a string in pixels.
    pub fn measure_text(&self, text: &str, style: &TextStyle) -> (u32, u32) {
        font::text_extent(self.fonts.face(style.bold), self.text_scale(style), text)
    }

    /// Draw text anchored at `pos` with the given justification.
    pub fn draw_text(&mut self, text: &str, pos: (f64, f64), h: HAlign, v: VAlign, style: &TextStyle, clip: Clip) {
        let scale = self.text_scale(style);
        let (width, height) = self.measure_text(text, style);
        let (width, height) = (width as f64, height as f64);

        let left = match h {
            HAlign::Left => pos.0,
            HAlign::Center => pos.0 - width / 2.0,
            HAlign::Right => pos.0 - width,
        }
        .round() as i32;
        let top = match v {
            VAlign::Top => pos.1,
            VAlign::Middle => pos.1 - height / 2.0,
            VAlign::Bottom => pos.1 - height,
        }
        .round() as i32;

        let bounds = self.clip_bounds(clip);
        let mut target = ClippedImage { image: &mut self.image, bounds };
        drawing::draw_text_mut(&mut target, Rgb(style.color), left, top, scale, self.fonts.face(style.bold), text);
    }
}

/// imageproc drawing target that drops writes outside a clip rectangle.
struct ClippedImage<'a> {
    image: &'a mut RgbImage,
    bounds: (i64, i64, i64, i64),
}

impl Canvas for ClippedImage<'_> {
    type Pixel = Rgb<u8>;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        let (x0, y0, x1, y1) = self.bounds;
        let (px, py) = (x as i64, y as i64);
        if px >= x0 && py >= y0 && px < x1 && py < y1 {
            self.image.put_pixel(x, y, color);
        }
    }
}

/// Ten-point star inscribed in a circle of `radius`, first tip straight up.
pub fn star_outline(center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    radial_outline(center, 10, radius, radius * 0.382)
}

/// Upward-pointing equilateral triangle inscribed in a circle of `radius`.
pub fn triangle_outline(center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    radial_outline(center, 3, radius, radius)
}

/// `count` vertices around `center`, alternating between the outer and
/// inner radius.
fn radial_outline(center: (f64, f64), count: usize, outer: f64, inner: f64) -> Vec<(f64, f64)> {
    use std::f64::consts::PI;

    (0..count)
        .map(|i| {
            // Screen y grows downward
            let angle = -PI / 2.0 + i as f64 * 2.0 * PI / count as f64;
            let r = if i % 2 == 1 { inner } else { outer };
            (center.0 + r * angle.cos(), center.1 + r * angle.sin())
        })
        .collect()
}
