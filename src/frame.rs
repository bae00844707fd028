//! Map frame: border, alternating "fancy" frame bars, degree annotations on
//! the west and south sides, and the title above the map.

use crate::canvas::{Clip, FigureCanvas, HAlign, TextStyle, VAlign};
use crate::palette::{Rgb, BLACK, WHITE};

/// Candidate annotation intervals in degrees
const INTERVALS: [f64; 14] = [0.1, 0.2, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0, 90.0];

/// Upper bound on annotations along one side
const MAX_ANNOTATIONS: f64 = 8.0;

pub const ANNOTATION_PT: f64 = 10.0;
pub const TITLE_PT: f64 = 12.0;
/// Width of the fancy frame bars, in points
pub const FRAME_WIDTH_PT: f64 = 5.0;

/// Smallest interval giving at most eight annotations across `span` degrees.
pub fn auto_interval(span: f64) -> f64 {
    INTERVALS
        .iter()
        .copied()
        .find(|&step| span / step <= MAX_ANNOTATIONS)
        .unwrap_or(90.0)
}

/// Multiples of `step` inside `[min, max]`.
pub fn ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn format_degrees(value: f64) -> String {
    let magnitude = value.abs();
    if (magnitude - magnitude.round()).abs() < 1e-9 {
        format!("{}°", magnitude.round() as i64)
    } else {
        let text = format!("{:.2}", magnitude);
        format!("{}°", text.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// `120°E`, `75°W`; zero and the antimeridian carry no hemisphere.
pub fn format_longitude(lon: f64) -> String {
    let deg = format_degrees(lon);
    if lon.abs() < 1e-9 || (lon.abs() - 180.0).abs() < 1e-9 {
        deg
    } else if lon > 0.0 {
        format!("{deg}E")
    } else {
        format!("{deg}W")
    }
}

/// `10°N`, `5°S`; the equator is plain `0°`.
pub fn format_latitude(lat: f64) -> String {
    let deg = format_degrees(lat);
    if lat.abs() < 1e-9 {
        deg
    } else if lat > 0.0 {
        format!("{deg}N")
    } else {
        format!("{deg}S")
    }
}

/// Draw the frame around the map area and annotate it.
pub fn draw_frame(canvas: &mut FigureCanvas) {
    let geom = *canvas.geometry();
    let region = geom.region;
    let left = geom.map_left as i64;
    let top = geom.map_top as i64;
    let right = left + geom.map_width as i64;
    let bottom = top + geom.map_height as i64;
    let bar = geom.pt(FRAME_WIDTH_PT).round().max(2.0) as i64;
    let pen = geom.pt(0.5).round().max(1.0) as i64;

    let lon_step = auto_interval(region.lon_span());
    let lat_step = auto_interval(region.lat_span());

    // Alternating bars, one segment per interval, split at the tick positions
    let mut lon_edges = vec![region.min_lon()];
    lon_edges.extend(ticks(region.min_lon(), region.max_lon(), lon_step));
    lon_edges.push(region.max_lon());
    lon_edges.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let mut lat_edges = vec![region.min_lat()];
    lat_edges.extend(ticks(region.min_lat(), region.max_lat(), lat_step));
    lat_edges.push(region.max_lat());
    lat_edges.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    for pair in lon_edges.windows(2) {
        let color = bar_color(pair[0], lon_step);
        let x0 = geom.project(pair[0], region.min_lat()).0.round() as i64;
        let x1 = geom.project(pair[1], region.min_lat()).0.round() as i64;
        canvas.fill_rect(x0, top - bar, x1, top, color, Clip::Canvas);
        canvas.fill_rect(x0, bottom, x1, bottom + bar, color, Clip::Canvas);
    }
    for pair in lat_edges.windows(2) {
        let color = bar_color(pair[0], lat_step);
        let y0 = geom.project(region.min_lon(), pair[0]).1.round() as i64;
        let y1 = geom.project(region.min_lon(), pair[1]).1.round() as i64;
        canvas.fill_rect(left - bar, y1, left, y0, color, Clip::Canvas);
        canvas.fill_rect(right, y1, right + bar, y0, color, Clip::Canvas);
    }

    // Outlines of the inner border and of the bar strip
    canvas.stroke_rect(left - pen, top - pen, right + pen, bottom + pen, BLACK, pen, Clip::Canvas);
    canvas.stroke_rect(left - bar, top - bar, right + bar, bottom + bar, BLACK, pen, Clip::Canvas);

    let style = TextStyle::new(ANNOTATION_PT);
    let gap = bar as f64 + geom.pt(3.0);
    for lon in ticks(region.min_lon(), region.max_lon(), lon_step) {
        let x = geom.project(lon, region.min_lat()).0;
        canvas.draw_text(
            &format_longitude(lon),
            (x, bottom as f64 + gap),
            HAlign::Center,
            VAlign::Top,
            &style,
            Clip::Canvas,
        );
    }
    for lat in ticks(region.min_lat(), region.max_lat(), lat_step) {
        let y = geom.project(region.min_lon(), lat).1;
        canvas.draw_text(
            &format_latitude(lat),
            (left as f64 - gap, y),
            HAlign::Right,
            VAlign::Middle,
            &style,
            Clip::Canvas,
        );
    }
}

/// Bar colour alternates with the parity of the interval a segment starts in.
fn bar_color(start: f64, step: f64) -> Rgb {
    if ((start / step + 1e-9).floor() as i64).rem_euclid(2) == 0 {
        BLACK
    } else {
        WHITE
    }
}

/// Centered bold title in the top margin, above the frame annotations.
pub fn draw_title(canvas: &mut FigureCanvas, title: &str) {
    if title.is_empty() {
        return;
    }
    let geom = *canvas.geometry();
    let x = geom.map_left as f64 + geom.map_width as f64 / 2.0;
    let y = geom.map_top as f64 - geom.pt(FRAME_WIDTH_PT) - geom.cm(0.3);
    canvas.draw_text(
        title,
        (x, y),
        HAlign::Center,
        VAlign::Bottom,
        &TextStyle::new(TITLE_PT).bold(),
        Clip::Canvas,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{MapGeometry, Projection};
    use crate::region::BoundingRegion;

    #[test]
    fn test_auto_interval() {
        assert_eq!(auto_interval(35.0), 5.0);
        assert_eq!(auto_interval(40.0), 5.0);
        assert_eq!(auto_interval(3.0), 0.5);
        assert_eq!(auto_interval(120.0), 15.0);
        assert_eq!(auto_interval(1000.0), 90.0);
    }

    #[test]
    fn test_ticks_inclusive() {
        assert_eq!(ticks(115.0, 150.0, 5.0), vec![115.0, 120.0, 125.0, 130.0, 135.0, 140.0, 145.0, 150.0]);
        assert_eq!(ticks(1.5, 9.0, 5.0), vec![5.0]);
        assert_eq!(ticks(-12.0, 3.0, 10.0), vec![-10.0, 0.0]);
    }

    #[test]
    fn test_degree_labels() {
        assert_eq!(format_longitude(120.0), "120°E");
        assert_eq!(format_longitude(-75.0), "75°W");
        assert_eq!(format_longitude(0.0), "0°");
        assert_eq!(format_longitude(180.0), "180°");
        assert_eq!(format_latitude(10.0), "10°N");
        assert_eq!(format_latitude(-2.5), "2.5°S");
        assert_eq!(format_latitude(0.0), "0°");
    }

    #[test]
    fn test_frame_draws_outside_map_only() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 150).unwrap();
        let mut canvas = crate::canvas::FigureCanvas::new(geom).unwrap();
        draw_frame(&mut canvas);
        draw_title(&mut canvas, "Title");

        let img = canvas.image();
        // Map interior untouched
        let cx = geom.map_left + geom.map_width / 2;
        let cy = geom.map_top + geom.map_height / 2;
        assert_eq!(img.get_pixel(cx, cy).0, WHITE);
        // Border line just outside the map corner is black
        assert_eq!(img.get_pixel(geom.map_left - 1, geom.map_top - 1).0, BLACK);
        // Something was written in the left margin (latitude labels)
        let labelled = (0..geom.map_left)
            .flat_map(|x| (geom.map_top..geom.map_top + geom.map_height).map(move |y| (x, y)))
            .filter(|&(x, _)| x + 10 < geom.map_left)
            .any(|(x, y)| img.get_pixel(x, y).0.iter().all(|&c| c < 128));
        assert!(labelled);
    }
}
