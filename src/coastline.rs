//! Shorelines traced off the resampled relief raster.

use crate::canvas::{Clip, FigureCanvas};
use crate::grid::Grid;
use crate::palette::Rgb;

/// Elevation separating land from water, in metres
pub const SEA_LEVEL: f32 = 0.0;

/// Land pixels with at least one water neighbour (8-connected).
///
/// NaN pixels are neither land nor water, so the edge of missing data does
/// not produce a false shoreline.
pub fn extract_coastline(elevation: &Grid<f32>, sea_level: f32) -> Vec<(usize, usize)> {
    let mut coastline_pixels = Vec::new();

    for y in 0..elevation.height {
        for x in 0..elevation.width {
            let h = *elevation.get(x, y);

            // Must be land
            if h.is_nan() || h < sea_level {
                continue;
            }

            let is_coastal = elevation
                .neighbors_8(x, y)
                .into_iter()
                .any(|(nx, ny)| *elevation.get(nx, ny) < sea_level);

            if is_coastal {
                coastline_pixels.push((x, y));
            }
        }
    }

    coastline_pixels
}

/// Stamp shoreline pixels onto the map area with a square pen `pen_px` wide.
/// `elevation` must be the map-area raster returned by the relief layer.
pub fn paint_coastline(canvas: &mut FigureCanvas, elevation: &Grid<f32>, color: Rgb, pen_px: f64) -> usize {
    let geom = *canvas.geometry();
    let pixels = extract_coastline(elevation, SEA_LEVEL);
    let pen = pen_px.round().max(1.0) as i64;
    let offset = (pen - 1) / 2;

    for &(x, y) in &pixels {
        let cx = geom.map_left as i64 + x as i64 - offset;
        let cy = geom.map_top as i64 + y as i64 - offset;
        canvas.fill_rect(cx, cy, cx + pen, cy + pen, color, Clip::Map);
    }

    pixels.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island() -> Grid<f32> {
        // 5x5 ocean with a 3x3 island in the middle
        let mut grid = Grid::new_with(5, 5, -100.0f32);
        for y in 1..4 {
            for x in 1..4 {
                grid.set(x, y, 50.0);
            }
        }
        grid
    }

    #[test]
    fn test_island_ring_is_coastline() {
        let coast = extract_coastline(&island(), SEA_LEVEL);
        assert_eq!(coast.len(), 8);
        assert!(!coast.contains(&(2, 2)));
        assert!(coast.contains(&(1, 1)));
    }

    #[test]
    fn test_missing_data_is_not_water() {
        let mut grid = Grid::new_with(3, 3, 10.0f32);
        grid.set(0, 0, f32::NAN);
        assert!(extract_coastline(&grid, SEA_LEVEL).is_empty());
    }

    #[test]
    fn test_sea_level_counts_as_land() {
        let grid = Grid::from_vec(2, 1, vec![0.0f32, -1.0]).unwrap();
        assert_eq!(extract_coastline(&grid, SEA_LEVEL), vec![(0, 0)]);
    }
}
