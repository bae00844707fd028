//! Ground-distance scale for the distance bar in the map corner.
//!
//! Mercator scale varies with latitude, so a scale is always taken at one
//! latitude: the one the bar is drawn at.

use crate::projection::MapGeometry;

/// Mean Earth radius used for ground distances (kilometres)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ground scale at one latitude
#[derive(Clone, Copy, Debug)]
pub struct MapScale {
    /// Physical distance one pixel represents (in kilometres)
    pub km_per_pixel: f64,
    /// Latitude the scale was taken at
    pub latitude: f64,
}

impl MapScale {
    /// Scale of the map at a latitude
    pub fn at_latitude(geometry: &MapGeometry, latitude: f64) -> Self {
        Self {
            km_per_pixel: geometry.km_per_pixel(latitude),
            latitude,
        }
    }

    /// Pixel length representing a ground distance
    pub fn pixels_for(&self, km: f64) -> f64 {
        km / self.km_per_pixel
    }

    /// Ground distance represented by a pixel length
    pub fn km_for(&self, pixels: f64) -> f64 {
        pixels * self.km_per_pixel
    }
}

/// Segment boundaries of a fancy scale bar, in kilometres.
///
/// The bar is split into alternating black/white segments; a round length
/// divides into 5 (500 km -> 100 km steps), otherwise 4.
pub fn bar_segments(length_km: f64) -> Vec<f64> {
    let count = if is_round_multiple(length_km, 5.0) { 5 } else { 4 };
    (0..=count)
        .map(|i| length_km * i as f64 / count as f64)
        .collect()
}

fn is_round_multiple(value: f64, divisor: f64) -> bool {
    let q = value / divisor;
    (q - q.round()).abs() < 1e-9 && q >= 1.0
}

/// Format a distance label the way the bar annotates it
pub fn format_distance(km: f64) -> String {
    if km == 0.0 {
        "0".to_string()
    } else if km >= 1.0 {
        format!("{} km", trim_number(km))
    } else {
        format!("{} m", trim_number(km * 1000.0))
    }
}

fn trim_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;
    use crate::region::BoundingRegion;

    #[test]
    fn test_scale_shrinks_towards_pole() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 300).unwrap();
        let equator = MapScale::at_latitude(&geom, 0.0);
        let north = MapScale::at_latitude(&geom, 35.0);
        assert!(north.km_per_pixel < equator.km_per_pixel);
        // Same ground distance needs more pixels further north
        assert!(north.pixels_for(500.0) > equator.pixels_for(500.0));
    }

    #[test]
    fn test_equator_scale_matches_map_width() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 300).unwrap();
        let scale = MapScale::at_latitude(&geom, 0.0);
        let expected_km = EARTH_RADIUS_KM * 35f64.to_radians();
        let width_km = scale.km_for(geom.map_width as f64);
        assert!((width_km - expected_km).abs() / expected_km < 1e-9);
    }

    #[test]
    fn test_bar_segments() {
        assert_eq!(bar_segments(500.0), vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(bar_segments(2.0), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0");
        assert_eq!(format_distance(500.0), "500 km");
        assert_eq!(format_distance(12.5), "12.5 km");
        assert_eq!(format_distance(0.25), "250 m");
    }
}
