//! Mercator projection and the pixel layout of the figure.
//!
//! Projection descriptors follow the GMT `-J` shorthand: `M15c` is a Mercator
//! map 15 centimetres wide. Only Mercator is supported.

use std::f64::consts::PI;

use thiserror::Error;

use crate::region::BoundingRegion;

pub const CM_PER_INCH: f64 = 2.54;
pub const POINTS_PER_INCH: f64 = 72.0;

/// Margins around the map area, in centimetres: left, right, top, bottom.
/// The right margin leaves room for the depth colorbar.
const MARGINS_CM: [f64; 4] = [1.6, 3.4, 1.8, 1.2];

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("unsupported projection '{0}': only Mercator (M<width><unit>) is available")]
    Unsupported(String),

    #[error("invalid map width in projection '{0}'")]
    InvalidWidth(String),

    #[error("resolution must be positive, got {0} dpi")]
    InvalidDpi(u32),
}

/// Map projection descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Mercator, map width in centimetres
    Mercator { width_cm: f64 },
}

impl Projection {
    /// Parse a descriptor such as `M15c`, `M6i` or `M400p`.
    /// A missing unit means centimetres.
    pub fn parse(descriptor: &str) -> Result<Self, ProjectionError> {
        let s = descriptor.trim();
        let Some(rest) = s.strip_prefix('M') else {
            return Err(ProjectionError::Unsupported(descriptor.to_string()));
        };

        let (number, to_cm) = match rest.chars().last() {
            Some('c') => (&rest[..rest.len() - 1], 1.0),
            Some('i') => (&rest[..rest.len() - 1], CM_PER_INCH),
            Some('p') => (&rest[..rest.len() - 1], CM_PER_INCH / POINTS_PER_INCH),
            _ => (rest, 1.0),
        };

        let width: f64 = number
            .parse()
            .map_err(|_| ProjectionError::InvalidWidth(descriptor.to_string()))?;
        if !width.is_finite() || width <= 0.0 {
            return Err(ProjectionError::InvalidWidth(descriptor.to_string()));
        }

        Ok(Projection::Mercator { width_cm: width * to_cm })
    }

    pub fn width_cm(&self) -> f64 {
        match self {
            Projection::Mercator { width_cm } => *width_cm,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Mercator { width_cm: 15.0 }
    }
}

/// Spherical Mercator northing for a latitude in degrees (radians of arc).
pub fn mercator_y(lat: f64) -> f64 {
    let phi = lat.to_radians();
    (PI / 4.0 + phi / 2.0).tan().ln()
}

/// Inverse of [`mercator_y`], returning degrees.
pub fn inverse_mercator_y(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

/// Pixel layout of the figure: map area, margins and the lon/lat transforms.
#[derive(Clone, Copy, Debug)]
pub struct MapGeometry {
    pub region: BoundingRegion,
    pub dpi: u32,
    /// Map area size in pixels
    pub map_width: u32,
    pub map_height: u32,
    /// Map area origin inside the canvas
    pub map_left: u32,
    pub map_top: u32,
    /// Full canvas size
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Pixels per radian of longitude
    scale: f64,
    y_top: f64,
}

impl MapGeometry {
    pub fn new(region: BoundingRegion, projection: Projection, dpi: u32) -> Result<Self, ProjectionError> {
        if dpi == 0 {
            return Err(ProjectionError::InvalidDpi(dpi));
        }
        let px_per_cm = dpi as f64 / CM_PER_INCH;

        let map_width = (projection.width_cm() * px_per_cm).round().max(2.0);
        let scale = map_width / region.lon_span().to_radians();
        let y_top = mercator_y(region.max_lat());
        let y_bottom = mercator_y(region.min_lat());
        let map_height = ((y_top - y_bottom) * scale).round().max(2.0);

        let [left, right, top, bottom] = MARGINS_CM.map(|cm| (cm * px_per_cm).round() as u32);

        Ok(Self {
            region,
            dpi,
            map_width: map_width as u32,
            map_height: map_height as u32,
            map_left: left,
            map_top: top,
            canvas_width: left + map_width as u32 + right,
            canvas_height: top + map_height as u32 + bottom,
            scale,
            y_top,
        })
    }

    /// Centimetres to pixels at the figure resolution.
    pub fn cm(&self, cm: f64) -> f64 {
        cm * self.dpi as f64 / CM_PER_INCH
    }

    /// Typographic points to pixels at the figure resolution.
    pub fn pt(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / POINTS_PER_INCH
    }

    /// Geographic position to canvas pixel coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.region.min_lon()).to_radians() * self.scale;
        let y = (self.y_top - mercator_y(lat)) * self.scale;
        (self.map_left as f64 + x, self.map_top as f64 + y)
    }

    /// Canvas pixel coordinates back to longitude/latitude.
    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        let lon = self.region.min_lon() + ((px - self.map_left as f64) / self.scale).to_degrees();
        let lat = inverse_mercator_y(self.y_top - (py - self.map_top as f64) / self.scale);
        (lon, lat)
    }

    /// Ground distance covered by one pixel at a latitude, in kilometres.
    pub fn km_per_pixel(&self, lat: f64) -> f64 {
        crate::scale::EARTH_RADIUS_KM * lat.to_radians().cos() / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptors() {
        assert_eq!(Projection::parse("M15c").unwrap(), Projection::Mercator { width_cm: 15.0 });
        assert_eq!(Projection::parse("M10").unwrap().width_cm(), 10.0);
        assert!((Projection::parse("M6i").unwrap().width_cm() - 15.24).abs() < 1e-9);
        assert!((Projection::parse("M72p").unwrap().width_cm() - 2.54).abs() < 1e-9);
        assert!(matches!(Projection::parse("X15c"), Err(ProjectionError::Unsupported(_))));
        assert!(matches!(Projection::parse("Mabc"), Err(ProjectionError::InvalidWidth(_))));
        assert!(matches!(Projection::parse("M-3c"), Err(ProjectionError::InvalidWidth(_))));
    }

    #[test]
    fn test_mercator_roundtrip_latitude() {
        for lat in [-60.0, -10.0, 0.0, 23.5, 40.0, 80.0] {
            assert!((inverse_mercator_y(mercator_y(lat)) - lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_corners_map_to_map_area() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 100).unwrap();
        let (x0, y0) = geom.project(115.0, 40.0);
        assert!((x0 - geom.map_left as f64).abs() < 1e-6);
        assert!((y0 - geom.map_top as f64).abs() < 1e-6);

        let (x1, y1) = geom.project(150.0, 0.0);
        assert!((x1 - (geom.map_left + geom.map_width) as f64).abs() < 1.0);
        assert!((y1 - (geom.map_top + geom.map_height) as f64).abs() < 1.0);

        // Mercator stretches north-south: 40 degrees of latitude is taller than 35 of longitude
        assert!(geom.map_height > geom.map_width);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 150).unwrap();
        let (px, py) = geom.project(121.35, 15.7);
        let (lon, lat) = geom.unproject(px, py);
        assert!((lon - 121.35).abs() < 1e-9);
        assert!((lat - 15.7).abs() < 1e-9);
    }

    #[test]
    fn test_map_width_follows_dpi() {
        let geom = MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 254).unwrap();
        assert_eq!(geom.map_width, 1500);
        assert_eq!(geom.cm(1.0), 100.0);
        assert!(MapGeometry::new(BoundingRegion::philippine_sea(), Projection::default(), 0).is_err());
    }
}
