//! Colour palettes and discrete colour scales.
//!
//! Palettes are piecewise-linear colour tables in the GMT CPT sense: each
//! segment runs from `(z0, c0)` to `(z1, c1)`. Adjacent segments may disagree
//! at their shared boundary, which is how the `geo` palette hinges sharply at
//! sea level.

use thiserror::Error;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];
pub const RED: Rgb = [255, 0, 0];
pub const YELLOW: Rgb = [255, 255, 0];

pub fn lerp_color(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f64 + (b[0] as f64 - a[0] as f64) * t).round() as u8,
        (a[1] as f64 + (b[1] as f64 - a[1] as f64) * t).round() as u8,
        (a[2] as f64 + (b[2] as f64 - a[2] as f64) * t).round() as u8,
    ]
}

/// Multiply a colour by a brightness factor (hillshade).
pub fn shade_color(c: Rgb, shade: f64) -> Rgb {
    [
        (c[0] as f64 * shade).clamp(0.0, 255.0) as u8,
        (c[1] as f64 * shade).clamp(0.0, 255.0) as u8,
        (c[2] as f64 * shade).clamp(0.0, 255.0) as u8,
    ]
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    z0: f64,
    c0: Rgb,
    z1: f64,
    c1: Rgb,
}

/// Continuous colour table
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    name: &'static str,
    segments: Vec<Segment>,
}

impl Palette {
    fn from_rows(name: &'static str, rows: &[(f64, Rgb, f64, Rgb)]) -> Self {
        Self {
            name,
            segments: rows
                .iter()
                .map(|&(z0, c0, z1, c1)| Segment { z0, c0, z1, c1 })
                .collect(),
        }
    }

    /// Topography/bathymetry in metres, hinged at sea level.
    pub fn geo() -> Self {
        Self::from_rows(
            "geo",
            &[
                (-8000.0, [0, 0, 0], -7000.0, [0, 5, 25]),
                (-7000.0, [0, 5, 25], -6000.0, [0, 10, 50]),
                (-6000.0, [0, 10, 50], -5000.0, [0, 80, 125]),
                (-5000.0, [0, 80, 125], -4000.0, [0, 150, 200]),
                (-4000.0, [0, 150, 200], -3000.0, [86, 197, 184]),
                (-3000.0, [86, 197, 184], -2000.0, [172, 245, 168]),
                (-2000.0, [172, 245, 168], -1000.0, [211, 250, 211]),
                (-1000.0, [211, 250, 211], 0.0, [250, 255, 255]),
                (0.0, [70, 120, 50], 500.0, [120, 100, 50]),
                (500.0, [120, 100, 50], 1000.0, [146, 126, 60]),
                (1000.0, [146, 126, 60], 2000.0, [198, 178, 80]),
                (2000.0, [198, 178, 80], 3000.0, [250, 230, 100]),
                (3000.0, [250, 230, 100], 4000.0, [250, 234, 126]),
                (4000.0, [250, 234, 126], 5000.0, [252, 238, 152]),
                (5000.0, [252, 238, 152], 6000.0, [252, 243, 177]),
                (6000.0, [252, 243, 177], 7000.0, [253, 249, 216]),
            ],
        )
    }

    /// Seismology rainbow: dark red through yellow and green to dark blue.
    pub fn seis() -> Self {
        Self::from_rows(
            "seis",
            &[
                (0.0, [170, 0, 0], 1.0, [255, 0, 0]),
                (1.0, [255, 0, 0], 2.0, [255, 85, 0]),
                (2.0, [255, 85, 0], 3.0, [255, 170, 0]),
                (3.0, [255, 170, 0], 4.0, [255, 255, 0]),
                (4.0, [255, 255, 0], 5.0, [90, 255, 30]),
                (5.0, [90, 255, 30], 6.0, [0, 240, 110]),
                (6.0, [0, 240, 110], 7.0, [0, 80, 255]),
                (7.0, [0, 80, 255], 8.0, [0, 0, 205]),
            ],
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn z_min(&self) -> f64 {
        self.segments.first().map(|s| s.z0).unwrap_or(0.0)
    }

    pub fn z_max(&self) -> f64 {
        self.segments.last().map(|s| s.z1).unwrap_or(1.0)
    }

    /// Colour at a palette value; values outside the table clamp to its ends.
    pub fn sample(&self, z: f64) -> Rgb {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return BLACK;
        };
        if z.is_nan() || z <= first.z0 {
            return first.c0;
        }
        if z >= last.z1 {
            return last.c1;
        }

        let seg = self
            .segments
            .iter()
            .find(|s| z >= s.z0 && z < s.z1)
            .unwrap_or(last);
        let t = (z - seg.z0) / (seg.z1 - seg.z0);
        lerp_color(seg.c0, seg.c1, t)
    }

    /// Colour at a fraction `t` of the palette's full range.
    pub fn sample_normalized(&self, t: f64) -> Rgb {
        let z = self.z_min() + t.clamp(0.0, 1.0) * (self.z_max() - self.z_min());
        self.sample(z)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("colour scale step must be positive, got {0}")]
    InvalidStep(f64),

    #[error("colour scale range is empty: {min} to {max}")]
    EmptyRange { min: f64, max: f64 },
}

/// Discrete colour scale over a numeric domain: one colour per `step`-wide
/// slice, taken at the slice mid-point. Values outside the domain clamp to the
/// end slices.
#[derive(Clone, Debug)]
pub struct ColorScale {
    min: f64,
    max: f64,
    step: f64,
    colors: Vec<Rgb>,
}

impl ColorScale {
    pub fn new(palette: &Palette, min: f64, max: f64, step: f64, reverse: bool) -> Result<Self, ScaleError> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(ScaleError::InvalidStep(step));
        }
        if !(max > min) {
            return Err(ScaleError::EmptyRange { min, max });
        }

        let count = ((max - min) / step).ceil().max(1.0) as usize;
        let colors = (0..count)
            .map(|i| {
                let t = (i as f64 + 0.5) / count as f64;
                palette.sample_normalized(if reverse { 1.0 - t } else { t })
            })
            .collect();

        Ok(Self { min, max, step, colors })
    }

    /// The depth scale used for recent seismicity: 0-600 km in 10 km slices.
    pub fn depth(palette: &Palette) -> Result<Self, ScaleError> {
        Self::new(palette, 0.0, 600.0, 10.0, true)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn slice_count(&self) -> usize {
        self.colors.len()
    }

    pub fn slice_index(&self, value: f64) -> usize {
        let last = self.colors.len() - 1;
        if value.is_nan() || value <= self.min {
            return 0;
        }
        (((value - self.min) / self.step).floor() as usize).min(last)
    }

    pub fn color_for(&self, value: f64) -> Rgb {
        self.colors[self.slice_index(value)]
    }

    /// `(low, high, colour)` for every slice, lowest first.
    pub fn slices(&self) -> impl Iterator<Item = (f64, f64, Rgb)> + '_ {
        self.colors.iter().enumerate().map(move |(i, &c)| {
            let lo = self.min + i as f64 * self.step;
            (lo, (lo + self.step).min(self.max), c)
        })
    }
}
