//! TrueType faces for map text.
//!
//! DejaVu Sans regular and bold are compiled into the binary, so labels do
//! not depend on fonts installed on the host.

use rusttype::{point, Font, Scale};
use thiserror::Error;

const REGULAR_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BOLD_DATA: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

#[derive(Debug, Error)]
pub enum FontError {
    #[error("embedded {0} font could not be parsed")]
    Invalid(&'static str),
}

/// Regular and bold faces
#[derive(Clone)]
pub struct Fonts {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl Fonts {
    pub fn embedded() -> Result<Self, FontError> {
        let regular = Font::try_from_bytes(REGULAR_DATA).ok_or(FontError::Invalid("regular"))?;
        let bold = Font::try_from_bytes(BOLD_DATA).ok_or(FontError::Invalid("bold"))?;
        Ok(Self { regular, bold })
    }

    pub fn face(&self, bold: bool) -> &Font<'static> {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

/// Scale for a line `pixel_height` pixels tall (ascent to descent).
pub fn scale_for_height(pixel_height: f64) -> Scale {
    Scale::uniform(pixel_height.max(1.0) as f32)
}

/// Rendered `(width, height)` in pixels: inked width, full line height.
pub fn text_extent(font: &Font<'_>, scale: Scale, text: &str) -> (u32, u32) {
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .map(|bb| bb.max.x)
        .max()
        .unwrap_or(0);
    let height = (v_metrics.ascent - v_metrics.descent).round();
    (width.max(0) as u32, height.max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_faces_load() {
        let fonts = Fonts::embedded().unwrap();
        let scale = scale_for_height(20.0);
        let (regular, _) = text_extent(fonts.face(false), scale, "Plate Boundaries");
        let (bold, _) = text_extent(fonts.face(true), scale, "Plate Boundaries");
        assert!(regular > 0);
        assert!(bold > regular);
    }

    #[test]
    fn test_extent_grows_with_size() {
        let fonts = Fonts::embedded().unwrap();
        let small = text_extent(fonts.face(false), scale_for_height(10.0), "120°E");
        let large = text_extent(fonts.face(false), scale_for_height(30.0), "120°E");
        assert!(large.0 > small.0 * 2);
        assert_eq!(large.1, 30);
        assert_eq!(text_extent(fonts.face(false), scale_for_height(10.0), ""), (0, 10));
    }

    #[test]
    fn test_punctuation_has_glyphs() {
        let fonts = Fonts::embedded().unwrap();
        let scale = scale_for_height(20.0);
        for text in ["!", "?", "&", "°"] {
            assert!(text_extent(fonts.face(true), scale, text).0 > 0, "no ink for {text}");
        }
    }
}
