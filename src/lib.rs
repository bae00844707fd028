//! Tectonic map renderer
//!
//! Composes a static Mercator map of a region (by default the Philippine Sea
//! Plate): shaded relief, coastlines, plate boundaries, historical
//! earthquakes, volcanoes and recent seismicity, then writes a PNG.

pub mod canvas;
pub mod catalog;
pub mod coastline;
pub mod config;
pub mod decorations;
pub mod error;
pub mod fetch;
pub mod font;
pub mod frame;
pub mod grid;
pub mod layers;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod plates;
pub mod projection;
pub mod region;
pub mod relief;
pub mod scale;
pub mod seismicity;

pub use config::MapConfig;
pub use error::MapError;
pub use pipeline::{run, RunReport};
