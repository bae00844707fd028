use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::font::FontError;
use crate::plates::PlateDataError;
use crate::projection::ProjectionError;
use crate::region::RegionError;
use crate::relief::ReliefError;

/// Errors that abort the run. Seismicity failures never end up here.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid region: {0}")]
    Region(#[from] RegionError),

    #[error("invalid projection: {0}")]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("HTTP client: {0}")]
    Http(#[from] FetchError),

    #[error("relief layer: {0}")]
    Relief(#[from] ReliefError),

    #[error("plate boundaries: {0}")]
    PlateData(#[from] PlateDataError),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
