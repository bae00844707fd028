//! Run configuration.
//!
//! Defaults reproduce the standard Philippine Sea Plate figure. A JSON file
//! may override any subset of fields; command-line flags override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchPolicy;
use crate::region::BoundingRegion;
use crate::relief::{ReliefSource, Shading};
use crate::seismicity::DEFAULT_FEED_URL;

pub const DEFAULT_TITLE: &str = "Tectonic Map of the Philippine Sea Plate";
pub const DEFAULT_OUTPUT: &str = "PSP_Map.png";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[west, east, south, north]` in degrees
    pub region: BoundingRegion,
    /// GMT-style projection descriptor, e.g. `M15c`
    pub projection: String,
    pub dpi: u32,
    pub title: String,
    pub output: PathBuf,
    pub relief: ReliefSource,
    pub shading: Shading,
    /// GeoJSON plate boundaries; the built-in set when absent
    pub plates: Option<PathBuf>,
    /// Earthquake feed URL or local CSV path
    pub feed: String,
    pub fetch: FetchPolicy,
    /// Length of the distance scale bar
    pub scale_bar_km: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            region: BoundingRegion::philippine_sea(),
            projection: "M15c".to_string(),
            dpi: 300,
            title: DEFAULT_TITLE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            relief: ReliefSource::default(),
            shading: Shading::default(),
            plates: None,
            feed: DEFAULT_FEED_URL.to_string(),
            fetch: FetchPolicy::default(),
            scale_bar_km: 500.0,
        }
    }
}

impl MapConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.region, BoundingRegion::philippine_sea());
        assert_eq!(config.projection, "M15c");
        assert_eq!(config.dpi, 300);
        assert_eq!(config.output, PathBuf::from("PSP_Map.png"));
        assert_eq!(config.feed, DEFAULT_FEED_URL);
        assert_eq!(config.fetch.timeout_secs, 60);
        assert!(config.plates.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"region": [120, 130, 10, 20], "dpi": 72,
                "relief": {{"kind": "file", "path": "relief.csv"}},
                "fetch": {{"timeout_secs": 5}}}}"#
        )
        .unwrap();

        let config = MapConfig::load(file.path()).unwrap();
        assert_eq!(config.region, BoundingRegion::new(120.0, 130.0, 10.0, 20.0).unwrap());
        assert_eq!(config.dpi, 72);
        assert_eq!(config.relief, ReliefSource::File { path: PathBuf::from("relief.csv") });
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_invalid_region_in_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"region": [150, 115, 0, 40]}}"#).unwrap();
        let err = MapConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("min 150"));
    }

    #[test]
    fn test_inverted_shade_range_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"shading": {{"min_shade": 1.5, "max_shade": 1.0}}}}"#).unwrap();
        let err = MapConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("min_shade 1.5"));
    }

    #[test]
    fn test_partial_shading_keeps_defaults() {
        let config: MapConfig = serde_json::from_str(r#"{"shading": {"enabled": false}}"#).unwrap();
        assert!(!config.shading.enabled());
        assert_eq!(config.shading, Shading::flat());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MapConfig::load(Path::new("/nonexistent/map.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
