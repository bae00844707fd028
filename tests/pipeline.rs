//! End-to-end runs of the map pipeline against local relief and feed files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tectonic_map::canvas::LayerKind;
use tectonic_map::relief::ReliefSource;
use tectonic_map::seismicity::SeismicityOutcome;
use tectonic_map::{run, MapConfig, MapError};

const STATIC_LAYERS: [LayerKind; 5] = [
    LayerKind::Relief,
    LayerKind::Coastline,
    LayerKind::PlateBoundaries,
    LayerKind::HistoricalEvents,
    LayerKind::Volcanoes,
];

/// ERDDAP-style relief CSV over the default region: deep ocean with a
/// mountain ridge running north-east.
fn write_relief(dir: &Path) -> PathBuf {
    let mut csv = String::from("latitude,longitude,altitude\ndegrees_north,degrees_east,m\n");
    for lat in -1..=41 {
        for lon in 114..=151 {
            let ridge = (lon - 110 - lat) as f64;
            let altitude = 3000.0 - ridge.abs() * 800.0;
            writeln!(csv, "{lat},{lon},{}", altitude.max(-6000.0)).unwrap();
        }
    }
    let path = dir.join("relief.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn write_feed(dir: &Path, rows: &[(f64, f64, f64)]) -> PathBuf {
    let mut csv = String::from("time,latitude,longitude,depth,mag,magType,place\n");
    for (lon, lat, depth) in rows {
        writeln!(csv, "2024-05-01T00:00:00.000Z,{lat},{lon},{depth},5.0,mb,\"somewhere\"").unwrap();
    }
    let path = dir.join("feed.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn offline_config(dir: &Path, feed: &str) -> MapConfig {
    MapConfig {
        dpi: 30,
        output: dir.join("map.png"),
        relief: ReliefSource::File { path: write_relief(dir) },
        feed: feed.to_string(),
        ..MapConfig::default()
    }
}

fn assert_png(path: &Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.len() > 8);
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_full_map_with_recent_quakes() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[(120.0, 20.0, 30.0), (100.0, -5.0, 10.0), (135.0, 30.0, 450.0)]);
    let config = offline_config(dir.path(), feed.to_str().unwrap());

    let report = run(&config).unwrap();

    let mut expected = STATIC_LAYERS.to_vec();
    expected.extend([LayerKind::Seismicity, LayerKind::Colorbar, LayerKind::ScaleBar, LayerKind::Legend]);
    assert_eq!(report.layers, expected);
    assert_eq!(report.seismicity, Some(SeismicityOutcome::Plotted { fetched: 3, plotted: 2 }));
    assert!(report.warning.is_none());
    assert_eq!(
        report.legend,
        vec!["Plate Boundaries", "Major Historical EQ", "Active Volcanoes"]
    );
    assert_png(&config.output);
}

#[test]
fn test_no_quakes_in_region_is_not_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[(10.0, 50.0, 10.0), (-120.0, 35.0, 8.0)]);
    let config = offline_config(dir.path(), feed.to_str().unwrap());

    let report = run(&config).unwrap();

    let mut expected = STATIC_LAYERS.to_vec();
    expected.extend([LayerKind::ScaleBar, LayerKind::Legend]);
    assert_eq!(report.layers, expected);
    assert_eq!(report.seismicity, Some(SeismicityOutcome::Empty { fetched: 2 }));
    assert!(report.warning.is_none());
    assert_png(&config.output);
}

#[test]
fn test_feed_failure_keeps_static_map() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-feed.csv");
    let config = offline_config(dir.path(), missing.to_str().unwrap());

    let report = run(&config).unwrap();

    let mut expected = STATIC_LAYERS.to_vec();
    expected.extend([LayerKind::ScaleBar, LayerKind::Legend]);
    assert_eq!(report.layers, expected);
    assert!(report.seismicity.is_none());
    let warning = report.warning.unwrap();
    assert!(warning.starts_with("USGS Data Warning: "));
    assert!(warning.contains("no-such-feed.csv"));
    assert_png(&config.output);
}

#[test]
fn test_unreachable_feed_url_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = offline_config(dir.path(), "http://127.0.0.1:9/4.5_month.csv");
    config.fetch.timeout_secs = 5;

    let report = run(&config).unwrap();

    assert!(!report.layers.contains(&LayerKind::Seismicity));
    assert!(report.warning.unwrap().contains("127.0.0.1:9"));
    assert_png(&config.output);
}

#[test]
fn test_historical_labels() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[]);
    let config = offline_config(dir.path(), feed.to_str().unwrap());

    let report = run(&config).unwrap();

    assert_eq!(
        report.annotations,
        vec![
            ("1923 Kanto (M7.9)".to_string(), 139.3, 35.3),
            ("1999 Chi-Chi (M7.7)".to_string(), 120.98, 23.85),
            ("1990 Luzon (M7.7)".to_string(), 121.35, 15.7),
        ]
    );
}

#[test]
fn test_broken_relief_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[]);
    let mut config = offline_config(dir.path(), feed.to_str().unwrap());
    let broken = dir.path().join("broken.csv");
    std::fs::write(&broken, "latitude,longitude,altitude\n10,120,5\n").unwrap();
    config.relief = ReliefSource::File { path: broken };

    let err = run(&config).unwrap_err();
    assert!(matches!(err, MapError::Relief(_)));
    assert!(!config.output.exists());
}

#[test]
fn test_bad_projection_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[]);
    let mut config = offline_config(dir.path(), feed.to_str().unwrap());
    config.projection = "X15c".to_string();

    assert!(matches!(run(&config), Err(MapError::Projection(_))));
    assert!(!config.output.exists());
}

#[test]
fn test_custom_plate_file() {
    let dir = tempfile::tempdir().unwrap();
    let feed = write_feed(dir.path(), &[]);
    let plates = dir.path().join("pb2002.json");
    std::fs::write(
        &plates,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"Name": "PS-PA"},
             "geometry": {"type": "LineString", "coordinates": [[140, 10], [145, 20]]}}
        ]}"#,
    )
    .unwrap();
    let mut config = offline_config(dir.path(), feed.to_str().unwrap());
    config.plates = Some(plates);

    let report = run(&config).unwrap();
    assert!(report.layers.contains(&LayerKind::PlateBoundaries));

    config.plates = Some(dir.path().join("missing.json"));
    assert!(matches!(run(&config), Err(MapError::PlateData(_))));
}
