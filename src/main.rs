use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tectonic_map::fetch::FetchPolicy;
use tectonic_map::region::BoundingRegion;
use tectonic_map::relief::ReliefSource;
use tectonic_map::MapConfig;

#[derive(Parser, Debug)]
#[command(name = "tectonic_map")]
#[command(about = "Render a tectonic map with relief, plate boundaries and recent seismicity")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map region as W/E/S/N in degrees (default: 115/150/0/40)
    #[arg(short, long)]
    region: Option<String>,

    /// Projection descriptor, Mercator only (default: M15c)
    #[arg(short = 'J', long)]
    projection: Option<String>,

    /// Output resolution in dots per inch (default: 300)
    #[arg(long)]
    dpi: Option<u32>,

    /// Output PNG path (default: PSP_Map.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Earthquake feed URL or local CSV file
    #[arg(long)]
    feed: Option<String>,

    /// Relief source: "erddap" or a local CSV grid
    #[arg(long)]
    relief: Option<String>,

    /// GeoJSON plate boundaries (default: built-in set)
    #[arg(long)]
    plates: Option<PathBuf>,

    /// Timeout for each download, in seconds (default: 60)
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Map title
    #[arg(long)]
    title: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<MapConfig> {
        let mut config = match &self.config {
            Some(path) => MapConfig::load(path)?,
            None => MapConfig::default(),
        };

        if let Some(region) = &self.region {
            config.region = BoundingRegion::parse(region).context("invalid --region")?;
        }
        if let Some(projection) = self.projection {
            config.projection = projection;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(feed) = self.feed {
            config.feed = feed;
        }
        if let Some(relief) = &self.relief {
            config.relief = ReliefSource::parse(relief);
        }
        if let Some(plates) = self.plates {
            config.plates = Some(plates);
        }
        if let Some(timeout_secs) = self.fetch_timeout {
            config.fetch = FetchPolicy { timeout_secs };
        }
        if let Some(title) = self.title {
            config.title = title;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config()?;
    tracing::debug!(?config, "configuration");

    let report = tectonic_map::run(&config).with_context(|| format!("failed to render {}", config.output.display()))?;
    tracing::info!(layers = report.layers.len(), "done");

    Ok(())
}
