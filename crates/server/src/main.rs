use anyhow::Context;
use clap::{Parser, ValueEnum};
use hexdex::{Config, HexIndex, LookupStrategy, ValueRange};
use hexdex_server::run_server;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LookupArg {
    Cached,
    Recompute,
}

impl From<LookupArg> for LookupStrategy {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Cached => LookupStrategy::Cached,
            LookupArg::Recompute => LookupStrategy::Recompute,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// JSON (or TOML) config file; flags and environment override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, env = "BASE_H3_RESOLUTION")]
    base_resolution: Option<u8>,

    #[arg(long, env = "CENTER_POINT_LATITUDE", allow_hyphen_values = true)]
    center_latitude: Option<f64>,

    #[arg(long, env = "CENTER_POINT_LONGITUDE", allow_hyphen_values = true)]
    center_longitude: Option<f64>,

    #[arg(long, env = "BASE_AREA_RADIUS")]
    radius_km: Option<f64>,

    #[arg(long, env = "LEVEL_BORDER_LEFT", allow_hyphen_values = true)]
    level_low: Option<i64>,

    #[arg(long, env = "LEVEL_BORDER_RIGHT", allow_hyphen_values = true)]
    level_high: Option<i64>,

    #[arg(long, env = "CELL_ID_FROM", allow_hyphen_values = true)]
    group_id_low: Option<i64>,

    #[arg(long, env = "CELL_ID_TO", allow_hyphen_values = true)]
    group_id_high: Option<i64>,

    #[arg(long, env = "HEXDEX_LOOKUP", value_enum)]
    lookup: Option<LookupArg>,
}

impl Args {
    fn index_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => Config::default(),
        };

        let latitude = self.center_latitude.unwrap_or(config.center_latitude);
        let longitude = self.center_longitude.unwrap_or(config.center_longitude);
        let level = ValueRange::new(
            self.level_low.unwrap_or(config.level.low),
            self.level_high.unwrap_or(config.level.high),
        );
        let group_id = ValueRange::new(
            self.group_id_low.unwrap_or(config.group_id.low),
            self.group_id_high.unwrap_or(config.group_id.high),
        );

        config = config
            .with_center(latitude, longitude)
            .with_level_range(level)
            .with_group_id_range(group_id);
        if let Some(resolution) = self.base_resolution {
            config = config.with_base_resolution(resolution);
        }
        if let Some(radius_km) = self.radius_km {
            config = config.with_radius_km(radius_km);
        }
        if let Some(lookup) = self.lookup {
            config = config.with_lookup(lookup.into());
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext == "toml") {
        return Config::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()));
    }

    Config::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexdex_server=info,hexdex=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.index_config()?;

    info!(
        "Building index at resolution {} around ({}, {}) with radius {} km",
        config.base_resolution, config.center_latitude, config.center_longitude, config.radius_km
    );
    let index = tokio::task::spawn_blocking(move || HexIndex::new(config)).await??;
    info!("Index ready: {:?}", index.stats());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl_c signal: {}", e);
        }
    };

    run_server(listener, Arc::new(index), shutdown).await?;

    Ok(())
}
