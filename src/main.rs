//! Release tag watcher.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                 TAG WATCHER                  │
//!                 │                                              │
//!                 │  ┌─────────┐  probe   ┌────────┐   GET       │
//!                 │  │ watcher │─────────▶│ probe  │─────────────┼────▶ Target
//!                 │  │  loop   │◀─────────│ (http) │◀────────────┼───── (status code)
//!                 │  └────┬────┘   bool   └────────┘             │
//!                 │       │ publish                              │
//!                 │       ▼                                      │
//!                 │  ┌──────────┐  snapshot  ┌──────────────┐    │
//!     Viewer ─────┼─▶│  status  │◀───────────│ status cell  │    │
//!     ◀───────────┼──│  server  │            │  (arc-swap)  │    │
//!   "YES!"/"No."  │  └──────────┘            └──────────────┘    │
//!                 │                                              │
//!                 │  config · lifecycle · observability          │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tag_watcher::config::{load_config, validate_config, ConfigError, WatchConfig};
use tag_watcher::lifecycle::{wait_for_signal, Shutdown};
use tag_watcher::observability::{logging, metrics};
use tag_watcher::{HttpProber, StatusPage, StatusServer, Watcher};

#[derive(Parser)]
#[command(name = "tag-watcher")]
#[command(about = "Serve a page saying whether a release has been tagged yet", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address for the status page.
    #[arg(long)]
    http: Option<String>,

    /// URL to probe (overrides the version template).
    #[arg(long)]
    target: Option<String>,

    /// Release version to wait for.
    #[arg(long = "tag-version")]
    tag_version: Option<String>,

    /// Poll interval in milliseconds.
    #[arg(long)]
    poll_ms: Option<u64>,
}

impl Cli {
    fn apply(self, config: &mut WatchConfig) {
        if let Some(http) = self.http {
            config.listener.bind_address = http;
        }
        if let Some(target) = self.target {
            config.target.url = Some(target);
        }
        if let Some(version) = self.tag_version {
            config.target.version = version;
        }
        if let Some(poll_ms) = self.poll_ms {
            config.target.poll_interval_ms = poll_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();

    let mut config = match cli.config.take() {
        Some(path) => load_config(&path)?,
        None => WatchConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("tag-watcher v{} starting", env!("CARGO_PKG_VERSION"));

    let target_url = config.target.resolved_url();
    tracing::info!(
        bind_address = %config.listener.bind_address,
        url = %target_url,
        poll_interval_ms = config.target.poll_interval_ms,
        timeout_ms = config.target.timeout_ms,
        "Configuration loaded"
    );
    if config.target.timeout_ms > config.target.poll_interval_ms {
        tracing::warn!("Probe timeout exceeds poll interval; slow probes will delay ticks");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();

    let prober = HttpProber::new(config.target.timeout(), &config.target.proxy)?;
    let watcher = Watcher::start_with_shutdown(
        target_url.clone(),
        config.target.poll_interval(),
        prober,
        shutdown.subscribe(),
    );
    tracing::info!(
        url = %watcher.target(),
        interval = ?watcher.interval(),
        proxy = ?config.target.proxy,
        "Watching target"
    );

    let page = StatusPage::new(
        config.page.resolved_subject(&config.target.version),
        target_url,
    )?;
    let server = StatusServer::new(
        watcher.reader(),
        page,
        std::time::Duration::from_secs(config.timeouts.request_secs),
    );

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let served = server.run(listener, shutdown.subscribe()).await;
    shutdown.trigger();
    watcher.stop().await;
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}
