//! Release tracker bot.
//!
//! This binary periodically checks every tracked series for newly
//! released volumes and announces them to the configured webhook
//! endpoints.

use anyhow::{bail, Context, Result};
use books_api::RakutenClient;
use clap::Parser;
use shared::{Catalog, Config, Store};
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

mod announce;
mod detector;
mod notify;

use detector::ReleaseDetector;
use notify::Notifier;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run a single detection pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    config.apply_env();

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "manga-bot".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!("Release tracker bot starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    if config.rakuten.application_id.is_empty() {
        bail!("Rakuten application ID is required. Set it in config.toml or RAKUTEN_APP_ID env var");
    }
    if config.bot.announce_new_releases && config.notify.endpoints.is_empty() {
        bail!("Announcements are enabled but no webhook endpoints are configured");
    }

    std::fs::create_dir_all(config.data_dir()).context("Failed to create data directory")?;

    // Initialize catalog storage
    let db_path = config.database_path();
    info!(db_path = %db_path.display(), "Opening store");
    let store = Store::open(&db_path).context("Failed to open store")?;
    let catalog = Catalog::new(store);

    // Initialize search client and notifier
    let client = RakutenClient::new(
        config.rakuten.base_url.clone(),
        config.rakuten.application_id.clone(),
        config.rakuten.requests_per_second,
    )
    .context("Failed to create books API client")?;

    let notifier = Notifier::new(config.notify.endpoints.clone())
        .context("Failed to create notifier")?;

    if config.bot.announce_new_releases {
        if let Err(e) = notifier.publish(announce::STARTUP_MESSAGE).await {
            warn!(error = %e, "Failed to publish startup message");
        }
    }

    if args.once {
        run_pass(&catalog, &client, &notifier, &config).await;
        info!("Single pass complete");
        return Ok(());
    }

    let period = config.check_interval();
    info!(
        interval_secs = period.as_secs(),
        "Starting periodic release checks. Press Ctrl+C to stop"
    );

    // First tick fires immediately; passes run on this task, so at most
    // one is in flight at a time.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => run_pass(&catalog, &client, &notifier, &config).await,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    Ok(())
}

/// One detection pass: detect, then announce each discovered release.
async fn run_pass(catalog: &Catalog, client: &RakutenClient, notifier: &Notifier, config: &Config) {
    info!("Checking for new releases");

    let detector = ReleaseDetector::new(catalog);
    let releases = match detector.check_new_releases(client).await {
        Ok(releases) => releases,
        Err(e) => {
            error!(error = %e, "Detection pass failed");
            return;
        }
    };

    if releases.is_empty() {
        info!("No new releases found");
        return;
    }

    info!(count = releases.len(), "New releases found");

    if !config.bot.announce_new_releases {
        return;
    }

    for release in &releases {
        let message = announce::new_release_message(release);
        match notifier.publish(&message).await {
            Ok(()) => info!(
                series = %release.series_title,
                volume = release.new_volume,
                "Announced release"
            ),
            Err(e) => warn!(
                series = %release.series_title,
                error = %e,
                "Failed to publish announcement"
            ),
        }
    }
}
