//! Economy server binary.
//!
//! Composition root that assembles:
//! 1. Content (catalog, reward tables, tuning) via `ContentFactory`
//! 2. File-backed profile storage
//! 3. The economy runtime and its background workers
//!
//! The process runs until Ctrl-C, then flushes pending profile writes.
//!
//! ```bash
//! ECONOMY_DATA_DIR=./data RUST_LOG=economy_runtime=debug cargo run -p economy-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use economy_content::ContentFactory;
use economy_runtime::{
    Audience, EconomyEvent, FileProfileRepository, Runtime, RuntimeConfig, Topic,
};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _guard = setup_logging(&config)?;

    tracing::info!("Starting economy server");
    tracing::info!("Content: {}", config.data_dir.display());
    tracing::info!("Profiles: {}", config.save_dir.display());

    // 1. Content
    let factory = ContentFactory::new(&config.data_dir);
    let economy_config = factory.load_config()?;
    let loaded = factory.load_catalog()?;
    for skipped in &loaded.skipped {
        tracing::warn!("Catalog record skipped: {}", skipped);
    }
    let rewards = factory.load_rewards_for(&loaded.catalog)?;
    for skipped in &rewards.skipped {
        tracing::warn!("Reward entry skipped: {}", skipped);
    }
    let tables = rewards.tables;
    tracing::info!(
        "Loaded {} boost item(s), {} crystal type(s), {} pet type(s), {} synergy(ies), {} reward table(s)",
        loaded.catalog.boosts().len(),
        loaded.catalog.crystals().len(),
        loaded.catalog.pets().len(),
        loaded.catalog.synergies().len(),
        tables.len()
    );

    // 2. Storage
    let repository = FileProfileRepository::new(&config.save_dir).with_context(|| {
        format!(
            "Failed to open profile directory {}",
            config.save_dir.display()
        )
    })?;

    // 3. Runtime
    let mut runtime_config = RuntimeConfig::from(&economy_config);
    if let Some(secs) = config.sweep_interval_secs {
        runtime_config.sweep_interval = Duration::from_secs(secs);
    }

    let runtime = Runtime::builder()
        .config(runtime_config)
        .catalog(loaded.catalog)
        .rewards(tables)
        .repository(Arc::new(repository))
        .build()
        .await?;

    let announcements = tokio::spawn(log_announcements(
        runtime.subscribe(Topic::Announcement),
    ));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Ctrl-C received, shutting down");
    runtime.shutdown().await?;
    announcements.abort();

    tracing::info!("Economy server stopped");
    Ok(())
}

/// Mirrors announcements into the log until the bus closes.
async fn log_announcements(mut rx: tokio::sync::broadcast::Receiver<EconomyEvent>) {
    loop {
        match rx.recv().await {
            Ok(EconomyEvent::Announced(announcement)) => match announcement.audience {
                Audience::Everyone => tracing::info!("[all] {}", announcement.message),
                Audience::Entity(entity) => {
                    tracing::info!("[{}] {}", entity, announcement.message)
                }
            },
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!("Announcement log lagged, {} message(s) dropped", missed)
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Setup logging to both stderr and a daily-rolling file.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(config: &ServerConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!(
            "Failed to create log directory {}",
            config.log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "economy.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/economy.log", config.log_dir.display());
    Ok(guard)
}
