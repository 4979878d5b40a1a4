//! Dgrelay - UDP-to-HTTP JSON Datagram Relay
//!
//! This is the main entry point for the Dgrelay application.

use anyhow::Result;
use clap::Parser;
use dgrelay::config::load_config;
use dgrelay::forwarder::HttpForwarder;
use dgrelay::listener::Listener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Dgrelay - relay JSON datagrams from a UDP port to an HTTP endpoint
#[derive(Parser, Debug)]
#[command(name = "dgrelay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging format
    #[arg(long)]
    json_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(&args.log_level, args.json_log)?;

    // Load configuration
    let config = load_config(&args.config)?;
    if let Err(e) = config.relay.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }

    info!("Dgrelay v{}", dgrelay::VERSION);
    info!("Configuration loaded from: {:?}", args.config);
    info!("Relay endpoint: {}", config.relay.relay_url);

    // Build the forwarder and start the listener
    let timeout = Duration::from_secs(config.relay.forward_timeout);
    let forwarder = HttpForwarder::new(config.relay.relay_url.clone(), timeout)?;
    let handle = Listener::new(config.relay, Arc::new(forwarder)).start().await?;

    // Run until interrupted
    wait_for_signal().await;
    handle.stop().await;

    info!("Relay stopped");
    Ok(())
}

/// Block until Ctrl+C or a termination signal arrives (cross-platform)
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("Failed to setup SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        // On Windows, only handle Ctrl+C
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down...");
    }
}

/// Setup logging based on configuration
fn setup_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
