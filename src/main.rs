// src/main.rs

//! The main entry point for the timetabled server application.

use anyhow::Result;
use std::env;
use std::path::Path;
use timetabled::config::Config;
use timetabled::core::state::ServerState;
use timetabled::server;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

/// Read when no `--config` flag is given, if present.
const DEFAULT_CONFIG_PATH: &str = "timetabled.toml";

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--version") {
        println!("timetabled version {VERSION}");
        return Ok(());
    }

    // An explicit --config path must exist; the default one is optional.
    let explicit_config = args
        .iter()
        .position(|arg| arg == "--config")
        .map(|i| args.get(i + 1));
    let loaded = match explicit_config {
        Some(Some(path)) => Config::from_file(path),
        Some(None) => {
            eprintln!("--config flag requires a value");
            std::process::exit(1);
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH),
        None => Ok(Config::default()),
    };
    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    // Override port if provided as a command-line argument
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        match args.get(port_index + 1).map(|s| s.parse::<u16>()) {
            Some(Ok(port)) if port != 0 => config.port = port,
            Some(_) => {
                eprintln!("Invalid port number: {}", args[port_index + 1]);
                std::process::exit(1);
            }
            None => {
                eprintln!("--port flag requires a value");
                std::process::exit(1);
            }
        }
    }

    // RUST_LOG takes precedence over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact() // Use the compact, single-line format.
                .with_ansi(true), // Enable ANSI color codes for log levels.
        )
        .init();

    let state = ServerState::new(config);
    if let Err(e) = server::run(state).await {
        error!("Server runtime error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
