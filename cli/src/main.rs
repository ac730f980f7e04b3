//! Smart Parking CLI server
//!
//! ```sh
//! # Run with default config (~/.config/smart-parking/config.toml)
//! smart-parking
//!
//! # Custom config path and port
//! smart-parking --config /etc/smart-parking/config.toml --port 8080
//!
//! # Validate config without starting
//! smart-parking --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use smart_parking::config::AppConfig;
use smart_parking::server::{init_tracing, ServerHandle, ServerOptions};

/// Smart Parking: REST API for sensor-driven parking facilities.
#[derive(Parser, Debug)]
#[command(
    name = "smart-parking",
    version,
    about = "REST API for sensor-driven parking facilities",
    long_about = "Smart Parking: CRUD API for Arduino hubs, sensors, parking slots, \
                  users, sessions and payments, with sensor-driven slot status.\n\n\
                  Default config: ~/.config/smart-parking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(smart_parking::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            std::process::exit(2);
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.server.address());
        println!("   Database      : {}", config.database.url);
        println!("   Log level     : {} ({})", config.logging.level, config.logging.format);
        println!("   Threshold (cm): {}", config.sensors.occupancy_threshold_cm);
        println!("   Chain cascade : {}", config.cascade.chain_arduino_to_slots);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
