//! Uptime Monitor
//!
//! Periodically probes HTTP(S) endpoints and records status and latency in
//! PostgreSQL.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         UPTIME MONITOR                           │
//!   │                                                                  │
//!   │  ┌───────────┐   ┌─────────────┐   ┌────────┐   ┌─────────────┐  │
//!   │  │ scheduler │──▶│ security::  │──▶│ health │──▶│  storage    │──┼──▶ PostgreSQL
//!   │  │  (tick)   │   │ validator   │   │ prober │   │ uptime_logs │  │    (uptime_logs)
//!   │  └─────┬─────┘   └─────────────┘   └───┬────┘   └─────────────┘  │
//!   │        │ one task per target           │                         │
//!   │        └───────────────────────────────┘       HTTP GET ─────────┼──▶ Targets
//!   │                                                                  │
//!   │  ┌────────────────────────────────────────────────────────────┐  │
//!   │  │ config │ observability (tracing) │ lifecycle (start/stop) │  │
//!   │  └────────────────────────────────────────────────────────────┘  │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use uptime_monitor::config::{load_config, MonitorConfig, ObservabilityConfig};
use uptime_monitor::observability::init_logging;

#[derive(Parser)]
#[command(name = "uptime-monitor")]
#[command(about = "Periodically probe HTTP(S) endpoints and record their uptime", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "UPTIME_CONFIG")]
    config: Option<PathBuf>,

    /// Validate configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            // No config means no configured format; report through defaults
            let _ = init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.check_config {
        print_summary(&config);
        return ExitCode::SUCCESS;
    }

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        targets = config.monitor.targets.len(),
        interval_secs = config.monitor.interval_secs,
        timeout_secs = config.monitor.timeout_secs,
        "uptime-monitor starting"
    );

    match uptime_monitor::lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &MonitorConfig) {
    println!("Configuration OK");
    println!("  interval: {}s, timeout: {}s, max in flight: {}",
        config.monitor.interval_secs, config.monitor.timeout_secs, config.monitor.max_in_flight);
    println!("  database: {}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name);
    match &config.security.allow_list {
        Some(hosts) => println!("  allow-list: {}", hosts.join(", ")),
        None => println!("  allow-list: off"),
    }
    for target in &config.monitor.targets {
        println!("  target: {}", target);
    }
}
