mod classifier;
mod config;
mod error;
mod log_collector;
mod log_entry;
mod timestamp;
mod types;
mod uptime;

use anyhow::Result;
use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;
use std::io::{self, Write};

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = config::Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level)
        .env()
        .init()?;

    info!("Starting device-uptime");

    // Load configuration
    let config = config::load_config(&cli)?;
    info!(
        "Configuration loaded: pairing={:?}, on_parse_error={:?}",
        config.pairing, config.on_parse_error
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    log_collector::run(&cli.logfile, &config, cli.format, &mut out)?;
    out.flush()?;

    Ok(())
}
