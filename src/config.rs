use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "device-uptime", version, about = "Report device ON time and ERR events from a log file")]
pub struct Cli {
    /// Log file to analyze
    pub logfile: PathBuf,

    /// Path to an optional TOML configuration file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Override what happens when a timestamp cannot be parsed
    #[clap(long, value_enum)]
    pub on_parse_error: Option<ParseErrorPolicy>,

    /// Override how ON and OFF events are paired
    #[clap(long, value_enum)]
    pub pairing: Option<Pairing>,

    /// Output format for the report
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Diagnostic log level, written to stderr
    #[clap(long, default_value = "warn")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Stop at the first malformed timestamp
    #[default]
    Abort,
    /// Warn and drop the affected event
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    /// i-th ON with i-th OFF
    #[default]
    Positional,
    /// ON to OFF transitions in time order
    Transitions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub on: String,
    pub off: String,
    pub error: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            on: "Device State: ON".to_string(),
            off: "Device State: OFF".to_string(),
            error: "ERR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markers: Markers,
    pub on_parse_error: ParseErrorPolicy,
    pub pairing: Pairing,
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => {
            let config_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            parse_config(&config_content).context("Failed to parse config file")?
        }
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(policy) = cli.on_parse_error {
        config.on_parse_error = policy;
    }

    if let Some(pairing) = cli.pairing {
        config.pairing = pairing;
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}
