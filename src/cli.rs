use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// Command-line options for the polling daemon.
#[derive(Parser, Debug)]
#[command(name = "lgtmeme")]
#[command(about = "Posts a celebratory meme comment on pull requests you recently approved")]
#[command(long_version = BUILD_INFO_HUMAN)]
pub struct Cli {
    /// Polling interval (e.g. 30s, 5m, 2h; unitless implies minutes)
    #[arg(long, value_name = "DURATION", default_value = "5m")]
    pub interval: String,

    /// Run a single polling cycle and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    pub fn poll_interval(&self) -> Result<Duration> {
        parse_interval(&self.interval)
            .with_context(|| format!("Invalid interval: '{}'", self.interval))
    }
}

fn parse_interval(raw: &str) -> Result<Duration> {
    let raw = raw.trim();

    if let Ok(minutes) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(minutes * 60));
    }

    if let Some(seconds_str) = raw.strip_suffix('s') {
        let seconds: u64 = seconds_str
            .parse()
            .with_context(|| format!("Invalid interval seconds: '{}'", seconds_str))?;
        return Ok(Duration::from_secs(seconds));
    }

    if let Some(minutes_str) = raw.strip_suffix('m') {
        let minutes: u64 = minutes_str
            .parse()
            .with_context(|| format!("Invalid interval minutes: '{}'", minutes_str))?;
        return Ok(Duration::from_secs(minutes * 60));
    }

    if let Some(hours_str) = raw.strip_suffix('h') {
        let hours: u64 = hours_str
            .parse()
            .with_context(|| format!("Invalid interval hours: '{}'", hours_str))?;
        return Ok(Duration::from_secs(hours * 3600));
    }

    anyhow::bail!(
        "Invalid interval format '{}'. Supported formats: unitless number (minutes), '30s', '5m', '2h'",
        raw
    )
}
