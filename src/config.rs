//! Server configuration from command-line flags and environment

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use clap::Parser;

use crate::analytics::config::{AnalyticsConfig, DEFAULT_INACTIVITY_HOURS, DEFAULT_READ_TIMEOUT_MS};

pub const ENV_HOST: &str = "TOUR_ANALYTICS_HOST";
pub const ENV_PORT: &str = "TOUR_ANALYTICS_PORT";
pub const ENV_DATA_DIR: &str = "TOUR_ANALYTICS_DATA_DIR";
pub const ENV_INACTIVITY_MINUTES: &str = "TOUR_ANALYTICS_INACTIVITY_MINUTES";
pub const ENV_READ_TIMEOUT_MS: &str = "TOUR_ANALYTICS_READ_TIMEOUT_MS";
pub const ENV_RECOMPUTE_SECS: &str = "TOUR_ANALYTICS_RECOMPUTE_SECS";

#[derive(Parser, Debug, Clone)]
#[command(name = "tour-server")]
#[command(version, about = "Tour analytics API for the product tour dashboard", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, short = 'H', env = ENV_HOST, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = ENV_PORT, default_value_t = 3030)]
    pub port: u16,

    /// Directory for tours.jsonl and events.jsonl; in-memory only when unset
    #[arg(long, short = 'd', env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Minutes of inactivity after which a started session counts as abandoned
    #[arg(long, env = ENV_INACTIVITY_MINUTES, default_value_t = DEFAULT_INACTIVITY_HOURS * 60)]
    pub inactivity_minutes: i64,

    /// Deadline for each event store read, in milliseconds
    #[arg(long, env = ENV_READ_TIMEOUT_MS, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,

    /// Interval of the background stats recomputation (0 disables it)
    #[arg(long, env = ENV_RECOMPUTE_SECS, default_value_t = 0)]
    pub recompute_secs: u64,
}

impl Cli {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Engine settings, rejecting a non-positive inactivity window
    pub fn analytics_config(&self) -> Result<AnalyticsConfig, String> {
        if self.inactivity_minutes <= 0 {
            return Err(format!(
                "--inactivity-minutes must be positive, got {}",
                self.inactivity_minutes
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err("--read-timeout-ms must be positive".to_string());
        }

        Ok(AnalyticsConfig::default()
            .with_inactivity_threshold(Duration::minutes(self.inactivity_minutes))
            .with_read_timeout(StdDuration::from_millis(self.read_timeout_ms)))
    }

    pub fn recompute_interval(&self) -> Option<StdDuration> {
        (self.recompute_secs > 0).then(|| StdDuration::from_secs(self.recompute_secs))
    }
}
