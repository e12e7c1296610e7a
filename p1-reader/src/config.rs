//! Configuration management for the P1 reader
//!
//! All settings come from the environment. Log verbosity is handled
//! separately through `RUST_LOG`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Input mode: live serial device or replay from a capture file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Serial,
    Replay,
}

/// InfluxDB connection parameters (1.x HTTP API)
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Complete reader configuration
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub mode: Mode,
    pub device: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub capture: PathBuf,
    pub influx: InfluxConfig,
}

impl ReaderConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let mode = match var("P1_MODE", "serial").as_str() {
            "serial" => Mode::Serial,
            "replay" => Mode::Replay,
            other => anyhow::bail!("Invalid P1_MODE: {other} (must be serial or replay)"),
        };

        let baud_rate: u32 = var("P1_BAUD", "115200")
            .parse()
            .context("Invalid P1_BAUD")?;
        let timeout_secs: u64 = var("P1_READ_TIMEOUT_SECS", "12")
            .parse()
            .context("Invalid P1_READ_TIMEOUT_SECS")?;
        let port: u16 = var("INFLUXDB_PORT", "8086")
            .parse()
            .context("Invalid INFLUXDB_PORT")?;

        let config = Self {
            mode,
            device: var("P1_DEVICE", "/dev/ttyUSB0"),
            baud_rate,
            read_timeout: Duration::from_secs(timeout_secs),
            capture: PathBuf::from(var("P1_CAPTURE", "raw.out")),
            influx: InfluxConfig {
                host: var("INFLUXDB_HOST", "localhost"),
                port,
                username: var("INFLUXDB_USERNAME", "root"),
                password: var("INFLUXDB_PASSWORD", "root"),
                database: var("INFLUXDB_DATABASE", "dsmr"),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            anyhow::bail!("P1_BAUD must be greater than 0");
        }
        if self.read_timeout.is_zero() {
            anyhow::bail!("P1_READ_TIMEOUT_SECS must be greater than 0");
        }
        if self.influx.database.is_empty() {
            anyhow::bail!("INFLUXDB_DATABASE must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ReaderConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.mode, Mode::Serial);
        assert_eq!(config.device, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.read_timeout, Duration::from_secs(12));
        assert_eq!(config.influx.host, "localhost");
        assert_eq!(config.influx.port, 8086);
        assert_eq!(config.influx.database, "dsmr");
    }

    #[test]
    fn test_config_replay_mode() {
        let config = ReaderConfig::from_lookup(|key| match key {
            "P1_MODE" => Some("replay".to_string()),
            "P1_CAPTURE" => Some("/var/log/p1/raw.out".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.mode, Mode::Replay);
        assert_eq!(config.capture, PathBuf::from("/var/log/p1/raw.out"));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(ReaderConfig::from_lookup(|key| match key {
            "P1_MODE" => Some("tcp".to_string()),
            _ => None,
        })
        .is_err());

        assert!(ReaderConfig::from_lookup(|key| match key {
            "P1_BAUD" => Some("fast".to_string()),
            _ => None,
        })
        .is_err());

        assert!(ReaderConfig::from_lookup(|key| match key {
            "P1_READ_TIMEOUT_SECS" => Some("0".to_string()),
            _ => None,
        })
        .is_err());
    }
}
