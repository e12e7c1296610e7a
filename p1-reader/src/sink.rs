//! Reading export sinks
//!
//! The driver hands every successfully decoded reading set to a `Sink`
//! together with the UTC instant it was decoded, truncated to the second.

use crate::config::InfluxConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use p1_core::{P1Error, P1Result, ReadingSet};
use tracing::{debug, info};

/// Destination for decoded reading sets
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist one reading set observed at the given instant
    async fn export(&self, at: DateTime<Utc>, readings: &ReadingSet) -> P1Result<()>;
}

/// Sink writing to the InfluxDB 1.x HTTP API
///
/// Readings are posted as a single `dsmr` measurement in line protocol with
/// second precision, authenticated with basic auth.
pub struct InfluxSink {
    client: reqwest::Client,
    write_url: String,
    username: String,
    password: String,
}

impl InfluxSink {
    /// Create a sink for the configured InfluxDB instance
    pub fn new(config: &InfluxConfig) -> Self {
        let write_url = format!(
            "http://{}:{}/write?db={}&precision=s",
            config.host, config.port, config.database
        );
        info!(url = %write_url, "Creating InfluxDB sink");
        Self {
            client: reqwest::Client::new(),
            write_url,
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// Render one reading set as an InfluxDB line protocol record
///
/// Returns None for an empty set; there is nothing to write.
fn to_line_protocol(at: DateTime<Utc>, readings: &ReadingSet) -> Option<String> {
    if readings.is_empty() {
        return None;
    }
    let fields = readings
        .iter()
        .map(|(tag, value)| format!("{tag}={value}"))
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("dsmr {} {}", fields, at.timestamp()))
}

#[async_trait]
impl Sink for InfluxSink {
    async fn export(&self, at: DateTime<Utc>, readings: &ReadingSet) -> P1Result<()> {
        let Some(body) = to_line_protocol(at, readings) else {
            debug!("empty reading set, nothing to export");
            return Ok(());
        };

        let response = self
            .client
            .post(&self.write_url)
            .basic_auth(&self.username, Some(&self.password))
            .body(body)
            .send()
            .await
            .map_err(|e| P1Error::Export(format!("Failed to write to InfluxDB: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(P1Error::Export(format!(
                "InfluxDB write returned status {status}"
            )));
        }

        debug!(readings = readings.len(), "Wrote reading set to InfluxDB");
        Ok(())
    }
}
