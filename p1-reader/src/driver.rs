//! Pipeline driver
//!
//! Owns the whole per-telegram cycle: acquire the stream, assemble one
//! telegram, release the stream, then validate, decode, normalize and
//! export. The loop is the top-level recovery boundary; no protocol error
//! escapes it.

use crate::sink::Sink;
use chrono::{SubsecRound, Utc};
use p1_core::{P1Error, P1Result, Registry};
use p1_telegram::{checksum, decoder, normalizer, TelegramAssembler};
use p1_transport::TransportLayer;
use std::time::Duration;
use tracing::{error, info, warn};

/// Driver behavior switches
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Per-read timeout handed to the stream while assembling
    pub read_timeout: Option<Duration>,
    /// Sleep until the next wall-clock minute after each delivered telegram
    pub align_to_minute: bool,
    /// Treat end-of-stream while assembling as a clean shutdown (replay)
    pub stop_at_eof: bool,
}

impl DriverOptions {
    /// Options for a live serial device
    pub fn serial(read_timeout: Duration) -> Self {
        Self {
            read_timeout: Some(read_timeout),
            align_to_minute: true,
            stop_at_eof: false,
        }
    }

    /// Options for replaying a capture file back-to-back
    pub fn replay() -> Self {
        Self {
            read_timeout: None,
            align_to_minute: false,
            stop_at_eof: true,
        }
    }
}

/// The pipeline driver
pub struct Driver<T, S> {
    transport: T,
    sink: S,
    registry: Registry,
    options: DriverOptions,
}

impl<T: TransportLayer, S: Sink> Driver<T, S> {
    /// Create a driver over a transport and a sink
    pub fn new(transport: T, sink: S, registry: Registry, options: DriverOptions) -> Self {
        Self {
            transport,
            sink,
            registry,
            options,
        }
    }

    /// Run the pipeline until the process is terminated
    ///
    /// Returns an error only if the very first stream acquisition fails;
    /// every later failure is logged and retried. With `stop_at_eof` set the
    /// run also ends, cleanly, once the stream is exhausted.
    pub async fn run(&mut self) -> P1Result<()> {
        let mut first_attempt = true;
        loop {
            if let Err(e) = self.transport.open().await {
                if first_attempt {
                    error!("could not open stream: {e}");
                    return Err(e);
                }
                warn!("reopening stream failed: {e}");
                continue;
            }
            first_attempt = false;

            let assembled =
                TelegramAssembler::assemble(&mut self.transport, self.options.read_timeout).await;
            // Release the stream before any processing, on both paths, so a
            // stuck device handle never straddles iterations.
            let _ = self.transport.close().await;

            let telegram = match assembled {
                Ok(telegram) => telegram,
                Err(e) if self.options.stop_at_eof && is_eof(&e) => {
                    info!("stream exhausted, stopping");
                    return Ok(());
                }
                Err(e) => {
                    warn!("telegram read failed: {e}");
                    continue;
                }
            };

            if let Err(e) = checksum::validate(&telegram) {
                warn!("bad checksum: {e}");
                continue;
            }

            let decoded = decoder::decode(&telegram);
            let readings = match normalizer::normalize(&decoded, &self.registry) {
                Ok(readings) => readings,
                Err(e) => {
                    warn!("discarding telegram: {e}");
                    continue;
                }
            };

            let at = Utc::now().trunc_subsecs(0);
            match self.sink.export(at, &readings).await {
                Ok(()) => info!(readings = readings.len(), "reading set exported"),
                // A failed export must not tighten the reporting cadence;
                // fall through to the minute-boundary sleep.
                Err(e) => error!("export failed: {e}"),
            }

            self.pause().await;
        }
    }

    /// Suspend until the next wall-clock minute boundary
    async fn pause(&self) {
        if !self.options.align_to_minute {
            return;
        }
        let into_minute = Utc::now().timestamp_millis().rem_euclid(60_000) as u64;
        tokio::time::sleep(Duration::from_millis(60_000 - into_minute)).await;
    }
}

fn is_eof(error: &P1Error) -> bool {
    matches!(error, P1Error::Connection(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}
