//! Capture replay transport
//!
//! Reads a previously captured P1 byte stream from a file, so the pipeline
//! can be exercised without a meter on the line.

use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use log::debug;
use p1_core::{P1Error, P1Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Transport that replays a captured byte stream from a file
///
/// Unlike the serial transport, `open` is idempotent once the capture has
/// been opened: the driver re-acquires its stream every cycle, and the
/// capture must be consumed exactly once across those cycles rather than
/// restarted from the top. EOF surfaces as a zero-length read.
#[derive(Debug)]
pub struct ReplayTransport {
    path: PathBuf,
    file: Option<File>,
    closed: bool,
}

impl ReplayTransport {
    /// Create a replay transport for a capture file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            closed: true,
        }
    }
}

#[async_trait]
impl TransportLayer for ReplayTransport {
    async fn open(&mut self) -> P1Result<()> {
        if self.file.is_none() {
            debug!("opening capture {}", self.path.display());
            let file = File::open(&self.path).await.map_err(P1Error::Connection)?;
            self.file = Some(file);
        }
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for ReplayTransport {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> P1Result<()> {
        // A file never stalls; the timeout only applies to live links.
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> P1Result<usize> {
        let file = self.file.as_mut().ok_or_else(|| {
            P1Error::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Capture not opened",
            ))
        })?;

        let n = file.read(buf).await.map_err(P1Error::Connection)?;
        if n == 0 {
            self.closed = true;
        }
        Ok(n)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> P1Result<()> {
        // Keep the file handle so the next open resumes where we stopped.
        self.closed = true;
        Ok(())
    }
}
