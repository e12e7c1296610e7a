//! Telegram frame assembler
//!
//! Collects CR/LF-terminated lines from the raw byte stream into a single
//! buffer until the trailer line (first byte `!`) has been appended. The
//! buffer then holds one complete telegram, byte-exact.

use crate::telegram::Telegram;
use bytes::BytesMut;
use log::trace;
use p1_core::{P1Error, P1Result};
use p1_transport::StreamAccessor;
use std::time::Duration;

/// Telegram frame assembler
pub struct TelegramAssembler;

impl TelegramAssembler {
    /// Assemble one complete telegram from the stream
    ///
    /// Starts from an empty buffer on every call; a failed read abandons the
    /// partial buffer and the caller restarts assembly on its next attempt.
    ///
    /// # Arguments
    ///
    /// * `stream` - Byte stream to read from
    /// * `timeout` - Per-read timeout applied to the stream, if any
    pub async fn assemble<S: StreamAccessor>(
        stream: &mut S,
        timeout: Option<Duration>,
    ) -> P1Result<Telegram> {
        if timeout.is_some() {
            stream.set_timeout(timeout).await?;
        }

        let mut telegram = BytesMut::new();
        loop {
            let line_start = telegram.len();
            Self::read_line(stream, &mut telegram).await?;
            if telegram[line_start] == b'!' {
                trace!("trailer line found, telegram of {} bytes", telegram.len());
                return Ok(Telegram::new(telegram.freeze()));
            }
        }
    }

    /// Append one line, terminator included, to the buffer
    async fn read_line<S: StreamAccessor>(stream: &mut S, buf: &mut BytesMut) -> P1Result<()> {
        let mut byte = [0u8; 1];
        loop {
            let n = stream.read(&mut byte).await?;
            if n == 0 {
                return Err(P1Error::Connection(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "Stream ended inside a telegram",
                )));
            }
            buf.extend_from_slice(&byte);
            if byte[0] == b'\n' {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// In-memory stream for exercising the assembler
    struct MemoryStream {
        data: Vec<u8>,
        pos: usize,
    }

    impl MemoryStream {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                pos: 0,
            }
        }
    }

    #[async_trait]
    impl StreamAccessor for MemoryStream {
        async fn set_timeout(&mut self, _timeout: Option<Duration>) -> P1Result<()> {
            Ok(())
        }

        async fn read(&mut self, buf: &mut [u8]) -> P1Result<usize> {
            if self.pos >= self.data.len() {
                return Ok(0);
            }
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }

        fn is_closed(&self) -> bool {
            self.pos >= self.data.len()
        }

        async fn close(&mut self) -> P1Result<()> {
            Ok(())
        }
    }

    const FIXTURE: &[u8] = b"/TST5 20250807\r\n\r\n1-0:1.8.1(001234.567*kWh)\r\n!7AC7\r\n";

    #[tokio::test]
    async fn test_assemble_complete_telegram() {
        let mut stream = MemoryStream::new(FIXTURE);
        let telegram = TelegramAssembler::assemble(&mut stream, None).await.unwrap();
        assert_eq!(telegram.as_bytes(), FIXTURE);
    }

    #[tokio::test]
    async fn test_assemble_stops_at_trailer() {
        // Bytes of a following telegram must not leak into this one.
        let mut data = FIXTURE.to_vec();
        data.extend_from_slice(b"/TST5 NEXT\r\n");
        let mut stream = MemoryStream::new(&data);
        let telegram = TelegramAssembler::assemble(&mut stream, None).await.unwrap();
        assert_eq!(telegram.as_bytes(), FIXTURE);
    }

    #[tokio::test]
    async fn test_assemble_eof_mid_telegram() {
        let mut stream = MemoryStream::new(b"/TST5 20250807\r\n1-0:1.8.1(");
        let err = TelegramAssembler::assemble(&mut stream, None).await.unwrap_err();
        assert!(matches!(err, P1Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_assemble_back_to_back() {
        let mut data = FIXTURE.to_vec();
        data.extend_from_slice(FIXTURE);
        let mut stream = MemoryStream::new(&data);
        let first = TelegramAssembler::assemble(&mut stream, None).await.unwrap();
        let second = TelegramAssembler::assemble(&mut stream, None).await.unwrap();
        assert_eq!(first.as_bytes(), FIXTURE);
        assert_eq!(second.as_bytes(), FIXTURE);
    }
}
