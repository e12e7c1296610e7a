//! Telegram buffer type

use bytes::Bytes;

/// One complete protocol message from the meter
///
/// Holds exactly the bytes received from the start of listening through the
/// trailer line's CR/LF, inclusive. The buffer is immutable; the validator
/// and decoder only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram {
    bytes: Bytes,
}

impl Telegram {
    /// Wrap a complete telegram buffer
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// The raw telegram bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total size in bytes, trailer included
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate the physical lines of the telegram
    ///
    /// Lines are split on CR/LF; the terminator is not included in the
    /// yielded slices. A trailing fragment without a terminator is yielded
    /// as-is.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter(|line| !line.is_empty())
    }
}

impl From<Bytes> for Telegram {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Telegram {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(Bytes::from(bytes))
    }
}
