use thiserror::Error;

/// Main error type for P1 pipeline operations
#[derive(Error, Debug)]
pub enum P1Error {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Frame invalid: {0}")]
    FrameInvalid(String),

    #[error("Checksum mismatch: given 0x{given:04X}, calculated 0x{calculated:04X}")]
    ChecksumMismatch { given: u16, calculated: u16 },

    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for P1 pipeline operations
pub type P1Result<T> = Result<T, P1Error>;
