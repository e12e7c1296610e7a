//! Telegram layer for the DSMR P1 protocol
//!
//! This crate reconstructs complete telegrams from the raw P1 byte stream,
//! verifies their CRC-16 trailer, decodes the OBIS-tagged data lines, and
//! normalizes the decoded readings against the registry of known
//! identifiers. Together with `p1-transport` it forms the whole pipeline
//! below the driver:
//!
//! stream -> assemble -> validate -> decode -> normalize -> ReadingSet

pub mod assembler;
pub mod checksum;
pub mod crc16;
pub mod decoder;
pub mod normalizer;
pub mod telegram;

pub use assembler::TelegramAssembler;
pub use checksum::validate;
pub use crc16::Crc16;
pub use decoder::decode;
pub use normalizer::normalize;
pub use p1_core::{P1Error, P1Result};
pub use telegram::Telegram;
