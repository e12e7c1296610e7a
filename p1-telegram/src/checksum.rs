//! Telegram checksum validation
//!
//! The trailer line of a telegram is `!` followed by four hex digits; the
//! digits are the CRC-16 of every byte from the start of the telegram up to
//! and including the `!` itself.

use crate::crc16;
use crate::telegram::Telegram;
use log::trace;
use p1_core::{P1Error, P1Result};

/// Validate the checksum trailer of a complete telegram
///
/// Every `\r\n!` boundary in the buffer is checked and validation succeeds
/// if any of them carries a matching checksum. More than one boundary only
/// occurs in pathological input; since the given digits run from the `!` to
/// the end of the buffer, only the final boundary's digits normally parse,
/// so the last match is the one that decides.
pub fn validate(telegram: &Telegram) -> P1Result<()> {
    let bytes = telegram.as_bytes();
    let mut boundary_seen = false;
    let mut last_mismatch: Option<(u16, u16)> = None;

    for i in 2..bytes.len() {
        if bytes[i] != b'!' || &bytes[i - 2..i] != b"\r\n" {
            continue;
        }
        boundary_seen = true;

        // The `!` itself is part of the checksummed text.
        let calculated = crc16::checksum(&bytes[..=i]);
        match parse_trailer_digits(&bytes[i + 1..]) {
            Some(given) if given == calculated => {
                trace!("checksum 0x{:04X} verified", given);
                return Ok(());
            }
            Some(given) => {
                last_mismatch = Some((given, calculated));
            }
            None => {}
        }
    }

    if !boundary_seen {
        Err(P1Error::FrameInvalid(
            "No checksum trailer boundary in telegram".to_string(),
        ))
    } else if let Some((given, calculated)) = last_mismatch {
        Err(P1Error::ChecksumMismatch { given, calculated })
    } else {
        Err(P1Error::FrameInvalid(
            "Checksum trailer digits are not hexadecimal".to_string(),
        ))
    }
}

/// Parse the hex digits following the `!`, tolerating the trailing CR/LF
fn parse_trailer_digits(rest: &[u8]) -> Option<u16> {
    let text = std::str::from_utf8(rest).ok()?;
    let text = text.trim_end_matches(['\r', '\n']);
    if text.is_empty() {
        return None;
    }
    u16::from_str_radix(text, 16).ok()
}
