//! Telegram field decoder
//!
//! Splits a validated telegram into physical lines and extracts the
//! (identifier, raw value) pair from every data line. Data lines start with
//! a decimal digit; the identifier runs up to the first `(` and the raw
//! value is everything from that `(` to the end of the line, parentheses
//! retained.

use crate::telegram::Telegram;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// A data line: OBIS-style identifier immediately followed by one or more
/// parenthesized value groups.
static DATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9][^(]*)(\(.*\))$").expect("data line pattern"));

/// Decode the data lines of a telegram into an identifier -> raw value map
///
/// Header lines, blank lines and the trailer line are ignored. A duplicated
/// identifier keeps its last value. Digit-leading lines with no parenthesis
/// group, or with an unterminated group, are skipped rather than failing the
/// telegram: the surrounding readings are still usable.
pub fn decode(telegram: &Telegram) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for line in telegram.lines() {
        if !line.first().is_some_and(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(text) = std::str::from_utf8(line) else {
            debug!("skipping non-ASCII data line");
            continue;
        };
        match DATA_LINE.captures(text) {
            Some(captures) => {
                values.insert(captures[1].to_string(), captures[2].to_string());
            }
            None => debug!("skipping malformed data line: {text}"),
        }
    }

    values
}
