//! Reading filter and normalizer
//!
//! Turns the decoded identifier -> raw value map into the final reading set:
//! identifiers missing from the registry are dropped, unit suffixes are
//! stripped, and the remaining text must parse as a base-10 float.

use log::debug;
use p1_core::{P1Error, P1Result, ReadingSet, Registry};
use std::collections::BTreeMap;

/// Characters stripped from the end of a raw value: closing parenthesis,
/// unit separator and unit letters (kWh, kW, A, V).
const TRAILING_UNITS: &[char] = &[')', '*', 'k', 'W', 'h', 'A', 'V'];

/// Filter decoded values against the registry and parse them as floats
///
/// Identifiers are processed in ascending lexicographic order. Any value
/// that fails to parse after stripping aborts the whole telegram: a partial
/// reading set is never returned. Compound multi-group values are not split;
/// if one reaches a registry-matched identifier it fails the float parse,
/// which is the intended outcome.
pub fn normalize(
    decoded: &BTreeMap<String, String>,
    registry: &Registry,
) -> P1Result<ReadingSet> {
    let mut readings = ReadingSet::new();

    for (identifier, raw_value) in decoded {
        let Some(entry) = registry.lookup(identifier) else {
            debug!("dropping unregistered identifier {identifier}");
            continue;
        };

        let stripped = raw_value
            .trim_start_matches('(')
            .trim_end_matches(TRAILING_UNITS);
        let value: f64 = stripped.parse().map_err(|_| {
            P1Error::InvalidReading(format!(
                "{identifier}: {raw_value:?} is not numeric after stripping"
            ))
        })?;

        readings.insert(entry.tag.clone(), value);
    }

    Ok(readings)
}
