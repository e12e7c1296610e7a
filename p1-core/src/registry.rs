use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One registry entry: the export tag and a human description of a reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub tag: String,
    pub description: String,
}

/// The OBIS identifiers this system understands and forwards
///
/// Identifiers are matched as raw text; no numeric normalization of the
/// address is performed. Note the `1-0:72:32.0` entry, which uses a colon
/// where its L1/L2 siblings use a dot — meters emit it that way, so the
/// table preserves it.
static KNOWN_READINGS: Lazy<HashMap<&'static str, RegistryEntry>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|&(identifier, tag, description)| {
            (
                identifier,
                RegistryEntry {
                    tag: tag.to_string(),
                    description: description.to_string(),
                },
            )
        })
        .collect()
});

#[rustfmt::skip]
static TABLE: &[(&str, &str, &str)] = &[
    ("1-0:1.8.1",    "electricity_used_tariff1",      "Meter Reading electricity delivered to client (Tariff 1) in kWh"),
    ("1-0:1.8.2",    "electricity_used_tariff2",      "Meter Reading electricity delivered to client (Tariff 2) in kWh"),
    ("1-0:2.8.1",    "electricity_delivered_tariff1", "Meter Reading electricity delivered by client (Tariff 1) in kWh"),
    ("1-0:2.8.2",    "electricity_delivered_tariff2", "Meter Reading electricity delivered by client (Tariff 2) in kWh"),
    ("0-0:96.14.0",  "active_tariff",                 "Tariff indicator electricity"),
    ("1-0:1.7.0",    "current_electricity_usage",     "Actual electricity power delivered (+P) in kW"),
    ("1-0:2.7.0",    "current_electricity_delivery",  "Actual electricity power received (-P) in kW"),
    ("0-0:17.0.0",   "threshold",                     "The actual threshold electricity in kW"),
    ("0-0:96.3.10",  "switch_position",               "Switch position electricity"),
    ("0-0:96.7.21",  "short_failure_count",           "Number of power failures in any phase"),
    ("0-0:96.7.9",   "long_failure_count",            "Number of long power failures in any phase"),
    ("1-0:32.32.0",  "voltage_sag_l1_count",          "Number of voltage sags in phase L1"),
    ("1-0:52.32.0",  "voltage_sag_l2_count",          "Number of voltage sags in phase L2"),
    ("1-0:72:32.0",  "voltage_sag_l3_count",          "Number of voltage sags in phase L3"),
    ("1-0:32.36.0",  "voltage_swell_l1_count",        "Number of voltage swells in phase L1"),
    ("1-0:52.36.0",  "voltage_swell_l2_count",        "Number of voltage swells in phase L2"),
    ("1-0:72.36.0",  "voltage_swell_l3_count",        "Number of voltage swells in phase L3"),
    ("1-0:32.7.0",   "voltage_l1",                    "Instantaneous voltage L1 in V"),
    ("1-0:52.7.0",   "voltage_l2",                    "Instantaneous voltage L2 in V"),
    ("1-0:72.7.0",   "voltage_l3",                    "Instantaneous voltage L3 in V"),
    ("1-0:31.7.0",   "current_l1",                    "Instantaneous current L1 in A"),
    ("1-0:51.7.0",   "current_l2",                    "Instantaneous current L2 in A"),
    ("1-0:71.7.0",   "current_l3",                    "Instantaneous current L3 in A"),
    ("1-0:21.7.0",   "active_positive_l1",            "Instantaneous active power L1 (+P) in kW"),
    ("1-0:41.7.0",   "active_positive_l2",            "Instantaneous active power L2 (+P) in kW"),
    ("1-0:61.7.0",   "active_positive_l3",            "Instantaneous active power L3 (+P) in kW"),
    ("1-0:22.7.0",   "active_negative_l1",            "Instantaneous active power L1 (-P) in kW"),
    ("1-0:42.7.0",   "active_negative_l2",            "Instantaneous active power L2 (-P) in kW"),
    ("1-0:62.7.0",   "active_negative_l3",            "Instantaneous active power L3 (-P) in kW"),
];

/// Static mapping from OBIS identifier to registry entry
///
/// Constructed once at startup and handed by reference to the normalizer;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<&'static str, RegistryEntry>,
}

impl Registry {
    /// Create the standard registry of known readings
    pub fn standard() -> Self {
        Self {
            entries: KNOWN_READINGS.clone(),
        }
    }

    /// Look up an identifier, returning its entry if known
    pub fn lookup(&self, identifier: &str) -> Option<&RegistryEntry> {
        self.entries.get(identifier)
    }

    /// Number of known identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
