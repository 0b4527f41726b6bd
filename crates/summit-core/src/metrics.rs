//! Per-node derived metrics: input power, mean temperature, cabinet.

use serde::Serialize;

use crate::group::{NanPolicy, Reducer};
use crate::sample::{Readings, TelemetrySample, Timestamp};
use crate::schema::{CABINET_PREFIX_LEN, INPUT_POWER_FIELDS, TEMPERATURE_FIELDS};

/// One cleaned node row with its derived scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAggregate {
    pub timestamp: Timestamp,
    pub hostname: String,
    pub cabinet: String,
    /// Watts drawn through both power-supply rails.
    pub input_power: f64,
    /// Mean over the 58 temperature sensors, Celsius.
    pub node_temp_mean: f64,
}

impl NodeAggregate {
    pub fn derive(sample: &TelemetrySample, policy: NanPolicy) -> Self {
        NodeAggregate {
            timestamp: sample.timestamp,
            cabinet: cabinet_of(&sample.hostname).to_string(),
            hostname: sample.hostname.clone(),
            input_power: input_power(&sample.readings),
            node_temp_mean: node_temp_mean(&sample.readings, policy),
        }
    }
}

/// Cabinet identifier: the first three characters of the hostname.
pub fn cabinet_of(hostname: &str) -> &str {
    match hostname.char_indices().nth(CABINET_PREFIX_LEN) {
        Some((end, _)) => &hostname[..end],
        None => hostname,
    }
}

/// Sum of the two power-supply input rails.
pub fn input_power(readings: &Readings) -> f64 {
    INPUT_POWER_FIELDS.iter().map(|&f| readings.get(f)).sum()
}

/// Mean over [`TEMPERATURE_FIELDS`] under `policy`.
pub fn node_temp_mean(readings: &Readings, policy: NanPolicy) -> f64 {
    Reducer::Mean(policy).apply(TEMPERATURE_FIELDS.iter().map(|&f| readings.get(f)))
}

/// Derive every node row of a cleaned dataset.
pub fn derive_nodes(samples: &[TelemetrySample], policy: NanPolicy) -> Vec<NodeAggregate> {
    samples
        .iter()
        .map(|s| NodeAggregate::derive(s, policy))
        .collect()
}
