//! Cabinet-level and system-level rollups of node rows.

use serde::Serialize;

use crate::group::{NanPolicy, Reducer, group_reduce};
use crate::metrics::NodeAggregate;
use crate::sample::Timestamp;

/// One cabinet at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CabinetAggregate {
    pub timestamp: Timestamp,
    pub cabinet: String,
    /// Sum of the cabinet's node input power, watts.
    pub input_power: f64,
    /// Mean of the cabinet's node temperature means, Celsius.
    pub node_temp_mean: f64,
    pub node_count: usize,
}

/// Total machine input power, one value per timestamp in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemPowerSeries {
    pub timestamps: Vec<Timestamp>,
    pub input_power: Vec<f64>,
}

impl SystemPowerSeries {
    pub fn len(&self) -> usize {
        self.input_power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_power.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.input_power
    }
}

/// Re-aggregate node rows by `(timestamp, cabinet)`: power summed,
/// temperature averaged, both under `policy`.
pub fn cabinet_rollup(nodes: &[NodeAggregate], policy: NanPolicy) -> Vec<CabinetAggregate> {
    group_reduce(
        nodes,
        |n| (n.timestamp, n.cabinet.as_str()),
        |key, members| {
            let (timestamp, cabinet) = *key;
            CabinetAggregate {
                timestamp,
                cabinet: cabinet.to_string(),
                input_power: Reducer::Sum(policy).apply(members.iter().map(|n| n.input_power)),
                node_temp_mean: Reducer::Mean(policy)
                    .apply(members.iter().map(|n| n.node_temp_mean)),
                node_count: members.len(),
            }
        },
    )
}

/// Sum node input power across the whole machine per timestamp.
pub fn system_power_series(nodes: &[NodeAggregate], policy: NanPolicy) -> SystemPowerSeries {
    let sum = Reducer::Sum(policy);
    let points = group_reduce(
        nodes,
        |n| n.timestamp,
        |ts, members| (*ts, sum.apply(members.iter().map(|n| n.input_power))),
    );
    let (timestamps, input_power) = points.into_iter().unzip();
    SystemPowerSeries {
        timestamps,
        input_power,
    }
}
