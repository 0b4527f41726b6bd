//! Snapshot cleaning: exact-duplicate removal and per-node averaging.
//!
//! Down-sampling the 1 Hz feed to 1-minute resolution leaves several rows
//! for the same `(timestamp, hostname)`, some of them byte-for-byte copies.
//! Copies are dropped first, then the remaining rows of each key are averaged
//! field by field.

use std::collections::HashSet;

use log::debug;

use crate::group::{NanPolicy, Reducer, group_reduce};
use crate::sample::{Readings, TelemetrySample};
use crate::schema::SensorField;

/// Remove rows identical in every field, returning the survivors in
/// canonical `(timestamp, hostname, readings)` order.
///
/// Readings are compared by bit pattern, so two `NaN` cells are equal;
/// `0.0` and `-0.0` are equal too. Rows are sorted before comparison, so the
/// surviving copy does not depend on input order.
pub fn deduplicate(samples: &[TelemetrySample]) -> Vec<TelemetrySample> {
    let mut sorted: Vec<&TelemetrySample> = samples.iter().collect();
    sorted.sort_by(|a, b| a.canonical_cmp(b));

    let mut seen = HashSet::with_capacity(sorted.len());
    let mut unique = Vec::with_capacity(sorted.len());
    for s in sorted {
        let (timestamp, hostname) = s.node_key();
        if seen.insert((timestamp, hostname, s.readings.bit_key())) {
            unique.push(s.clone());
        }
    }
    debug!(
        "dedup: {} rows in, {} unique ({} exact duplicates)",
        samples.len(),
        unique.len(),
        samples.len() - unique.len()
    );
    unique
}

/// Average every sensor field over rows sharing `(timestamp, hostname)`.
///
/// Expects the canonical order produced by [`deduplicate`]; under that order
/// the result does not depend on how the raw rows were arranged.
pub fn average_by_node(samples: &[TelemetrySample], policy: NanPolicy) -> Vec<TelemetrySample> {
    let mean = Reducer::Mean(policy);
    group_reduce(
        samples,
        TelemetrySample::node_key,
        |key, members| {
            let (timestamp, hostname) = *key;
            if let [only] = members {
                return (*only).clone();
            }
            let mut readings = Readings::missing();
            for field in SensorField::ALL {
                readings.set(field, mean.apply(members.iter().map(|m| m.readings.get(field))));
            }
            TelemetrySample::new(timestamp, hostname, readings)
        },
    )
}

/// Deduplicate then average: one row per `(timestamp, hostname)`.
pub fn aggregate_nodes(samples: &[TelemetrySample], policy: NanPolicy) -> Vec<TelemetrySample> {
    let unique = deduplicate(samples);
    let nodes = average_by_node(&unique, policy);
    debug!("aggregate: {} node rows", nodes.len());
    nodes
}
