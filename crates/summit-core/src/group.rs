//! Keyed grouping and per-field reduction.
//!
//! Every aggregation stage of the pipeline is "group rows by some key, then
//! fold each group into one output row". [`group_reduce`] captures that shape
//! with a key-extraction closure and a reduction closure; [`Reducer`] and
//! [`NanPolicy`] provide the numeric folds the reductions use.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How `NaN` inputs are treated by [`Reducer`] folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// Any `NaN` input makes the result `NaN`.
    #[default]
    Propagate,
    /// `NaN` inputs are ignored. A mean with nothing left is `NaN`, a sum
    /// with nothing left is `0.0`.
    Skip,
}

impl fmt::Display for NanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NanPolicy::Propagate => f.write_str("propagate"),
            NanPolicy::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for NanPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" => Ok(NanPolicy::Propagate),
            "skip" => Ok(NanPolicy::Skip),
            _ => Err(ConfigError::NanPolicy(s.to_string())),
        }
    }
}

/// A numeric fold over one column of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum(NanPolicy),
    Mean(NanPolicy),
}

impl Reducer {
    /// Fold `values` in iteration order.
    ///
    /// `Sum` of no input is `0.0`; `Mean` of no input is `NaN`.
    pub fn apply<I>(self, values: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        match self {
            Reducer::Sum(NanPolicy::Propagate) => values.into_iter().sum(),
            Reducer::Sum(NanPolicy::Skip) => values.into_iter().filter(|v| !v.is_nan()).sum(),
            Reducer::Mean(policy) => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for v in values {
                    if v.is_nan() && policy == NanPolicy::Skip {
                        continue;
                    }
                    sum += v;
                    count += 1;
                }
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            }
        }
    }
}

/// Group `rows` by `key` and fold each group with `reduce`.
///
/// Groups are emitted in ascending key order. Within a group, rows keep the
/// order they had in `rows`, so callers that need order-independent floating
/// point results should sort `rows` canonically first. Every group passed to
/// `reduce` is non-empty.
pub fn group_reduce<'a, R, K, O, KF, RF>(rows: &'a [R], key: KF, mut reduce: RF) -> Vec<O>
where
    K: Ord,
    KF: Fn(&'a R) -> K,
    RF: FnMut(&K, &[&'a R]) -> O,
{
    let mut groups: BTreeMap<K, Vec<&'a R>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
        .iter()
        .map(|(k, members)| reduce(k, members.as_slice()))
        .collect()
}
