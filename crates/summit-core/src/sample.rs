//! Raw telemetry rows and their timestamps.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{SENSOR_COUNT, SensorField};

/// Sample time as UTC seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Parse a snapshot timestamp cell.
    ///
    /// Accepts integer epoch seconds, RFC 3339, or `YYYY-MM-DD HH:MM:SS`
    /// (optionally with a `T` separator and fractional seconds) interpreted
    /// as UTC. Fractions are truncated to whole seconds.
    pub fn parse(raw: &str) -> Option<Timestamp> {
        let raw = raw.trim();
        if let Ok(secs) = raw.parse::<i64>() {
            return Some(Timestamp(secs));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Timestamp(dt.timestamp()));
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Timestamp(naive.and_utc().timestamp()))
    }

    pub fn secs(self) -> i64 {
        self.0
    }

    /// RFC 3339 rendering, falling back to raw seconds when out of range.
    pub fn to_rfc3339(self) -> String {
        DateTime::<Utc>::from_timestamp(self.0, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Fixed-width sensor readings indexed by [`SensorField`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings(#[serde(with = "readings_serde")] [f64; SENSOR_COUNT]);

impl Readings {
    /// Every reading set to `NaN`.
    pub fn missing() -> Self {
        Readings([f64::NAN; SENSOR_COUNT])
    }

    pub fn filled(value: f64) -> Self {
        Readings([value; SENSOR_COUNT])
    }

    pub fn get(&self, field: SensorField) -> f64 {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: SensorField, value: f64) {
        self.0[field.index()] = value;
    }

    /// Builder-style [`Readings::set`].
    pub fn with(mut self, field: SensorField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Bit patterns of every reading; equal bit patterns mean identical cells,
    /// including two `NaN`s. `-0.0` is keyed as `0.0`.
    pub fn bit_key(&self) -> [u64; SENSOR_COUNT] {
        self.0.map(|v| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
    }

    /// Lexicographic total order over the readings.
    pub fn total_cmp(&self, other: &Readings) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

mod readings_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::schema::SENSOR_COUNT;

    pub fn serialize<S: Serializer>(values: &[f64; SENSOR_COUNT], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(values.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[f64; SENSOR_COUNT], D::Error> {
        let values = Vec::<f64>::deserialize(d)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"one value per sensor field"))
    }
}

/// One raw observation of a node at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: Timestamp,
    pub hostname: String,
    pub readings: Readings,
}

impl TelemetrySample {
    pub fn new(timestamp: Timestamp, hostname: impl Into<String>, readings: Readings) -> Self {
        Self {
            timestamp,
            hostname: hostname.into(),
            readings,
        }
    }

    /// Grouping key after cleaning.
    pub fn node_key(&self) -> (Timestamp, &str) {
        (self.timestamp, self.hostname.as_str())
    }

    /// Canonical order: key first, then readings.
    pub fn canonical_cmp(&self, other: &TelemetrySample) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.hostname.cmp(&other.hostname))
            .then_with(|| self.readings.total_cmp(&other.readings))
    }
}
