//! Sensor schema of a node telemetry snapshot.
//!
//! Every snapshot row carries the same fixed set of numeric columns. They are
//! modelled as a closed enum so the pipeline indexes readings by field rather
//! than by column name, and so the temperature set used for the node mean is
//! defined exactly once.
//!
//! Core 13 is absent on both sockets of every node; it is not part of the
//! schema.

use serde::{Deserialize, Serialize};

/// Number of numeric sensor columns in a snapshot row.
pub const SENSOR_COUNT: usize = 68;

/// Column holding the sample time.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Column holding the node identifier.
pub const HOSTNAME_COLUMN: &str = "hostname";

/// Length of the hostname prefix that names a cabinet.
pub const CABINET_PREFIX_LEN: usize = 3;

/// A numeric sensor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    P0Gpu0Power,
    P0Gpu1Power,
    P0Gpu2Power,
    P1Gpu0Power,
    P1Gpu1Power,
    P1Gpu2Power,
    P0Power,
    P1Power,
    Gpu0CoreTemp,
    Gpu0MemTemp,
    Gpu1CoreTemp,
    Gpu1MemTemp,
    Gpu2CoreTemp,
    Gpu2MemTemp,
    Gpu3CoreTemp,
    Gpu3MemTemp,
    Gpu4CoreTemp,
    Gpu4MemTemp,
    Gpu5CoreTemp,
    Gpu5MemTemp,
    P0Core0Temp,
    P0Core1Temp,
    P0Core2Temp,
    P0Core3Temp,
    P0Core4Temp,
    P0Core5Temp,
    P0Core6Temp,
    P0Core7Temp,
    P0Core8Temp,
    P0Core9Temp,
    P0Core10Temp,
    P0Core11Temp,
    P0Core12Temp,
    P0Core14Temp,
    P0Core15Temp,
    P0Core16Temp,
    P0Core17Temp,
    P0Core18Temp,
    P0Core19Temp,
    P0Core20Temp,
    P0Core21Temp,
    P0Core22Temp,
    P0Core23Temp,
    P1Core0Temp,
    P1Core1Temp,
    P1Core2Temp,
    P1Core3Temp,
    P1Core4Temp,
    P1Core5Temp,
    P1Core6Temp,
    P1Core7Temp,
    P1Core8Temp,
    P1Core9Temp,
    P1Core10Temp,
    P1Core11Temp,
    P1Core12Temp,
    P1Core14Temp,
    P1Core15Temp,
    P1Core16Temp,
    P1Core17Temp,
    P1Core18Temp,
    P1Core19Temp,
    P1Core20Temp,
    P1Core21Temp,
    P1Core22Temp,
    P1Core23Temp,
    Ps0InputPower,
    Ps1InputPower,
}

impl SensorField {
    /// All sensor fields in snapshot column order.
    pub const ALL: [SensorField; SENSOR_COUNT] = [
        SensorField::P0Gpu0Power,
        SensorField::P0Gpu1Power,
        SensorField::P0Gpu2Power,
        SensorField::P1Gpu0Power,
        SensorField::P1Gpu1Power,
        SensorField::P1Gpu2Power,
        SensorField::P0Power,
        SensorField::P1Power,
        SensorField::Gpu0CoreTemp,
        SensorField::Gpu0MemTemp,
        SensorField::Gpu1CoreTemp,
        SensorField::Gpu1MemTemp,
        SensorField::Gpu2CoreTemp,
        SensorField::Gpu2MemTemp,
        SensorField::Gpu3CoreTemp,
        SensorField::Gpu3MemTemp,
        SensorField::Gpu4CoreTemp,
        SensorField::Gpu4MemTemp,
        SensorField::Gpu5CoreTemp,
        SensorField::Gpu5MemTemp,
        SensorField::P0Core0Temp,
        SensorField::P0Core1Temp,
        SensorField::P0Core2Temp,
        SensorField::P0Core3Temp,
        SensorField::P0Core4Temp,
        SensorField::P0Core5Temp,
        SensorField::P0Core6Temp,
        SensorField::P0Core7Temp,
        SensorField::P0Core8Temp,
        SensorField::P0Core9Temp,
        SensorField::P0Core10Temp,
        SensorField::P0Core11Temp,
        SensorField::P0Core12Temp,
        SensorField::P0Core14Temp,
        SensorField::P0Core15Temp,
        SensorField::P0Core16Temp,
        SensorField::P0Core17Temp,
        SensorField::P0Core18Temp,
        SensorField::P0Core19Temp,
        SensorField::P0Core20Temp,
        SensorField::P0Core21Temp,
        SensorField::P0Core22Temp,
        SensorField::P0Core23Temp,
        SensorField::P1Core0Temp,
        SensorField::P1Core1Temp,
        SensorField::P1Core2Temp,
        SensorField::P1Core3Temp,
        SensorField::P1Core4Temp,
        SensorField::P1Core5Temp,
        SensorField::P1Core6Temp,
        SensorField::P1Core7Temp,
        SensorField::P1Core8Temp,
        SensorField::P1Core9Temp,
        SensorField::P1Core10Temp,
        SensorField::P1Core11Temp,
        SensorField::P1Core12Temp,
        SensorField::P1Core14Temp,
        SensorField::P1Core15Temp,
        SensorField::P1Core16Temp,
        SensorField::P1Core17Temp,
        SensorField::P1Core18Temp,
        SensorField::P1Core19Temp,
        SensorField::P1Core20Temp,
        SensorField::P1Core21Temp,
        SensorField::P1Core22Temp,
        SensorField::P1Core23Temp,
        SensorField::Ps0InputPower,
        SensorField::Ps1InputPower,
    ];

    /// Position of this field in a reading array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name as it appears in the snapshot.
    pub fn name(self) -> &'static str {
        match self {
            SensorField::P0Gpu0Power => "p0_gpu0_power",
            SensorField::P0Gpu1Power => "p0_gpu1_power",
            SensorField::P0Gpu2Power => "p0_gpu2_power",
            SensorField::P1Gpu0Power => "p1_gpu0_power",
            SensorField::P1Gpu1Power => "p1_gpu1_power",
            SensorField::P1Gpu2Power => "p1_gpu2_power",
            SensorField::P0Power => "p0_power",
            SensorField::P1Power => "p1_power",
            SensorField::Gpu0CoreTemp => "gpu0_core_temp",
            SensorField::Gpu0MemTemp => "gpu0_mem_temp",
            SensorField::Gpu1CoreTemp => "gpu1_core_temp",
            SensorField::Gpu1MemTemp => "gpu1_mem_temp",
            SensorField::Gpu2CoreTemp => "gpu2_core_temp",
            SensorField::Gpu2MemTemp => "gpu2_mem_temp",
            SensorField::Gpu3CoreTemp => "gpu3_core_temp",
            SensorField::Gpu3MemTemp => "gpu3_mem_temp",
            SensorField::Gpu4CoreTemp => "gpu4_core_temp",
            SensorField::Gpu4MemTemp => "gpu4_mem_temp",
            SensorField::Gpu5CoreTemp => "gpu5_core_temp",
            SensorField::Gpu5MemTemp => "gpu5_mem_temp",
            SensorField::P0Core0Temp => "p0_core0_temp",
            SensorField::P0Core1Temp => "p0_core1_temp",
            SensorField::P0Core2Temp => "p0_core2_temp",
            SensorField::P0Core3Temp => "p0_core3_temp",
            SensorField::P0Core4Temp => "p0_core4_temp",
            SensorField::P0Core5Temp => "p0_core5_temp",
            SensorField::P0Core6Temp => "p0_core6_temp",
            SensorField::P0Core7Temp => "p0_core7_temp",
            SensorField::P0Core8Temp => "p0_core8_temp",
            SensorField::P0Core9Temp => "p0_core9_temp",
            SensorField::P0Core10Temp => "p0_core10_temp",
            SensorField::P0Core11Temp => "p0_core11_temp",
            SensorField::P0Core12Temp => "p0_core12_temp",
            SensorField::P0Core14Temp => "p0_core14_temp",
            SensorField::P0Core15Temp => "p0_core15_temp",
            SensorField::P0Core16Temp => "p0_core16_temp",
            SensorField::P0Core17Temp => "p0_core17_temp",
            SensorField::P0Core18Temp => "p0_core18_temp",
            SensorField::P0Core19Temp => "p0_core19_temp",
            SensorField::P0Core20Temp => "p0_core20_temp",
            SensorField::P0Core21Temp => "p0_core21_temp",
            SensorField::P0Core22Temp => "p0_core22_temp",
            SensorField::P0Core23Temp => "p0_core23_temp",
            SensorField::P1Core0Temp => "p1_core0_temp",
            SensorField::P1Core1Temp => "p1_core1_temp",
            SensorField::P1Core2Temp => "p1_core2_temp",
            SensorField::P1Core3Temp => "p1_core3_temp",
            SensorField::P1Core4Temp => "p1_core4_temp",
            SensorField::P1Core5Temp => "p1_core5_temp",
            SensorField::P1Core6Temp => "p1_core6_temp",
            SensorField::P1Core7Temp => "p1_core7_temp",
            SensorField::P1Core8Temp => "p1_core8_temp",
            SensorField::P1Core9Temp => "p1_core9_temp",
            SensorField::P1Core10Temp => "p1_core10_temp",
            SensorField::P1Core11Temp => "p1_core11_temp",
            SensorField::P1Core12Temp => "p1_core12_temp",
            SensorField::P1Core14Temp => "p1_core14_temp",
            SensorField::P1Core15Temp => "p1_core15_temp",
            SensorField::P1Core16Temp => "p1_core16_temp",
            SensorField::P1Core17Temp => "p1_core17_temp",
            SensorField::P1Core18Temp => "p1_core18_temp",
            SensorField::P1Core19Temp => "p1_core19_temp",
            SensorField::P1Core20Temp => "p1_core20_temp",
            SensorField::P1Core21Temp => "p1_core21_temp",
            SensorField::P1Core22Temp => "p1_core22_temp",
            SensorField::P1Core23Temp => "p1_core23_temp",
            SensorField::Ps0InputPower => "ps0_input_power",
            SensorField::Ps1InputPower => "ps1_input_power",
        }
    }

    /// Look up a field by its column name.
    pub fn from_name(name: &str) -> Option<SensorField> {
        SensorField::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Physical unit of the reading.
    pub fn unit(self) -> &'static str {
        if self.is_temperature() { "celsius" } else { "watts" }
    }

    /// Whether this field participates in the node temperature mean.
    pub fn is_temperature(self) -> bool {
        TEMPERATURE_FIELDS.contains(&self)
    }
}

impl std::fmt::Display for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The two power-supply rails summed into a node's input power.
pub const INPUT_POWER_FIELDS: [SensorField; 2] =
    [SensorField::Ps0InputPower, SensorField::Ps1InputPower];

/// Temperature sensors averaged into `node_temp_mean`: GPU core temps, GPU
/// memory temps, then socket 0 and socket 1 core temps.
pub const TEMPERATURE_FIELDS: [SensorField; 58] = [
    SensorField::Gpu0CoreTemp,
    SensorField::Gpu1CoreTemp,
    SensorField::Gpu2CoreTemp,
    SensorField::Gpu3CoreTemp,
    SensorField::Gpu4CoreTemp,
    SensorField::Gpu5CoreTemp,
    SensorField::Gpu0MemTemp,
    SensorField::Gpu1MemTemp,
    SensorField::Gpu2MemTemp,
    SensorField::Gpu3MemTemp,
    SensorField::Gpu4MemTemp,
    SensorField::Gpu5MemTemp,
    SensorField::P0Core0Temp,
    SensorField::P0Core1Temp,
    SensorField::P0Core2Temp,
    SensorField::P0Core3Temp,
    SensorField::P0Core4Temp,
    SensorField::P0Core5Temp,
    SensorField::P0Core6Temp,
    SensorField::P0Core7Temp,
    SensorField::P0Core8Temp,
    SensorField::P0Core9Temp,
    SensorField::P0Core10Temp,
    SensorField::P0Core11Temp,
    SensorField::P0Core12Temp,
    SensorField::P0Core14Temp,
    SensorField::P0Core15Temp,
    SensorField::P0Core16Temp,
    SensorField::P0Core17Temp,
    SensorField::P0Core18Temp,
    SensorField::P0Core19Temp,
    SensorField::P0Core20Temp,
    SensorField::P0Core21Temp,
    SensorField::P0Core22Temp,
    SensorField::P0Core23Temp,
    SensorField::P1Core0Temp,
    SensorField::P1Core1Temp,
    SensorField::P1Core2Temp,
    SensorField::P1Core3Temp,
    SensorField::P1Core4Temp,
    SensorField::P1Core5Temp,
    SensorField::P1Core6Temp,
    SensorField::P1Core7Temp,
    SensorField::P1Core8Temp,
    SensorField::P1Core9Temp,
    SensorField::P1Core10Temp,
    SensorField::P1Core11Temp,
    SensorField::P1Core12Temp,
    SensorField::P1Core14Temp,
    SensorField::P1Core15Temp,
    SensorField::P1Core16Temp,
    SensorField::P1Core17Temp,
    SensorField::P1Core18Temp,
    SensorField::P1Core19Temp,
    SensorField::P1Core20Temp,
    SensorField::P1Core21Temp,
    SensorField::P1Core22Temp,
    SensorField::P1Core23Temp,
];
