//! `summit fields`: list the sensor columns of a snapshot.

use summit_core::schema::{HOSTNAME_COLUMN, TIMESTAMP_COLUMN};
use summit_core::{INPUT_POWER_FIELDS, SensorField, TEMPERATURE_FIELDS};

pub fn run(temperature_only: bool) {
    if temperature_only {
        println!("{} temperature sensors (averaged into node_temp_mean):", TEMPERATURE_FIELDS.len());
        for field in TEMPERATURE_FIELDS {
            println!("  {:<24} {}", field.name(), field.unit());
        }
        return;
    }

    println!("Key columns: {TIMESTAMP_COLUMN}, {HOSTNAME_COLUMN}");
    println!();
    println!("{}", table_row("Column", "Unit", "Role"));
    println!("{}", "-".repeat(52));
    for field in SensorField::ALL {
        let role = if INPUT_POWER_FIELDS.contains(&field) {
            "input_power"
        } else if field.is_temperature() {
            "node_temp_mean"
        } else {
            ""
        };
        println!("{}", table_row(field.name(), field.unit(), role));
    }
    println!();
    println!("{} sensor columns", SensorField::ALL.len());
}

fn table_row(column: &str, unit: &str, role: &str) -> String {
    format!("{column:<24} {unit:<8} {role}").trim_end().to_string()
}
