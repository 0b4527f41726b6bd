pub mod fields;
pub mod run;
pub mod spectrum;

use summit_core::NanPolicy;

/// Parse a `--nan-policy` value; clap has already restricted the choices.
pub fn parse_nan_policy(s: &str) -> NanPolicy {
    match s.parse() {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}

/// Format a wattage with a thousands-appropriate unit.
pub fn format_watts(w: f64) -> String {
    if !w.is_finite() {
        "n/a".to_string()
    } else if w.abs() >= 1_000_000.0 {
        format!("{:.2} MW", w / 1_000_000.0)
    } else if w.abs() >= 1_000.0 {
        format!("{:.1} kW", w / 1_000.0)
    } else {
        format!("{w:.0} W")
    }
}
