//! Formatting helpers shared by status providers

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{
    StatusError,
    StatusResult,
};
use crate::types::ResourceUnit;

const BINARY_SUFFIXES: [&str; 8] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)([A-Za-z]*)$")
        .expect("Invalid regex pattern")
});

/// Render a quota amount in its resource unit for display
pub fn human_readable_unit(unit: ResourceUnit, value: i64) -> String {
    match unit {
        ResourceUnit::Bytes => natural_size(value),
        ResourceUnit::Milliseconds => natural_duration(value),
    }
}

/// Binary size such as `"1.5 GiB"`
pub fn natural_size(bytes: i64) -> String {
    let base = 1024_f64;
    let value = bytes as f64;
    let magnitude = value.abs();

    if bytes.unsigned_abs() == 1 {
        return format!("{} Byte", bytes);
    }
    if magnitude < base {
        return format!("{} Bytes", bytes);
    }

    for (i, suffix) in BINARY_SUFFIXES.iter().enumerate() {
        let unit = base.powi(i as i32 + 2);
        if magnitude < unit {
            return format!("{:.1} {}", base * value / unit, suffix);
        }
    }

    let unit = base.powi(BINARY_SUFFIXES.len() as i32 + 1);
    format!("{:.1} {}", base * value / unit, BINARY_SUFFIXES[BINARY_SUFFIXES.len() - 1])
}

/// Duration such as `"26h 3m 7s"`; leading zero components are dropped
pub fn natural_duration(milliseconds: i64) -> String {
    let total_seconds = milliseconds.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Usage as a percentage of the limit, empty when there is no limit.
///
/// Halves round to the even neighbour, so 12.5% renders as `"12%"`.
pub fn usage_percentage(used: i64, limit: i64) -> String {
    if limit == 0 {
        return String::new();
    }
    format!("{}%", (used as f64 / limit as f64 * 100.0).round_ties_even() as i64)
}

/// Convert a Kubernetes memory quantity (`"16Gi"`, `"512M"`, `"1e3"`) to bytes
pub fn kubernetes_memory_to_bytes(quantity: &str) -> StatusResult<u64> {
    let captures = QUANTITY_PATTERN
        .captures(quantity.trim())
        .ok_or_else(|| StatusError::ParseError(format!("Invalid memory quantity: {}", quantity)))?;

    let number: f64 = captures[1]
        .parse()
        .map_err(|_| StatusError::ParseError(format!("Invalid memory quantity: {}", quantity)))?;

    let multiplier = match &captures[2] {
        "" => 1.0,
        "m" => 0.001,
        "k" | "K" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        "P" => 1e15,
        "E" => 1e18,
        "Ki" => 1024_f64,
        "Mi" => 1024_f64.powi(2),
        "Gi" => 1024_f64.powi(3),
        "Ti" => 1024_f64.powi(4),
        "Pi" => 1024_f64.powi(5),
        "Ei" => 1024_f64.powi(6),
        suffix => {
            return Err(StatusError::ParseError(format!(
                "Unknown memory suffix `{}` in {}",
                suffix, quantity
            )))
        }
    };

    Ok((number * multiplier).round() as u64)
}
