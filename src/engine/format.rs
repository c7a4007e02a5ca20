// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for durations, distances, and paces.
//!
//! All comparisons elsewhere in the engine stay in SI units; these helpers
//! only produce strings for presentation, in the caller-selected unit
//! system.

use std::str::FromStr;

pub const METERS_PER_KILOMETER: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.344;

/// Display unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(format!("unknown unit system: {}", other)),
        }
    }
}

/// Format elapsed seconds as `H:MM:SS`, or `M:SS` under an hour.
/// Fractional seconds are floored.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a distance in meters as kilometers or miles.
pub fn format_distance(meters: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.2} km", meters / METERS_PER_KILOMETER),
        UnitSystem::Imperial => format!("{:.2} mi", meters / METERS_PER_MILE),
    }
}

/// Format a pace given in seconds per kilometer as `M:SS /km` or
/// `M:SS /mi`. Minutes and seconds are floored.
pub fn format_pace(seconds_per_km: f64, units: UnitSystem) -> String {
    let (seconds_per_unit, suffix) = match units {
        UnitSystem::Metric => (seconds_per_km, "/km"),
        UnitSystem::Imperial => (seconds_per_km * METERS_PER_MILE / METERS_PER_KILOMETER, "/mi"),
    };

    let total = seconds_per_unit.max(0.0).floor() as u64;
    format!("{}:{:02} {}", total / 60, total % 60, suffix)
}

/// Format a speed in meters per second as a pace string.
/// Non-positive speeds have no meaningful pace.
pub fn pace_from_speed(meters_per_second: f64, units: UnitSystem) -> String {
    if meters_per_second <= 0.0 || !meters_per_second.is_finite() {
        return "-:--".to_string();
    }
    format_pace(METERS_PER_KILOMETER / meters_per_second, units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_under_an_hour() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(754.0), "12:34");
    }

    #[test]
    fn test_format_duration_over_an_hour() {
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(36_061.0), "10:01:01");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(5000.0, UnitSystem::Metric), "5.00 km");
        assert_eq!(format_distance(1609.344, UnitSystem::Imperial), "1.00 mi");
    }

    #[test]
    fn test_format_pace_metric() {
        // 270 s/km -> 4:30 /km
        assert_eq!(format_pace(270.0, UnitSystem::Metric), "4:30 /km");
    }

    #[test]
    fn test_format_pace_imperial_converts() {
        // 270 s/km is ~434.5 s/mi -> floored to 7:14 /mi
        assert_eq!(format_pace(270.0, UnitSystem::Imperial), "7:14 /mi");
    }

    #[test]
    fn test_pace_from_speed() {
        // 10 km/h = 2.7778 m/s -> 6:00 /km
        assert_eq!(pace_from_speed(1000.0 / 360.0, UnitSystem::Metric), "6:00 /km");
        assert_eq!(pace_from_speed(0.0, UnitSystem::Metric), "-:--");
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("nautical".parse::<UnitSystem>().is_err());
    }
}
