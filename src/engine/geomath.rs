// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance between GPS coordinates.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// A GPS coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Haversine great-circle distance between two coordinates, in meters.
///
/// Used for positional sanity checks on sample streams; the timing
/// algorithm itself only consumes the cumulative distance stream.
pub fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
    let p1 = Point::new(a.lng, a.lat);
    let p2 = Point::new(b.lng, b.lat);
    Haversine.distance(p1, p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_same_point() {
        let p = LatLng {
            lat: 37.4419,
            lng: -122.143,
        };
        assert_eq!(haversine_meters(p, p), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Roughly 111 km per degree of latitude at the equator
        let a = LatLng { lat: 0.0, lng: 0.0 };
        let b = LatLng { lat: 1.0, lng: 0.0 };
        let d = haversine_meters(a, b);
        assert!((d - 111_195.0).abs() < 500.0, "got {}", d);
    }

    #[test]
    fn test_symmetric() {
        let a = LatLng {
            lat: 37.3861,
            lng: -122.0839,
        };
        let b = LatLng {
            lat: 37.4419,
            lng: -122.143,
        };
        assert_eq!(haversine_meters(a, b), haversine_meters(b, a));
    }
}
