// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort segment and personal-record models.

use crate::engine::format::METERS_PER_KILOMETER;
use crate::engine::geomath::LatLng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fastest contiguous portion of one activity covering at least a
/// target distance. Produced once per (activity, target distance) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestEffortSegment {
    /// Target distance label (e.g., "5K")
    pub distance_label: String,
    /// Target distance in meters
    pub target_meters: f64,
    /// Index of the first sample in the window
    pub start_index: usize,
    /// Index of the last sample in the window
    pub end_index: usize,
    /// Elapsed seconds at the window start
    pub start_time_seconds: f64,
    /// Elapsed seconds at the window end
    pub end_time_seconds: f64,
    /// Window duration in seconds (end - start)
    pub duration_seconds: f64,
    /// Cumulative meters at the window start
    pub start_distance_meters: f64,
    /// Cumulative meters at the window end
    pub end_distance_meters: f64,
    /// Position at the window start, if the sample had a GPS fix
    pub start_position: Option<LatLng>,
    /// Position at the window end, if the sample had a GPS fix
    pub end_position: Option<LatLng>,
}

impl BestEffortSegment {
    /// Derived pace in seconds per kilometer. Display-only; ranking and
    /// progression always compare raw durations.
    pub fn pace_seconds_per_km(&self) -> f64 {
        self.duration_seconds / self.target_meters * METERS_PER_KILOMETER
    }
}

/// A best-effort segment enriched with activity metadata, stored in
/// Firestore keyed by `{activity_id}_{distance label}` and eligible for
/// ranking and progression views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalBestRecord {
    /// Strava activity ID
    pub activity_id: u64,
    /// Strava athlete ID (owner)
    pub athlete_id: u64,
    /// Activity name/title
    pub activity_name: String,
    /// Activity start date
    pub start_date: DateTime<Utc>,
    /// Full-run distance in meters
    pub activity_distance_meters: f64,
    /// Full-run moving time in seconds
    pub activity_duration_seconds: f64,
    /// The extracted segment; fields are stored flattened so queries can
    /// filter on `distance_label` directly
    #[serde(flatten)]
    pub segment: BestEffortSegment,
    /// Optional passthrough fields (heart rate, cadence, elevation gain,
    /// power, ...) carried through unmodified for presentation
    #[serde(default)]
    pub extras: HashMap<String, serde_json::Value>,
}

/// One step of a personal-record progression. The rank is the entry's
/// 1-based position within the progression, not its rank by time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub record: PersonalBestRecord,
}
