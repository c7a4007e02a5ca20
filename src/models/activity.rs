// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID (also used as document ID)
    pub strava_activity_id: u64,
    /// Strava athlete ID (owner)
    pub athlete_id: u64,
    /// Activity name/title
    pub name: String,
    /// Sport type (Run, TrailRun, etc.)
    pub sport_type: String,
    /// Start date/time
    pub start_date: DateTime<Utc>,
    /// Full-run distance in meters
    pub distance_meters: f64,
    /// Full-run moving time in seconds
    pub moving_time_seconds: f64,
    /// Labels of the target distances this activity set a best effort for
    pub best_effort_labels: Vec<String>,
    /// Device name (e.g. "Garmin Forerunner 255")
    pub device_name: Option<String>,
    /// When this activity was processed
    pub processed_at: DateTime<Utc>,
}
