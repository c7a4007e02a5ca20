// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity processing service.
//!
//! Handles the core workflow:
//! 1. Fetch activity detail and raw streams from Strava
//! 2. Validate the sample stream under the configured policy
//! 3. Extract best-effort segments for every catalog distance
//! 4. Store the activity and its personal-best records in Firestore

use crate::db::FirestoreDb;
use crate::engine::distance::DistanceCatalog;
use crate::engine::geomath::LatLng;
use crate::engine::segment::{find_best_segments, ActivitySampleStream, MalformedSamplePolicy};
use crate::error::{AppError, Result};
use crate::models::{Activity, PersonalBestRecord};
use crate::services::strava::{StravaClient, StravaStreamSet};
use std::collections::HashMap;

/// Activities per page when backfilling.
const BACKFILL_PAGE_SIZE: u32 = 50;
/// Upper bound on pages fetched by a single backfill request.
const MAX_BACKFILL_PAGES: u32 = 20;

/// Record extras and the Strava field names they are harvested from, in
/// preference order. Values are carried through unmodified.
const EXTRA_SOURCE_FIELDS: &[(&str, &[&str])] = &[
    ("heart_rate", &["average_heartrate", "average_heart_rate"]),
    ("cadence", &["average_cadence", "cadence"]),
    ("elevation_gain", &["total_elevation_gain", "elev_gain"]),
    ("power", &["average_watts", "weighted_average_watts"]),
];

/// Process activities into best-effort records.
#[derive(Clone)]
pub struct EffortProcessor {
    strava: StravaClient,
    db: FirestoreDb,
    policy: MalformedSamplePolicy,
}

impl EffortProcessor {
    pub fn new(strava: StravaClient, db: FirestoreDb, policy: MalformedSamplePolicy) -> Self {
        Self { strava, db, policy }
    }

    /// Process one activity by ID.
    ///
    /// Idempotent: an activity that has already been processed is skipped
    /// without touching Strava.
    pub async fn process_activity(
        &self,
        access_token: &str,
        athlete_id: u64,
        activity_id: u64,
    ) -> Result<ProcessResult> {
        tracing::info!(athlete_id, activity_id, "Processing activity");

        // 1. Idempotency check against the stored activity
        if let Some(existing) = self.db.get_activity(activity_id).await? {
            tracing::debug!(
                athlete_id,
                activity_id,
                "Activity already processed (idempotent skip)"
            );
            return Ok(ProcessResult {
                activity_id,
                new: false,
                efforts: existing.best_effort_labels,
            });
        }

        // 2. Fetch detail and raw streams from Strava
        let strava_activity = self.strava.get_activity(access_token, activity_id).await?;
        let streams = self
            .strava
            .get_activity_streams(access_token, activity_id)
            .await?;

        let start_date = chrono::DateTime::parse_from_rfc3339(&strava_activity.start_date)
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Invalid Strava start_date for activity {}: {}",
                    activity_id,
                    e
                ))
            })?
            .with_timezone(&chrono::Utc);

        // 3. Validate the sample stream. Failures here (missing or
        //    malformed streams) are per-activity errors the caller can skip.
        let stream = build_sample_stream(streams, self.policy)?;

        // 4. Extract best efforts for the athlete's distance catalog
        let customs = self.db.list_custom_distances(athlete_id).await?;
        let catalog = DistanceCatalog::with_custom(customs)?;
        let segments = find_best_segments(&stream, catalog.distances());

        tracing::info!(
            activity_id,
            samples = stream.len(),
            efforts = segments.len(),
            "Extracted best efforts"
        );

        // 5. Build records with passthrough extras
        let extras = harvest_extras(&strava_activity.extra);
        let records: Vec<PersonalBestRecord> = segments
            .into_iter()
            .map(|segment| PersonalBestRecord {
                activity_id,
                athlete_id,
                activity_name: strava_activity.name.clone(),
                start_date,
                activity_distance_meters: strava_activity.distance,
                activity_duration_seconds: strava_activity.moving_time,
                segment,
                extras: extras.clone(),
            })
            .collect();

        let labels: Vec<String> = records
            .iter()
            .map(|r| r.segment.distance_label.clone())
            .collect();

        // 6. Persist records first, then the activity marker. The record
        //    insert is insert-if-absent, so a crash between the two writes
        //    only causes a harmless reprocess.
        let inserted = self.db.insert_best_efforts_if_absent(&records).await?;

        let activity = Activity {
            strava_activity_id: activity_id,
            athlete_id,
            name: strava_activity.name,
            sport_type: strava_activity.sport_type,
            start_date,
            distance_meters: strava_activity.distance,
            moving_time_seconds: strava_activity.moving_time,
            best_effort_labels: labels.clone(),
            device_name: strava_activity.device_name,
            processed_at: chrono::Utc::now(),
        };
        self.db.set_activity(&activity).await?;

        tracing::info!(
            athlete_id,
            activity_id,
            inserted,
            efforts = ?labels,
            "Activity processed"
        );

        Ok(ProcessResult {
            activity_id,
            new: true,
            efforts: labels,
        })
    }

    /// Backfill runs recorded after `after` (Unix timestamp).
    ///
    /// Failed activities (missing streams, malformed samples, transient API
    /// errors) are skipped with a warning; one bad activity never aborts
    /// the batch.
    pub async fn backfill(
        &self,
        access_token: &str,
        athlete_id: u64,
        after: i64,
    ) -> Result<BackfillResult> {
        let mut result = BackfillResult::default();

        for page in 1..=MAX_BACKFILL_PAGES {
            let summaries = self
                .strava
                .list_activities(access_token, after, page, BACKFILL_PAGE_SIZE)
                .await?;

            if summaries.is_empty() {
                break;
            }

            for summary in &summaries {
                if !summary.sport_type.contains("Run") {
                    continue;
                }

                // Already stored: skip without spending Strava quota
                if self.db.activity_exists(summary.id).await? {
                    continue;
                }

                match self
                    .process_activity(access_token, athlete_id, summary.id)
                    .await
                {
                    Ok(processed) => {
                        result.processed += 1;
                        if processed.new {
                            result.new_activities += 1;
                        }
                    }
                    Err(e) => {
                        // Rate limits will also hit the next activity;
                        // stop and let the caller retry later.
                        if e.is_strava_rate_limit() {
                            return Err(e);
                        }
                        tracing::warn!(
                            athlete_id,
                            activity_id = summary.id,
                            error = %e,
                            "Skipping activity during backfill"
                        );
                        result.skipped += 1;
                    }
                }
            }
        }

        tracing::info!(
            athlete_id,
            processed = result.processed,
            new_activities = result.new_activities,
            skipped = result.skipped,
            "Backfill complete"
        );

        Ok(result)
    }
}

/// Result of processing an activity.
#[derive(Debug)]
pub struct ProcessResult {
    pub activity_id: u64,
    /// False when the activity had already been processed
    pub new: bool,
    /// Distance labels a best effort was recorded for
    pub efforts: Vec<String>,
}

/// Result of a backfill request.
#[derive(Debug, Default)]
pub struct BackfillResult {
    pub processed: u32,
    pub new_activities: u32,
    pub skipped: u32,
}

/// Convert raw Strava streams into a validated sample stream.
fn build_sample_stream(
    streams: StravaStreamSet,
    policy: MalformedSamplePolicy,
) -> std::result::Result<ActivitySampleStream, crate::engine::segment::StreamError> {
    let time = streams.time.map(|s| s.data);
    let distance = streams.distance.map(|s| s.data);
    let position = streams.latlng.map(|s| {
        s.data
            .into_iter()
            .map(|pair| pair.map(|[lat, lng]| LatLng { lat, lng }))
            .collect()
    });

    ActivitySampleStream::from_raw(time, distance, position, policy)
}

/// Pick out optional display metrics from the raw activity fields.
fn harvest_extras(
    source: &HashMap<String, serde_json::Value>,
) -> HashMap<String, serde_json::Value> {
    let mut extras = HashMap::new();
    for (key, candidates) in EXTRA_SOURCE_FIELDS {
        if let Some(value) = candidates.iter().find_map(|c| source.get(*c)) {
            if !value.is_null() {
                extras.insert((*key).to_string(), value.clone());
            }
        }
    }
    extras
}
