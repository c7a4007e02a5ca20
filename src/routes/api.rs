// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for best-effort records, progressions, and distances.

use crate::engine::aggregate::{filter_window, top_records, TimeWindow};
use crate::engine::distance::{DistanceCatalog, TargetDistance};
use crate::engine::format::{format_distance, format_duration, format_pace, UnitSystem};
use crate::engine::progression::build_progression;
use crate::error::{AppError, Result};
use crate::models::PersonalBestRecord;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// Default number of records returned by /api/records.
const DEFAULT_RECORD_LIMIT: usize = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/records", get(get_records))
        .route("/api/progression", get(get_progression))
        .route("/api/distances", get(get_distances).post(create_distance))
        .route("/api/activities/{id}/process", post(process_activity))
        .route("/api/backfill", post(backfill))
}

// ─── Query Parsing ───────────────────────────────────────────

fn default_window() -> String {
    "all".to_string()
}
fn default_units() -> String {
    "metric".to_string()
}
fn default_limit() -> usize {
    DEFAULT_RECORD_LIMIT
}

#[derive(Deserialize)]
struct RecordsQuery {
    athlete_id: u64,
    /// Target distance label (e.g., "5K")
    distance: String,
    /// Window kind: all | year | months | custom
    #[serde(default = "default_window")]
    window: String,
    /// Number of months for window=months
    months: Option<u32>,
    /// Range start (RFC3339) for window=custom
    from: Option<String>,
    /// Range end (RFC3339) for window=custom
    to: Option<String>,
    /// Number of records to return; 0 returns all
    #[serde(default = "default_limit")]
    limit: usize,
    /// Display units: metric | imperial
    #[serde(default = "default_units")]
    units: String,
}

fn parse_date(raw: &str, name: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid '{}' parameter: must be RFC3339 datetime",
                name
            ))
        })
}

fn parse_window(
    window: &str,
    months: Option<u32>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<TimeWindow> {
    match window {
        "all" => Ok(TimeWindow::AllTime),
        "year" => Ok(TimeWindow::ThisYear),
        "months" => {
            let months = months.ok_or_else(|| {
                AppError::BadRequest("'months' is required when window=months".to_string())
            })?;
            if months == 0 {
                return Err(AppError::BadRequest(
                    "'months' must be greater than 0".to_string(),
                ));
            }
            Ok(TimeWindow::LastMonths(months))
        }
        "custom" => {
            let from = parse_date(
                from.ok_or_else(|| {
                    AppError::BadRequest("'from' is required when window=custom".to_string())
                })?,
                "from",
            )?;
            let to = parse_date(
                to.ok_or_else(|| {
                    AppError::BadRequest("'to' is required when window=custom".to_string())
                })?,
                "to",
            )?;
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
            Ok(TimeWindow::Custom { from, to })
        }
        other => Err(AppError::BadRequest(format!(
            "Invalid 'window' parameter: {}",
            other
        ))),
    }
}

fn parse_units(raw: &str) -> Result<UnitSystem> {
    raw.parse().map_err(|_| {
        AppError::BadRequest("Invalid 'units' parameter: must be metric or imperial".to_string())
    })
}

fn require_athlete_id(athlete_id: u64) -> Result<u64> {
    if athlete_id == 0 {
        return Err(AppError::BadRequest(
            "'athlete_id' must be greater than 0".to_string(),
        ));
    }
    Ok(athlete_id)
}

/// Extract the caller-supplied Strava bearer token.
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)
}

/// The athlete's catalog: canonical distances plus stored customs.
async fn load_catalog(state: &AppState, athlete_id: u64) -> Result<DistanceCatalog> {
    let customs = state.db.list_custom_distances(athlete_id).await?;
    Ok(DistanceCatalog::with_custom(customs)?)
}

// ─── Record Views ────────────────────────────────────────────

/// One record as displayed in ranked and progression views.
#[derive(Serialize, Clone, Debug)]
pub struct RecordSummary {
    pub rank: u32,
    pub activity_id: u64,
    pub activity_name: String,
    pub start_date: String,
    pub duration_seconds: f64,
    /// Formatted duration (e.g., "22:41")
    pub duration: String,
    /// Formatted pace (e.g., "4:32 /km")
    pub pace: String,
    pub extras: HashMap<String, serde_json::Value>,
}

fn record_summary(rank: u32, record: PersonalBestRecord, units: UnitSystem) -> RecordSummary {
    let pace = format_pace(record.segment.pace_seconds_per_km(), units);
    RecordSummary {
        rank,
        activity_id: record.activity_id,
        activity_name: record.activity_name,
        start_date: format_utc_rfc3339(record.start_date),
        duration_seconds: record.segment.duration_seconds,
        duration: format_duration(record.segment.duration_seconds),
        pace,
        extras: record.extras,
    }
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub distance: String,
    /// Formatted target distance (e.g., "5.00 km")
    pub distance_display: String,
    pub total: u32,
    pub records: Vec<RecordSummary>,
}

/// Get top personal-best records for a distance under a time window.
async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>> {
    let athlete_id = require_athlete_id(params.athlete_id)?;
    let units = parse_units(&params.units)?;
    let window = parse_window(
        &params.window,
        params.months,
        params.from.as_deref(),
        params.to.as_deref(),
    )?;

    tracing::debug!(
        athlete_id,
        distance = %params.distance,
        window = %params.window,
        limit = params.limit,
        "Fetching records"
    );

    let catalog = load_catalog(&state, athlete_id).await?;
    let target = catalog
        .get(&params.distance)
        .ok_or_else(|| AppError::NotFound(format!("Unknown distance: {}", params.distance)))?
        .clone();

    // The query bounds narrow the read; the engine filter owns the
    // window semantics.
    let now = chrono::Utc::now();
    let (from, to) = window.bounds(now);
    let records = state
        .db
        .get_records_for_distance(athlete_id, &target.label, from, to)
        .await?;

    let ranked = top_records(filter_window(records, &window, now), params.limit);
    let summaries: Vec<RecordSummary> = ranked
        .into_iter()
        .enumerate()
        .map(|(i, record)| record_summary(i as u32 + 1, record, units))
        .collect();

    Ok(Json(RecordsResponse {
        distance: target.label.clone(),
        distance_display: format_distance(target.meters, units),
        total: summaries.len() as u32,
        records: summaries,
    }))
}

// ─── Progression ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProgressionResponse {
    pub distance: String,
    pub entries: Vec<RecordSummary>,
}

/// Get the record-breaking history for a distance: the chronological
/// sequence of efforts that each beat every earlier one.
async fn get_progression(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<ProgressionResponse>> {
    let athlete_id = require_athlete_id(params.athlete_id)?;
    let units = parse_units(&params.units)?;
    let window = parse_window(
        &params.window,
        params.months,
        params.from.as_deref(),
        params.to.as_deref(),
    )?;

    let catalog = load_catalog(&state, athlete_id).await?;
    let target = catalog
        .get(&params.distance)
        .ok_or_else(|| AppError::NotFound(format!("Unknown distance: {}", params.distance)))?
        .clone();

    let now = chrono::Utc::now();
    let (from, to) = window.bounds(now);
    let records = state
        .db
        .get_records_for_distance(athlete_id, &target.label, from, to)
        .await?;

    // Full set (limit 0); the progression scan applies its own ordering.
    let entries: Vec<RecordSummary> = build_progression(filter_window(records, &window, now))
        .into_iter()
        .map(|entry| record_summary(entry.rank, entry.record, units))
        .collect();

    Ok(Json(ProgressionResponse {
        distance: target.label,
        entries,
    }))
}

// ─── Distances ───────────────────────────────────────────────

#[derive(Deserialize)]
struct DistancesQuery {
    athlete_id: u64,
}

#[derive(Serialize)]
pub struct DistancesResponse {
    pub distances: Vec<TargetDistance>,
}

/// Get the athlete's target distances (canonical + custom), ordered by
/// meter value ascending.
async fn get_distances(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DistancesQuery>,
) -> Result<Json<DistancesResponse>> {
    let athlete_id = require_athlete_id(params.athlete_id)?;
    let catalog = load_catalog(&state, athlete_id).await?;

    Ok(Json(DistancesResponse {
        distances: catalog.distances().to_vec(),
    }))
}

#[derive(Deserialize, Validate)]
struct CreateDistanceRequest {
    athlete_id: u64,
    #[validate(length(min = 1, max = 40))]
    label: String,
    #[validate(range(min = 1.0, max = 10_000_000.0))]
    meters: f64,
}

#[derive(Serialize)]
pub struct CreateDistanceResponse {
    pub success: bool,
    pub distance: TargetDistance,
}

/// Add a custom target distance for an athlete.
async fn create_distance(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDistanceRequest>,
) -> Result<Json<CreateDistanceResponse>> {
    let athlete_id = require_athlete_id(payload.athlete_id)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Check against canonical labels and the stored customs before writing.
    let catalog = load_catalog(&state, athlete_id).await?;
    if catalog.get(&payload.label).is_some() {
        return Err(AppError::BadRequest(format!(
            "Duplicate distance label: {}",
            payload.label
        )));
    }

    let distance = TargetDistance {
        label: payload.label,
        meters: payload.meters,
    };

    let inserted = state.db.add_custom_distance(athlete_id, &distance).await?;
    if !inserted {
        return Err(AppError::BadRequest(format!(
            "Duplicate distance label: {}",
            distance.label
        )));
    }

    tracing::info!(athlete_id, label = %distance.label, meters = distance.meters, "Custom distance added");

    Ok(Json(CreateDistanceResponse {
        success: true,
        distance,
    }))
}

// ─── Activity Processing ─────────────────────────────────────

#[derive(Deserialize)]
struct ProcessQuery {
    athlete_id: u64,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    pub activity_id: u64,
    pub new: bool,
    pub efforts: Vec<String>,
}

/// Process one activity into best-effort records.
///
/// The caller supplies a Strava access token as a bearer token; token
/// acquisition and refresh are the surrounding application's concern.
async fn process_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
    Query(params): Query<ProcessQuery>,
    headers: HeaderMap,
) -> Result<Json<ProcessResponse>> {
    let athlete_id = require_athlete_id(params.athlete_id)?;
    let token = bearer_token(&headers)?;

    let result = state
        .processor
        .process_activity(token, athlete_id, activity_id)
        .await
        .map_err(|e| {
            if e.is_strava_token_error() {
                AppError::InvalidToken
            } else {
                e
            }
        })?;

    Ok(Json(ProcessResponse {
        activity_id: result.activity_id,
        new: result.new,
        efforts: result.efforts,
    }))
}

#[derive(Deserialize)]
struct BackfillQuery {
    athlete_id: u64,
    /// Only consider activities after this Unix timestamp
    #[serde(default)]
    after: i64,
}

#[derive(Serialize)]
pub struct BackfillResponse {
    pub processed: u32,
    pub new_activities: u32,
    pub skipped: u32,
}

/// Backfill best-effort records from the athlete's activity history.
async fn backfill(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BackfillQuery>,
    headers: HeaderMap,
) -> Result<Json<BackfillResponse>> {
    let athlete_id = require_athlete_id(params.athlete_id)?;
    let token = bearer_token(&headers)?;

    let result = state
        .processor
        .backfill(token, athlete_id, params.after)
        .await
        .map_err(|e| {
            if e.is_strava_token_error() {
                AppError::InvalidToken
            } else {
                e
            }
        })?;

    Ok(Json(BackfillResponse {
        processed: result.processed,
        new_activities: result.new_activities,
        skipped: result.skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_variants() {
        assert_eq!(
            parse_window("all", None, None, None).unwrap(),
            TimeWindow::AllTime
        );
        assert_eq!(
            parse_window("year", None, None, None).unwrap(),
            TimeWindow::ThisYear
        );
        assert_eq!(
            parse_window("months", Some(6), None, None).unwrap(),
            TimeWindow::LastMonths(6)
        );
    }

    #[test]
    fn test_parse_window_rejects_unknown_kind() {
        assert!(parse_window("fortnight", None, None, None).is_err());
    }

    #[test]
    fn test_parse_window_months_requires_count() {
        assert!(parse_window("months", None, None, None).is_err());
        assert!(parse_window("months", Some(0), None, None).is_err());
    }

    #[test]
    fn test_parse_window_custom_requires_valid_range() {
        let window = parse_window(
            "custom",
            None,
            Some("2024-01-01T00:00:00Z"),
            Some("2024-02-01T00:00:00Z"),
        )
        .unwrap();
        assert!(matches!(window, TimeWindow::Custom { .. }));

        // Inverted range
        assert!(parse_window(
            "custom",
            None,
            Some("2024-02-01T00:00:00Z"),
            Some("2024-01-01T00:00:00Z"),
        )
        .is_err());

        // Not a date
        assert!(parse_window("custom", None, Some("yesterday"), Some("today")).is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");

        let empty = HeaderMap::new();
        assert!(bearer_token(&empty).is_err());
    }
}
