// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Activities (processed Strava activities)
//! - Best-effort records (queryable by athlete, distance, and date range)
//! - Custom target distances (per athlete)

use crate::db::collections;
use crate::engine::distance::TargetDistance;
use crate::error::AppError;
use crate::models::{Activity, PersonalBestRecord};
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Stored custom distance, scoped to an athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDistance {
    pub athlete_id: u64,
    pub label: String,
    pub meters: f64,
}

impl From<CustomDistance> for TargetDistance {
    fn from(custom: CustomDistance) -> Self {
        TargetDistance {
            label: custom.label,
            meters: custom.meters,
        }
    }
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Document ID for a best-effort record.
    fn effort_doc_id(activity_id: u64, distance_label: &str) -> String {
        let safe_label = urlencoding::encode(distance_label);
        format!("{}_{}", activity_id, safe_label)
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get an activity by Strava ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<Option<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVITIES)
            .obj()
            .one(&activity_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an activity has already been processed.
    pub async fn activity_exists(&self, activity_id: u64) -> Result<bool, AppError> {
        Ok(self.get_activity(activity_id).await?.is_some())
    }

    /// Store a processed activity.
    pub async fn set_activity(&self, activity: &Activity) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(activity.strava_activity_id.to_string())
            .object(activity)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Best-Effort Record Operations ───────────────────────────

    /// Store best-effort records, skipping any that already exist.
    ///
    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    /// Returns the number of newly inserted records.
    pub async fn insert_best_efforts_if_absent(
        &self,
        records: &[PersonalBestRecord],
    ) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let inserted = stream::iter(records.to_vec())
            .map(|record| async move {
                let doc_id = Self::effort_doc_id(record.activity_id, &record.segment.distance_label);

                let existing: Option<PersonalBestRecord> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::BEST_EFFORTS)
                    .obj()
                    .one(&doc_id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                if existing.is_some() {
                    return Ok::<_, AppError>(false);
                }

                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::BEST_EFFORTS)
                    .document_id(&doc_id)
                    .object(&record)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok(true)
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<bool, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<bool>, AppError>>()?
            .into_iter()
            .filter(|&new| new)
            .count();

        Ok(inserted)
    }

    /// List best-effort records for one athlete and target distance,
    /// optionally bounded by an inclusive date range, ordered by activity
    /// date ascending.
    pub async fn get_records_for_distance(
        &self,
        athlete_id: u64,
        distance_label: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PersonalBestRecord>, AppError> {
        let label = distance_label.to_string();
        // Dates are stored as RFC3339 UTC strings, which order
        // lexicographically.
        let from = from.map(crate::time_utils::format_utc_rfc3339);
        let to = to.map(crate::time_utils::format_utc_rfc3339);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::BEST_EFFORTS)
            .filter(move |q| {
                let mut conditions = vec![
                    q.field("athlete_id").eq(athlete_id),
                    q.field("distance_label").eq(label.clone()),
                ];
                if let Some(from) = from.clone() {
                    conditions.push(q.field("start_date").greater_than_or_equal(from));
                }
                if let Some(to) = to.clone() {
                    conditions.push(q.field("start_date").less_than_or_equal(to));
                }
                q.for_all(conditions)
            })
            .order_by([(
                "start_date",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Custom Distance Operations ──────────────────────────────

    /// List an athlete's custom target distances.
    pub async fn list_custom_distances(
        &self,
        athlete_id: u64,
    ) -> Result<Vec<TargetDistance>, AppError> {
        let customs: Vec<CustomDistance> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CUSTOM_DISTANCES)
            .filter(move |q| q.for_all([q.field("athlete_id").eq(athlete_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(customs.into_iter().map(TargetDistance::from).collect())
    }

    /// Add a custom distance for an athlete.
    ///
    /// Returns `false` if a custom distance with the same label already
    /// exists (nothing is written).
    pub async fn add_custom_distance(
        &self,
        athlete_id: u64,
        distance: &TargetDistance,
    ) -> Result<bool, AppError> {
        let client = self.get_client()?;
        let safe_label = urlencoding::encode(&distance.label);
        let doc_id = format!("{}_{}", athlete_id, safe_label);

        let existing: Option<CustomDistance> = client
            .fluent()
            .select()
            .by_id_in(collections::CUSTOM_DISTANCES)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if existing.is_some() {
            return Ok(false);
        }

        let record = CustomDistance {
            athlete_id,
            label: distance.label.clone(),
            meters: distance.meters,
        };

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::CUSTOM_DISTANCES)
            .document_id(&doc_id)
            .object(&record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }
}
