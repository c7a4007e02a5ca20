// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities and their sample streams.
//!
//! Handles:
//! - Detailed activity fetching
//! - Raw stream fetching (time, distance, latlng)
//! - Activity listing for backfill
//! - Rate limit and token-error detection

use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashMap;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a new Strava client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
        }
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaActivity, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Get the raw sample streams for an activity.
    ///
    /// Requests the time, distance, and latlng streams keyed by type; any
    /// stream the activity does not have is simply absent in the response.
    pub async fn get_activity_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StravaStreamSet, AppError> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("keys", "time,distance,latlng"), ("key_by_type", "true")])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// List activities for backfill (paginated).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Rate limit - caller may retry later
            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            // Unauthorized - token may be expired
            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Detailed Strava activity response.
///
/// Unknown fields are collected so optional metrics (heart rate, cadence,
/// power, ...) can be passed through without modeling every variant.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    pub name: String,
    pub sport_type: String,
    pub start_date: String,
    pub distance: f64,
    pub moving_time: f64,
    pub device_name: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Summary activity for list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub name: String,
    pub sport_type: String,
    pub start_date: String,
}

/// Stream set response (key_by_type=true). Each stream is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StravaStreamSet {
    pub time: Option<StravaStream<f64>>,
    pub distance: Option<StravaStream<f64>>,
    pub latlng: Option<StravaStream<Option<[f64; 2]>>>,
}

/// A single raw stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaStream<T> {
    pub data: Vec<T>,
}
