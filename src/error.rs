// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::engine::distance::DistanceError;
use crate::engine::segment::StreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker message for Strava 429 responses.
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";
    /// Marker message for Strava 401 responses.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Invalid or expired token";

    /// Whether this is a Strava authentication failure (expired or revoked
    /// access token) rather than some other API error.
    pub fn is_strava_token_error(&self) -> bool {
        match self {
            AppError::StravaApi(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("token") || msg.contains("invalid")
            }
            _ => false,
        }
    }

    /// Whether this is a Strava rate-limit rejection.
    pub fn is_strava_rate_limit(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg.contains(Self::STRAVA_RATE_LIMIT))
    }
}

/// Stream validation failures surface as bad requests: the activity cannot
/// be processed, but the batch (and the server) keeps going.
impl From<StreamError> for AppError {
    fn from(err: StreamError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<DistanceError> for AppError {
    fn from(err: DistanceError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::StravaApi(msg) => {
                (StatusCode::BAD_GATEWAY, "strava_error", Some(msg.clone()))
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
