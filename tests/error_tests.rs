// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use pr_tracker::error::AppError;

#[test]
fn test_is_strava_token_error_matches() {
    let err = AppError::StravaApi("Token expired".to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi("Invalid access token".to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string());
    assert!(err.is_strava_token_error());
}

#[test]
fn test_is_strava_token_error_no_match() {
    let err = AppError::StravaApi("Rate limit exceeded".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::StravaApi("Internal Server Error".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::BadRequest("Bad Request".to_string());
    assert!(!err.is_strava_token_error());
}

#[test]
fn test_is_strava_rate_limit() {
    let err = AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(err.is_strava_rate_limit());

    let err = AppError::StravaApi("HTTP 500: oops".to_string());
    assert!(!err.is_strava_rate_limit());

    let err = AppError::Database("Rate limit exceeded".to_string());
    assert!(!err.is_strava_rate_limit());
}

#[test]
fn test_stream_errors_convert_to_bad_request() {
    use pr_tracker::engine::segment::StreamError;

    let err: AppError = StreamError::MissingStreamData("time").into();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err: AppError = StreamError::MalformedSampleData("NaN at index 3".to_string()).into();
    assert!(matches!(err, AppError::BadRequest(_)));
}
