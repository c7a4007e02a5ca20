// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use pr_tracker::config::Config;
use pr_tracker::db::FirestoreDb;
use pr_tracker::routes::create_router;
use pr_tracker::services::{EffortProcessor, StravaClient};
use pr_tracker::AppState;
use std::sync::Arc;

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let processor = EffortProcessor::new(
        StravaClient::new(),
        db.clone(),
        config.malformed_sample_policy,
    );

    let state = Arc::new(AppState {
        config,
        db,
        processor,
    });

    (create_router(state.clone()), state)
}
