// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PR-Tracker: Personal running records from Strava activities
//!
//! This crate provides the backend API for extracting best-effort times
//! from Strava activity streams and serving ranked personal records and
//! record progressions.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::EffortProcessor;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub processor: EffortProcessor,
}
