// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod effort;
pub mod strava;

pub use effort::{BackfillResult, EffortProcessor, ProcessResult};
pub use strava::StravaClient;
