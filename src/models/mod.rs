// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod effort;

pub use activity::Activity;
pub use effort::{BestEffortSegment, PersonalBestRecord, ProgressionEntry};
