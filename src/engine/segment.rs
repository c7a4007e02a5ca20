// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort segment extraction.
//!
//! Given one activity's validated sample stream and a set of target
//! distances, finds for each target the minimum-duration contiguous window
//! covering at least that distance. Cumulative distance is non-decreasing,
//! which allows the scan to stop at the first start index that can no
//! longer reach the target.

use crate::engine::distance::TargetDistance;
use crate::engine::geomath::{haversine_meters, LatLng};
use crate::models::effort::BestEffortSegment;
use std::str::FromStr;

/// Positions closer than this are treated as the same GPS fix when
/// dropping zero-time duplicate samples.
const DUPLICATE_POSITION_METERS: f64 = 1.0;

/// How to handle malformed numeric samples (NaN, negative values,
/// non-monotonic time or distance) during stream validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedSamplePolicy {
    /// Fail the whole activity with `MalformedSampleData`.
    #[default]
    Reject,
    /// Drop offending samples and keep the rest of the stream.
    Drop,
}

impl FromStr for MalformedSamplePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "drop" => Ok(Self::Drop),
            other => Err(format!("unknown sample policy: {}", other)),
        }
    }
}

/// Errors from stream validation.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Activity stream is missing the {0} collection")]
    MissingStreamData(&'static str),

    #[error("Malformed sample data: {0}")]
    MalformedSampleData(String),
}

/// A validated per-activity sample stream: three equal-length sequences of
/// elapsed seconds, cumulative meters, and optional positions.
#[derive(Debug, Clone)]
pub struct ActivitySampleStream {
    time: Vec<f64>,
    distance: Vec<f64>,
    position: Vec<Option<LatLng>>,
}

impl ActivitySampleStream {
    /// Build a stream from raw collections as delivered by the activity
    /// provider. Any absent collection is a precondition failure; the
    /// position collection must be present even if every entry is `None`.
    pub fn from_raw(
        time: Option<Vec<f64>>,
        distance: Option<Vec<f64>>,
        position: Option<Vec<Option<LatLng>>>,
        policy: MalformedSamplePolicy,
    ) -> Result<Self, StreamError> {
        let time = time.ok_or(StreamError::MissingStreamData("time"))?;
        let distance = distance.ok_or(StreamError::MissingStreamData("distance"))?;
        let position = position.ok_or(StreamError::MissingStreamData("position"))?;
        Self::new(time, distance, position, policy)
    }

    /// Build a stream from owned sample sequences, validating per `policy`.
    ///
    /// Length mismatches between the three sequences are always rejected;
    /// no policy can repair misaligned streams.
    pub fn new(
        time: Vec<f64>,
        distance: Vec<f64>,
        position: Vec<Option<LatLng>>,
        policy: MalformedSamplePolicy,
    ) -> Result<Self, StreamError> {
        if time.len() != distance.len() || time.len() != position.len() {
            return Err(StreamError::MalformedSampleData(format!(
                "stream length mismatch: time={}, distance={}, position={}",
                time.len(),
                distance.len(),
                position.len()
            )));
        }

        let mut kept_time = Vec::with_capacity(time.len());
        let mut kept_distance = Vec::with_capacity(distance.len());
        let mut kept_position = Vec::with_capacity(position.len());
        let mut dropped = 0usize;

        for i in 0..time.len() {
            let (t, d, p) = (time[i], distance[i], position[i]);

            let defect = if !t.is_finite() || !d.is_finite() {
                Some(format!("non-finite sample at index {}", i))
            } else if t < 0.0 || d < 0.0 {
                Some(format!("negative sample at index {}", i))
            } else if kept_time.last().is_some_and(|&prev| t < prev) {
                Some(format!("time decreases at index {}", i))
            } else if kept_distance.last().is_some_and(|&prev| d < prev) {
                Some(format!("distance decreases at index {}", i))
            } else {
                None
            };

            if let Some(reason) = defect {
                match policy {
                    MalformedSamplePolicy::Reject => {
                        return Err(StreamError::MalformedSampleData(reason));
                    }
                    MalformedSamplePolicy::Drop => {
                        dropped += 1;
                        continue;
                    }
                }
            }

            // Under the Drop policy, also discard zero-time GPS duplicates:
            // same timestamp, same cumulative distance, and a position within
            // a meter of the previous fix.
            if policy == MalformedSamplePolicy::Drop
                && kept_time.last() == Some(&t)
                && kept_distance.last() == Some(&d)
                && is_duplicate_position(kept_position.last().copied().flatten(), p)
            {
                dropped += 1;
                continue;
            }

            kept_time.push(t);
            kept_distance.push(d);
            kept_position.push(p);
        }

        if dropped > 0 {
            tracing::debug!(dropped, kept = kept_time.len(), "Dropped malformed samples");
        }

        Ok(Self {
            time: kept_time,
            distance: kept_distance,
            position: kept_position,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn distance(&self) -> &[f64] {
        &self.distance
    }

    pub fn position(&self) -> &[Option<LatLng>] {
        &self.position
    }

    /// Total distance covered by the activity, in meters.
    pub fn total_distance(&self) -> f64 {
        match (self.distance.first(), self.distance.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

fn is_duplicate_position(prev: Option<LatLng>, current: Option<LatLng>) -> bool {
    match (prev, current) {
        (Some(a), Some(b)) => haversine_meters(a, b) < DUPLICATE_POSITION_METERS,
        (None, None) => true,
        _ => false,
    }
}

/// Find the best (minimum-duration) contiguous segment for each target
/// distance achievable within the stream.
///
/// Targets the activity never covers are omitted from the result; a stream
/// with fewer than two samples yields no segments. Equal-duration windows
/// keep the earliest one found.
pub fn find_best_segments(
    stream: &ActivitySampleStream,
    targets: &[TargetDistance],
) -> Vec<BestEffortSegment> {
    if stream.len() < 2 {
        return Vec::new();
    }

    targets
        .iter()
        .filter_map(|target| find_best_segment(stream, target))
        .collect()
}

fn find_best_segment(
    stream: &ActivitySampleStream,
    target: &TargetDistance,
) -> Option<BestEffortSegment> {
    // A target must cover actual ground for the monotone end pointer to be
    // valid (and for the pace derivation to mean anything).
    if !(target.meters > 0.0) {
        return None;
    }

    let time = stream.time();
    let distance = stream.distance();
    let n = time.len();

    let mut best: Option<(usize, usize, f64)> = None;
    let mut end = 1usize;

    for start in 0..n {
        if end <= start {
            end = start + 1;
        }

        // The first index covering target meters from this start. The goal
        // distance is non-decreasing in `start`, so `end` never moves back.
        let goal = distance[start] + target.meters;
        while end < n && distance[end] < goal {
            end += 1;
        }

        if end >= n {
            // Remaining distance from any later start is no larger, so no
            // later start can cover the target either.
            break;
        }

        let elapsed = time[end] - time[start];
        if best.is_none_or(|(_, _, best_time)| elapsed < best_time) {
            best = Some((start, end, elapsed));
        }
    }

    let (start, end, duration) = best?;
    Some(BestEffortSegment {
        distance_label: target.label.clone(),
        target_meters: target.meters,
        start_index: start,
        end_index: end,
        start_time_seconds: time[start],
        end_time_seconds: time[end],
        duration_seconds: duration,
        start_distance_meters: distance[start],
        end_distance_meters: distance[end],
        start_position: stream.position()[start],
        end_position: stream.position()[end],
    })
}
