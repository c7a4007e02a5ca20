// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort extraction and personal-record progression engine.
//!
//! Everything in this module is pure computation over in-memory sample
//! streams and record collections: no I/O, no shared state, no ambient
//! configuration. Callers supply target distances, time windows, and unit
//! systems as explicit parameters.

pub mod aggregate;
pub mod distance;
pub mod format;
pub mod geomath;
pub mod progression;
pub mod segment;

pub use aggregate::{top_records, TimeWindow};
pub use distance::{canonical_distances, DistanceCatalog, DistanceError, TargetDistance};
pub use format::UnitSystem;
pub use geomath::LatLng;
pub use progression::build_progression;
pub use segment::{
    find_best_segments, ActivitySampleStream, MalformedSamplePolicy, StreamError,
};
