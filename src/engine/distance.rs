// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Target distances: the canonical best-effort table plus user customs.

use serde::{Deserialize, Serialize};

/// Canonical best-effort distances, ordered by meter value ascending.
const CANONICAL: &[(&str, f64)] = &[
    ("400m", 400.0),
    ("1/2 mile", 804.672),
    ("1K", 1000.0),
    ("1 mile", 1609.344),
    ("2 mile", 3218.688),
    ("5K", 5000.0),
    ("10K", 10000.0),
    ("15K", 15000.0),
    ("10 mile", 16093.44),
    ("20K", 20000.0),
    ("Half-Marathon", 21097.5),
    ("30K", 30000.0),
    ("Marathon", 42195.0),
];

/// A distance for which best-effort times are tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDistance {
    /// Display label, unique within a catalog (e.g., "5K")
    pub label: String,
    /// Distance in meters
    pub meters: f64,
}

/// The canonical distance table.
pub fn canonical_distances() -> Vec<TargetDistance> {
    CANONICAL
        .iter()
        .map(|&(label, meters)| TargetDistance {
            label: label.to_string(),
            meters,
        })
        .collect()
}

/// Ordered set of target distances: canonical entries merged with an
/// athlete's custom distances, kept sorted by meter value ascending.
#[derive(Debug, Clone)]
pub struct DistanceCatalog {
    distances: Vec<TargetDistance>,
}

impl Default for DistanceCatalog {
    fn default() -> Self {
        Self::canonical()
    }
}

impl DistanceCatalog {
    /// Catalog containing only the canonical distances.
    pub fn canonical() -> Self {
        Self {
            distances: canonical_distances(),
        }
    }

    /// Catalog of canonical distances plus the given custom distances.
    pub fn with_custom(customs: Vec<TargetDistance>) -> Result<Self, DistanceError> {
        let mut catalog = Self::canonical();
        for custom in customs {
            catalog.add(custom)?;
        }
        Ok(catalog)
    }

    /// Add a custom distance, keeping meter-ascending order.
    pub fn add(&mut self, distance: TargetDistance) -> Result<(), DistanceError> {
        if self.get(&distance.label).is_some() {
            return Err(DistanceError::DuplicateLabel(distance.label));
        }
        self.distances.push(distance);
        self.distances
            .sort_by(|a, b| a.meters.total_cmp(&b.meters));
        Ok(())
    }

    /// Look up a distance by its label.
    pub fn get(&self, label: &str) -> Option<&TargetDistance> {
        self.distances.iter().find(|d| d.label == label)
    }

    /// All distances, ordered by meter value ascending.
    pub fn distances(&self) -> &[TargetDistance] {
        &self.distances
    }
}

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    #[error("Duplicate distance label: {0}")]
    DuplicateLabel(String),
}
