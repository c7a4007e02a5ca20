//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
    /// Best-effort records, keyed by `{activity_id}_{distance label}`
    pub const BEST_EFFORTS: &str = "best_efforts";
    /// User-defined target distances, keyed by `{athlete_id}_{label}`
    pub const CUSTOM_DISTANCES: &str = "custom_distances";
}
