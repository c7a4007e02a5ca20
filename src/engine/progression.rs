// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal-record progression: the chronological subsequence of records
//! that each improved on every prior record for a distance.

use crate::models::effort::{PersonalBestRecord, ProgressionEntry};

/// Build the record-breaking history for a single target distance.
///
/// Records are ordered by activity date ascending (stable for ties) and
/// kept only when strictly faster than every earlier kept record. Each
/// entry's rank is its 1-based position within the progression itself, not
/// its rank among all records by time. Equal durations keep only the
/// earlier record.
pub fn build_progression(mut records: Vec<PersonalBestRecord>) -> Vec<ProgressionEntry> {
    records.sort_by_key(|r| r.start_date);

    let mut entries: Vec<ProgressionEntry> = Vec::new();
    let mut current_best = f64::INFINITY;

    for record in records {
        let duration = record.segment.duration_seconds;
        if duration < current_best {
            current_best = duration;
            entries.push(ProgressionEntry {
                rank: entries.len() as u32 + 1,
                record,
            });
        }
    }

    entries
}
