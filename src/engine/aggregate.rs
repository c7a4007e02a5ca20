// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking of persisted best-effort records under a time-window filter.

use crate::models::effort::PersonalBestRecord;
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

/// Date-range filter applied before ranking or progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    AllTime,
    ThisYear,
    LastMonths(u32),
    /// Inclusive on both ends.
    Custom {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl TimeWindow {
    /// Resolve the window to concrete date bounds against `now`.
    /// `None` means unbounded on that side.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            TimeWindow::AllTime => (None, None),
            TimeWindow::ThisYear => (Some(start_of_year(now)), None),
            TimeWindow::LastMonths(months) => {
                let from = now
                    .checked_sub_months(Months::new(months))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                (Some(from), None)
            }
            TimeWindow::Custom { from, to } => (Some(from), Some(to)),
        }
    }

    /// Whether a record dated `date` falls inside the window.
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (from, to) = self.bounds(now);
        from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
    }
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or(now)
}

/// Drop records outside the window.
pub fn filter_window(
    records: Vec<PersonalBestRecord>,
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> Vec<PersonalBestRecord> {
    records
        .into_iter()
        .filter(|r| window.contains(r.start_date, now))
        .collect()
}

/// Rank records fastest-first. A `limit` of 0 returns the full sorted set
/// (used as progression input); otherwise the first `limit` entries.
///
/// The sort is stable, so duration ties keep their incoming order.
pub fn top_records(
    mut records: Vec<PersonalBestRecord>,
    limit: usize,
) -> Vec<PersonalBestRecord> {
    records.sort_by(|a, b| {
        a.segment
            .duration_seconds
            .total_cmp(&b.segment.duration_seconds)
    });
    if limit > 0 {
        records.truncate(limit);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_this_year_starts_january_first() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let (from, to) = TimeWindow::ThisYear.bounds(now);
        assert_eq!(from, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(to, None);
    }

    #[test]
    fn test_last_months_bound() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let (from, _) = TimeWindow::LastMonths(3).bounds(now);
        assert_eq!(from, Some(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_custom_window_inclusive_on_both_ends() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::Custom { from, to };

        assert!(window.contains(from, now));
        assert!(window.contains(to, now));
        assert!(!window.contains(to + chrono::Duration::seconds(1), now));
        assert!(!window.contains(from - chrono::Duration::seconds(1), now));
    }

    #[test]
    fn test_all_time_contains_everything() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let ancient = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::AllTime.contains(ancient, now));
    }
}
