/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Retention schedule computation.
//!
//! Maps a reference date to the set of calendar dates whose backups must
//! survive: the most recent week in full, then weekly checkpoints aligned
//! to fixed days of the month, then monthly checkpoints. Pure computation,
//! no I/O; every run derives the set fresh from the reference date.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Date rendering shared by the key layout and folder comparison.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tier configuration for the retention schedule.
///
/// The defaults reproduce the standard grandfather-father-son tiers: seven
/// daily backups, four weekly checkpoints and three monthly checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Length of the daily window, in days.
    pub daily_days: u32,
    /// Number of weekly checkpoints to keep.
    pub weekly_slots: usize,
    /// Day-of-month values the weekly walk stops on. The weekly cadence is
    /// aligned to these calendar anchors, not a rolling seven-day step.
    pub weekly_anchor_days: Vec<u32>,
    /// Number of monthly checkpoints to keep.
    pub monthly_slots: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            daily_days: 7,
            weekly_slots: 4,
            weekly_anchor_days: vec![22, 15, 8, 1],
            monthly_slots: 3,
        }
    }
}

impl RetentionPolicy {
    /// Compute the set of dates whose backups survive a run on `today`.
    ///
    /// The tiers chain: the weekly walk is anchored on the oldest daily
    /// date, so it searches strictly before the daily window, and the
    /// monthly walk is anchored on the oldest weekly checkpoint. The tiers
    /// are unioned as a set, so the final cardinality is data dependent and
    /// must not be assumed constant.
    pub fn keep_dates(&self, today: NaiveDate) -> BTreeSet<NaiveDate> {
        let daily = self.daily_tier(today);
        let weekly = self.weekly_tier(daily.last().copied().unwrap_or(today));
        let monthly = self.monthly_tier(weekly.last().copied().unwrap_or(today));
        daily.into_iter().chain(weekly).chain(monthly).collect()
    }

    /// The `daily_days` most recent dates, newest first.
    pub fn daily_tier(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..i64::from(self.daily_days))
            .map(|offset| today - Duration::days(offset))
            .collect()
    }

    /// Weekly checkpoints: walk backward day by day, starting the day
    /// before `anchor`, collecting dates whose day-of-month is one of the
    /// configured anchor days, until the tier is full.
    ///
    /// When the walk starts mid-month the first matches can be only a few
    /// days apart (a walk starting on the 23rd finds the 22nd immediately);
    /// that is the intended calendar-of-month alignment.
    pub fn weekly_tier(&self, anchor: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(self.weekly_slots);
        if self.weekly_slots == 0 || self.weekly_anchor_days.is_empty() {
            return dates;
        }
        let mut cursor = anchor - Duration::days(1);
        while dates.len() < self.weekly_slots {
            if self.weekly_anchor_days.contains(&cursor.day()) {
                dates.push(cursor);
            }
            cursor = cursor - Duration::days(1);
        }
        dates
    }

    /// Monthly checkpoints: the first of the month containing the day
    /// before `anchor`, then the first of each preceding month, newest
    /// first.
    pub fn monthly_tier(&self, anchor: NaiveDate) -> Vec<NaiveDate> {
        let mut months = Vec::with_capacity(self.monthly_slots);
        if self.monthly_slots == 0 {
            return months;
        }
        let mut cursor = first_of_month(anchor - Duration::days(1));
        months.push(cursor);
        while months.len() < self.monthly_slots {
            cursor = previous_month_start(cursor);
            months.push(cursor);
        }
        months
    }
}

/// Parse a `YYYY-MM-DD` reference date, failing fast on malformed input.
pub fn parse_reference_date(input: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(input, DATE_FORMAT)?)
}

/// First day of the month containing `date`.
fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// First day of the month before the one starting at `first`. Stepping
/// through the last day of the previous month keeps this whole-month
/// arithmetic, wrapping the year below January, with no drift from unequal
/// month lengths.
fn previous_month_start(first: NaiveDate) -> NaiveDate {
    first_of_month(first - Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn dates(input: &[&str]) -> Vec<NaiveDate> {
        input.iter().map(|s| date(s)).collect()
    }

    #[test]
    fn daily_tier_covers_the_last_week() {
        let tier = RetentionPolicy::default().daily_tier(date("2024-03-15"));
        assert_eq!(
            tier,
            dates(&[
                "2024-03-15",
                "2024-03-14",
                "2024-03-13",
                "2024-03-12",
                "2024-03-11",
                "2024-03-10",
                "2024-03-09",
            ])
        );
    }

    #[test]
    fn weekly_tier_walks_month_anchors() {
        // Anchored on the oldest daily date of a 2024-03-15 run.
        let tier = RetentionPolicy::default().weekly_tier(date("2024-03-09"));
        assert_eq!(
            tier,
            dates(&["2024-03-08", "2024-03-01", "2024-02-22", "2024-02-15"])
        );
    }

    #[test]
    fn weekly_tier_finds_close_matches_mid_month() {
        // A walk starting on the 23rd finds the 22nd immediately.
        let tier = RetentionPolicy::default().weekly_tier(date("2024-03-24"));
        assert_eq!(
            tier,
            dates(&["2024-03-22", "2024-03-15", "2024-03-08", "2024-03-01"])
        );
    }

    #[test]
    fn weekly_tier_is_full_and_strictly_decreasing() {
        let policy = RetentionPolicy::default();
        let mut anchor = date("2023-01-01");
        for _ in 0..500 {
            let tier = policy.weekly_tier(anchor);
            assert_eq!(tier.len(), 4);
            for pair in tier.windows(2) {
                assert!(pair[0] > pair[1]);
            }
            for day in &tier {
                assert!([1, 8, 15, 22].contains(&day.day()));
            }
            anchor = anchor + Duration::days(1);
        }
    }

    #[test]
    fn monthly_tier_takes_firsts_of_consecutive_months() {
        let tier = RetentionPolicy::default().monthly_tier(date("2024-02-15"));
        assert_eq!(tier, dates(&["2024-02-01", "2024-01-01", "2023-12-01"]));
    }

    #[test]
    fn monthly_tier_wraps_the_year() {
        let tier = RetentionPolicy::default().monthly_tier(date("2024-01-08"));
        assert_eq!(tier, dates(&["2024-01-01", "2023-12-01", "2023-11-01"]));
    }

    #[test]
    fn monthly_tier_anchor_on_the_first_steps_back_a_month() {
        // The day before the 1st falls in the previous month.
        let tier = RetentionPolicy::default().monthly_tier(date("2024-03-01"));
        assert_eq!(tier, dates(&["2024-02-01", "2024-01-01", "2023-12-01"]));
    }

    #[test]
    fn keep_dates_worked_example() {
        let keep = RetentionPolicy::default().keep_dates(date("2024-03-15"));
        let expected: BTreeSet<NaiveDate> = dates(&[
            // daily
            "2024-03-15",
            "2024-03-14",
            "2024-03-13",
            "2024-03-12",
            "2024-03-11",
            "2024-03-10",
            "2024-03-09",
            // weekly
            "2024-03-08",
            "2024-03-01",
            "2024-02-22",
            "2024-02-15",
            // monthly
            "2024-02-01",
            "2024-01-01",
            "2023-12-01",
        ])
        .into_iter()
        .collect();
        assert_eq!(keep, expected);
    }

    #[test]
    fn keep_dates_across_february_of_a_leap_year() {
        // Daily window 2024-03-01 back through 2024-02-24, leap day included;
        // the weekly walk starts on 2024-02-23 and ends on 2024-02-01, so the
        // monthly tier starts at January and reaches back to November.
        let keep = RetentionPolicy::default().keep_dates(date("2024-03-01"));
        assert!(keep.contains(&date("2024-02-29")));
        assert!(keep.contains(&date("2024-02-24")));
        assert!(keep.contains(&date("2024-02-22")));
        assert!(keep.contains(&date("2024-02-01")));
        assert!(keep.contains(&date("2024-01-01")));
        assert!(keep.contains(&date("2023-11-01")));
        assert!(!keep.contains(&date("2024-02-23")));
        assert!(!keep.contains(&date("2023-12-15")));
    }

    #[test]
    fn keep_dates_is_deterministic() {
        let policy = RetentionPolicy::default();
        let today = date("2024-07-04");
        assert_eq!(policy.keep_dates(today), policy.keep_dates(today));
    }

    #[test]
    fn keep_dates_cardinality_is_data_dependent() {
        let policy = RetentionPolicy::default();
        let mut today = date("2023-01-01");
        for _ in 0..500 {
            let keep = policy.keep_dates(today);
            assert!(keep.len() >= 11, "too few dates kept for {today}");
            assert!(keep.len() <= 14, "too many dates kept for {today}");
            for offset in 0..7 {
                assert!(keep.contains(&(today - Duration::days(offset))));
            }
            today = today + Duration::days(1);
        }
    }

    #[test]
    fn checkpoints_stay_outside_the_daily_window() {
        let policy = RetentionPolicy::default();
        let today = date("2024-03-09");
        let oldest_daily = today - Duration::days(6);
        for checkpoint in policy.weekly_tier(oldest_daily) {
            assert!(checkpoint < oldest_daily);
        }
    }

    #[test]
    fn parse_reference_date_accepts_iso_dates() {
        assert_eq!(parse_reference_date("2024-03-15").unwrap(), date("2024-03-15"));
    }

    #[test]
    fn parse_reference_date_rejects_malformed_input() {
        for input in ["", "yesterday", "2024-13-99", "15-03-2024", "2024/03/15"] {
            assert!(parse_reference_date(input).is_err(), "accepted {input:?}");
        }
    }
}
