//! Models for clock-in/clock-out time entries.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Split shifts and breaks are modeled as up to three entries per
/// assignment, numbered 1..=3.
pub const MAX_ENTRIES_PER_ASSIGNMENT: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeEntry {
    pub id: String,
    pub assignment_id: String,
    /// Position of this entry within the assignment's shift (1..=3).
    pub entry_number: i32,
    pub clock_in: NaiveDateTime,
    /// Unset while the worker is still on the clock.
    pub clock_out: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn new(
        assignment_id: String,
        entry_number: i32,
        clock_in: NaiveDateTime,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            assignment_id,
            entry_number,
            clock_in,
            clock_out: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn close(&mut self, clock_out: NaiveDateTime, now: DateTime<Utc>) {
        self.clock_out = Some(clock_out);
        self.updated_at = now;
    }

    /// Minutes worked in this entry; zero while the entry is still open.
    pub fn worked_minutes(&self) -> i64 {
        match self.clock_out {
            Some(out) => (out - self.clock_in).num_minutes().max(0),
            None => 0,
        }
    }
}

/// Total worked hours across a worker's entries for one shift.
pub fn total_worked_hours(entries: &[TimeEntry]) -> f64 {
    let minutes: i64 = entries.iter().map(TimeEntry::worked_minutes).sum();
    minutes as f64 / 60.0
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClockOutRequest {
    /// When true the worker is done for the day and the assignment moves to
    /// shift_ended; otherwise this clock-out starts a break.
    #[serde(default)]
    pub end_shift: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeEntryResponse {
    pub id: String,
    pub assignment_id: String,
    pub entry_number: i32,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
}

impl From<TimeEntry> for TimeEntryResponse {
    fn from(entry: TimeEntry) -> Self {
        TimeEntryResponse {
            id: entry.id,
            assignment_id: entry.assignment_id,
            entry_number: entry.entry_number,
            clock_in: entry.clock_in,
            clock_out: entry.clock_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn open_entry_contributes_zero_minutes() {
        let entry = TimeEntry::new("a1".into(), 1, t(8, 0), Utc::now());
        assert!(entry.is_open());
        assert_eq!(entry.worked_minutes(), 0);
    }

    #[test]
    fn split_shift_entries_sum_into_total_hours() {
        let now = Utc::now();
        let mut first = TimeEntry::new("a1".into(), 1, t(8, 0), now);
        first.close(t(12, 0), now);
        let mut second = TimeEntry::new("a1".into(), 2, t(12, 30), now);
        second.close(t(17, 0), now);

        let total = total_worked_hours(&[first, second]);
        assert!((total - 8.5).abs() < f64::EPSILON);
    }

    #[test]
    fn clock_out_before_clock_in_is_floored_at_zero() {
        let now = Utc::now();
        let mut entry = TimeEntry::new("a1".into(), 1, t(9, 0), now);
        entry.close(t(8, 0), now);
        assert_eq!(entry.worked_minutes(), 0);
    }
}
