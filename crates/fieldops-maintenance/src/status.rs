//! Schedule status classification.
//!
//! Everything here is derived from one number: the whole-day offset between
//! a schedule's due date and the caller's "today". Labels, severities, buckets
//! and list filters all read that offset so their boundaries cannot drift
//! apart.
//!
//! | Offset `d`      | Label                       | Severity  | Bucket      |
//! |-----------------|-----------------------------|-----------|-------------|
//! | no due date     | `Not scheduled`             | Neutral   | Unscheduled |
//! | `d < 0`         | `Overdue by {-d} days`      | Critical  | Overdue     |
//! | `d == 0`        | `Due today`                 | Warning   | Upcoming    |
//! | `d == 1`        | `Due tomorrow`              | Warning   | Upcoming    |
//! | `1 < d < 7`     | `Due in {d} days`           | Warning   | Upcoming    |
//! | `7 <= d < 30`   | `Due in {d / 7} weeks`      | OnTrack   | OnTrack     |
//! | `d >= 30`       | `Due in {d / 30} months`    | OnTrack   | OnTrack     |

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::MaintenanceSchedule;

const MS_PER_DAY: i64 = 86_400_000;
const UPCOMING_DAYS: i64 = 7;
const MONTHS_FROM_DAYS: i64 = 30;

/// Presentation tier used to colour-code a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Neutral,
    Critical,
    Warning,
    OnTrack,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Neutral => "neutral",
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::OnTrack => "on_track",
        };
        write!(f, "{s}")
    }
}

/// Filter/sort group. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Overdue,
    Upcoming,
    OnTrack,
    Unscheduled,
}

impl StatusBucket {
    /// Bucket for a day offset; `None` means no due date.
    pub fn from_days(days_until_due: Option<i64>) -> Self {
        match days_until_due {
            None => StatusBucket::Unscheduled,
            Some(d) if d < 0 => StatusBucket::Overdue,
            Some(d) if d < UPCOMING_DAYS => StatusBucket::Upcoming,
            Some(_) => StatusBucket::OnTrack,
        }
    }
}

/// Classified status of one schedule relative to a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStatus {
    /// Whole days until due (negative when overdue), `None` when unscheduled.
    pub days_until_due: Option<i64>,
    pub label: String,
    pub severity: Severity,
}

impl ScheduleStatus {
    pub fn bucket(&self) -> StatusBucket {
        StatusBucket::from_days(self.days_until_due)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Whole days from `today` to `next_due`.
pub fn days_between(next_due: NaiveDate, today: NaiveDate) -> i64 {
    (next_due - today).num_days()
}

/// Days from the instant `now` to midnight UTC of `next_due`, rounded up.
///
/// Any partial day counts as a full day still to go, so a date due later
/// today (or due at midnight that has just passed) reads as 0.
pub fn days_until_due(next_due: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due = next_due.and_time(NaiveTime::MIN).and_utc();
    let ms = (due - now).num_milliseconds();
    let whole = ms.div_euclid(MS_PER_DAY);
    if ms.rem_euclid(MS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Classify a schedule's due date against `today`.
pub fn classify_schedule(next_due: Option<NaiveDate>, today: NaiveDate) -> ScheduleStatus {
    classify_days(next_due.map(|due| days_between(due, today)))
}

/// Classify a schedule's due date against the instant `now`.
pub fn classify_schedule_at(next_due: Option<NaiveDate>, now: DateTime<Utc>) -> ScheduleStatus {
    classify_days(next_due.map(|due| days_until_due(due, now)))
}

/// Label and severity for a precomputed day offset.
pub fn classify_days(days_until_due: Option<i64>) -> ScheduleStatus {
    let Some(d) = days_until_due else {
        return ScheduleStatus {
            days_until_due: None,
            label: "Not scheduled".to_string(),
            severity: Severity::Neutral,
        };
    };

    let (label, severity) = match d {
        d if d < 0 => (format!("Overdue by {} days", d.unsigned_abs()), Severity::Critical),
        0 => ("Due today".to_string(), Severity::Warning),
        1 => ("Due tomorrow".to_string(), Severity::Warning),
        d if d < UPCOMING_DAYS => (format!("Due in {d} days"), Severity::Warning),
        // Unit words stay plural ("1 weeks") to match the labels the dashboard shows.
        d if d < MONTHS_FROM_DAYS => (format!("Due in {} weeks", d / 7), Severity::OnTrack),
        d => (format!("Due in {} months", d / 30), Severity::OnTrack),
    };

    ScheduleStatus {
        days_until_due: Some(d),
        label,
        severity,
    }
}

/// List filters offered over schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFilter {
    #[default]
    All,
    Overdue,
    Upcoming,
    /// Performed at least once, regardless of when it is next due.
    Completed,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &MaintenanceSchedule, today: NaiveDate) -> bool {
        match self {
            ScheduleFilter::All => true,
            ScheduleFilter::Overdue => bucket_of(schedule, today) == StatusBucket::Overdue,
            ScheduleFilter::Upcoming => bucket_of(schedule, today) == StatusBucket::Upcoming,
            ScheduleFilter::Completed => schedule.last_performed.is_some(),
        }
    }
}

fn bucket_of(schedule: &MaintenanceSchedule, today: NaiveDate) -> StatusBucket {
    StatusBucket::from_days(schedule.next_due.map(|due| days_between(due, today)))
}

impl std::fmt::Display for ScheduleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScheduleFilter::All => "all",
            ScheduleFilter::Overdue => "overdue",
            ScheduleFilter::Upcoming => "upcoming",
            ScheduleFilter::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ScheduleFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(ScheduleFilter::All),
            "overdue" => Ok(ScheduleFilter::Overdue),
            "upcoming" => Ok(ScheduleFilter::Upcoming),
            "completed" => Ok(ScheduleFilter::Completed),
            other => Err(format!("unknown schedule filter: {other}")),
        }
    }
}
