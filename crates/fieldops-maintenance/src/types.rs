use chrono::NaiveDate;
use fieldops_core::types::{EquipmentId, LogId, ScheduleId, TaskId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Recurrence interval of a maintenance obligation.
///
/// Parsing is lenient: anything that is not one of the five known spellings
/// becomes `Monthly`. Persisted rows and form input are never rejected for a
/// bad frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Biannual,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Biannual,
        Frequency::Annual,
    ];

    /// Map free text to a frequency, falling back to `Monthly`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "biannual" => Frequency::Biannual,
            "annual" => Frequency::Annual,
            other => {
                warn!(frequency = %other, "unrecognised frequency, treating as monthly");
                Frequency::Monthly
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Biannual => "biannual",
            Frequency::Annual => "annual",
        }
    }
}

impl From<&str> for Frequency {
    fn from(s: &str) -> Self {
        Frequency::parse_lenient(s)
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        Frequency::parse_lenient(&s)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded on a maintenance visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    #[default]
    Completed,
    Incomplete,
    NeedsFollowUp,
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogStatus::Completed => "completed",
            LogStatus::Incomplete => "incomplete",
            LogStatus::NeedsFollowUp => "needs_follow_up",
        };
        write!(f, "{s}")
    }
}

impl LogStatus {
    /// Read a stored status, falling back to `Completed` for unknown text.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "treating log status as completed");
            LogStatus::Completed
        })
    }
}

impl std::str::FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "completed" => Ok(LogStatus::Completed),
            "incomplete" => Ok(LogStatus::Incomplete),
            "needs_follow_up" => Ok(LogStatus::NeedsFollowUp),
            other => Err(format!("unknown log status: {other}")),
        }
    }
}

/// A serviced piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// RFC3339 timestamp of the last update.
    pub updated_at: String,
}

/// A reusable task definition ("replace filter", "inspect belts").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: TaskId,
    pub name: String,
    pub description: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

/// One recurring obligation: this task, on this equipment, at this frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub id: ScheduleId,
    pub equipment_id: EquipmentId,
    pub task_id: TaskId,
    pub frequency: Frequency,
    /// Date of the most recent log, `None` if never performed.
    pub last_performed: Option<NaiveDate>,
    /// `None` when the schedule has not been given a due date.
    pub next_due: Option<NaiveDate>,
    /// Calendar date the schedule was created; anchors `next_due` until the
    /// first log is recorded.
    pub created_on: NaiveDate,
    pub created_at: String,
    pub updated_at: String,
}

/// Immutable record of one maintenance visit against a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub id: LogId,
    pub schedule_id: ScheduleId,
    pub performed_on: NaiveDate,
    pub status: LogStatus,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Input for [`crate::MaintenanceManager::add_equipment`].
#[derive(Debug, Clone, Default)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: Option<String>,
    pub location: Option<String>,
}

/// Input for [`crate::MaintenanceManager::add_task`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub estimated_minutes: Option<u32>,
}

/// How a new schedule gets its first due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstDue {
    /// One interval after the creation date.
    #[default]
    OneInterval,
    /// On the given date.
    On(NaiveDate),
    /// No due date until the first log is recorded.
    Unscheduled,
}

impl FirstDue {
    pub fn resolve(self, created_on: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
        match self {
            FirstDue::OneInterval => Some(crate::calendar::advance_date(created_on, frequency)),
            FirstDue::On(date) => Some(date),
            FirstDue::Unscheduled => None,
        }
    }
}

/// Input for [`crate::MaintenanceManager::add_schedule`].
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub equipment_id: EquipmentId,
    pub task_id: TaskId,
    pub frequency: Frequency,
    pub first_due: FirstDue,
}

/// Input for [`crate::MaintenanceManager::record_log`].
#[derive(Debug, Clone)]
pub struct NewLog {
    pub schedule_id: ScheduleId,
    pub performed_on: NaiveDate,
    pub status: LogStatus,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_frequencies_parse() {
        for f in Frequency::ALL {
            assert_eq!(Frequency::parse_lenient(f.as_str()), f);
        }
        assert_eq!(Frequency::parse_lenient(" Quarterly "), Frequency::Quarterly);
    }

    #[test]
    fn unknown_frequency_falls_back_to_monthly() {
        assert_eq!(Frequency::parse_lenient("fortnightly"), Frequency::Monthly);
        assert_eq!(Frequency::parse_lenient(""), Frequency::Monthly);
        assert_eq!(Frequency::from("yearly"), Frequency::Monthly);
    }

    #[test]
    fn frequency_deserializes_leniently() {
        let f: Frequency = serde_json::from_str("\"annual\"").expect("json");
        assert_eq!(f, Frequency::Annual);
        let f: Frequency = serde_json::from_str("\"every-other-tuesday\"").expect("json");
        assert_eq!(f, Frequency::Monthly);
        assert_eq!(serde_json::to_string(&Frequency::Biannual).expect("json"), "\"biannual\"");
    }

    #[test]
    fn first_due_resolution() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date");
        let fixed = NaiveDate::from_ymd_opt(2024, 3, 3).expect("valid date");
        assert_eq!(
            FirstDue::OneInterval.resolve(created, Frequency::Monthly),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(FirstDue::On(fixed).resolve(created, Frequency::Weekly), Some(fixed));
        assert_eq!(FirstDue::Unscheduled.resolve(created, Frequency::Weekly), None);
    }

    #[test]
    fn log_status_text_form() {
        assert_eq!(LogStatus::NeedsFollowUp.to_string(), "needs_follow_up");
        assert_eq!("incomplete".parse::<LogStatus>(), Ok(LogStatus::Incomplete));
        assert!("done".parse::<LogStatus>().is_err());
        assert_eq!(LogStatus::parse_lenient("done"), LogStatus::Completed);
        assert_eq!(LogStatus::parse_lenient("incomplete"), LogStatus::Incomplete);
    }
}
