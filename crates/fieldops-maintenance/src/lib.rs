//! `fieldops-maintenance` — recurring maintenance schedules with SQLite persistence.
//!
//! # Overview
//!
//! A schedule pairs one piece of equipment with one task and a
//! [`Frequency`]. Recording a log against it sets `last_performed` and
//! advances `next_due` by one interval, atomically with the log insert.
//! Status labels ("Overdue by 3 days", "Due in 2 weeks") are computed on read
//! from an explicit `today`.
//!
//! # Frequencies
//!
//! | Variant     | Advance by         |
//! |-------------|--------------------|
//! | `Weekly`    | 7 days             |
//! | `Monthly`   | 1 calendar month   |
//! | `Quarterly` | 3 calendar months  |
//! | `Biannual`  | 6 calendar months  |
//! | `Annual`    | 12 calendar months |
//!
//! Unknown frequency text is treated as `Monthly`.

pub mod calendar;
pub mod db;
pub mod error;
pub mod manager;
pub mod status;
pub mod types;

pub use calendar::{advance_date, advance_date_str, on_log_recorded};
pub use error::{MaintenanceError, Result};
pub use manager::MaintenanceManager;
pub use status::{
    classify_schedule, classify_schedule_at, ScheduleFilter, ScheduleStatus, Severity, StatusBucket,
};
pub use types::{
    Equipment, FirstDue, Frequency, LogStatus, MaintenanceLog, MaintenanceSchedule, MaintenanceTask,
    NewEquipment, NewLog, NewSchedule, NewTask,
};
