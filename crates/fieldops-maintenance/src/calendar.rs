use chrono::{Days, Months, NaiveDate};

use crate::types::{Frequency, MaintenanceSchedule};

/// Compute the next due date one `frequency` interval after `reference`.
///
/// Month-based intervals use chrono's calendar arithmetic, which clamps to the
/// last day of a shorter target month: 2024-01-31 + 1 month is 2024-02-29,
/// and 2024-02-29 + 1 year is 2025-02-28.
///
/// Never fails. A result past the end of chrono's date range saturates to
/// [`NaiveDate::MAX`].
pub fn advance_date(reference: NaiveDate, frequency: Frequency) -> NaiveDate {
    let next = match frequency {
        Frequency::Weekly => reference.checked_add_days(Days::new(7)),
        Frequency::Monthly => reference.checked_add_months(Months::new(1)),
        Frequency::Quarterly => reference.checked_add_months(Months::new(3)),
        Frequency::Biannual => reference.checked_add_months(Months::new(6)),
        Frequency::Annual => reference.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(NaiveDate::MAX)
}

/// [`advance_date`] for a frequency that arrives as text (form field or
/// stored column). Unknown spellings advance by one month.
pub fn advance_date_str(reference: NaiveDate, frequency: &str) -> NaiveDate {
    advance_date(reference, Frequency::parse_lenient(frequency))
}

/// Apply a newly recorded visit to `schedule`.
///
/// Returns the schedule with `last_performed` set to `performed_on` and
/// `next_due` one interval later. The caller persists the result in the same
/// transaction as the log row.
pub fn on_log_recorded(schedule: &MaintenanceSchedule, performed_on: NaiveDate) -> MaintenanceSchedule {
    MaintenanceSchedule {
        last_performed: Some(performed_on),
        next_due: Some(advance_date(performed_on, schedule.frequency)),
        ..schedule.clone()
    }
}

/// Date the schedule's `next_due` is derived from when no log overrides it.
pub fn anchor_date(schedule: &MaintenanceSchedule) -> NaiveDate {
    schedule.last_performed.unwrap_or(schedule.created_on)
}
