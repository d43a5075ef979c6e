// Pin the date arithmetic and status labels the dashboard depends on.
// A change to any value here changes what operators see.

use chrono::{Duration, NaiveDate};
use fieldops_maintenance::db::open_in_memory;
use fieldops_maintenance::{
    advance_date, advance_date_str, classify_schedule, FirstDue, Frequency, LogStatus, MaintenanceManager,
    NewEquipment, NewLog, NewSchedule, NewTask, Severity,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn weekly_is_always_seven_days() {
    let mut d = date(2023, 12, 1);
    while d < date(2025, 1, 31) {
        assert_eq!(advance_date(d, Frequency::Weekly), d + Duration::days(7));
        d += Duration::days(1);
    }
}

#[test]
fn month_end_overflow_is_clamped() {
    assert_eq!(advance_date(date(2024, 1, 31), Frequency::Monthly), date(2024, 2, 29));
    assert_eq!(advance_date(date(2024, 2, 29), Frequency::Annual), date(2025, 2, 28));
}

#[test]
fn unknown_frequency_is_monthly() {
    assert_eq!(advance_date_str(date(2024, 3, 15), "hourly"), date(2024, 4, 15));
}

#[test]
fn status_labels() {
    let today = date(2024, 7, 4);
    let check = |due: Option<NaiveDate>, label: &str, severity: Severity| {
        let s = classify_schedule(due, today);
        assert_eq!(s.label, label);
        assert_eq!(s.severity, severity);
    };
    check(None, "Not scheduled", Severity::Neutral);
    check(Some(today - Duration::days(5)), "Overdue by 5 days", Severity::Critical);
    check(Some(today), "Due today", Severity::Warning);
    check(Some(today + Duration::days(1)), "Due tomorrow", Severity::Warning);
    check(Some(today + Duration::days(10)), "Due in 1 weeks", Severity::OnTrack);
}

#[test]
fn quarterly_log_sets_next_due() {
    let manager = MaintenanceManager::new(open_in_memory().unwrap());
    let equipment = manager
        .add_equipment(NewEquipment {
            name: "Forklift 7".to_string(),
            ..Default::default()
        })
        .unwrap();
    let task = manager
        .add_task(NewTask {
            name: "Hydraulic fluid check".to_string(),
            ..Default::default()
        })
        .unwrap();
    let schedule = manager
        .add_schedule(
            NewSchedule {
                equipment_id: equipment.id,
                task_id: task.id,
                frequency: Frequency::Quarterly,
                first_due: FirstDue::OneInterval,
            },
            date(2024, 2, 1),
        )
        .unwrap();
    assert_eq!(schedule.last_performed, None);

    let (_, updated) = manager
        .record_log(NewLog {
            schedule_id: schedule.id.clone(),
            performed_on: date(2024, 3, 1),
            status: LogStatus::Completed,
            notes: None,
        })
        .unwrap();

    assert_eq!(updated.last_performed, Some(date(2024, 3, 1)));
    assert_eq!(updated.next_due, Some(date(2024, 6, 1)));
    assert_eq!(manager.get_schedule(&schedule.id).unwrap(), updated);
}
