use std::collections::HashMap;

use chrono::NaiveDate;
use fieldops_maintenance::{
    classify_schedule, Equipment, MaintenanceLog, MaintenanceSchedule, MaintenanceTask,
    ScheduleStatus, StatusBucket,
};
use serde::Serialize;

/// A schedule together with its status as of a given day.
#[derive(Debug, Serialize)]
pub struct ScheduleView<'a> {
    #[serde(flatten)]
    pub schedule: &'a MaintenanceSchedule,
    pub status: ScheduleStatus,
    pub bucket: StatusBucket,
}

impl<'a> ScheduleView<'a> {
    pub fn new(schedule: &'a MaintenanceSchedule, today: NaiveDate) -> Self {
        let status = classify_schedule(schedule.next_due, today);
        let bucket = status.bucket();
        Self {
            schedule,
            status,
            bucket,
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn opt_text(text: Option<&str>) -> &str {
    text.unwrap_or("-")
}

pub fn print_equipment(all: &[Equipment]) {
    println!("{:<36}  {:<24}  {:<14}  LOCATION", "ID", "NAME", "SERIAL");
    for e in all {
        println!(
            "{:<36}  {:<24}  {:<14}  {}",
            e.id,
            e.name,
            opt_text(e.serial_number.as_deref()),
            opt_text(e.location.as_deref())
        );
    }
}

pub fn print_tasks(all: &[MaintenanceTask]) {
    println!("{:<36}  {:<28}  MINUTES", "ID", "NAME");
    for t in all {
        let minutes = t
            .estimated_minutes
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<36}  {:<28}  {}", t.id, t.name, minutes);
    }
}

pub fn print_schedules(views: &[ScheduleView<'_>], equipment: &[Equipment], tasks: &[MaintenanceTask]) {
    let equipment_names: HashMap<&str, &str> = equipment
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();
    let task_names: HashMap<&str, &str> = tasks
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    println!(
        "{:<36}  {:<20}  {:<20}  {:<9}  {:<10}  {:<10}  STATUS",
        "ID", "EQUIPMENT", "TASK", "FREQUENCY", "LAST", "NEXT DUE"
    );
    for v in views {
        let s = v.schedule;
        println!(
            "{:<36}  {:<20}  {:<20}  {:<9}  {:<10}  {:<10}  {}",
            s.id,
            name_or_id(&equipment_names, s.equipment_id.as_str()),
            name_or_id(&task_names, s.task_id.as_str()),
            s.frequency,
            opt_date(s.last_performed),
            opt_date(s.next_due),
            v.status
        );
    }
}

pub fn print_logs(logs: &[MaintenanceLog]) {
    println!("{:<36}  {:<10}  {:<15}  NOTES", "ID", "DATE", "STATUS");
    for l in logs {
        println!(
            "{:<36}  {:<10}  {:<15}  {}",
            l.id,
            l.performed_on,
            l.status,
            opt_text(l.notes.as_deref())
        );
    }
}

fn name_or_id<'a>(names: &HashMap<&str, &'a str>, id: &'a str) -> &'a str {
    names.get(id).copied().unwrap_or(id)
}
