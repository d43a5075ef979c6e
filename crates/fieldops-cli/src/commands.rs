use chrono::NaiveDate;
use fieldops_maintenance::{
    advance_date_str, Frequency, MaintenanceManager, NewEquipment, NewLog, NewSchedule, NewTask,
};

use crate::cli::{Command, EquipmentCommand, LogCommand, ScheduleCommand, TaskCommand};
use crate::format;

/// Dispatch one parsed command against the registries.
pub fn run(
    manager: &MaintenanceManager,
    command: Command,
    today: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Command::Equipment(cmd) => equipment(manager, cmd, json),
        Command::Task(cmd) => task(manager, cmd, json),
        Command::Schedule(cmd) => schedule(manager, cmd, today, json),
        Command::Log(cmd) => log(manager, cmd, today, json),
        Command::NextDue { date, frequency } => next_due(date, &frequency, json),
    }
}

/// Pure date arithmetic; needs no database.
pub fn next_due(date: NaiveDate, frequency: &str, json: bool) -> anyhow::Result<()> {
    let next = advance_date_str(date, frequency);
    if json {
        format::print_json(&serde_json::json!({
            "from": date,
            "frequency": frequency,
            "next_due": next,
        }))
    } else {
        println!("{next}");
        Ok(())
    }
}

fn equipment(manager: &MaintenanceManager, cmd: EquipmentCommand, json: bool) -> anyhow::Result<()> {
    match cmd {
        EquipmentCommand::Add {
            name,
            serial,
            location,
        } => {
            let equipment = manager.add_equipment(NewEquipment {
                name,
                serial_number: serial,
                location,
            })?;
            if json {
                return format::print_json(&equipment);
            }
            println!("{}", equipment.id);
        }
        EquipmentCommand::List => {
            let all = manager.list_equipment()?;
            if json {
                return format::print_json(&all);
            }
            format::print_equipment(&all);
        }
        EquipmentCommand::Remove { id } => {
            manager.remove_equipment(&id)?;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn task(manager: &MaintenanceManager, cmd: TaskCommand, json: bool) -> anyhow::Result<()> {
    match cmd {
        TaskCommand::Add {
            name,
            description,
            minutes,
        } => {
            let task = manager.add_task(NewTask {
                name,
                description,
                estimated_minutes: minutes,
            })?;
            if json {
                return format::print_json(&task);
            }
            println!("{}", task.id);
        }
        TaskCommand::List => {
            let all = manager.list_tasks()?;
            if json {
                return format::print_json(&all);
            }
            format::print_tasks(&all);
        }
        TaskCommand::Remove { id } => {
            manager.remove_task(&id)?;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn schedule(
    manager: &MaintenanceManager,
    cmd: ScheduleCommand,
    today: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    match cmd {
        ScheduleCommand::Add(args) => {
            let first_due = args.first_due();
            let schedule = manager.add_schedule(
                NewSchedule {
                    equipment_id: args.equipment_id,
                    task_id: args.task_id,
                    frequency: Frequency::parse_lenient(&args.frequency),
                    first_due,
                },
                today,
            )?;
            if json {
                return format::print_json(&format::ScheduleView::new(&schedule, today));
            }
            println!("{}", schedule.id);
        }
        ScheduleCommand::List { filter } => {
            let schedules = manager.list_schedules_filtered(filter, today)?;
            let views: Vec<_> = schedules
                .iter()
                .map(|s| format::ScheduleView::new(s, today))
                .collect();
            if json {
                return format::print_json(&views);
            }
            let equipment = manager.list_equipment()?;
            let tasks = manager.list_tasks()?;
            format::print_schedules(&views, &equipment, &tasks);
        }
        ScheduleCommand::Frequency { id, frequency } => {
            let schedule = manager.set_frequency(&id, Frequency::parse_lenient(&frequency))?;
            let view = format::ScheduleView::new(&schedule, today);
            if json {
                return format::print_json(&view);
            }
            println!("{} {} ({})", schedule.id, schedule.frequency, view.status);
        }
        ScheduleCommand::Due { id, date } => {
            let schedule = manager.set_next_due(&id, date)?;
            let view = format::ScheduleView::new(&schedule, today);
            if json {
                return format::print_json(&view);
            }
            println!(
                "{} next due {} ({})",
                schedule.id,
                format::opt_date(schedule.next_due),
                view.status
            );
        }
        ScheduleCommand::Remove { id } => {
            manager.remove_schedule(&id)?;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn log(manager: &MaintenanceManager, cmd: LogCommand, today: NaiveDate, json: bool) -> anyhow::Result<()> {
    match cmd {
        LogCommand::Record {
            schedule_id,
            date,
            status,
            notes,
        } => {
            let (log, schedule) = manager.record_log(NewLog {
                schedule_id,
                performed_on: date.unwrap_or(today),
                status,
                notes,
            })?;
            let view = format::ScheduleView::new(&schedule, today);
            if json {
                return format::print_json(&serde_json::json!({
                    "log": log,
                    "schedule": view,
                }));
            }
            println!("{}", log.id);
            println!(
                "next due {} ({})",
                format::opt_date(schedule.next_due),
                view.status
            );
        }
        LogCommand::List { schedule_id } => {
            let logs = manager.list_logs(&schedule_id)?;
            if json {
                return format::print_json(&logs);
            }
            format::print_logs(&logs);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScheduleAddArgs;
    use fieldops_maintenance::db::open_in_memory;
    use fieldops_maintenance::ScheduleFilter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn seeded() -> MaintenanceManager {
        let manager = MaintenanceManager::new(open_in_memory().expect("open"));
        manager
            .add_equipment(NewEquipment {
                name: "Air compressor".to_string(),
                ..Default::default()
            })
            .expect("equipment");
        manager
            .add_task(NewTask {
                name: "Drain tank".to_string(),
                ..Default::default()
            })
            .expect("task");
        manager
    }

    fn add_args(manager: &MaintenanceManager, unscheduled: bool) -> ScheduleAddArgs {
        ScheduleAddArgs {
            equipment_id: manager.list_equipment().expect("list")[0].id.clone(),
            task_id: manager.list_tasks().expect("list")[0].id.clone(),
            frequency: "weekly".to_string(),
            next_due: None,
            unscheduled,
        }
    }

    #[test]
    fn next_due_needs_no_database() {
        assert!(next_due(date(2024, 1, 31), "monthly", false).is_ok());
        assert!(next_due(date(2024, 1, 31), "fortnightly", true).is_ok());
    }

    #[test]
    fn added_schedule_shows_up_in_filtered_list() {
        let manager = seeded();
        let today = date(2024, 5, 20);
        let add = Command::Schedule(ScheduleCommand::Add(add_args(&manager, false)));
        run(&manager, add, date(2024, 5, 10), true).expect("add");

        // created 2024-05-10, weekly: due 2024-05-17, three days overdue
        let overdue = manager
            .list_schedules_filtered(ScheduleFilter::Overdue, today)
            .expect("list");
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].next_due, Some(date(2024, 5, 17)));

        let list = Command::Schedule(ScheduleCommand::List {
            filter: ScheduleFilter::Overdue,
        });
        run(&manager, list, today, false).expect("list");
    }

    #[test]
    fn unscheduled_flag_and_due_command() {
        let manager = seeded();
        let today = date(2024, 5, 20);
        let add = Command::Schedule(ScheduleCommand::Add(add_args(&manager, true)));
        run(&manager, add, today, false).expect("add");
        let id = manager.list_schedules().expect("list")[0].id.clone();
        assert_eq!(manager.get_schedule(&id).expect("get").next_due, None);

        let set = Command::Schedule(ScheduleCommand::Due {
            id: id.clone(),
            date: Some(date(2024, 6, 1)),
        });
        run(&manager, set, today, true).expect("set");
        assert_eq!(
            manager.get_schedule(&id).expect("get").next_due,
            Some(date(2024, 6, 1))
        );

        let clear = Command::Schedule(ScheduleCommand::Due { id: id.clone(), date: None });
        run(&manager, clear, today, false).expect("clear");
        assert_eq!(manager.get_schedule(&id).expect("get").next_due, None);
    }

    #[test]
    fn unknown_schedule_is_an_error() {
        let manager = seeded();
        let cmd = Command::Schedule(ScheduleCommand::Remove {
            id: fieldops_core::types::ScheduleId::new(),
        });
        assert!(run(&manager, cmd, date(2024, 5, 20), false).is_err());
    }
}
