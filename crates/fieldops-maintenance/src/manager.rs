use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use fieldops_core::types::{EquipmentId, LogId, ScheduleId, TaskId};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, instrument};

use crate::{
    calendar::{advance_date, anchor_date, on_log_recorded},
    error::{MaintenanceError, Result},
    status::ScheduleFilter,
    types::{
        Equipment, Frequency, MaintenanceLog, MaintenanceSchedule, MaintenanceTask, NewEquipment,
        FirstDue, LogStatus, NewLog, NewSchedule, NewTask,
    },
};

const EQUIPMENT_COLUMNS: &str = "id, name, serial_number, location, created_at, updated_at";
const TASK_COLUMNS: &str = "id, name, description, estimated_minutes, created_at, updated_at";
const SCHEDULE_COLUMNS: &str = "id, equipment_id, task_id, frequency, last_performed, next_due,
                                created_on, created_at, updated_at";
const LOG_COLUMNS: &str = "id, schedule_id, performed_on, status, notes, created_at";

/// Registries for equipment, tasks, schedules and logs.
///
/// Wraps a single SQLite connection in a `Mutex`. Every method is one
/// request/response round trip; there is no background work.
pub struct MaintenanceManager {
    db: Mutex<Connection>,
}

impl MaintenanceManager {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| MaintenanceError::LockPoisoned)
    }

    // --- equipment ---------------------------------------------------------

    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn add_equipment(&self, new: NewEquipment) -> Result<Equipment> {
        let name = required("equipment name", &new.name)?;
        let now = Utc::now().to_rfc3339();
        let equipment = Equipment {
            id: EquipmentId::new(),
            name,
            serial_number: new.serial_number,
            location: new.location,
            created_at: now.clone(),
            updated_at: now,
        };

        self.conn()?.execute(
            "INSERT INTO equipment (id, name, serial_number, location, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![
                equipment.id.as_str(),
                equipment.name,
                equipment.serial_number,
                equipment.location,
                equipment.created_at,
            ],
        )?;
        info!(equipment_id = %equipment.id, "equipment added");
        Ok(equipment)
    }

    pub fn get_equipment(&self, id: &EquipmentId) -> Result<Equipment> {
        self.conn()?
            .query_row(
                &format!("SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE id = ?1"),
                [id.as_str()],
                row_to_equipment,
            )
            .optional()?
            .ok_or_else(|| MaintenanceError::not_found("equipment", id))
    }

    /// All equipment, alphabetically by name.
    pub fn list_equipment(&self) -> Result<Vec<Equipment>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment ORDER BY name, id"
        ))?;
        let rows = stmt.query_map([], row_to_equipment)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete equipment together with its schedules and their logs.
    #[instrument(skip(self), fields(equipment_id = %id))]
    pub fn remove_equipment(&self, id: &EquipmentId) -> Result<()> {
        let n = self
            .conn()?
            .execute("DELETE FROM equipment WHERE id = ?1", [id.as_str()])?;
        if n == 0 {
            return Err(MaintenanceError::not_found("equipment", id));
        }
        info!("equipment removed");
        Ok(())
    }

    // --- tasks -------------------------------------------------------------

    #[instrument(skip(self, new), fields(name = %new.name))]
    pub fn add_task(&self, new: NewTask) -> Result<MaintenanceTask> {
        let name = required("task name", &new.name)?;
        let now = Utc::now().to_rfc3339();
        let task = MaintenanceTask {
            id: TaskId::new(),
            name,
            description: new.description,
            estimated_minutes: new.estimated_minutes,
            created_at: now.clone(),
            updated_at: now,
        };

        self.conn()?.execute(
            "INSERT INTO maintenance_tasks
             (id, name, description, estimated_minutes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![
                task.id.as_str(),
                task.name,
                task.description,
                task.estimated_minutes,
                task.created_at,
            ],
        )?;
        info!(task_id = %task.id, "task added");
        Ok(task)
    }

    pub fn get_task(&self, id: &TaskId) -> Result<MaintenanceTask> {
        self.conn()?
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM maintenance_tasks WHERE id = ?1"),
                [id.as_str()],
                row_to_task,
            )
            .optional()?
            .ok_or_else(|| MaintenanceError::not_found("task", id))
    }

    pub fn list_tasks(&self) -> Result<Vec<MaintenanceTask>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM maintenance_tasks ORDER BY name, id"
        ))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete a task together with its schedules and their logs.
    #[instrument(skip(self), fields(task_id = %id))]
    pub fn remove_task(&self, id: &TaskId) -> Result<()> {
        let n = self
            .conn()?
            .execute("DELETE FROM maintenance_tasks WHERE id = ?1", [id.as_str()])?;
        if n == 0 {
            return Err(MaintenanceError::not_found("task", id));
        }
        info!("task removed");
        Ok(())
    }

    // --- schedules ---------------------------------------------------------

    /// Pair a piece of equipment with a task at a frequency.
    ///
    /// `today` is the creation date; [`FirstDue`] decides the first due date
    /// relative to it.
    #[instrument(skip(self, new), fields(equipment_id = %new.equipment_id, task_id = %new.task_id, frequency = %new.frequency))]
    pub fn add_schedule(&self, new: NewSchedule, today: NaiveDate) -> Result<MaintenanceSchedule> {
        let db = self.conn()?;
        ensure_exists(&db, "equipment", "equipment", new.equipment_id.as_str())?;
        ensure_exists(&db, "maintenance_tasks", "task", new.task_id.as_str())?;

        let now = Utc::now().to_rfc3339();
        let schedule = MaintenanceSchedule {
            id: ScheduleId::new(),
            next_due: new.first_due.resolve(today, new.frequency),
            equipment_id: new.equipment_id,
            task_id: new.task_id,
            frequency: new.frequency,
            last_performed: None,
            created_on: today,
            created_at: now.clone(),
            updated_at: now,
        };

        let inserted = db.execute(
            "INSERT INTO maintenance_schedules
             (id, equipment_id, task_id, frequency, last_performed, next_due,
              created_on, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?7)",
            rusqlite::params![
                schedule.id.as_str(),
                schedule.equipment_id.as_str(),
                schedule.task_id.as_str(),
                schedule.frequency.as_str(),
                schedule.next_due,
                schedule.created_on,
                schedule.created_at,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(MaintenanceError::AlreadyExists(format!(
                    "schedule for equipment {} and task {}",
                    schedule.equipment_id, schedule.task_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        info!(schedule_id = %schedule.id, next_due = ?schedule.next_due, "schedule added");
        Ok(schedule)
    }

    pub fn get_schedule(&self, id: &ScheduleId) -> Result<MaintenanceSchedule> {
        let db = self.conn()?;
        fetch_schedule(&db, id)
    }

    /// All schedules, soonest due first; unscheduled rows last.
    pub fn list_schedules(&self) -> Result<Vec<MaintenanceSchedule>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM maintenance_schedules
             ORDER BY next_due IS NULL, next_due, created_at"
        ))?;
        let rows = stmt.query_map([], row_to_schedule)?;
        let schedules = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = schedules.len(), "schedules listed");
        Ok(schedules)
    }

    /// Schedules matching `filter` as of `today`, in [`Self::list_schedules`] order.
    pub fn list_schedules_filtered(
        &self,
        filter: ScheduleFilter,
        today: NaiveDate,
    ) -> Result<Vec<MaintenanceSchedule>> {
        Ok(self
            .list_schedules()?
            .into_iter()
            .filter(|s| filter.matches(s, today))
            .collect())
    }

    /// Schedules attached to one piece of equipment.
    pub fn list_schedules_for_equipment(&self, id: &EquipmentId) -> Result<Vec<MaintenanceSchedule>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM maintenance_schedules
             WHERE equipment_id = ?1
             ORDER BY next_due IS NULL, next_due, created_at"
        ))?;
        let rows = stmt.query_map([id.as_str()], row_to_schedule)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Change a schedule's frequency and recompute `next_due` from its last
    /// visit (or its creation date when it has never been performed).
    /// An unscheduled schedule stays unscheduled.
    #[instrument(skip(self), fields(schedule_id = %id, frequency = %frequency))]
    pub fn set_frequency(&self, id: &ScheduleId, frequency: Frequency) -> Result<MaintenanceSchedule> {
        let db = self.conn()?;
        let current = fetch_schedule(&db, id)?;
        let next_due = current
            .next_due
            .map(|_| advance_date(anchor_date(&current), frequency));
        let updated = MaintenanceSchedule {
            frequency,
            next_due,
            updated_at: Utc::now().to_rfc3339(),
            ..current
        };
        db.execute(
            "UPDATE maintenance_schedules
             SET frequency = ?1, next_due = ?2, updated_at = ?3
             WHERE id = ?4",
            rusqlite::params![
                updated.frequency.as_str(),
                updated.next_due,
                updated.updated_at,
                id.as_str(),
            ],
        )?;
        info!(next_due = ?updated.next_due, "schedule frequency changed");
        Ok(updated)
    }

    /// Override the next due date. `None` leaves the schedule unscheduled
    /// until its next log.
    #[instrument(skip(self), fields(schedule_id = %id))]
    pub fn set_next_due(&self, id: &ScheduleId, next_due: Option<NaiveDate>) -> Result<MaintenanceSchedule> {
        let db = self.conn()?;
        let current = fetch_schedule(&db, id)?;
        let updated = MaintenanceSchedule {
            next_due,
            updated_at: Utc::now().to_rfc3339(),
            ..current
        };
        db.execute(
            "UPDATE maintenance_schedules SET next_due = ?1, updated_at = ?2 WHERE id = ?3",
            rusqlite::params![updated.next_due, updated.updated_at, id.as_str()],
        )?;
        info!(next_due = ?updated.next_due, "schedule due date set");
        Ok(updated)
    }

    /// Delete a schedule and its logs.
    #[instrument(skip(self), fields(schedule_id = %id))]
    pub fn remove_schedule(&self, id: &ScheduleId) -> Result<()> {
        let n = self
            .conn()?
            .execute("DELETE FROM maintenance_schedules WHERE id = ?1", [id.as_str()])?;
        if n == 0 {
            return Err(MaintenanceError::not_found("schedule", id));
        }
        info!("schedule removed");
        Ok(())
    }

    // --- logs --------------------------------------------------------------

    /// Record a visit and roll the schedule forward.
    ///
    /// The log insert and the schedule update share one transaction: if
    /// either write fails neither is visible, and the error is returned
    /// with nothing persisted.
    #[instrument(skip(self, new), fields(schedule_id = %new.schedule_id, performed_on = %new.performed_on, status = %new.status))]
    pub fn record_log(&self, new: NewLog) -> Result<(MaintenanceLog, MaintenanceSchedule)> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;

        let schedule = fetch_schedule(&tx, &new.schedule_id)?;
        let now = Utc::now().to_rfc3339();
        let log = MaintenanceLog {
            id: LogId::new(),
            schedule_id: new.schedule_id,
            performed_on: new.performed_on,
            status: new.status,
            notes: new.notes,
            created_at: now.clone(),
        };

        tx.execute(
            "INSERT INTO maintenance_logs (id, schedule_id, performed_on, status, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                log.id.as_str(),
                log.schedule_id.as_str(),
                log.performed_on,
                log.status.to_string(),
                log.notes,
                log.created_at,
            ],
        )?;

        let updated = MaintenanceSchedule {
            updated_at: now,
            ..on_log_recorded(&schedule, log.performed_on)
        };
        tx.execute(
            "UPDATE maintenance_schedules
             SET last_performed = ?1, next_due = ?2, updated_at = ?3
             WHERE id = ?4",
            rusqlite::params![
                updated.last_performed,
                updated.next_due,
                updated.updated_at,
                updated.id.as_str(),
            ],
        )?;
        tx.commit()?;

        info!(log_id = %log.id, next_due = ?updated.next_due, "maintenance logged");
        Ok((log, updated))
    }

    /// Logs for a schedule, most recent visit first.
    pub fn list_logs(&self, schedule_id: &ScheduleId) -> Result<Vec<MaintenanceLog>> {
        let db = self.conn()?;
        ensure_exists(&db, "maintenance_schedules", "schedule", schedule_id.as_str())?;
        let mut stmt = db.prepare(&format!(
            "SELECT {LOG_COLUMNS} FROM maintenance_logs
             WHERE schedule_id = ?1
             ORDER BY performed_on DESC, created_at DESC"
        ))?;
        let rows = stmt.query_map([schedule_id.as_str()], row_to_log)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

// --- private helpers -------------------------------------------------------

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MaintenanceError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn ensure_exists(db: &Connection, table: &str, kind: &'static str, id: &str) -> Result<()> {
    let found = db
        .query_row(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id], |_| Ok(()))
        .optional()?;
    found.ok_or_else(|| MaintenanceError::not_found(kind, id))
}

fn fetch_schedule(db: &Connection, id: &ScheduleId) -> Result<MaintenanceSchedule> {
    db.query_row(
        &format!("SELECT {SCHEDULE_COLUMNS} FROM maintenance_schedules WHERE id = ?1"),
        [id.as_str()],
        row_to_schedule,
    )
    .optional()?
    .ok_or_else(|| MaintenanceError::not_found("schedule", id))
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn row_to_equipment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: EquipmentId(row.get(0)?),
        name: row.get(1)?,
        serial_number: row.get(2)?,
        location: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<MaintenanceTask> {
    Ok(MaintenanceTask {
        id: TaskId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        estimated_minutes: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Column order from SCHEDULE_COLUMNS. Frequency is read leniently.
fn row_to_schedule(row: &rusqlite::Row<'_>) -> rusqlite::Result<MaintenanceSchedule> {
    Ok(MaintenanceSchedule {
        id: ScheduleId(row.get(0)?),
        equipment_id: EquipmentId(row.get(1)?),
        task_id: TaskId(row.get(2)?),
        frequency: Frequency::parse_lenient(&row.get::<_, String>(3)?),
        last_performed: row.get(4)?,
        next_due: row.get(5)?,
        created_on: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<MaintenanceLog> {
    Ok(MaintenanceLog {
        id: LogId(row.get(0)?),
        schedule_id: ScheduleId(row.get(1)?),
        performed_on: row.get(2)?,
        status: LogStatus::parse_lenient(&row.get::<_, String>(3)?),
        notes: row.get(4)?,
        created_at: row.get(5)?,
    })
}
