use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Open (or create) the database at `path` and run migrations.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    info!(path = %path.display(), "opening SQLite database");
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    configure(&conn)?;
    Ok(conn)
}

/// In-memory database with the full schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    init_db(conn)
}

/// Initialise the maintenance schema in `conn`. Safe to call on every
/// startup — CREATE IF NOT EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_equipment_table(conn)?;
    create_tasks_table(conn)?;
    create_schedules_table(conn)?;
    create_logs_table(conn)?;
    Ok(())
}

fn create_equipment_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS equipment (
            id              TEXT PRIMARY KEY NOT NULL,
            name            TEXT NOT NULL,
            serial_number   TEXT,
            location        TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );",
    )?;
    Ok(())
}

fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS maintenance_tasks (
            id                  TEXT PRIMARY KEY NOT NULL,
            name                TEXT NOT NULL,
            description         TEXT,
            estimated_minutes   INTEGER,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );",
    )?;
    Ok(())
}

fn create_schedules_table(conn: &Connection) -> Result<()> {
    // frequency is free text: rows written by older clients may hold values
    // outside the five known spellings and are read leniently.
    // idx_schedules_next_due serves the due-date ordering of every list query.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS maintenance_schedules (
            id              TEXT PRIMARY KEY NOT NULL,
            equipment_id    TEXT NOT NULL REFERENCES equipment(id) ON DELETE CASCADE,
            task_id         TEXT NOT NULL REFERENCES maintenance_tasks(id) ON DELETE CASCADE,
            frequency       TEXT NOT NULL DEFAULT 'monthly',
            last_performed  TEXT,               -- YYYY-MM-DD or NULL
            next_due        TEXT,               -- YYYY-MM-DD or NULL
            created_on      TEXT NOT NULL,      -- YYYY-MM-DD
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            UNIQUE(equipment_id, task_id)
        );
        CREATE INDEX IF NOT EXISTS idx_schedules_next_due
            ON maintenance_schedules (next_due);",
    )?;
    Ok(())
}

fn create_logs_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS maintenance_logs (
            id              TEXT PRIMARY KEY NOT NULL,
            schedule_id     TEXT NOT NULL REFERENCES maintenance_schedules(id) ON DELETE CASCADE,
            performed_on    TEXT NOT NULL,      -- YYYY-MM-DD
            status          TEXT NOT NULL DEFAULT 'completed',
            notes           TEXT,
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_logs_schedule
            ON maintenance_logs (schedule_id, performed_on);",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = open_in_memory().expect("open");
        init_db(&conn).expect("second init");
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('equipment', 'maintenance_tasks',
                              'maintenance_schedules', 'maintenance_logs')",
                [],
                |row| row.get(0),
            )
            .expect("count");
        assert_eq!(tables, 4);
    }

    #[test]
    fn foreign_keys_enforced() {
        let conn = open_in_memory().expect("open");
        let err = conn.execute(
            "INSERT INTO maintenance_logs (id, schedule_id, performed_on, created_at)
             VALUES ('l1', 'missing', '2024-01-01', '2024-01-01T00:00:00Z')",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn file_database_persists_schema() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fieldops.db");
        drop(open(&path).expect("open"));
        let conn = open(&path).expect("reopen");
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM equipment", [], |row| row.get(0))
            .expect("count");
        assert_eq!(n, 0);
    }
}
