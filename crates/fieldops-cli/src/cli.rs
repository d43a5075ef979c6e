use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fieldops_core::types::{EquipmentId, ScheduleId, TaskId};
use fieldops_maintenance::{FirstDue, LogStatus, ScheduleFilter};

/// Maintenance schedules for field equipment.
#[derive(Debug, Parser)]
#[command(name = "fieldops", version)]
pub struct Cli {
    /// Config file (default: $FIELDOPS_CONFIG, then ~/.fieldops/fieldops.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// SQLite database path, overriding `database.path` from config.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Date to classify schedules against (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage equipment.
    #[command(subcommand)]
    Equipment(EquipmentCommand),
    /// Manage task definitions.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage recurring schedules.
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Record and inspect maintenance visits.
    #[command(subcommand)]
    Log(LogCommand),
    /// Print the due date one interval after DATE.
    NextDue {
        date: NaiveDate,
        /// weekly, monthly, quarterly, biannual or annual (anything else: monthly).
        frequency: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum EquipmentCommand {
    Add {
        name: String,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    List,
    Remove { id: EquipmentId },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Estimated duration in minutes.
        #[arg(long)]
        minutes: Option<u32>,
    },
    List,
    Remove { id: TaskId },
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    Add(ScheduleAddArgs),
    List {
        /// all, overdue, upcoming or completed.
        #[arg(long, default_value_t = ScheduleFilter::All)]
        filter: ScheduleFilter,
    },
    /// Change the frequency and recompute the next due date.
    Frequency { id: ScheduleId, frequency: String },
    /// Set the next due date, or clear it when DATE is omitted.
    Due { id: ScheduleId, date: Option<NaiveDate> },
    Remove { id: ScheduleId },
}

#[derive(Debug, Args)]
pub struct ScheduleAddArgs {
    pub equipment_id: EquipmentId,
    pub task_id: TaskId,
    pub frequency: String,
    /// First due date; defaults to one interval from today.
    #[arg(long)]
    pub next_due: Option<NaiveDate>,
    /// Leave the schedule without a due date until the first log.
    #[arg(long, conflicts_with = "next_due")]
    pub unscheduled: bool,
}

impl ScheduleAddArgs {
    pub fn first_due(&self) -> FirstDue {
        match (self.next_due, self.unscheduled) {
            (Some(date), _) => FirstDue::On(date),
            (None, true) => FirstDue::Unscheduled,
            (None, false) => FirstDue::OneInterval,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    Record {
        schedule_id: ScheduleId,
        /// Date performed (default: today).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// completed, incomplete or needs_follow_up.
        #[arg(long, default_value_t = LogStatus::Completed)]
        status: LogStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    List { schedule_id: ScheduleId },
}
