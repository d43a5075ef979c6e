//! `fieldops-core` — configuration, errors and identifiers shared by the
//! fieldops crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::FieldOpsConfig;
pub use error::{FieldOpsError, Result};
pub use types::{EquipmentId, LogId, ScheduleId, TaskId};
