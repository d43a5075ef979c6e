use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::FieldOpsError;

/// Declares a UUIDv7-backed row identifier.
///
/// v7 ids sort by creation time, so `ORDER BY id` doubles as insertion order.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::str::FromStr for $name {
            type Err = FieldOpsError;

            /// Accepts any UUID spelling and normalises it to lowercase hyphenated form.
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(|u| Self(u.to_string()))
                    .map_err(|e| FieldOpsError::InvalidId(format!("{s}: {e}")))
            }
        }
    };
}

row_id!(
    /// Identifies one piece of serviced equipment.
    EquipmentId
);
row_id!(
    /// Identifies a reusable maintenance task definition.
    TaskId
);
row_id!(
    /// Identifies a recurring (equipment, task) obligation.
    ScheduleId
);
row_id!(
    /// Identifies one immutable maintenance log entry.
    LogId
);
