use thiserror::Error;

/// Errors that can occur within the maintenance registries.
///
/// The scheduling calculator itself never fails; every variant here comes
/// from persistence or from caller-supplied references.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No row of the given kind exists with this ID.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A schedule already pairs this equipment with this task.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A stored or supplied value could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another thread panicked while holding the connection.
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl MaintenanceError {
    pub(crate) fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        MaintenanceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MaintenanceError>;
