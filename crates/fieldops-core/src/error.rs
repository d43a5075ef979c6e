use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldOpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl FieldOpsError {
    /// Short error code string printed by the CLI next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            FieldOpsError::Config(_) => "CONFIG_ERROR",
            FieldOpsError::InvalidId(_) => "INVALID_ID",
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldOpsError>;
