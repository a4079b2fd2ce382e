//! Error types for the sweep CLI.
//!
//! Only structural failures become a `SweepError`. Problems with a single
//! candidate are recorded on its `Operation` and never surface here.

use crate::exit_codes;
use thiserror::Error;

/// Structural error that aborts a sweep command.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Bad arguments, unusable project root, or invalid configuration.
    #[error("{0}")]
    UserError(String),

    /// The candidates document is missing, unreadable, or malformed.
    #[error("Candidate input error: {0}")]
    InputError(String),

    /// The dependency manifest could not be read or parsed.
    #[error("Dependency manifest error: {0}")]
    ManifestError(String),

    /// The backup root could not be prepared.
    #[error("Backup store error: {0}")]
    BackupError(String),

    /// The rollback manifest is missing or corrupt.
    #[error("Rollback failed: {0}")]
    RollbackError(String),
}

impl SweepError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::UserError(_) => exit_codes::USER_ERROR,
            SweepError::InputError(_) => exit_codes::INPUT_FAILURE,
            SweepError::ManifestError(_) => exit_codes::INPUT_FAILURE,
            SweepError::BackupError(_) => exit_codes::BACKUP_FAILURE,
            SweepError::RollbackError(_) => exit_codes::ROLLBACK_FAILURE,
        }
    }
}

/// Result type alias for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
