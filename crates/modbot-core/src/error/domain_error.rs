//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Warn not found: {0}")]
    WarnNotFound(Snowflake),

    #[error("Punishment not found: {0}")]
    PunishmentNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Registration Conflicts
    // =========================================================================
    #[error("Command name or alias already registered: {name}")]
    DuplicateCommand { name: String },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Get an error code string for user-facing messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::WarnNotFound(_) => "UNKNOWN_WARN",
            Self::PunishmentNotFound(_) => "UNKNOWN_PUNISHMENT",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::DuplicateCommand { .. } => "DUPLICATE_COMMAND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Check if this is a "not found" error (recoverable, reported to the
    /// issuing source)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::WarnNotFound(_) | Self::PunishmentNotFound(_) | Self::UserNotFound(_)
        )
    }
}
