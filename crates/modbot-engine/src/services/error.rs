//! Engine error types

use modbot_core::{DomainError, GatewayError, StoreError};

/// Application layer errors
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Domain rule violation (duplicate command, unknown warn id, ...)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Messaging gateway failure (recoverable, never retried by the core)
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Persistence collaborator failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Connecting to the platform failed; the bot stays disconnected
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Lifecycle misuse - indicates a bug in the host, not a runtime condition
    #[error("Illegal lifecycle transition: {0}")]
    IllegalState(&'static str),

    /// A feature's start hook failed; feature activation is aborted
    #[error("Feature '{name}' failed to start")]
    Feature {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use modbot_core::Snowflake;

    #[test]
    fn test_domain_error_passes_through() {
        let err = EngineError::from(DomainError::WarnNotFound(Snowflake::new(1)));
        assert_eq!(err.to_string(), "Warn not found: 1");
    }

    #[test]
    fn test_feature_error_names_the_feature() {
        let err = EngineError::Feature {
            name: "command-handler",
            source: anyhow::anyhow!("boom"),
        };
        assert!(err.to_string().contains("command-handler"));
    }
}
