//! Collaborator traits - the messaging gateway and the user store
//!
//! The core computes what to do and hands the side effects to these
//! collaborators. Retry, backoff, and rate limiting belong to the
//! implementations, never to the core.

use async_trait::async_trait;

use crate::entities::User;
use crate::moderation::RoleCorrection;
use crate::value_objects::Snowflake;

/// Failure reported by the messaging gateway
///
/// Recoverable: the core logs it and does not retry.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway is not connected")]
    NotConnected,

    #[error("gateway request failed: {0}")]
    Request(String),
}

/// Failure reported by the persistence collaborator
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user store is closed")]
    Closed,

    #[error("user store request failed: {0}")]
    Request(String),
}

/// The external messaging-platform connection
///
/// All calls are pure side-effecting requests from the core's perspective.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send a text message to a channel
    async fn send_message(&self, channel_id: Snowflake, text: &str) -> Result<(), GatewayError>;

    /// Apply a single role correction to a user
    async fn apply_role_correction(
        &self,
        user_id: Snowflake,
        correction: &RoleCorrection,
    ) -> Result<(), GatewayError>;

    /// Remove a user from the community entirely
    async fn expel_user(&self, user_id: Snowflake, reason: &str) -> Result<(), GatewayError>;
}

/// The persistence collaborator
///
/// The returned `User` is the live ledger: the core mutates it and relies on
/// `save_user` at checkpoints (command completion, shutdown). There is no
/// dirty-diff tracking.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load a user, creating an empty ledger on first observed interaction
    async fn load_user(&self, id: Snowflake) -> Result<User, StoreError>;

    /// Persist a user's ledger
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// Flush pending state and release the store
    async fn flush_and_close(&self) -> Result<(), StoreError>;
}
