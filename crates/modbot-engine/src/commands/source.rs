//! Command sources - who issued a command and how to answer them

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use modbot_core::{GatewayError, MessagingGateway, Permissions, Snowflake};

/// A command issuer: identity, permission check, reply capability
///
/// Created per invocation and discarded afterwards.
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Platform identity of the issuer (zero sentinel for the console)
    fn id(&self) -> Snowflake;

    /// Display name of the issuer
    fn name(&self) -> &str;

    /// Channel the command arrived in
    fn channel_id(&self) -> Snowflake;

    /// Whether the issuer may run a command gated behind `required`
    fn has_permission(&self, required: Permissions) -> bool;

    /// Send a reply to the issuer
    async fn reply(&self, text: &str) -> Result<(), GatewayError>;
}

/// The operator console as a command source - always authorized
pub struct ConsoleSource;

#[async_trait]
impl CommandSource for ConsoleSource {
    fn id(&self) -> Snowflake {
        Snowflake::new(0)
    }

    fn name(&self) -> &str {
        "console"
    }

    fn channel_id(&self) -> Snowflake {
        Snowflake::new(0)
    }

    fn has_permission(&self, _required: Permissions) -> bool {
        true
    }

    async fn reply(&self, text: &str) -> Result<(), GatewayError> {
        info!(target: "console", "{text}");
        Ok(())
    }
}

/// A platform member as a command source
///
/// Permissions are resolved from the member's roles by the host before
/// construction; the core never performs the role lookup itself.
pub struct MemberSource {
    user_id: Snowflake,
    name: String,
    channel_id: Snowflake,
    permissions: Permissions,
    gateway: Arc<dyn MessagingGateway>,
}

impl MemberSource {
    pub fn new(
        user_id: Snowflake,
        name: impl Into<String>,
        channel_id: Snowflake,
        permissions: Permissions,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            channel_id,
            permissions,
            gateway,
        }
    }
}

#[async_trait]
impl CommandSource for MemberSource {
    fn id(&self) -> Snowflake {
        self.user_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    fn has_permission(&self, required: Permissions) -> bool {
        self.permissions.has(required)
    }

    async fn reply(&self, text: &str) -> Result<(), GatewayError> {
        self.gateway.send_message(self.channel_id, text).await
    }
}
