//! Test fixtures - recording gateway and configuration
//!
//! Provides reusable collaborator doubles for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use modbot_common::BotConfig;
use modbot_core::{
    EscalationThresholds, GatewayError, GovernedRoles, MessagingGateway, RoleCorrection, Snowflake,
};
use modbot_engine::ConnectionHandler;

pub const MEMBER_ROLE: Snowflake = Snowflake::new(1000);
pub const PUNISHED_ROLE: Snowflake = Snowflake::new(2000);
pub const MODERATOR: Snowflake = Snowflake::new(77);

/// Every side-effecting call made through the gateway, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Message(Snowflake, String),
    Correction(Snowflake, RoleCorrection),
    Expel(Snowflake, String),
}

/// A gateway that records calls instead of talking to a platform
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingGateway {
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_message(&self, channel_id: Snowflake, text: &str) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .push(GatewayCall::Message(channel_id, text.to_string()));
        Ok(())
    }

    async fn apply_role_correction(
        &self,
        user_id: Snowflake,
        correction: &RoleCorrection,
    ) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .push(GatewayCall::Correction(user_id, correction.clone()));
        Ok(())
    }

    async fn expel_user(&self, user_id: Snowflake, reason: &str) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .push(GatewayCall::Expel(user_id, reason.to_string()));
        Ok(())
    }
}

/// A connection handler that always hands out the same recording gateway
pub struct FixedConnection {
    pub gateway: Arc<RecordingGateway>,
}

#[async_trait]
impl ConnectionHandler for FixedConnection {
    async fn connect(&self) -> Result<Arc<dyn MessagingGateway>, GatewayError> {
        Ok(Arc::clone(&self.gateway) as Arc<dyn MessagingGateway>)
    }
}

/// Baseline configuration: thresholds {3, 5, 7}, no channel restrictions
pub fn test_config() -> BotConfig {
    BotConfig {
        prefix: "!".to_string(),
        roles: GovernedRoles {
            member_role: MEMBER_ROLE,
            punished_role: PUNISHED_ROLE,
        },
        thresholds: EscalationThresholds {
            first_auto_mute: 3,
            second_auto_mute: 5,
            auto_ban: 7,
        },
        command_channel: None,
        log_channel: None,
    }
}
