//! Service context - dependency container for services
//!
//! Holds the collaborators and configuration every service needs. Built by
//! the bot lifecycle once the gateway connection is up.

use std::sync::Arc;

use modbot_common::BotConfig;
use modbot_core::{MessagingGateway, Snowflake, SnowflakeGenerator, UserStore};

/// Service context containing all dependencies
///
/// Provides access to:
/// - The messaging gateway (side-effecting platform requests)
/// - The user store (ledger persistence)
/// - Bot configuration (thresholds, governed roles, prefix)
/// - Snowflake generator for warn/punishment ids
#[derive(Clone)]
pub struct ServiceContext {
    gateway: Arc<dyn MessagingGateway>,
    store: Arc<dyn UserStore>,
    config: BotConfig,
    ids: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        store: Arc<dyn UserStore>,
        config: BotConfig,
        ids: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            gateway,
            store,
            config,
            ids,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn MessagingGateway> {
        &self.gateway
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Generate a new unique id for a warn or punishment
    pub fn generate_id(&self) -> Snowflake {
        self.ids.generate()
    }
}
