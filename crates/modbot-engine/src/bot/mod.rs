//! Bot lifecycle - connection state machine and command dispatch
//!
//! State transitions are strict: Disconnected -> Connecting -> Connected
//! -> Running -> ShuttingDown -> Disconnected. A transition attempted from
//! the wrong state is an error, never a silent no-op, with one exception:
//! a failed shutdown may be retried from ShuttingDown.

mod features;

pub use features::{BotFeature, ChannelGateFeature, CommandHandlerFeature, LoggerFeature};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use modbot_common::BotConfig;
use modbot_core::events::CommandPreProcessEvent;
use modbot_core::{
    GatewayError, MessagingGateway, ModEvent, SnowflakeGenerator, StoreError, UserStore,
};

use crate::bus::EventBus;
use crate::commands::{CommandContext, CommandRegistry, CommandSource};
use crate::services::{EngineError, EngineResult, ModerationService, ServiceContext};

/// Lifecycle states of the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Disconnected,
    Connecting,
    Connected,
    Running,
    ShuttingDown,
}

/// Establishes the platform connection
///
/// Implemented by the host binary against the real platform SDK; tests
/// provide a stub returning a mock gateway.
#[async_trait]
pub trait ConnectionHandler: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn MessagingGateway>, GatewayError>;
}

/// What happened to a dispatched command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No prefix, or no command registered under that name
    NotFound,
    /// A bus listener cancelled the pre-process event
    Cancelled,
    /// The source lacks the command's required permission
    Denied,
    /// The handler returned an error (already reported to the source)
    Failed,
    Completed,
}

/// The bot: configuration, collaborators, registry, bus, and lifecycle state
pub struct Bot {
    state: BotState,
    config: BotConfig,
    store: Arc<dyn UserStore>,
    gateway: Option<Arc<dyn MessagingGateway>>,
    ctx: Option<ServiceContext>,
    registry: CommandRegistry,
    bus: EventBus,
    started_at: DateTime<Utc>,
}

impl Bot {
    /// Create a disconnected bot
    pub fn new(config: BotConfig, store: Arc<dyn UserStore>) -> Self {
        let registry = CommandRegistry::new(config.prefix.clone());
        Self {
            state: BotState::Disconnected,
            config,
            store,
            gateway: None,
            ctx: None,
            registry,
            bus: EventBus::new(),
            started_at: Utc::now(),
        }
    }

    pub fn state(&self) -> BotState {
        self.state
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Mutable registry access, used by features during activation
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable bus access, used by features during activation
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Establish the platform connection
    ///
    /// On failure the bot returns to Disconnected and may retry.
    #[instrument(skip_all)]
    pub async fn connect(&mut self, handler: &dyn ConnectionHandler) -> EngineResult<()> {
        if self.state != BotState::Disconnected {
            return Err(EngineError::IllegalState(
                "connect requires the Disconnected state",
            ));
        }
        self.state = BotState::Connecting;

        let gateway = match handler.connect().await {
            Ok(gateway) => gateway,
            Err(err) => {
                self.state = BotState::Disconnected;
                warn!(error = %err, "connection attempt failed");
                return Err(EngineError::Connection(err.to_string()));
            }
        };

        self.ctx = Some(ServiceContext::new(
            Arc::clone(&gateway),
            Arc::clone(&self.store),
            self.config.clone(),
            Arc::new(SnowflakeGenerator::new(0)),
        ));
        self.gateway = Some(gateway);
        self.state = BotState::Connected;
        info!("gateway connection established");
        Ok(())
    }

    /// Activate features and move to Running
    ///
    /// Features run in order; a feature whose `is_applicable_to` returns
    /// false is skipped. The first failing feature aborts activation and the
    /// bot stays Connected.
    #[instrument(skip_all)]
    pub async fn activate_features(
        &mut self,
        features: Vec<Box<dyn BotFeature>>,
    ) -> EngineResult<()> {
        if self.state != BotState::Connected {
            return Err(EngineError::IllegalState(
                "feature activation requires the Connected state",
            ));
        }

        for feature in features {
            if !feature.is_applicable_to(self) {
                info!(feature = feature.name(), "feature not applicable, skipped");
                continue;
            }
            feature
                .on_start(self)
                .await
                .map_err(|source| EngineError::Feature {
                    name: feature.name(),
                    source,
                })?;
            info!(feature = feature.name(), "feature activated");
        }

        self.started_at = Utc::now();
        self.state = BotState::Running;
        Ok(())
    }

    /// Dispatch one raw command line from a source
    #[instrument(skip(self, line, source), fields(source_id = %source.id()))]
    pub async fn dispatch(
        &self,
        line: &str,
        source: &dyn CommandSource,
    ) -> EngineResult<DispatchOutcome> {
        if self.state != BotState::Running {
            return Err(EngineError::IllegalState(
                "dispatch requires the Running state",
            ));
        }
        let services = self
            .ctx
            .as_ref()
            .ok_or(EngineError::IllegalState("service context not initialized"))?;

        let Some((descriptor, args)) = self.registry.resolve(line) else {
            return Ok(DispatchOutcome::NotFound);
        };

        let mut event = ModEvent::CommandPreProcess(CommandPreProcessEvent::new(
            descriptor.name.clone(),
            args.clone(),
            source.id(),
            source.channel_id(),
        ));
        self.bus.publish(&mut event);
        if event.is_cancelled() {
            return Ok(DispatchOutcome::Cancelled);
        }

        if !source.has_permission(descriptor.required_permission) {
            if let Err(err) = source.reply("You are not allowed to run this command").await {
                warn!(error = %err, "unable to deliver permission denial");
            }
            return Ok(DispatchOutcome::Denied);
        }

        let ctx = CommandContext {
            services,
            bus: &self.bus,
            registry: &self.registry,
            started_at: self.started_at,
        };
        match descriptor.handler().execute(ctx, source, &args).await {
            Ok(()) => Ok(DispatchOutcome::Completed),
            Err(err) => {
                error!(command = %descriptor.name, error = %err, "command handler failed");
                if let Err(err) = source.reply("Something went wrong running that command").await
                {
                    warn!(error = %err, "unable to deliver failure notice");
                }
                Ok(DispatchOutcome::Failed)
            }
        }
    }

    /// Moderation service bound to the live context
    pub fn moderation(&self) -> EngineResult<ModerationService<'_>> {
        let services = self
            .ctx
            .as_ref()
            .ok_or(EngineError::IllegalState("service context not initialized"))?;
        Ok(ModerationService::new(services, &self.bus))
    }

    /// Release the connection and close the store
    ///
    /// Safe to call from Connected, Running, or a previously failed
    /// ShuttingDown. A store flush failure leaves the bot in ShuttingDown so
    /// the call can be retried.
    #[instrument(skip_all)]
    pub async fn shutdown(&mut self) -> EngineResult<()> {
        match self.state {
            BotState::Disconnected | BotState::Connecting => {
                return Err(EngineError::IllegalState(
                    "shutdown requires an established connection",
                ));
            }
            _ => {}
        }
        self.state = BotState::ShuttingDown;

        self.gateway = None;
        self.ctx = None;

        match self.store.flush_and_close().await {
            Ok(()) | Err(StoreError::Closed) => {
                self.state = BotState::Disconnected;
                info!("shutdown complete");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "store flush failed, still shutting down");
                Err(err.into())
            }
        }
    }
}
