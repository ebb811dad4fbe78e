//! Bot features - pluggable units of startup behavior
//!
//! A feature contributes commands or bus listeners during activation.
//! Activation order is the order features are handed to the bot.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use modbot_core::{EventKind, ModEvent, Permissions, Snowflake};

use crate::bus::Listener;
use crate::commands::{
    CommandDescriptor, DeletePunishCommand, DeleteWarnCommand, HelpCommand, PingCommand,
    PunishCommand, PunishmentsCommand, UptimeCommand, UserInfoCommand, WarnCommand, WarnsCommand,
};

use super::Bot;

/// A unit of startup behavior
#[async_trait]
pub trait BotFeature: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this feature should run for the given bot configuration
    fn is_applicable_to(&self, _bot: &Bot) -> bool {
        true
    }

    /// Contribute commands and listeners; a returned error aborts activation
    async fn on_start(&self, bot: &mut Bot) -> anyhow::Result<()>;
}

/// Registers the built-in command set
pub struct CommandHandlerFeature;

#[async_trait]
impl BotFeature for CommandHandlerFeature {
    fn name(&self) -> &'static str {
        "command-handler"
    }

    async fn on_start(&self, bot: &mut Bot) -> anyhow::Result<()> {
        let registry = bot.registry_mut();
        registry.register(
            CommandDescriptor::new("help", "List available commands", Arc::new(HelpCommand))
                .with_aliases(["?"]),
        )?;
        registry.register(CommandDescriptor::new(
            "ping",
            "Check that the bot is alive",
            Arc::new(PingCommand),
        ))?;
        registry.register(CommandDescriptor::new(
            "uptime",
            "Show how long the bot has been running",
            Arc::new(UptimeCommand),
        ))?;
        registry.register(
            CommandDescriptor::new(
                "userinfo",
                "Summarize a user's moderation record",
                Arc::new(UserInfoCommand),
            )
            .with_permission(Permissions::VIEW_RECORDS),
        )?;
        registry.register(
            CommandDescriptor::new("warn", "Warn a user", Arc::new(WarnCommand))
                .with_permission(Permissions::MODERATE),
        )?;
        registry.register(
            CommandDescriptor::new("warns", "List a user's warns", Arc::new(WarnsCommand))
                .with_permission(Permissions::VIEW_RECORDS),
        )?;
        registry.register(
            CommandDescriptor::new(
                "delwarn",
                "Remove a warn from a user",
                Arc::new(DeleteWarnCommand),
            )
            .with_permission(Permissions::MODERATE),
        )?;
        registry.register(
            CommandDescriptor::new(
                "punish",
                "Issue a punishment to a user",
                Arc::new(PunishCommand),
            )
            .with_permission(Permissions::PUNISH),
        )?;
        registry.register(
            CommandDescriptor::new(
                "punishments",
                "List a user's punishments",
                Arc::new(PunishmentsCommand),
            )
            .with_aliases(["pl"])
            .with_permission(Permissions::VIEW_RECORDS),
        )?;
        registry.register(
            CommandDescriptor::new(
                "delpunish",
                "Revoke a punishment",
                Arc::new(DeletePunishCommand),
            )
            .with_permission(Permissions::PUNISH),
        )?;
        Ok(())
    }
}

/// Cancels commands issued outside the configured command channel
///
/// Only applicable when a command channel is configured. The console (zero
/// id) is exempt.
pub struct ChannelGateFeature;

#[async_trait]
impl BotFeature for ChannelGateFeature {
    fn name(&self) -> &'static str {
        "channel-gate"
    }

    fn is_applicable_to(&self, bot: &Bot) -> bool {
        bot.config().command_channel.is_some()
    }

    async fn on_start(&self, bot: &mut Bot) -> anyhow::Result<()> {
        // is_applicable_to guards this unwrap path
        let Some(allowed) = bot.config().command_channel else {
            return Ok(());
        };
        bot.bus_mut()
            .subscribe(EventKind::CommandPreProcess, channel_gate(allowed));
        Ok(())
    }
}

fn channel_gate(allowed: Snowflake) -> Listener {
    Box::new(move |event| {
        let foreign = match &*event {
            ModEvent::CommandPreProcess(pre) => {
                !pre.source_id.is_zero() && pre.channel_id != allowed
            }
            _ => false,
        };
        if foreign {
            debug!(channel = %allowed, "command outside the command channel, cancelled");
            event.set_cancelled(true);
        }
        Ok(())
    })
}

/// Logs every published event
pub struct LoggerFeature;

#[async_trait]
impl BotFeature for LoggerFeature {
    fn name(&self) -> &'static str {
        "logger"
    }

    async fn on_start(&self, bot: &mut Bot) -> anyhow::Result<()> {
        let bus = bot.bus_mut();
        for kind in [
            EventKind::CommandPreProcess,
            EventKind::UserJoin,
            EventKind::WarnCreate,
            EventKind::PunishmentCreate,
            EventKind::PunishmentRevoke,
        ] {
            bus.subscribe(kind, log_listener());
        }
        Ok(())
    }
}

fn log_listener() -> Listener {
    Box::new(|event| {
        info!(
            event_type = event.event_type(),
            timestamp = %event.timestamp(),
            "event published"
        );
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbot_core::events::CommandPreProcessEvent;

    fn pre_process(source_id: i64, channel_id: i64) -> ModEvent {
        ModEvent::CommandPreProcess(CommandPreProcessEvent::new(
            "ping",
            Vec::new(),
            Snowflake::new(source_id),
            Snowflake::new(channel_id),
        ))
    }

    #[test]
    fn test_channel_gate_cancels_foreign_channel() {
        let gate = channel_gate(Snowflake::new(500));
        let mut event = pre_process(42, 600);
        gate(&mut event).unwrap();
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_channel_gate_allows_command_channel() {
        let gate = channel_gate(Snowflake::new(500));
        let mut event = pre_process(42, 500);
        gate(&mut event).unwrap();
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_channel_gate_exempts_console() {
        let gate = channel_gate(Snowflake::new(500));
        let mut event = pre_process(0, 0);
        gate(&mut event).unwrap();
        assert!(!event.is_cancelled());
    }
}
