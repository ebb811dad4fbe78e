//! Moderation commands - warn, punish, and ledger management
//!
//! Argument errors reply with a usage line and return Ok; only downstream
//! service failures bubble up as errors for the dispatcher to report.

use async_trait::async_trait;

use modbot_core::{PunishmentKind, Snowflake};

use crate::services::ModerationService;

use super::info::parse_user_arg;
use super::{CommandContext, CommandHandler, CommandSource};

/// Issue a warn to a user, escalating automatically when a threshold is hit
pub struct WarnCommand;

#[async_trait]
impl CommandHandler for WarnCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some(user_id) = parse_user_arg(args) else {
            source.reply("Usage: warn <user-id> <reason>").await?;
            return Ok(());
        };
        let reason = args[1..].join(" ");
        if reason.is_empty() {
            source.reply("Usage: warn <user-id> <reason>").await?;
            return Ok(());
        }

        let service = ModerationService::new(ctx.services, ctx.bus);
        let outcome = service
            .warn_user(user_id, &reason, source.id(), None)
            .await?;

        let mut message = format!("Warned user {user_id} (warn {})", outcome.warn.id);
        if let Some(punishment) = &outcome.punishment {
            message.push_str(&format!(
                ". Threshold reached: {} issued (id {})",
                punishment.kind, punishment.id
            ));
        }
        source.reply(&message).await?;
        Ok(())
    }
}

/// List a user's warns
pub struct WarnsCommand;

#[async_trait]
impl CommandHandler for WarnsCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some(user_id) = parse_user_arg(args) else {
            source.reply("Usage: warns <user-id>").await?;
            return Ok(());
        };

        let service = ModerationService::new(ctx.services, ctx.bus);
        let user = service.user_record(user_id).await?;

        if user.warns().is_empty() {
            source.reply(&format!("User {user_id} has no warns")).await?;
            return Ok(());
        }

        let mut lines = vec![format!(
            "Warns for user {user_id} ({} active of {}):",
            user.active_warn_count(),
            user.warns().len()
        )];
        for warn in user.warns() {
            let state = if warn.reviewed { "reviewed" } else { "active" };
            lines.push(format!(
                "[{}] {} - {} (by {}, {})",
                warn.id,
                state,
                warn.reason,
                warn.issued_by,
                warn.issued_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        source.reply(&lines.join("\n")).await?;
        Ok(())
    }
}

/// Remove a warn from a user's ledger
pub struct DeleteWarnCommand;

#[async_trait]
impl CommandHandler for DeleteWarnCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some((user_id, warn_id)) = parse_id_pair(args) else {
            source.reply("Usage: delwarn <user-id> <warn-id>").await?;
            return Ok(());
        };

        let service = ModerationService::new(ctx.services, ctx.bus);
        let removed = service.remove_warn(user_id, warn_id).await?;
        source
            .reply(&format!(
                "Removed warn {} from user {user_id} ({})",
                removed.id, removed.reason
            ))
            .await?;
        Ok(())
    }
}

/// Record a manual punishment
pub struct PunishCommand;

#[async_trait]
impl CommandHandler for PunishCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let (Some(user_id), Some(kind)) = (parse_user_arg(args), args.get(1)) else {
            source
                .reply("Usage: punish <user-id> <kind> <reason>")
                .await?;
            return Ok(());
        };
        let reason = args[2..].join(" ");
        if reason.is_empty() {
            source
                .reply("Usage: punish <user-id> <kind> <reason>")
                .await?;
            return Ok(());
        }
        // FromStr is total: unrecognized kinds become Custom
        let kind = kind
            .parse::<PunishmentKind>()
            .unwrap_or_else(|never| match never {});

        let service = ModerationService::new(ctx.services, ctx.bus);
        let punishment = service
            .punish_user(user_id, kind, &reason, source.id(), None, None)
            .await?;
        source
            .reply(&format!(
                "Issued {} (id {}) to user {user_id}",
                punishment.kind, punishment.id
            ))
            .await?;
        Ok(())
    }
}

/// List a user's punishments
pub struct PunishmentsCommand;

#[async_trait]
impl CommandHandler for PunishmentsCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some(user_id) = parse_user_arg(args) else {
            source.reply("Usage: punishments <user-id>").await?;
            return Ok(());
        };

        let service = ModerationService::new(ctx.services, ctx.bus);
        let user = service.user_record(user_id).await?;

        if user.punishments().is_empty() {
            source
                .reply(&format!("User {user_id} has no punishments"))
                .await?;
            return Ok(());
        }

        let mut lines = vec![format!("Punishments for user {user_id}:")];
        for punishment in user.punishments() {
            let state = if punishment.revoked {
                "revoked"
            } else if punishment.is_active() {
                "active"
            } else {
                "expired"
            };
            lines.push(format!(
                "[{}] {} - {} - {} (by {})",
                punishment.id, punishment.kind, state, punishment.reason, punishment.issued_by
            ));
        }
        source.reply(&lines.join("\n")).await?;
        Ok(())
    }
}

/// Revoke a punishment
pub struct DeletePunishCommand;

#[async_trait]
impl CommandHandler for DeletePunishCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some((user_id, punishment_id)) = parse_id_pair(args) else {
            source
                .reply("Usage: delpunish <user-id> <punishment-id>")
                .await?;
            return Ok(());
        };

        let service = ModerationService::new(ctx.services, ctx.bus);
        let punishment = service
            .revoke_punishment(user_id, punishment_id, None)
            .await?;
        source
            .reply(&format!(
                "Revoked {} (id {}) for user {user_id}",
                punishment.kind, punishment.id
            ))
            .await?;
        Ok(())
    }
}

fn parse_id_pair(args: &[String]) -> Option<(Snowflake, Snowflake)> {
    let first = parse_user_arg(args)?;
    let second = args.get(1)?.parse::<Snowflake>().ok()?;
    Some((first, second))
}
