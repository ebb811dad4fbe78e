//! Informational commands - help, ping, uptime, userinfo

use async_trait::async_trait;
use chrono::Utc;

use modbot_core::Snowflake;

use super::{CommandContext, CommandHandler, CommandSource};

/// Lists every command the issuing source is allowed to run
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        _args: &[String],
    ) -> anyhow::Result<()> {
        let prefix = ctx.registry.prefix();
        let mut lines = vec!["Available commands:".to_string()];
        for descriptor in ctx.registry.list_accessible_to(source) {
            let mut line = format!("{prefix}{} - {}", descriptor.name, descriptor.description);
            if !descriptor.aliases.is_empty() {
                line.push_str(&format!(" (aliases: {})", descriptor.aliases.join(", ")));
            }
            lines.push(line);
        }
        source.reply(&lines.join("\n")).await?;
        Ok(())
    }
}

/// Liveness check
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn execute(
        &self,
        _ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        _args: &[String],
    ) -> anyhow::Result<()> {
        source.reply("Pong!").await?;
        Ok(())
    }
}

/// Reports how long the process has been running
pub struct UptimeCommand;

#[async_trait]
impl CommandHandler for UptimeCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        _args: &[String],
    ) -> anyhow::Result<()> {
        let elapsed = (Utc::now() - ctx.started_at).num_seconds().max(0);
        source
            .reply(&format!("Online for {}", format_uptime(elapsed)))
            .await?;
        Ok(())
    }
}

/// Render a duration in seconds as a human sentence
///
/// Days are the largest unit; zero components are skipped except the
/// all-zero case, which reads "0 seconds".
fn format_uptime(total_seconds: i64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    for (value, unit) in [
        (days, "day"),
        (hours, "hour"),
        (minutes, "minute"),
        (seconds, "second"),
    ] {
        if value > 0 {
            let plural = if value == 1 { "" } else { "s" };
            parts.push(format!("{value} {unit}{plural}"));
        }
    }

    match parts.len() {
        0 => "0 seconds".to_string(),
        1 => parts.remove(0),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{} and {}", parts.join(", "), last)
        }
    }
}

/// Summarizes a user's moderation record
pub struct UserInfoCommand;

#[async_trait]
impl CommandHandler for UserInfoCommand {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()> {
        let Some(user_id) = parse_user_arg(args) else {
            source.reply("Usage: userinfo <user-id>").await?;
            return Ok(());
        };

        let service = crate::services::ModerationService::new(ctx.services, ctx.bus);
        let user = service.user_record(user_id).await?;

        let name = user
            .information
            .display_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let active: Vec<String> = user
            .punishments()
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.kind.to_string())
            .collect();
        let active = if active.is_empty() {
            "none".to_string()
        } else {
            active.join(", ")
        };

        source
            .reply(&format!(
                "User {} ({}): {} active warn(s), {} total, active punishments: {}",
                user.id,
                name,
                user.active_warn_count(),
                user.warns().len(),
                active
            ))
            .await?;
        Ok(())
    }
}

/// Parse the first argument as a user id
pub(super) fn parse_user_arg(args: &[String]) -> Option<Snowflake> {
    args.first()?.parse::<Snowflake>().ok()
}
