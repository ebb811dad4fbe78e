//! Command dispatch - sources, registry, and built-in commands

mod info;
mod moderation;
mod registry;
mod source;

pub use info::{HelpCommand, PingCommand, UptimeCommand, UserInfoCommand};
pub use moderation::{
    DeletePunishCommand, DeleteWarnCommand, PunishCommand, PunishmentsCommand, WarnCommand,
    WarnsCommand,
};
pub use registry::{CommandDescriptor, CommandRegistry};
pub use source::{CommandSource, ConsoleSource, MemberSource};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::services::ServiceContext;
use crate::EventBus;

/// Everything a command handler may reach during execution
///
/// Passed explicitly instead of living in process-wide statics so commands
/// stay testable without a live connection.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub services: &'a ServiceContext,
    pub bus: &'a EventBus,
    pub registry: &'a CommandRegistry,
    pub started_at: DateTime<Utc>,
}

/// A command's execute hook
///
/// Errors are caught at the dispatch boundary, logged, and reported to the
/// issuing source as a generic failure message; they never reach the bus or
/// the lifecycle.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        ctx: CommandContext<'_>,
        source: &dyn CommandSource,
        args: &[String],
    ) -> anyhow::Result<()>;
}
