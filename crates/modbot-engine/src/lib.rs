//! # modbot-engine
//!
//! Application layer: command registry and dispatch, the cancellable event
//! bus, moderation services, the bot lifecycle state machine, and an
//! in-memory user store.

pub mod bot;
pub mod bus;
pub mod commands;
pub mod services;
pub mod store;

// Re-export commonly used types at crate root
pub use bot::{
    Bot, BotFeature, BotState, ChannelGateFeature, CommandHandlerFeature, ConnectionHandler,
    DispatchOutcome, LoggerFeature,
};
pub use bus::{EventBus, Listener};
pub use commands::{
    CommandContext, CommandDescriptor, CommandHandler, CommandRegistry, CommandSource,
    ConsoleSource, MemberSource,
};
pub use services::{EngineError, EngineResult, ModerationService, ServiceContext, WarnOutcome};
pub use store::MemoryUserStore;
