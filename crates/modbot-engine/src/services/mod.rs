//! Application services

mod context;
mod error;
mod moderation;

pub use context::ServiceContext;
pub use error::{EngineError, EngineResult};
pub use moderation::{ModerationService, WarnOutcome};
