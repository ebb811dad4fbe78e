//! # modbot-core
//!
//! Domain layer containing entities, value objects, the moderation policy,
//! the closed event set, and collaborator traits. This crate has zero
//! dependencies on any platform SDK or transport.

pub mod entities;
pub mod error;
pub mod events;
pub mod moderation;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Punishment, PunishmentKind, User, UserInformation, Warn};
pub use error::DomainError;
pub use events::{EventKind, ModEvent};
pub use moderation::{
    decide, reconcile, EscalationDecision, EscalationThresholds, GovernedRoles, RoleCorrection,
};
pub use traits::{GatewayError, MessagingGateway, StoreError, UserStore};
pub use value_objects::{Permissions, Snowflake, SnowflakeGenerator, SnowflakeParseError};
