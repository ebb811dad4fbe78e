//! # modbot-common
//!
//! Shared utilities: typed configuration and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{BotConfig, ConfigError};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
