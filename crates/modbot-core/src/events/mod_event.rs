//! Moderation events - the closed set of events flowing through the bus
//!
//! Platform callbacks are re-expressed as tagged variants so the core never
//! depends on a transport SDK's class hierarchy. Payload fields are set at
//! construction and stay immutable; only the cancellation flag of the
//! cancellable variant may change while a publish is in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Punishment, Warn};
use crate::value_objects::Snowflake;

/// Discriminant used for event bus subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CommandPreProcess,
    UserJoin,
    WarnCreate,
    PunishmentCreate,
    PunishmentRevoke,
}

/// All events published on the moderation bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModEvent {
    CommandPreProcess(CommandPreProcessEvent),
    UserJoin(UserJoinEvent),
    WarnCreate(WarnCreateEvent),
    PunishmentCreate(PunishmentCreateEvent),
    PunishmentRevoke(PunishmentRevokeEvent),
}

impl ModEvent {
    /// Get the subscription discriminant for this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CommandPreProcess(_) => EventKind::CommandPreProcess,
            Self::UserJoin(_) => EventKind::UserJoin,
            Self::WarnCreate(_) => EventKind::WarnCreate,
            Self::PunishmentCreate(_) => EventKind::PunishmentCreate,
            Self::PunishmentRevoke(_) => EventKind::PunishmentRevoke,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommandPreProcess(_) => "COMMAND_PRE_PROCESS",
            Self::UserJoin(_) => "USER_JOIN",
            Self::WarnCreate(_) => "WARN_CREATE",
            Self::PunishmentCreate(_) => "PUNISHMENT_CREATE",
            Self::PunishmentRevoke(_) => "PUNISHMENT_REVOKE",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CommandPreProcess(e) => e.timestamp,
            Self::UserJoin(e) => e.timestamp,
            Self::WarnCreate(e) => e.timestamp,
            Self::PunishmentCreate(e) => e.timestamp,
            Self::PunishmentRevoke(e) => e.timestamp,
        }
    }

    /// Whether this variant supports cooperative cancellation
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::CommandPreProcess(_))
    }

    /// Cancellation state set by a prior listener in the same publish
    ///
    /// Always `false` for non-cancellable variants.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::CommandPreProcess(e) => e.cancelled,
            _ => false,
        }
    }

    /// Set the cancellation flag
    ///
    /// No-op for non-cancellable variants. The bus never short-circuits on
    /// cancellation; each consumer checks `is_cancelled` at entry.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        if let Self::CommandPreProcess(e) = self {
            e.cancelled = cancelled;
        }
    }
}

/// Published before a resolved command is executed (cancellable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandPreProcessEvent {
    pub command: String,
    pub raw_args: Vec<String>,
    pub source_id: Snowflake,
    pub channel_id: Snowflake,
    pub cancelled: bool,
    pub timestamp: DateTime<Utc>,
}

impl CommandPreProcessEvent {
    pub fn new(
        command: impl Into<String>,
        raw_args: Vec<String>,
        source_id: Snowflake,
        channel_id: Snowflake,
    ) -> Self {
        Self {
            command: command.into(),
            raw_args,
            source_id,
            channel_id,
            cancelled: false,
            timestamp: Utc::now(),
        }
    }
}

/// Published when a user is first observed in the community or rejoins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJoinEvent {
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl UserJoinEvent {
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            timestamp: Utc::now(),
        }
    }
}

/// Published after a warn is appended to a user's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarnCreateEvent {
    pub user_id: Snowflake,
    pub warn: Warn,
    pub timestamp: DateTime<Utc>,
}

impl WarnCreateEvent {
    pub fn new(user_id: Snowflake, warn: Warn) -> Self {
        Self {
            user_id,
            warn,
            timestamp: Utc::now(),
        }
    }
}

/// Published after a punishment is appended to a user's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunishmentCreateEvent {
    pub user_id: Snowflake,
    pub punishment: Punishment,
    pub timestamp: DateTime<Utc>,
}

impl PunishmentCreateEvent {
    pub fn new(user_id: Snowflake, punishment: Punishment) -> Self {
        Self {
            user_id,
            punishment,
            timestamp: Utc::now(),
        }
    }
}

/// Published after a punishment is revoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunishmentRevokeEvent {
    pub user_id: Snowflake,
    pub punishment: Punishment,
    pub timestamp: DateTime<Utc>,
}

impl PunishmentRevokeEvent {
    pub fn new(user_id: Snowflake, punishment: Punishment) -> Self {
        Self {
            user_id,
            punishment,
            timestamp: Utc::now(),
        }
    }
}
