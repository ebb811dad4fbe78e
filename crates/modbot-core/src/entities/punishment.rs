//! Punishment entity - a moderation action recorded against a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::Snowflake;

/// The kind of a punishment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunishmentKind {
    /// Punished role applied, member role kept
    Mute,
    /// User is expelled from the platform community
    Ban,
    /// Manually issued punishment with an operator-chosen label
    Custom(String),
}

impl fmt::Display for PunishmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mute => write!(f, "MUTE"),
            Self::Ban => write!(f, "BAN"),
            Self::Custom(label) => write!(f, "{}", label.to_uppercase()),
        }
    }
}

impl FromStr for PunishmentKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "MUTE" => Self::Mute,
            "BAN" => Self::Ban,
            other => Self::Custom(other.to_string()),
        })
    }
}

/// A punishment recorded against a user
///
/// Created active; optionally revoked later. Revocation is one-way and
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punishment {
    pub id: Snowflake,
    pub kind: PunishmentKind,
    pub reason: String,
    pub issued_by: Snowflake,
    pub issued_at: DateTime<Utc>,
    /// `None` means the punishment is permanent
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
}

impl Punishment {
    /// Create a new active punishment
    pub fn new(
        id: Snowflake,
        kind: PunishmentKind,
        reason: impl Into<String>,
        issued_by: Snowflake,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            kind,
            reason: reason.into(),
            issued_by,
            issued_at: Utc::now(),
            expires_at,
            revoked: false,
        }
    }

    /// A punishment is active while it is not revoked and not expired
    pub fn is_active(&self) -> bool {
        if self.revoked {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at > Utc::now(),
            None => true,
        }
    }
}
