//! Warn entity - a single reprimand recorded against a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A warn issued against a user
///
/// Immutable after creation except the `reviewed` flag, which flips
/// false -> true exactly once when escalation consumes the warn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warn {
    pub id: Snowflake,
    pub reason: String,
    pub issued_by: Snowflake,
    pub issued_at: DateTime<Utc>,
    pub reviewed: bool,
}

impl Warn {
    /// Create a new, unreviewed warn
    pub fn new(id: Snowflake, reason: impl Into<String>, issued_by: Snowflake) -> Self {
        Self {
            id,
            reason: reason.into(),
            issued_by,
            issued_at: Utc::now(),
            reviewed: false,
        }
    }
}
