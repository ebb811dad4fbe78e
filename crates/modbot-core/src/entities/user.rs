//! User entity - aggregate root owning a user's moderation ledger
//!
//! Warns and punishments live inside the user they belong to, in issuance
//! order. The ledger is single-writer by design: the serialized event
//! timeline guarantees at most one concurrent mutation path per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Punishment, PunishmentKind, Warn};
use crate::error::DomainError;
use crate::moderation::EscalationDecision;
use crate::value_objects::Snowflake;

/// Display metadata carried alongside the moderation ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInformation {
    pub display_name: Option<String>,
    pub first_seen: Option<DateTime<Utc>>,
}

/// A user of the platform together with their ordered warn and punishment
/// history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    pub information: UserInformation,
    warns: Vec<Warn>,
    punishments: Vec<Punishment>,
}

impl User {
    /// Create a user with an empty ledger (first observed interaction)
    pub fn new(id: Snowflake) -> Self {
        Self {
            id,
            information: UserInformation {
                display_name: None,
                first_seen: Some(Utc::now()),
            },
            warns: Vec::new(),
            punishments: Vec::new(),
        }
    }

    /// All warns in issuance order
    pub fn warns(&self) -> &[Warn] {
        &self.warns
    }

    /// All punishments in issuance order
    pub fn punishments(&self) -> &[Punishment] {
        &self.punishments
    }

    /// Append a warn to the ledger
    pub fn add_warn(&mut self, warn: Warn) {
        self.warns.push(warn);
    }

    /// Number of warns not yet consumed by escalation
    pub fn active_warn_count(&self) -> usize {
        self.warns.iter().filter(|w| !w.reviewed).count()
    }

    /// Ids of all unreviewed warns, in issuance order
    pub fn unreviewed_warn_ids(&self) -> Vec<Snowflake> {
        self.warns
            .iter()
            .filter(|w| !w.reviewed)
            .map(|w| w.id)
            .collect()
    }

    /// Remove a warn from the ledger entirely (manual moderator correction)
    pub fn remove_warn(&mut self, warn_id: Snowflake) -> Result<Warn, DomainError> {
        let pos = self
            .warns
            .iter()
            .position(|w| w.id == warn_id)
            .ok_or(DomainError::WarnNotFound(warn_id))?;
        Ok(self.warns.remove(pos))
    }

    /// Flip the reviewed flag for exactly the given warns
    ///
    /// All-or-nothing: every id is validated before any flag is flipped, so
    /// a partial update can never desync the ledger.
    pub fn mark_reviewed(&mut self, warn_ids: &[Snowflake]) -> Result<(), DomainError> {
        for id in warn_ids {
            if !self.warns.iter().any(|w| w.id == *id) {
                return Err(DomainError::WarnNotFound(*id));
            }
        }
        for warn in &mut self.warns {
            if warn_ids.contains(&warn.id) {
                warn.reviewed = true;
            }
        }
        Ok(())
    }

    /// Append a punishment to the ledger
    pub fn add_punishment(&mut self, punishment: Punishment) {
        self.punishments.push(punishment);
    }

    /// Find a punishment by id
    pub fn punishment(&self, punishment_id: Snowflake) -> Option<&Punishment> {
        self.punishments.iter().find(|p| p.id == punishment_id)
    }

    /// Whether any punishment of the given kind is currently active
    pub fn has_active(&self, kind: &PunishmentKind) -> bool {
        self.punishments
            .iter()
            .any(|p| p.kind == *kind && p.is_active())
    }

    /// Revoke a punishment
    ///
    /// Revoking an already revoked punishment is a no-op, not an error.
    pub fn revoke(&mut self, punishment_id: Snowflake) -> Result<(), DomainError> {
        let punishment = self
            .punishments
            .iter_mut()
            .find(|p| p.id == punishment_id)
            .ok_or(DomainError::PunishmentNotFound(punishment_id))?;
        punishment.revoked = true;
        Ok(())
    }

    /// Consume all unreviewed warns into a punishment, atomically
    ///
    /// Marks the consumed warns reviewed and appends the punishment in one
    /// step, so the warn-reviewed invariant can never desync from punishment
    /// creation. Returns `None` when the decision requires no action.
    pub fn escalate(
        &mut self,
        decision: EscalationDecision,
        punishment_id: Snowflake,
        issued_by: Snowflake,
        expires_at: Option<DateTime<Utc>>,
    ) -> Option<Punishment> {
        let kind = match decision {
            EscalationDecision::None => return None,
            EscalationDecision::RequireMute => PunishmentKind::Mute,
            EscalationDecision::RequireBan => PunishmentKind::Ban,
        };

        let consumed = self.unreviewed_warn_ids();
        let reason = format!("Automatic {} after {} warns", kind, consumed.len());

        // Ids come straight from the ledger, so mark_reviewed cannot fail here.
        for warn in &mut self.warns {
            if consumed.contains(&warn.id) {
                warn.reviewed = true;
            }
        }

        let punishment = Punishment::new(punishment_id, kind, reason, issued_by, expires_at);
        self.punishments.push(punishment.clone());
        Some(punishment)
    }
}
