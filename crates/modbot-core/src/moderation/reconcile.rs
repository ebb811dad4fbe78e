//! Role reconciliation - minimal corrections to make observed platform
//! role state match the ledger
//!
//! The service governs exactly two roles (member and punished); any other
//! role a user carries is left untouched. Reconciliation is idempotent:
//! when observed state already matches the desired state the correction
//! list is empty, so it is safe to run on every join and after every warn.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::{PunishmentKind, User};
use crate::moderation::EscalationDecision;
use crate::value_objects::Snowflake;

/// The role identifiers this service governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernedRoles {
    pub member_role: Snowflake,
    pub punished_role: Snowflake,
}

/// A single correction to apply against the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCorrection {
    Add { role_id: Snowflake },
    Remove { role_id: Snowflake },
    /// Ban requires removing the user entirely instead of a role change
    Expel { reason: String },
}

/// Compute the minimal corrections for a user
///
/// A required or active ban short-circuits to a single `Expel`; the
/// gateway's expel operation is expected to be idempotent platform-side.
/// Otherwise the desired set is diffed against the observed governed roles.
pub fn reconcile(
    user: &User,
    observed_roles: &HashSet<Snowflake>,
    decision: EscalationDecision,
    roles: &GovernedRoles,
) -> Vec<RoleCorrection> {
    if decision == EscalationDecision::RequireBan || user.has_active(&PunishmentKind::Ban) {
        let reason = user
            .punishments()
            .iter()
            .rev()
            .find(|p| p.kind == PunishmentKind::Ban && p.is_active())
            .map(|p| p.reason.clone())
            .unwrap_or_else(|| "Warn threshold exceeded".to_string());
        return vec![RoleCorrection::Expel { reason }];
    }

    let punished = decision == EscalationDecision::RequireMute
        || user.has_active(&PunishmentKind::Mute);

    let mut desired = HashSet::from([roles.member_role]);
    if punished {
        desired.insert(roles.punished_role);
    }

    let governed = [roles.member_role, roles.punished_role];
    let mut corrections = Vec::new();

    for role_id in governed {
        let want = desired.contains(&role_id);
        let have = observed_roles.contains(&role_id);
        match (want, have) {
            (true, false) => corrections.push(RoleCorrection::Add { role_id }),
            (false, true) => corrections.push(RoleCorrection::Remove { role_id }),
            _ => {}
        }
    }

    corrections
}
