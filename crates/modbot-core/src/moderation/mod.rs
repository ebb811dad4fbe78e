//! Pure moderation logic - escalation policy and role reconciliation

mod escalation;
mod reconcile;

pub use escalation::{decide, EscalationDecision, EscalationThresholds};
pub use reconcile::{reconcile, GovernedRoles, RoleCorrection};
