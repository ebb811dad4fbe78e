//! Escalation policy - derives the required moderation action from a
//! user's warn history
//!
//! `decide` is a pure function of the ledger and the injected thresholds:
//! identical state always yields the identical decision.

use serde::{Deserialize, Serialize};

use crate::entities::{PunishmentKind, User};

/// Warn-count thresholds driving automatic moderation actions
///
/// Both mute thresholds map to a mute; the higher one re-triggers for
/// re-offenders who were already unmuted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationThresholds {
    pub first_auto_mute: u32,
    pub second_auto_mute: u32,
    pub auto_ban: u32,
}

/// The action required by the escalation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationDecision {
    None,
    RequireMute,
    RequireBan,
}

/// Evaluate the escalation policy against a user's ledger
///
/// Priority order: the ban threshold dominates, then either mute threshold
/// triggers a mute unless the user already carries an active ban.
pub fn decide(user: &User, thresholds: &EscalationThresholds) -> EscalationDecision {
    let count = user.active_warn_count() as u32;

    if count >= thresholds.auto_ban {
        return EscalationDecision::RequireBan;
    }

    let mute_reached =
        count >= thresholds.second_auto_mute || count >= thresholds.first_auto_mute;
    if mute_reached && !user.has_active(&PunishmentKind::Ban) {
        return EscalationDecision::RequireMute;
    }

    EscalationDecision::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Punishment, Warn};
    use crate::value_objects::Snowflake;

    const THRESHOLDS: EscalationThresholds = EscalationThresholds {
        first_auto_mute: 3,
        second_auto_mute: 5,
        auto_ban: 7,
    };

    fn user_with_warns(n: usize) -> User {
        let mut user = User::new(Snowflake::new(1));
        for i in 0..n {
            user.add_warn(Warn::new(Snowflake::new(i as i64 + 1), "x", Snowflake::new(9)));
        }
        user
    }

    #[test]
    fn test_below_first_threshold_is_none() {
        assert_eq!(decide(&user_with_warns(2), &THRESHOLDS), EscalationDecision::None);
    }

    #[test]
    fn test_first_threshold_requires_mute() {
        assert_eq!(
            decide(&user_with_warns(3), &THRESHOLDS),
            EscalationDecision::RequireMute
        );
    }

    #[test]
    fn test_second_threshold_requires_mute() {
        assert_eq!(
            decide(&user_with_warns(6), &THRESHOLDS),
            EscalationDecision::RequireMute
        );
    }

    #[test]
    fn test_ban_threshold_dominates() {
        assert_eq!(
            decide(&user_with_warns(7), &THRESHOLDS),
            EscalationDecision::RequireBan
        );
    }

    #[test]
    fn test_active_ban_suppresses_mute() {
        let mut user = user_with_warns(4);
        user.add_punishment(Punishment::new(
            Snowflake::new(50),
            PunishmentKind::Ban,
            "x",
            Snowflake::new(9),
            None,
        ));
        assert_eq!(decide(&user, &THRESHOLDS), EscalationDecision::None);
    }

    #[test]
    fn test_revoked_ban_no_longer_suppresses_mute() {
        let mut user = user_with_warns(4);
        user.add_punishment(Punishment::new(
            Snowflake::new(50),
            PunishmentKind::Ban,
            "x",
            Snowflake::new(9),
            None,
        ));
        user.revoke(Snowflake::new(50)).unwrap();
        assert_eq!(decide(&user, &THRESHOLDS), EscalationDecision::RequireMute);
    }

    #[test]
    fn test_decide_is_deterministic() {
        let user = user_with_warns(5);
        let first = decide(&user, &THRESHOLDS);
        for _ in 0..10 {
            assert_eq!(decide(&user, &THRESHOLDS), first);
        }
    }

    #[test]
    fn test_reviewed_warns_are_not_counted() {
        let mut user = user_with_warns(7);
        let ids = user.unreviewed_warn_ids();
        user.mark_reviewed(&ids[..5]).unwrap();
        // 2 unreviewed warns remain
        assert_eq!(decide(&user, &THRESHOLDS), EscalationDecision::None);
    }
}
