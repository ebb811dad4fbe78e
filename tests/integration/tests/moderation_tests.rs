//! Moderation Flow Integration Tests
//!
//! Exercises the full warn -> escalate -> reconcile pipeline against a
//! recording gateway and the in-memory store. No live platform connection
//! is required.
//!
//! Run with: cargo test -p integration-tests --test moderation_tests

use std::collections::HashSet;

use integration_tests::{
    running_bot, GatewayCall, MEMBER_ROLE, MODERATOR, PUNISHED_ROLE,
};
use modbot_core::{EscalationDecision, PunishmentKind, RoleCorrection, Snowflake};
use modbot_engine::{BotState, ConsoleSource, DispatchOutcome, EngineError};

// ============================================================================
// Escalation Tests
// ============================================================================

#[tokio::test]
async fn test_third_warn_triggers_auto_mute() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5001);
    let service = bot.moderation().unwrap();

    for _ in 0..2 {
        let outcome = service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
        assert_eq!(outcome.decision, EscalationDecision::None);
        assert!(outcome.punishment.is_none());
        assert!(outcome.corrections.is_empty());
    }

    let outcome = service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    assert_eq!(outcome.decision, EscalationDecision::RequireMute);
    let punishment = outcome.punishment.expect("third warn escalates");
    assert_eq!(punishment.kind, PunishmentKind::Mute);
    assert_eq!(
        outcome.corrections,
        vec![RoleCorrection::Add {
            role_id: PUNISHED_ROLE
        }]
    );
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Correction(
            user,
            RoleCorrection::Add {
                role_id: PUNISHED_ROLE
            }
        )]
    );

    // Escalation consumed the warns
    let record = service.user_record(user).await.unwrap();
    assert_eq!(record.active_warn_count(), 0);
    assert_eq!(record.warns().len(), 3);
    assert!(record.has_active(&PunishmentKind::Mute));
}

#[tokio::test]
async fn test_warns_after_a_mute_retrigger_at_the_first_threshold() {
    let (bot, _gateway) = running_bot().await;
    let user = Snowflake::new(5002);
    let service = bot.moderation().unwrap();

    for _ in 0..3 {
        service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    }
    for _ in 0..2 {
        let outcome = service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
        assert!(outcome.punishment.is_none());
    }
    let outcome = service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    let punishment = outcome.punishment.expect("sixth warn escalates again");
    assert_eq!(punishment.kind, PunishmentKind::Mute);

    let record = service.user_record(user).await.unwrap();
    assert_eq!(record.punishments().len(), 2);
    assert_eq!(record.active_warn_count(), 0);
}

// ============================================================================
// Reconciliation Tests
// ============================================================================

#[tokio::test]
async fn test_join_reconciliation_is_idempotent() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5003);
    let service = bot.moderation().unwrap();

    for _ in 0..3 {
        service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    }
    gateway.clear();

    // A muted user rejoins carrying only the member role
    let observed = HashSet::from([MEMBER_ROLE]);
    let corrections = service.handle_user_join(user, &observed).await.unwrap();
    assert_eq!(
        corrections,
        vec![RoleCorrection::Add {
            role_id: PUNISHED_ROLE
        }]
    );

    // With the correction applied, a second join produces nothing
    let observed = HashSet::from([MEMBER_ROLE, PUNISHED_ROLE]);
    let corrections = service.handle_user_join(user, &observed).await.unwrap();
    assert!(corrections.is_empty());
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Correction(
            user,
            RoleCorrection::Add {
                role_id: PUNISHED_ROLE
            }
        )]
    );
}

#[tokio::test]
async fn test_banned_user_joining_is_expelled() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5004);
    let service = bot.moderation().unwrap();

    service
        .punish_user(user, PunishmentKind::Ban, "raid account", MODERATOR, None, None)
        .await
        .unwrap();
    gateway.clear();

    let observed = HashSet::from([MEMBER_ROLE]);
    let corrections = service.handle_user_join(user, &observed).await.unwrap();
    assert_eq!(
        corrections,
        vec![RoleCorrection::Expel {
            reason: "raid account".to_string()
        }]
    );
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Expel(user, "raid account".to_string())]
    );
}

// ============================================================================
// Punishment Ledger Tests
// ============================================================================

#[tokio::test]
async fn test_revoking_twice_succeeds_and_restores_roles() {
    let (bot, _gateway) = running_bot().await;
    let user = Snowflake::new(5005);
    let service = bot.moderation().unwrap();

    let punishment = service
        .punish_user(user, PunishmentKind::Mute, "manual mute", MODERATOR, None, None)
        .await
        .unwrap();

    let observed = HashSet::from([MEMBER_ROLE, PUNISHED_ROLE]);
    let first = service
        .revoke_punishment(user, punishment.id, Some(&observed))
        .await
        .unwrap();
    assert!(first.revoked);

    let second = service
        .revoke_punishment(user, punishment.id, Some(&observed))
        .await
        .unwrap();
    assert!(second.revoked);

    let record = service.user_record(user).await.unwrap();
    assert!(!record.has_active(&PunishmentKind::Mute));
}

#[tokio::test]
async fn test_revoking_a_mute_without_a_snapshot_removes_the_punished_role() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5008);
    let service = bot.moderation().unwrap();

    let punishment = service
        .punish_user(user, PunishmentKind::Mute, "manual mute", MODERATOR, None, None)
        .await
        .unwrap();
    gateway.clear();

    // No caller snapshot: the assumed set must reflect the active mute
    let revoked = service
        .revoke_punishment(user, punishment.id, None)
        .await
        .unwrap();
    assert!(revoked.revoked);
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Correction(
            user,
            RoleCorrection::Remove {
                role_id: PUNISHED_ROLE
            }
        )]
    );
}

#[tokio::test]
async fn test_warning_an_already_muted_user_does_not_readd_the_role() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5009);
    let service = bot.moderation().unwrap();

    for _ in 0..3 {
        service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    }
    gateway.clear();

    let outcome = service.warn_user(user, "spam", MODERATOR, None).await.unwrap();
    assert!(outcome.punishment.is_none());
    assert!(outcome.corrections.is_empty());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_revoking_unknown_punishment_is_reported() {
    let (bot, _gateway) = running_bot().await;
    let service = bot.moderation().unwrap();

    let err = service
        .revoke_punishment(Snowflake::new(5010), Snowflake::new(99999), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Domain(domain) if domain.is_not_found()));
}

// ============================================================================
// Command Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_warn_command_escalates_through_dispatch() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5006);

    for _ in 0..3 {
        let outcome = bot
            .dispatch(&format!("!warn {user} being rude"), &ConsoleSource)
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Completed);
    }

    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Correction(
            user,
            RoleCorrection::Add {
                role_id: PUNISHED_ROLE
            }
        )]
    );

    let record = bot.moderation().unwrap().user_record(user).await.unwrap();
    assert!(record.has_active(&PunishmentKind::Mute));
}

#[tokio::test]
async fn test_delpunish_command_lifts_the_mute_role() {
    let (bot, gateway) = running_bot().await;
    let user = Snowflake::new(5011);

    let punishment = bot
        .moderation()
        .unwrap()
        .punish_user(user, PunishmentKind::Mute, "manual mute", MODERATOR, None, None)
        .await
        .unwrap();
    gateway.clear();

    let outcome = bot
        .dispatch(&format!("!delpunish {user} {}", punishment.id), &ConsoleSource)
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Completed);

    // The mute's role state is undone platform-side, not just in the ledger
    let corrections: Vec<_> = gateway
        .calls()
        .into_iter()
        .filter(|call| matches!(call, GatewayCall::Correction(..)))
        .collect();
    assert_eq!(
        corrections,
        vec![GatewayCall::Correction(
            user,
            RoleCorrection::Remove {
                role_id: PUNISHED_ROLE
            }
        )]
    );
}

#[tokio::test]
async fn test_unknown_command_is_not_found() {
    let (bot, _gateway) = running_bot().await;
    let outcome = bot.dispatch("!nosuchthing", &ConsoleSource).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NotFound);
    let outcome = bot.dispatch("hello there", &ConsoleSource).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::NotFound);
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_shutdown_releases_the_store() {
    let (mut bot, _gateway) = running_bot().await;
    bot.shutdown().await.unwrap();
    assert_eq!(bot.state(), BotState::Disconnected);

    // Dispatch is rejected after shutdown
    let err = bot.dispatch("!ping", &ConsoleSource).await.unwrap_err();
    assert!(matches!(err, EngineError::IllegalState(_)));
}
