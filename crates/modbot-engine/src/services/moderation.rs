//! Moderation service
//!
//! Orchestrates the warn -> escalate -> reconcile pipeline: mutates the
//! ledger, publishes events on the bus, and hands role corrections to the
//! gateway. The gateway owns retry semantics; failures here are logged and
//! never retried.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument};

use modbot_core::events::{
    PunishmentCreateEvent, PunishmentRevokeEvent, UserJoinEvent, WarnCreateEvent,
};
use modbot_core::{
    decide, reconcile, DomainError, EscalationDecision, ModEvent, Punishment, PunishmentKind,
    RoleCorrection, Snowflake, User, Warn,
};

use crate::bus::EventBus;

use super::context::ServiceContext;
use super::error::EngineResult;

/// The result of issuing a single warn
#[derive(Debug, Clone)]
pub struct WarnOutcome {
    pub warn: Warn,
    pub decision: EscalationDecision,
    pub punishment: Option<Punishment>,
    pub corrections: Vec<RoleCorrection>,
}

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
    bus: &'a EventBus,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext, bus: &'a EventBus) -> Self {
        Self { ctx, bus }
    }

    /// Issue a warn and run the escalation pipeline
    ///
    /// When the caller has no snapshot of the user's current platform roles
    /// (e.g. a text command naming an arbitrary target), pass `None`:
    /// corrections are then computed against a snapshot assumed from the
    /// ledger as it stood before the warn (member role, plus the punished
    /// role while a mute is active).
    #[instrument(skip(self, reason, observed_roles))]
    pub async fn warn_user(
        &self,
        user_id: Snowflake,
        reason: &str,
        issued_by: Snowflake,
        observed_roles: Option<&HashSet<Snowflake>>,
    ) -> EngineResult<WarnOutcome> {
        let mut user = self.ctx.store().load_user(user_id).await?;
        let observed = self.observed_or_assumed(&user, observed_roles);

        let warn = Warn::new(self.ctx.generate_id(), reason, issued_by);
        user.add_warn(warn.clone());
        self.bus
            .publish(&mut ModEvent::WarnCreate(WarnCreateEvent::new(
                user_id,
                warn.clone(),
            )));

        let decision = decide(&user, &self.ctx.config().thresholds);
        let punishment = user.escalate(decision, self.ctx.generate_id(), issued_by, None);
        if let Some(punishment) = &punishment {
            info!(
                user_id = %user_id,
                kind = %punishment.kind,
                warns = user.warns().len(),
                "warn threshold reached, punishment created"
            );
            self.bus
                .publish(&mut ModEvent::PunishmentCreate(PunishmentCreateEvent::new(
                    user_id,
                    punishment.clone(),
                )));
        }

        let corrections = self.sync_roles(&user, &observed, decision).await;
        self.ctx.store().save_user(&user).await?;

        Ok(WarnOutcome {
            warn,
            decision,
            punishment,
            corrections,
        })
    }

    /// Record a manually issued punishment and apply its role corrections
    #[instrument(skip(self, reason, observed_roles))]
    pub async fn punish_user(
        &self,
        user_id: Snowflake,
        kind: PunishmentKind,
        reason: &str,
        issued_by: Snowflake,
        expires_at: Option<DateTime<Utc>>,
        observed_roles: Option<&HashSet<Snowflake>>,
    ) -> EngineResult<Punishment> {
        let mut user = self.ctx.store().load_user(user_id).await?;
        let observed = self.observed_or_assumed(&user, observed_roles);

        let punishment = Punishment::new(
            self.ctx.generate_id(),
            kind,
            reason,
            issued_by,
            expires_at,
        );
        user.add_punishment(punishment.clone());
        self.bus
            .publish(&mut ModEvent::PunishmentCreate(PunishmentCreateEvent::new(
                user_id,
                punishment.clone(),
            )));

        self.sync_roles(&user, &observed, EscalationDecision::None)
            .await;
        self.ctx.store().save_user(&user).await?;

        Ok(punishment)
    }

    /// Revoke a punishment and restore the user's role state
    ///
    /// Revoking an already revoked punishment succeeds without effect. The
    /// assumed-roles snapshot is taken before the revocation, so lifting a
    /// mute emits the punished-role removal.
    #[instrument(skip(self, observed_roles))]
    pub async fn revoke_punishment(
        &self,
        user_id: Snowflake,
        punishment_id: Snowflake,
        observed_roles: Option<&HashSet<Snowflake>>,
    ) -> EngineResult<Punishment> {
        let mut user = self.ctx.store().load_user(user_id).await?;
        let observed = self.observed_or_assumed(&user, observed_roles);

        user.revoke(punishment_id)?;
        let punishment = user
            .punishment(punishment_id)
            .cloned()
            .ok_or(DomainError::PunishmentNotFound(punishment_id))?;
        self.bus
            .publish(&mut ModEvent::PunishmentRevoke(PunishmentRevokeEvent::new(
                user_id,
                punishment.clone(),
            )));

        self.sync_roles(&user, &observed, EscalationDecision::None)
            .await;
        self.ctx.store().save_user(&user).await?;

        Ok(punishment)
    }

    /// Remove a warn from a user's ledger (manual moderator correction)
    #[instrument(skip(self))]
    pub async fn remove_warn(&self, user_id: Snowflake, warn_id: Snowflake) -> EngineResult<Warn> {
        let mut user = self.ctx.store().load_user(user_id).await?;
        let removed = user.remove_warn(warn_id)?;
        self.ctx.store().save_user(&user).await?;
        Ok(removed)
    }

    /// Reconcile a joining user's roles against their ledger
    ///
    /// Join never escalates; it only mirrors the punishments already on
    /// record. Safe to run on every join - in-sync state yields no calls.
    #[instrument(skip(self, observed_roles))]
    pub async fn handle_user_join(
        &self,
        user_id: Snowflake,
        observed_roles: &HashSet<Snowflake>,
    ) -> EngineResult<Vec<RoleCorrection>> {
        let user = self.ctx.store().load_user(user_id).await?;
        self.bus
            .publish(&mut ModEvent::UserJoin(UserJoinEvent::new(user_id)));

        let corrections = self
            .sync_roles(&user, observed_roles, EscalationDecision::None)
            .await;
        // Persist the ledger created on first observed interaction
        self.ctx.store().save_user(&user).await?;

        Ok(corrections)
    }

    /// Fetch a user's full moderation record
    pub async fn user_record(&self, user_id: Snowflake) -> EngineResult<User> {
        Ok(self.ctx.store().load_user(user_id).await?)
    }

    /// Resolve the observed role set for reconciliation
    ///
    /// Without a caller-supplied snapshot the set is assumed from the
    /// ledger: the member role, plus the punished role while the user has
    /// an active mute. Must be taken before the ledger is mutated so role
    /// state removed by the operation still shows up as observed.
    fn observed_or_assumed(
        &self,
        user: &User,
        observed_roles: Option<&HashSet<Snowflake>>,
    ) -> HashSet<Snowflake> {
        if let Some(observed) = observed_roles {
            return observed.clone();
        }
        let roles = &self.ctx.config().roles;
        let mut assumed = HashSet::from([roles.member_role]);
        if user.has_active(&PunishmentKind::Mute) {
            assumed.insert(roles.punished_role);
        }
        assumed
    }

    /// Compute corrections and hand them to the gateway, fire-and-forget
    async fn sync_roles(
        &self,
        user: &User,
        observed: &HashSet<Snowflake>,
        decision: EscalationDecision,
    ) -> Vec<RoleCorrection> {
        let roles = &self.ctx.config().roles;
        let corrections = reconcile(user, observed, decision, roles);
        for correction in &corrections {
            let result = match correction {
                RoleCorrection::Expel { reason } => {
                    self.ctx.gateway().expel_user(user.id, reason).await
                }
                other => self.ctx.gateway().apply_role_correction(user.id, other).await,
            };
            if let Err(err) = result {
                error!(user_id = %user.id, error = %err, "gateway rejected role correction");
            }
        }

        if let Some(channel) = self.ctx.config().log_channel {
            if !corrections.is_empty() {
                let summary = format!(
                    "Applied {} role correction(s) for user {}",
                    corrections.len(),
                    user.id
                );
                if let Err(err) = self.ctx.gateway().send_message(channel, &summary).await {
                    debug!(error = %err, "unable to mirror corrections to log channel");
                }
            }
        }

        corrections
    }
}
