//! Movement reconciliation engine.
//!
//! Runs on the participant that moved a token. It never mutates effects
//! itself: every change is requested through the arbitration gateway, and
//! each removal is acknowledged before the matching addition is sent.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use auras_core::effect::ActiveEffect;
use auras_core::error::DomainError;
use auras_core::geometry::{GeometryService, TokenPlacement};
use auras_core::notify::Notifier;
use auras_core::repository::EffectRepository;
use auras_core::scene::{MovementTracker, SceneReader};
use auras_gateway::application::client::ArbitrationGateway;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::AuraSettings;
use crate::domain::movement::{MovementOptions, PositionDelta};
use crate::domain::plan::{NearbySource, plan_target_pass};
use crate::domain::proximity::ProximitySet;
use crate::domain::session::SessionState;

/// Warning shown once per session when nobody can apply aura effects.
pub const NO_AUTHORITY_WARNING: &str =
    "No game master is connected, so aura effects cannot be applied or removed.";

/// Host services the reconciler reads from.
#[derive(Clone)]
pub struct ReconcilerPorts {
    /// Distance computation.
    pub geometry: Arc<dyn GeometryService>,
    /// Token positions.
    pub scene: Arc<dyn SceneReader>,
    /// Movement settling and path segments.
    pub movement: Arc<dyn MovementTracker>,
    /// Read access to effects.
    pub effects: Arc<dyn EffectRepository>,
    /// User-facing warnings.
    pub notifier: Arc<dyn Notifier>,
}

/// Why a movement event was not reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The update did not change position or elevation.
    NotAMove,
    /// Another participant initiated the move and reconciles it.
    NotInitiator,
    /// Nobody holds authority; all mutation intents were dropped.
    NoAuthority,
}

/// Gateway requests sent while reconciling one movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Acknowledged removal requests.
    pub removal_requests: usize,
    /// Acknowledged addition requests.
    pub addition_requests: usize,
}

/// Result of handling a movement event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing was evaluated.
    Skipped(SkipReason),
    /// Both passes ran.
    Reconciled(ReconcileReport),
}

/// State of one movement after it settled.
struct SettledMove {
    correlation_id: Uuid,
    moved: TokenPlacement,
    tokens: Vec<TokenPlacement>,
    final_segment: bool,
}

/// Reconciles derived aura effects after token movement.
pub struct MovementReconciler {
    session: Arc<SessionState>,
    ports: ReconcilerPorts,
    gateway: ArbitrationGateway,
    settings: AuraSettings,
}

impl std::fmt::Debug for MovementReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovementReconciler")
            .field("session", &self.session)
            .field("gateway", &self.gateway)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Returns the placement of `token_id` among `tokens`.
fn locate(tokens: &[TokenPlacement], token_id: Uuid) -> Result<&TokenPlacement, DomainError> {
    tokens
        .iter()
        .find(|token| token.token_id == token_id)
        .ok_or(DomainError::TokenNotFound(token_id))
}

impl MovementReconciler {
    /// Creates a reconciler for the local participant's session.
    #[must_use]
    pub fn new(
        session: Arc<SessionState>,
        ports: ReconcilerPorts,
        gateway: ArbitrationGateway,
        settings: AuraSettings,
    ) -> Self {
        Self {
            session,
            ports,
            gateway,
            settings,
        }
    }

    /// Handles an accepted token update.
    ///
    /// Only the participant that initiated the move reconciles it, and only
    /// while an authority is present. Without one, a warning is shown once
    /// per session and the event is dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TokenNotFound` if the token left its scene,
    /// or any error from the host services or the gateway. Nothing is
    /// rolled back; the next movement re-derives state from geometry.
    #[instrument(
        skip_all,
        fields(token_id = %token.token_id, actor_id = %token.actor_id, animate = options.animate)
    )]
    pub async fn on_token_moved(
        &self,
        token: &TokenPlacement,
        delta: &PositionDelta,
        options: &MovementOptions,
        initiated_by: Uuid,
    ) -> Result<ReconcileOutcome, DomainError> {
        if !delta.moves_token() {
            return Ok(ReconcileOutcome::Skipped(SkipReason::NotAMove));
        }
        if initiated_by != self.session.participant_id() {
            return Ok(ReconcileOutcome::Skipped(SkipReason::NotInitiator));
        }
        if !self.gateway.has_authority() {
            return Ok(self.skip_without_authority());
        }

        match self.reconcile(token).await {
            Err(DomainError::NoAuthority) => Ok(self.skip_without_authority()),
            other => other.map(ReconcileOutcome::Reconciled),
        }
    }

    fn skip_without_authority(&self) -> ReconcileOutcome {
        if self.session.mark_no_authority_warned() {
            warn!("no authority present, aura reconciliation skipped");
            self.ports.notifier.warn(NO_AUTHORITY_WARNING);
        } else {
            debug!("no authority present, aura reconciliation skipped");
        }
        ReconcileOutcome::Skipped(SkipReason::NoAuthority)
    }

    async fn reconcile(&self, token: &TokenPlacement) -> Result<ReconcileReport, DomainError> {
        let final_segment = self.ports.movement.is_final_path_segment(token.token_id);
        let secret_policy = self.settings.secret_disposition;

        // Snapshot before the token settles.
        let own_effects = self.ports.effects.actor_effects(token.actor_id).await?;
        let before_tokens = self.ports.scene.scene_tokens(token.scene_id).await?;
        let mut before = Vec::new();
        for effect in own_effects {
            let Some(aura) = effect.active_aura() else {
                continue;
            };
            let source = locate(&before_tokens, token.token_id)?;
            let set = ProximitySet::capture(
                self.ports.geometry.as_ref(),
                source,
                &before_tokens,
                aura,
                secret_policy,
            );
            before.push((effect, set));
        }

        self.ports
            .movement
            .await_movement_settled(token.token_id)
            .await?;

        let tokens = self.ports.scene.scene_tokens(token.scene_id).await?;
        let settled = SettledMove {
            correlation_id: Uuid::new_v4(),
            moved: locate(&tokens, token.token_id)?.clone(),
            tokens,
            final_segment,
        };
        debug!(
            correlation_id = %settled.correlation_id,
            final_segment,
            source_auras = before.len(),
            "token settled"
        );

        let mut report = ReconcileReport::default();
        for (effect, before_set) in &before {
            self.reconcile_source(&settled, effect, before_set, &mut report)
                .await?;
        }
        self.reconcile_target(&settled, &mut report).await?;
        Ok(report)
    }

    /// Pass A: actors entering or leaving an aura the moving token emits.
    async fn reconcile_source(
        &self,
        settled: &SettledMove,
        effect: &ActiveEffect,
        before: &ProximitySet,
        report: &mut ReconcileReport,
    ) -> Result<(), DomainError> {
        let Some(aura) = effect.active_aura() else {
            return Ok(());
        };
        let after = ProximitySet::capture(
            self.ports.geometry.as_ref(),
            &settled.moved,
            &settled.tokens,
            aura,
            self.settings.secret_disposition,
        );
        let delta = ProximitySet::diff(before, &after);

        // Other tokens of the moving actor emit the same aura; an actor one of
        // them still reaches keeps the effect.
        let covered: BTreeSet<Uuid> = settled
            .tokens
            .iter()
            .filter(|token| {
                token.actor_id == settled.moved.actor_id && token.token_id != settled.moved.token_id
            })
            .flat_map(|twin| {
                ProximitySet::capture(
                    self.ports.geometry.as_ref(),
                    twin,
                    &settled.tokens,
                    aura,
                    self.settings.secret_disposition,
                )
                .actors()
                .collect::<Vec<_>>()
            })
            .collect();

        // Removals are never deferred to the end of the path.
        let mut stale = Vec::new();
        for &actor_id in delta.left.iter().filter(|actor_id| !covered.contains(*actor_id)) {
            if let Some(derived) = self.ports.effects.find_derived(actor_id, effect.id).await? {
                stale.push(derived.id);
            }
        }
        if !stale.is_empty() {
            info!(origin = %effect.id, effects = stale.len(), "removing aura from actors out of range");
            self.gateway
                .delete_effects(settled.correlation_id, stale)
                .await?;
            report.removal_requests += 1;
        }

        if !settled.final_segment {
            return Ok(());
        }

        // Everyone in range at the end of the path who lacks the effect,
        // which covers actors that just entered.
        let mut candidates: BTreeSet<Uuid> = delta.entered.iter().copied().collect();
        candidates.extend(
            settled
                .tokens
                .iter()
                .map(|token| token.actor_id)
                .filter(|actor_id| after.contains(*actor_id)),
        );
        let mut recipients = Vec::new();
        for actor_id in candidates {
            if actor_id == settled.moved.actor_id {
                continue;
            }
            if self
                .ports
                .effects
                .find_derived(actor_id, effect.id)
                .await?
                .is_some()
            {
                continue;
            }
            recipients.push(actor_id);
        }
        let Some(draft) = effect.derive() else {
            return Ok(());
        };
        if !recipients.is_empty() {
            info!(origin = %effect.id, actors = recipients.len(), "applying aura to actors in range");
            self.gateway
                .apply_effect(settled.correlation_id, draft, recipients)
                .await?;
            report.addition_requests += 1;
        }
        Ok(())
    }

    /// Pass B: auras on other actors' tokens the moving token entered or
    /// left.
    async fn reconcile_target(
        &self,
        settled: &SettledMove,
        report: &mut ReconcileReport,
    ) -> Result<(), DomainError> {
        let moving_actor = settled.moved.actor_id;
        let other_actors: BTreeSet<Uuid> = settled
            .tokens
            .iter()
            .map(|token| token.actor_id)
            .filter(|actor_id| *actor_id != moving_actor)
            .collect();

        let mut effects_by_actor: HashMap<Uuid, Vec<ActiveEffect>> = HashMap::new();
        for actor_id in other_actors {
            let effects = self.ports.effects.actor_effects(actor_id).await?;
            effects_by_actor.insert(actor_id, effects);
        }
        let sources: Vec<NearbySource<'_>> = settled
            .tokens
            .iter()
            .filter_map(|token| {
                effects_by_actor
                    .get(&token.actor_id)
                    .map(|effects| NearbySource {
                        token,
                        effects: effects.as_slice(),
                    })
            })
            .collect();

        let held_origins: HashSet<Uuid> = self
            .ports
            .effects
            .actor_effects(moving_actor)
            .await?
            .iter()
            .filter_map(|effect| effect.origin)
            .collect();

        let plan = plan_target_pass(
            self.ports.geometry.as_ref(),
            &settled.moved,
            &sources,
            &held_origins,
            self.settings.secret_disposition,
        );

        if !plan.remove_origins.is_empty() {
            info!(auras = plan.remove_origins.len(), "removing auras the token left");
            self.gateway
                .delete_aura_effects(settled.correlation_id, moving_actor, plan.remove_origins)
                .await?;
            report.removal_requests += 1;
        }
        if settled.final_segment && !plan.add.is_empty() {
            info!(auras = plan.add.len(), "applying auras the token entered");
            self.gateway
                .apply_aura_effects(settled.correlation_id, moving_actor, plan.add)
                .await?;
            report.addition_requests += 1;
        }
        Ok(())
    }
}
