//! Query handlers for the Effects context.

use auras_core::effect::{ActiveEffect, AuraParams};
use auras_core::error::DomainError;
use auras_core::repository::EffectRepository;
use serde::Serialize;
use uuid::Uuid;

/// Read-only view of a single effect.
#[derive(Debug, Serialize)]
pub struct EffectView {
    /// Effect identifier.
    pub effect_id: Uuid,
    /// Display name.
    pub name: String,
    /// Type tag the effect reports.
    pub type_tag: String,
    /// Source aura identifier for derived effects.
    pub origin: Option<Uuid>,
    /// Aura parameters for aura effects.
    pub aura: Option<AuraParams>,
}

impl From<ActiveEffect> for EffectView {
    fn from(effect: ActiveEffect) -> Self {
        let aura = effect.aura().cloned();
        Self {
            effect_id: effect.id,
            name: effect.name,
            type_tag: effect.kind.type_tag().to_owned(),
            origin: effect.origin,
            aura,
        }
    }
}

/// Read-only view of an actor's effects.
#[derive(Debug, Serialize)]
pub struct ActorEffectsView {
    /// The actor identifier.
    pub actor_id: Uuid,
    /// Effects the actor owns.
    pub effects: Vec<EffectView>,
}

/// Retrieves every effect owned by an actor.
///
/// # Errors
///
/// Returns `DomainError` if the repository fails.
pub async fn get_actor_effects(
    actor_id: Uuid,
    repo: &dyn EffectRepository,
) -> Result<ActorEffectsView, DomainError> {
    let effects = repo.actor_effects(actor_id).await?;
    Ok(ActorEffectsView {
        actor_id,
        effects: effects.into_iter().map(EffectView::from).collect(),
    })
}

/// Retrieves the effect on `actor_id` derived from the aura `origin`.
///
/// # Errors
///
/// Returns `DomainError` if the repository fails.
pub async fn find_derived_effect(
    actor_id: Uuid,
    origin: Uuid,
    repo: &dyn EffectRepository,
) -> Result<Option<EffectView>, DomainError> {
    Ok(repo
        .find_derived(actor_id, origin)
        .await?
        .map(EffectView::from))
}
