//! Effect repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::effect::{ActiveEffect, EffectDraft, EffectKind};
use crate::error::DomainError;

/// Repository trait over the host's effect documents.
#[async_trait]
pub trait EffectRepository: Send + Sync {
    /// Load every effect owned by an actor. Unknown actors own nothing.
    async fn actor_effects(&self, actor_id: Uuid) -> Result<Vec<ActiveEffect>, DomainError>;

    /// Load a single effect by identifier.
    async fn find_effect(&self, effect_id: Uuid) -> Result<Option<ActiveEffect>, DomainError>;

    /// Find the effect on `actor_id` derived from the aura `origin`, if any.
    async fn find_derived(
        &self,
        actor_id: Uuid,
        origin: Uuid,
    ) -> Result<Option<ActiveEffect>, DomainError>;

    /// Create effects on an actor from drafts, returning the stored effects.
    async fn create_effects(
        &self,
        actor_id: Uuid,
        drafts: &[EffectDraft],
    ) -> Result<Vec<ActiveEffect>, DomainError>;

    /// Create derived effects on an actor, skipping every draft whose origin
    /// the actor already holds. The check and the insert happen as one step,
    /// so concurrent callers never produce a second copy or an error for the
    /// same `(actor, origin)` pair. Returns only the effects created.
    ///
    /// Drafts without an origin are rejected with `DomainError::Validation`.
    async fn create_derived_effects(
        &self,
        actor_id: Uuid,
        drafts: &[EffectDraft],
    ) -> Result<Vec<ActiveEffect>, DomainError>;

    /// Delete effects by identifier. Identifiers that no longer exist are
    /// ignored; the identifiers actually deleted are returned.
    async fn delete_effects(&self, effect_ids: &[Uuid]) -> Result<Vec<Uuid>, DomainError>;

    /// Replace an effect's kind, returning the updated effect.
    async fn update_kind(
        &self,
        effect_id: Uuid,
        kind: EffectKind,
    ) -> Result<ActiveEffect, DomainError>;
}
