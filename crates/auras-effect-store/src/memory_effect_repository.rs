//! In-memory implementation of `EffectRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use auras_core::effect::{ActiveEffect, EffectDraft, EffectKind};
use auras_core::error::DomainError;
use auras_core::repository::EffectRepository;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::origin_index::OriginIndex;

#[derive(Debug, Default)]
struct StoreState {
    effects: HashMap<Uuid, ActiveEffect>,
    by_actor: HashMap<Uuid, Vec<Uuid>>,
    index: OriginIndex,
}

impl StoreState {
    fn store(&mut self, effect: ActiveEffect) -> Result<(), DomainError> {
        if let Some(origin) = effect.origin {
            if self.index.find(effect.actor_id, origin).is_some() {
                return Err(DomainError::Validation(format!(
                    "actor {} already holds an effect derived from {origin}",
                    effect.actor_id
                )));
            }
        }
        if self.effects.contains_key(&effect.id) {
            return Err(DomainError::Validation(format!(
                "effect {} already exists",
                effect.id
            )));
        }
        self.index.insert(&effect);
        self.by_actor
            .entry(effect.actor_id)
            .or_default()
            .push(effect.id);
        self.effects.insert(effect.id, effect);
        Ok(())
    }

    fn remove(&mut self, effect_id: Uuid) -> Option<ActiveEffect> {
        let effect = self.effects.remove(&effect_id)?;
        self.index.remove(&effect);
        if let Some(owned) = self.by_actor.get_mut(&effect.actor_id) {
            owned.retain(|id| *id != effect_id);
        }
        Some(effect)
    }
}

/// Effect store held in memory. Derived effects are looked up through an
/// [`OriginIndex`] rather than by scanning an actor's effects.
#[derive(Debug, Default)]
pub struct InMemoryEffectRepository {
    state: RwLock<StoreState>,
}

impl InMemoryEffectRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed effect, such as an aura authored on an actor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the identifier is taken or the
    /// actor already holds an effect with the same origin.
    pub async fn insert(&self, effect: ActiveEffect) -> Result<(), DomainError> {
        self.state.write().await.store(effect)
    }

    /// Returns every effect derived from `origin` as `(actor, effect)` pairs.
    pub async fn derived_from(&self, origin: Uuid) -> Vec<(Uuid, Uuid)> {
        self.state.read().await.index.derived_from(origin)
    }
}

#[async_trait]
impl EffectRepository for InMemoryEffectRepository {
    async fn actor_effects(&self, actor_id: Uuid) -> Result<Vec<ActiveEffect>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .by_actor
            .get(&actor_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.effects.get(id).cloned())
            .collect())
    }

    async fn find_effect(&self, effect_id: Uuid) -> Result<Option<ActiveEffect>, DomainError> {
        Ok(self.state.read().await.effects.get(&effect_id).cloned())
    }

    async fn find_derived(
        &self,
        actor_id: Uuid,
        origin: Uuid,
    ) -> Result<Option<ActiveEffect>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .index
            .find(actor_id, origin)
            .and_then(|id| state.effects.get(&id).cloned()))
    }

    async fn create_effects(
        &self,
        actor_id: Uuid,
        drafts: &[EffectDraft],
    ) -> Result<Vec<ActiveEffect>, DomainError> {
        let mut state = self.state.write().await;
        let mut created: Vec<ActiveEffect> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let effect = draft.clone().into_effect(Uuid::new_v4(), actor_id);
            if let Err(err) = state.store(effect.clone()) {
                // all-or-nothing per batch
                for stored in &created {
                    state.remove(stored.id);
                }
                return Err(err);
            }
            created.push(effect);
        }
        debug!(%actor_id, created = created.len(), "stored effects");
        Ok(created)
    }

    async fn create_derived_effects(
        &self,
        actor_id: Uuid,
        drafts: &[EffectDraft],
    ) -> Result<Vec<ActiveEffect>, DomainError> {
        let mut state = self.state.write().await;
        let mut created: Vec<ActiveEffect> = Vec::new();
        for draft in drafts {
            let Some(origin) = draft.origin else {
                for stored in &created {
                    state.remove(stored.id);
                }
                return Err(DomainError::Validation(
                    "derived effect must carry an origin".into(),
                ));
            };
            if state.index.find(actor_id, origin).is_some() {
                debug!(%actor_id, %origin, "actor already holds derived effect");
                continue;
            }
            let effect = draft.clone().into_effect(Uuid::new_v4(), actor_id);
            if let Err(err) = state.store(effect.clone()) {
                for stored in &created {
                    state.remove(stored.id);
                }
                return Err(err);
            }
            created.push(effect);
        }
        debug!(%actor_id, created = created.len(), "stored derived effects");
        Ok(created)
    }

    async fn delete_effects(&self, effect_ids: &[Uuid]) -> Result<Vec<Uuid>, DomainError> {
        let mut state = self.state.write().await;
        Ok(effect_ids
            .iter()
            .filter_map(|id| state.remove(*id).map(|effect| effect.id))
            .collect())
    }

    async fn update_kind(
        &self,
        effect_id: Uuid,
        kind: EffectKind,
    ) -> Result<ActiveEffect, DomainError> {
        let mut state = self.state.write().await;
        let effect = state
            .effects
            .get_mut(&effect_id)
            .ok_or(DomainError::EffectNotFound(effect_id))?;
        effect.kind = kind;
        Ok(effect.clone())
    }
}
