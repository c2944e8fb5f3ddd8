//! Index from source aura effects to their derived copies.

use std::collections::HashMap;

use auras_core::effect::ActiveEffect;
use uuid::Uuid;

/// Maps each origin to the single derived effect each actor holds for it.
#[derive(Debug, Default, Clone)]
pub struct OriginIndex {
    by_origin: HashMap<Uuid, HashMap<Uuid, Uuid>>,
}

impl OriginIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a derived effect. Effects without an origin are ignored.
    /// Returns the previously indexed effect for the same actor and origin.
    pub fn insert(&mut self, effect: &ActiveEffect) -> Option<Uuid> {
        let origin = effect.origin?;
        self.by_origin
            .entry(origin)
            .or_default()
            .insert(effect.actor_id, effect.id)
    }

    /// Forgets a derived effect.
    pub fn remove(&mut self, effect: &ActiveEffect) {
        let Some(origin) = effect.origin else {
            return;
        };
        if let Some(holders) = self.by_origin.get_mut(&origin) {
            if holders.get(&effect.actor_id) == Some(&effect.id) {
                holders.remove(&effect.actor_id);
            }
            if holders.is_empty() {
                self.by_origin.remove(&origin);
            }
        }
    }

    /// Returns the effect `actor_id` holds derived from `origin`.
    #[must_use]
    pub fn find(&self, actor_id: Uuid, origin: Uuid) -> Option<Uuid> {
        self.by_origin.get(&origin)?.get(&actor_id).copied()
    }

    /// Returns every `(actor, effect)` pair derived from `origin`.
    #[must_use]
    pub fn derived_from(&self, origin: Uuid) -> Vec<(Uuid, Uuid)> {
        self.by_origin
            .get(&origin)
            .map(|holders| holders.iter().map(|(a, e)| (*a, *e)).collect())
            .unwrap_or_default()
    }
}
