//! Target-perspective planning: which auras the moving actor now sits in.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use auras_core::disposition::SecretDispositionPolicy;
use auras_core::effect::{ActiveEffect, EffectDraft};
use auras_core::geometry::{GeometryService, TokenPlacement};
use uuid::Uuid;

/// Another token on the scene together with its actor's effects.
#[derive(Debug, Clone, Copy)]
pub struct NearbySource<'a> {
    /// The other token.
    pub token: &'a TokenPlacement,
    /// Effects owned by the other token's actor.
    pub effects: &'a [ActiveEffect],
}

/// Mutations needed for the moving actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetPlan {
    /// Origins whose derived effect the moving actor should lose.
    pub remove_origins: Vec<Uuid>,
    /// Derived effects the moving actor should gain.
    pub add: Vec<EffectDraft>,
}

impl TargetPlan {
    /// Whether the plan changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove_origins.is_empty() && self.add.is_empty()
    }
}

/// Works out which auras on other actors' tokens the moving token is in
/// or out of.
///
/// `held_origins` are the origins the moving actor already holds a derived
/// effect for; removals are limited to them and additions exclude them.
/// When several tokens of one actor emit the same aura, being in range of
/// any of them keeps the effect.
#[must_use]
pub fn plan_target_pass(
    geometry: &dyn GeometryService,
    moving: &TokenPlacement,
    sources: &[NearbySource<'_>],
    held_origins: &HashSet<Uuid>,
    secret_policy: SecretDispositionPolicy,
) -> TargetPlan {
    let mut in_range: BTreeMap<Uuid, EffectDraft> = BTreeMap::new();
    let mut out_of_range: BTreeSet<Uuid> = BTreeSet::new();

    for source in sources {
        if source.token.actor_id == moving.actor_id {
            continue;
        }
        let Some(relation) = secret_policy.relation(source.token.disposition, moving.disposition)
        else {
            continue;
        };
        for effect in source.effects {
            let Some(aura) = effect.active_aura() else {
                continue;
            };
            if !aura.disposition.admits(relation) {
                continue;
            }
            let distance = geometry.compute_distance(source.token, moving, aura.collision);
            if distance <= aura.radius {
                if let Some(draft) = effect.derive() {
                    in_range.entry(effect.id).or_insert(draft);
                }
            } else {
                out_of_range.insert(effect.id);
            }
        }
    }

    TargetPlan {
        remove_origins: out_of_range
            .into_iter()
            .filter(|origin| !in_range.contains_key(origin) && held_origins.contains(origin))
            .collect(),
        add: in_range
            .into_iter()
            .filter(|(origin, _)| !held_origins.contains(origin))
            .map(|(_, draft)| draft)
            .collect(),
    }
}
