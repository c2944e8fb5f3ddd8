//! Proximity sets: which actors an aura currently reaches.

use std::collections::BTreeSet;

use auras_core::disposition::SecretDispositionPolicy;
use auras_core::effect::AuraParams;
use auras_core::geometry::{
    GeometryService, RadiusQuery, TokenPlacement, find_tokens_within_radius,
};
use uuid::Uuid;

/// Point-in-time set of actors within an aura's radius.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProximitySet(BTreeSet<Uuid>);

impl ProximitySet {
    /// Captures the actors whose tokens `aura`, emitted by `source`, reaches
    /// among `tokens`. Inert auras reach nobody.
    #[must_use]
    pub fn capture(
        geometry: &dyn GeometryService,
        source: &TokenPlacement,
        tokens: &[TokenPlacement],
        aura: &AuraParams,
        secret_policy: SecretDispositionPolicy,
    ) -> Self {
        if !aura.is_active() {
            return Self::default();
        }
        let query = RadiusQuery {
            radius: aura.radius,
            disposition: aura.disposition,
            collision: aura.collision,
            secret_policy,
        };
        find_tokens_within_radius(geometry, source, tokens, &query)
            .into_iter()
            .map(|token| token.actor_id)
            .collect()
    }

    /// Whether the actor is in the set.
    #[must_use]
    pub fn contains(&self, actor_id: Uuid) -> bool {
        self.0.contains(&actor_id)
    }

    /// Iterates the actors in the set.
    pub fn actors(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.0.iter().copied()
    }

    /// Number of actors in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compares a pre-move snapshot with a post-move one.
    #[must_use]
    pub fn diff(before: &Self, after: &Self) -> ProximityDelta {
        ProximityDelta {
            entered: after.0.difference(&before.0).copied().collect(),
            left: before.0.difference(&after.0).copied().collect(),
        }
    }
}

impl FromIterator<Uuid> for ProximitySet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Actors that entered or left an aura between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProximityDelta {
    /// Present after but not before.
    pub entered: Vec<Uuid>,
    /// Present before but not after.
    pub left: Vec<Uuid>,
}

impl ProximityDelta {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty()
    }
}
