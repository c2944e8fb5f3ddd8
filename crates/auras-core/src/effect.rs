//! Effect data model.
//!
//! An effect is either a plain `Base` effect or an `Aura` that hands a
//! derived copy of itself to actors in range. Turning an effect into an
//! aura remembers its previous type tag so the conversion can be undone,
//! and derived copies carry that original type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::disposition::AuraDisposition;
use crate::geometry::CollisionPolicy;

/// Type tag of an ordinary effect.
pub const BASE_EFFECT_TYPE: &str = "base";

/// Type tag reported for aura effects.
pub const AURA_EFFECT_TYPE: &str = "aura";

/// A single attribute change carried by an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectChange {
    /// Attribute key the change targets.
    pub key: String,
    /// Value applied to the attribute.
    pub value: serde_json::Value,
}

/// Parameters of an aura effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraParams {
    /// Reach of the aura. Zero disables it.
    pub radius: f64,
    /// Which tokens the aura affects.
    pub disposition: AuraDisposition,
    /// Obstructions honored when measuring reach.
    pub collision: CollisionPolicy,
    /// Type tag the effect had before it became an aura.
    pub original_type: String,
}

impl AuraParams {
    /// Whether the aura reaches anything at all. Zero, negative and
    /// non-finite radii are inert.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

/// Kind of an effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// An ordinary effect with its type tag.
    Base {
        /// The effect's type tag.
        type_tag: String,
    },
    /// An aura emitter.
    Aura(AuraParams),
}

impl EffectKind {
    /// A base effect of the default type.
    #[must_use]
    pub fn base() -> Self {
        Self::Base {
            type_tag: BASE_EFFECT_TYPE.to_owned(),
        }
    }

    /// Returns the type tag this kind reports.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Base { type_tag } => type_tag,
            Self::Aura(_) => AURA_EFFECT_TYPE,
        }
    }

    /// Converts into an inert aura that remembers the current type tag.
    /// An aura is returned unchanged.
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn to_aura(self) -> Self {
        match self {
            Self::Base { type_tag } => Self::Aura(AuraParams {
                radius: 0.0,
                disposition: AuraDisposition::default(),
                collision: CollisionPolicy::default(),
                original_type: type_tag,
            }),
            aura @ Self::Aura(_) => aura,
        }
    }

    /// Converts back into the base kind the aura was created from.
    /// A base effect is returned unchanged.
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn from_aura(self) -> Self {
        match self {
            Self::Aura(params) => Self::Base {
                type_tag: params.original_type,
            },
            base @ Self::Base { .. } => base,
        }
    }
}

/// An effect owned by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    /// Effect identifier.
    pub id: Uuid,
    /// The actor that owns this effect.
    pub actor_id: Uuid,
    /// Display name.
    pub name: String,
    /// Identifier of the aura effect this one was derived from.
    pub origin: Option<Uuid>,
    /// Base effect or aura.
    pub kind: EffectKind,
    /// Attribute changes.
    pub changes: Vec<EffectChange>,
}

impl ActiveEffect {
    /// Returns the aura parameters if this effect is an aura.
    #[must_use]
    pub fn aura(&self) -> Option<&AuraParams> {
        match &self.kind {
            EffectKind::Aura(params) => Some(params),
            EffectKind::Base { .. } => None,
        }
    }

    /// Returns the aura parameters if this effect is an aura with a
    /// positive radius.
    #[must_use]
    pub fn active_aura(&self) -> Option<&AuraParams> {
        self.aura().filter(|params| params.is_active())
    }

    /// Whether this effect was derived from the given aura effect.
    #[must_use]
    pub fn is_derived_from(&self, origin: Uuid) -> bool {
        self.origin == Some(origin)
    }

    /// Builds the data for a derived copy of this aura, or `None` if this
    /// effect is not an aura.
    #[must_use]
    pub fn derive(&self) -> Option<EffectDraft> {
        let params = self.aura()?;
        Some(EffectDraft {
            name: self.name.clone(),
            origin: Some(self.id),
            kind: EffectKind::Base {
                type_tag: params.original_type.clone(),
            },
            changes: self.changes.clone(),
        })
    }
}

/// Effect data before the store has assigned an identifier and owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDraft {
    /// Display name.
    pub name: String,
    /// Identifier of the source aura effect.
    pub origin: Option<Uuid>,
    /// Base effect or aura.
    pub kind: EffectKind,
    /// Attribute changes.
    pub changes: Vec<EffectChange>,
}

impl EffectDraft {
    /// Materializes the draft as an effect owned by `actor_id`.
    #[must_use]
    pub fn into_effect(self, id: Uuid, actor_id: Uuid) -> ActiveEffect {
        ActiveEffect {
            id,
            actor_id,
            name: self.name,
            origin: self.origin,
            kind: self.kind,
            changes: self.changes,
        }
    }
}
