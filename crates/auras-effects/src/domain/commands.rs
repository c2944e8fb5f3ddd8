//! Commands for the Effects context.
//!
//! The first four are the remote operations the arbitration gateway
//! dispatches; they carry small serializable payloads.

use auras_core::command::Command;
use auras_core::disposition::AuraDisposition;
use auras_core::effect::EffectDraft;
use auras_core::geometry::CollisionPolicy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command type of [`ApplyEffect`].
pub const APPLY_EFFECT_COMMAND_TYPE: &str = "effects.apply_effect";
/// Command type of [`DeleteEffects`].
pub const DELETE_EFFECTS_COMMAND_TYPE: &str = "effects.delete_effects";
/// Command type of [`ApplyAuraEffects`].
pub const APPLY_AURA_EFFECTS_COMMAND_TYPE: &str = "effects.apply_aura_effects";
/// Command type of [`DeleteAuraEffects`].
pub const DELETE_AURA_EFFECTS_COMMAND_TYPE: &str = "effects.delete_aura_effects";

/// Command to apply one derived effect to several actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyEffect {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The derived effect data; must carry an origin.
    pub effect: EffectDraft,
    /// Actors that receive a copy.
    pub actor_ids: Vec<Uuid>,
}

impl Command for ApplyEffect {
    fn command_type(&self) -> &'static str {
        APPLY_EFFECT_COMMAND_TYPE
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete effects by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteEffects {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Effects to delete.
    pub effect_ids: Vec<Uuid>,
}

impl Command for DeleteEffects {
    fn command_type(&self) -> &'static str {
        DELETE_EFFECTS_COMMAND_TYPE
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to apply several distinct derived effects to one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyAuraEffects {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The receiving actor.
    pub actor_id: Uuid,
    /// Derived effect data; each must carry an origin.
    pub effects: Vec<EffectDraft>,
}

impl Command for ApplyAuraEffects {
    fn command_type(&self) -> &'static str {
        APPLY_AURA_EFFECTS_COMMAND_TYPE
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete an actor's effects derived from the given auras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAuraEffects {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The actor losing the effects.
    pub actor_id: Uuid,
    /// Source aura effect identifiers.
    pub origin_ids: Vec<Uuid>,
}

impl Command for DeleteAuraEffects {
    fn command_type(&self) -> &'static str {
        DELETE_AURA_EFFECTS_COMMAND_TYPE
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to switch an effect in or out of aura mode.
#[derive(Debug, Clone)]
pub struct SetAuraMode {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The effect to convert.
    pub effect_id: Uuid,
    /// `true` to make it an aura, `false` to restore its original type.
    pub enabled: bool,
}

impl Command for SetAuraMode {
    fn command_type(&self) -> &'static str {
        "effects.set_aura_mode"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to change an aura's parameters.
#[derive(Debug, Clone)]
pub struct ConfigureAura {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The aura effect.
    pub effect_id: Uuid,
    /// New radius; zero disables the aura.
    pub radius: f64,
    /// New disposition filter.
    pub disposition: AuraDisposition,
    /// New collision policy.
    pub collision: CollisionPolicy,
}

impl Command for ConfigureAura {
    fn command_type(&self) -> &'static str {
        "effects.configure_aura"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to author a new effect on an actor.
#[derive(Debug, Clone)]
pub struct CreateEffect {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning actor.
    pub actor_id: Uuid,
    /// Effect data; must not carry an origin.
    pub effect: EffectDraft,
}

impl Command for CreateEffect {
    fn command_type(&self) -> &'static str {
        "effects.create_effect"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
