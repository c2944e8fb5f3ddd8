//! The gateway's dispatch table.
//!
//! Each variant is one named remote operation. On the wire a request is
//! `{"operation": <name>, "payload": <command>}`.

use auras_core::command::Command;
use auras_core::error::DomainError;
use auras_effects::domain::commands::{
    ApplyAuraEffects, ApplyEffect, DeleteAuraEffects, DeleteEffects,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the apply-single-effect operation.
pub const APPLY_EFFECT: &str = "apply_effect";
/// Name of the delete-effects operation.
pub const DELETE_EFFECTS: &str = "delete_effects";
/// Name of the apply-many-aura-effects operation.
pub const APPLY_AURA_EFFECTS: &str = "apply_aura_effects";
/// Name of the delete-many-aura-effects operation.
pub const DELETE_AURA_EFFECTS: &str = "delete_aura_effects";

/// Every operation registered with the dispatch table.
pub const OPERATIONS: [&str; 4] = [
    APPLY_EFFECT,
    DELETE_EFFECTS,
    APPLY_AURA_EFFECTS,
    DELETE_AURA_EFFECTS,
];

/// A mutation request addressed to the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload", rename_all = "snake_case")]
pub enum GatewayRequest {
    /// Apply one derived effect to several actors.
    ApplyEffect(ApplyEffect),
    /// Delete effects by identifier.
    DeleteEffects(DeleteEffects),
    /// Apply several derived effects to one actor.
    ApplyAuraEffects(ApplyAuraEffects),
    /// Delete several derived effects from one actor by origin.
    DeleteAuraEffects(DeleteAuraEffects),
}

impl GatewayRequest {
    /// Builds a request from an operation name and its JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the operation is not registered
    /// or the payload does not match it.
    pub fn from_named(operation: &str, payload: serde_json::Value) -> Result<Self, DomainError> {
        if !OPERATIONS.contains(&operation) {
            return Err(DomainError::Validation(format!(
                "unknown gateway operation: {operation}"
            )));
        }
        serde_json::from_value(serde_json::json!({
            "operation": operation,
            "payload": payload,
        }))
        .map_err(|e| DomainError::Validation(format!("invalid {operation} payload: {e}")))
    }

    /// Returns the operation name.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ApplyEffect(_) => APPLY_EFFECT,
            Self::DeleteEffects(_) => DELETE_EFFECTS,
            Self::ApplyAuraEffects(_) => APPLY_AURA_EFFECTS,
            Self::DeleteAuraEffects(_) => DELETE_AURA_EFFECTS,
        }
    }

    /// Returns the wrapped command.
    #[must_use]
    pub fn command(&self) -> &dyn Command {
        match self {
            Self::ApplyEffect(command) => command,
            Self::DeleteEffects(command) => command,
            Self::ApplyAuraEffects(command) => command,
            Self::DeleteAuraEffects(command) => command,
        }
    }

    /// Returns the correlation ID of the wrapped command.
    #[must_use]
    pub fn correlation_id(&self) -> Uuid {
        self.command().correlation_id()
    }
}
