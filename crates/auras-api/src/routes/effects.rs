//! Routes for switching effects in and out of aura mode.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post, routing::put};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use auras_core::disposition::AuraDisposition;
use auras_core::geometry::CollisionPolicy;
use auras_effects::application::command_handlers;
use auras_effects::application::query_handlers::EffectView;
use auras_effects::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{effect_id}/aura-mode.
#[derive(Debug, Deserialize)]
pub struct AuraModeRequest {
    /// `true` to make the effect an aura.
    pub enabled: bool,
}

/// Request body for PUT /{effect_id}/aura.
#[derive(Debug, Deserialize)]
pub struct ConfigureAuraRequest {
    /// Reach of the aura.
    pub radius: f64,
    /// Disposition filter as `-1`, `0` or `1`.
    #[serde(default)]
    pub disposition: AuraDisposition,
    /// Obstruction rules.
    #[serde(default)]
    pub collision: CollisionPolicy,
}

/// POST /{effect_id}/aura-mode
#[instrument(skip(state, request), fields(enabled = request.enabled))]
async fn set_aura_mode(
    State(state): State<AppState>,
    Path(effect_id): Path<Uuid>,
    Json(request): Json<AuraModeRequest>,
) -> Result<Json<EffectView>, ApiError> {
    let command = commands::SetAuraMode {
        correlation_id: Uuid::new_v4(),
        effect_id,
        enabled: request.enabled,
    };

    info!(correlation_id = %command.correlation_id, "handling set_aura_mode command");

    let effect = command_handlers::handle_set_aura_mode(&command, &*state.effects).await?;
    Ok(Json(effect.into()))
}

/// PUT /{effect_id}/aura
#[instrument(skip(state, request))]
async fn configure_aura(
    State(state): State<AppState>,
    Path(effect_id): Path<Uuid>,
    Json(request): Json<ConfigureAuraRequest>,
) -> Result<Json<EffectView>, ApiError> {
    let command = commands::ConfigureAura {
        correlation_id: Uuid::new_v4(),
        effect_id,
        radius: request.radius,
        disposition: request.disposition,
        collision: request.collision,
    };

    info!(correlation_id = %command.correlation_id, "handling configure_aura command");

    let effect = command_handlers::handle_configure_aura(&command, &*state.effects).await?;
    Ok(Json(effect.into()))
}

/// Returns the router for effects.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{effect_id}/aura-mode", post(set_aura_mode))
        .route("/{effect_id}/aura", put(configure_aura))
}
