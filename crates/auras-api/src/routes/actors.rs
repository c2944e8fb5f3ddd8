//! Routes for reading and authoring an actor's effects.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use auras_core::effect::{EffectChange, EffectDraft, EffectKind};
use auras_core::error::DomainError;
use auras_effects::application::{command_handlers, query_handlers};
use auras_effects::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{actor_id}/effects.
#[derive(Debug, Deserialize)]
pub struct CreateEffectRequest {
    /// Display name.
    pub name: String,
    /// Base effect or aura.
    pub kind: EffectKind,
    /// Attribute changes.
    #[serde(default)]
    pub changes: Vec<EffectChange>,
}

/// GET /{actor_id}/effects
#[instrument(skip(state))]
async fn get_actor_effects(
    State(state): State<AppState>,
    Path(actor_id): Path<Uuid>,
) -> Result<Json<query_handlers::ActorEffectsView>, ApiError> {
    let view = query_handlers::get_actor_effects(actor_id, &*state.effects).await?;
    Ok(Json(view))
}

/// POST /{actor_id}/effects
#[instrument(skip(state, request))]
async fn create_effect(
    State(state): State<AppState>,
    Path(actor_id): Path<Uuid>,
    Json(request): Json<CreateEffectRequest>,
) -> Result<Json<query_handlers::EffectView>, ApiError> {
    let command = commands::CreateEffect {
        correlation_id: Uuid::new_v4(),
        actor_id,
        effect: EffectDraft {
            name: request.name,
            origin: None,
            kind: request.kind,
            changes: request.changes,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling create_effect command");

    let effect = command_handlers::handle_create_effect(&command, &*state.effects).await?;
    Ok(Json(effect.into()))
}

/// GET /{actor_id}/effects/derived/{origin}
#[instrument(skip(state))]
async fn get_derived_effect(
    State(state): State<AppState>,
    Path((actor_id, origin)): Path<(Uuid, Uuid)>,
) -> Result<Json<query_handlers::EffectView>, ApiError> {
    let view = query_handlers::find_derived_effect(actor_id, origin, &*state.effects)
        .await?
        .ok_or(DomainError::EffectNotFound(origin))?;
    Ok(Json(view))
}

/// Returns the router for actors.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{actor_id}/effects",
            get(get_actor_effects).post(create_effect),
        )
        .route(
            "/{actor_id}/effects/derived/{origin}",
            get(get_derived_effect),
        )
}
