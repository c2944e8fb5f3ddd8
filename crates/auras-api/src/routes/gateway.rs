//! Authority endpoint of the arbitration gateway.
//!
//! Participants forward gateway requests here by operation name.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use auras_gateway::domain::requests::OPERATIONS;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body returned after a gateway request is applied.
#[derive(Debug, Serialize)]
pub struct GatewayResponse {
    /// Effects created.
    pub created: Vec<Uuid>,
    /// Effects deleted.
    pub deleted: Vec<Uuid>,
}

/// Response body listing the registered operations.
#[derive(Debug, Serialize)]
pub struct OperationsResponse {
    /// Operation names.
    pub operations: Vec<&'static str>,
}

/// GET /
async fn list_operations() -> Json<OperationsResponse> {
    Json(OperationsResponse {
        operations: OPERATIONS.to_vec(),
    })
}

/// POST /{operation}
#[instrument(skip(state, payload))]
async fn dispatch(
    State(state): State<AppState>,
    Path(operation): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<GatewayResponse>, ApiError> {
    info!("handling gateway request");

    let result = state.dispatcher.dispatch_named(&operation, payload).await?;

    Ok(Json(GatewayResponse {
        created: result.created,
        deleted: result.deleted,
    }))
}

/// Returns the router for the gateway.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_operations))
        .route("/{operation}", post(dispatch))
}
