//! HTTP surface of the aura authority.
//!
//! The server owns the effect store and executes arbitration gateway
//! requests forwarded by other participants.

pub mod authority;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/gateway", routes::gateway::router())
        .nest("/api/v1/actors", routes::actors::router())
        .nest("/api/v1/effects", routes::effects::router())
        .with_state(state)
}
