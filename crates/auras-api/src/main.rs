//! Token auras authority server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use auras_api::authority::LocalAuthority;
use auras_api::error::AppError;
use auras_api::state::AppState;
use auras_effect_store::memory_effect_repository::InMemoryEffectRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting token auras authority server");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let participant_id = match std::env::var("AURAS_PARTICIPANT_ID") {
        Ok(raw) => Uuid::parse_str(raw.trim()).map_err(|e| {
            AppError::Config(format!("AURAS_PARTICIPANT_ID must be a valid UUID: {e}"))
        })?,
        Err(_) => Uuid::new_v4(),
    };
    tracing::info!(%participant_id, "holding aura authority");

    // Build application state.
    let app_state = AppState::new(
        participant_id,
        Arc::new(LocalAuthority::new(participant_id)),
        Arc::new(InMemoryEffectRepository::new()),
    );

    // TODO: Replace CorsLayer::permissive() with the game client's origin.
    let app = auras_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
