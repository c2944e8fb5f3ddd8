//! Shared application state.

use std::sync::Arc;

use auras_core::authority::AuthorityProvider;
use auras_core::repository::EffectRepository;
use auras_gateway::application::dispatcher::GatewayDispatcher;
use uuid::Uuid;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Executes gateway requests.
    pub dispatcher: GatewayDispatcher,
    /// Effect store.
    pub effects: Arc<dyn EffectRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state for participant `participant_id`.
    #[must_use]
    pub fn new(
        participant_id: Uuid,
        authority: Arc<dyn AuthorityProvider>,
        effects: Arc<dyn EffectRepository>,
    ) -> Self {
        Self {
            dispatcher: GatewayDispatcher::new(participant_id, authority, Arc::clone(&effects)),
            effects,
        }
    }
}
