//! Authority side of the arbitration gateway.

use std::sync::Arc;

use auras_core::authority::AuthorityProvider;
use auras_core::error::DomainError;
use auras_core::repository::EffectRepository;
use auras_effects::application::command_handlers::{self, EffectCommandResult};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::domain::requests::GatewayRequest;

/// Executes gateway requests against the effect store. Only runs while the
/// local participant is the current authority.
#[derive(Clone)]
pub struct GatewayDispatcher {
    participant_id: Uuid,
    authority: Arc<dyn AuthorityProvider>,
    repo: Arc<dyn EffectRepository>,
}

impl std::fmt::Debug for GatewayDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayDispatcher")
            .field("participant_id", &self.participant_id)
            .finish_non_exhaustive()
    }
}

impl GatewayDispatcher {
    /// Creates a dispatcher for the local participant.
    #[must_use]
    pub fn new(
        participant_id: Uuid,
        authority: Arc<dyn AuthorityProvider>,
        repo: Arc<dyn EffectRepository>,
    ) -> Self {
        Self {
            participant_id,
            authority,
            repo,
        }
    }

    /// The local participant identifier.
    #[must_use]
    pub fn participant_id(&self) -> Uuid {
        self.participant_id
    }

    /// Applies a request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotAuthority` if the local participant does not
    /// currently hold authority, or the command handler's error.
    #[instrument(skip_all, fields(
        operation = request.operation(),
        command_type = request.command().command_type(),
        correlation_id = %request.correlation_id(),
    ))]
    pub async fn dispatch(
        &self,
        request: GatewayRequest,
    ) -> Result<EffectCommandResult, DomainError> {
        let is_authority = self
            .authority
            .current_authority()
            .is_some_and(|handle| handle.participant_id == self.participant_id);
        if !is_authority {
            warn!(participant_id = %self.participant_id, "refusing gateway request: not the authority");
            return Err(DomainError::NotAuthority(self.participant_id));
        }

        let repo = self.repo.as_ref();
        match request {
            GatewayRequest::ApplyEffect(command) => {
                command_handlers::handle_apply_effect(&command, repo).await
            }
            GatewayRequest::DeleteEffects(command) => {
                command_handlers::handle_delete_effects(&command, repo).await
            }
            GatewayRequest::ApplyAuraEffects(command) => {
                command_handlers::handle_apply_aura_effects(&command, repo).await
            }
            GatewayRequest::DeleteAuraEffects(command) => {
                command_handlers::handle_delete_aura_effects(&command, repo).await
            }
        }
    }

    /// Applies a request given by operation name and JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unknown operations or bad
    /// payloads, otherwise as [`GatewayDispatcher::dispatch`].
    pub async fn dispatch_named(
        &self,
        operation: &str,
        payload: serde_json::Value,
    ) -> Result<EffectCommandResult, DomainError> {
        let request = GatewayRequest::from_named(operation, payload)?;
        self.dispatch(request).await
    }
}
