//! Caller side of the arbitration gateway.

use std::sync::Arc;
use std::time::Duration;

use auras_core::authority::AuthorityProvider;
use auras_core::effect::EffectDraft;
use auras_core::error::DomainError;
use auras_effects::domain::commands::{
    ApplyAuraEffects, ApplyEffect, DeleteAuraEffects, DeleteEffects,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::channel::AuthorityChannel;
use crate::domain::requests::GatewayRequest;

/// Sends effect mutations to whoever holds authority and waits for them
/// to be applied. Without an authority every request is refused and
/// nothing is mutated locally.
#[derive(Clone)]
pub struct ArbitrationGateway {
    authority: Arc<dyn AuthorityProvider>,
    channel: Arc<dyn AuthorityChannel>,
    timeout: Duration,
}

impl std::fmt::Debug for ArbitrationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationGateway")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ArbitrationGateway {
    /// Creates a gateway that gives up on a request after `timeout`.
    #[must_use]
    pub fn new(
        authority: Arc<dyn AuthorityProvider>,
        channel: Arc<dyn AuthorityChannel>,
        timeout: Duration,
    ) -> Self {
        Self {
            authority,
            channel,
            timeout,
        }
    }

    /// Whether an authority is currently present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.authority.current_authority().is_some()
    }

    /// Submits a request and waits for the authority's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoAuthority` if nobody holds authority,
    /// `DomainError::GatewayTimeout` if the acknowledgement does not arrive
    /// in time, or whatever error the authority reported.
    #[instrument(skip_all, fields(operation = request.operation(), correlation_id = %request.correlation_id()))]
    pub async fn submit(&self, request: GatewayRequest) -> Result<(), DomainError> {
        let Some(authority) = self.authority.current_authority() else {
            return Err(DomainError::NoAuthority);
        };
        let operation = request.operation();
        debug!(authority = %authority.participant_id, "submitting gateway request");

        match tokio::time::timeout(self.timeout, self.channel.send(authority, request)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::GatewayTimeout {
                operation,
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Applies one derived effect to several actors.
    ///
    /// # Errors
    ///
    /// See [`ArbitrationGateway::submit`].
    pub async fn apply_effect(
        &self,
        correlation_id: Uuid,
        effect: EffectDraft,
        actor_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.submit(GatewayRequest::ApplyEffect(ApplyEffect {
            correlation_id,
            effect,
            actor_ids,
        }))
        .await
    }

    /// Deletes effects by identifier.
    ///
    /// # Errors
    ///
    /// See [`ArbitrationGateway::submit`].
    pub async fn delete_effects(
        &self,
        correlation_id: Uuid,
        effect_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.submit(GatewayRequest::DeleteEffects(DeleteEffects {
            correlation_id,
            effect_ids,
        }))
        .await
    }

    /// Applies several derived effects to one actor.
    ///
    /// # Errors
    ///
    /// See [`ArbitrationGateway::submit`].
    pub async fn apply_aura_effects(
        &self,
        correlation_id: Uuid,
        actor_id: Uuid,
        effects: Vec<EffectDraft>,
    ) -> Result<(), DomainError> {
        self.submit(GatewayRequest::ApplyAuraEffects(ApplyAuraEffects {
            correlation_id,
            actor_id,
            effects,
        }))
        .await
    }

    /// Deletes an actor's effects derived from the given auras.
    ///
    /// # Errors
    ///
    /// See [`ArbitrationGateway::submit`].
    pub async fn delete_aura_effects(
        &self,
        correlation_id: Uuid,
        actor_id: Uuid,
        origin_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.submit(GatewayRequest::DeleteAuraEffects(DeleteAuraEffects {
            correlation_id,
            actor_id,
            origin_ids,
        }))
        .await
    }
}
