//! Transport port between participants.

use async_trait::async_trait;
use auras_core::authority::AuthorityHandle;
use auras_core::error::DomainError;

use super::requests::GatewayRequest;

/// Delivers gateway requests to the authority.
#[async_trait]
pub trait AuthorityChannel: Send + Sync {
    /// Sends `request` to `authority` and resolves once the authority has
    /// applied it.
    async fn send(
        &self,
        authority: AuthorityHandle,
        request: GatewayRequest,
    ) -> Result<(), DomainError>;
}
