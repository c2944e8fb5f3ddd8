//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A token was not found on its scene.
    #[error("token not found: {0}")]
    TokenNotFound(Uuid),

    /// An effect was not found.
    #[error("effect not found: {0}")]
    EffectNotFound(Uuid),

    /// No participant currently holds authority over shared effect state.
    #[error("no authority is present to apply effect changes")]
    NoAuthority,

    /// The given participant received a mutation but is not the authority.
    #[error("participant {0} does not hold authority")]
    NotAuthority(Uuid),

    /// The authority refused or failed a gateway request.
    #[error("gateway rejected {operation}: {reason}")]
    GatewayRejected {
        /// The remote operation name.
        operation: String,
        /// Why the authority refused it.
        reason: String,
    },

    /// A gateway request was not acknowledged in time.
    #[error("gateway request {operation} timed out after {timeout_ms}ms")]
    GatewayTimeout {
        /// The remote operation name.
        operation: &'static str,
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
