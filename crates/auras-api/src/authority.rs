//! Authority membership of the server process.

use auras_core::authority::{AuthorityHandle, AuthorityProvider};
use uuid::Uuid;

/// The server always holds authority over the effects it stores.
#[derive(Debug, Clone, Copy)]
pub struct LocalAuthority {
    participant_id: Uuid,
}

impl LocalAuthority {
    /// Creates the provider for the server's participant identifier.
    #[must_use]
    pub fn new(participant_id: Uuid) -> Self {
        Self { participant_id }
    }
}

impl AuthorityProvider for LocalAuthority {
    fn current_authority(&self) -> Option<AuthorityHandle> {
        Some(AuthorityHandle {
            participant_id: self.participant_id,
        })
    }
}
