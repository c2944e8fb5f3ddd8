//! Authority membership double.

use std::sync::Mutex;

use auras_core::authority::{AuthorityHandle, AuthorityProvider};
use uuid::Uuid;

/// An authority provider whose answer the test controls.
#[derive(Debug, Default)]
pub struct StaticAuthority {
    current: Mutex<Option<AuthorityHandle>>,
}

impl StaticAuthority {
    /// Creates a provider reporting `participant_id` as the authority.
    #[must_use]
    pub fn held_by(participant_id: Uuid) -> Self {
        Self {
            current: Mutex::new(Some(AuthorityHandle { participant_id })),
        }
    }

    /// Replaces the current authority.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set(&self, participant_id: Option<Uuid>) {
        *self.current.lock().unwrap() =
            participant_id.map(|participant_id| AuthorityHandle { participant_id });
    }
}

impl AuthorityProvider for StaticAuthority {
    fn current_authority(&self) -> Option<AuthorityHandle> {
        *self.current.lock().unwrap()
    }
}
