//! Single-authority membership.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the session participant currently allowed to mutate shared
/// effect state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorityHandle {
    /// The authority's participant identifier.
    pub participant_id: Uuid,
}

/// Answers which participant, if any, currently holds authority.
pub trait AuthorityProvider: Send + Sync {
    /// Returns the current authority, or `None` when nobody holds it.
    fn current_authority(&self) -> Option<AuthorityHandle>;
}
