//! Per-session state of the local participant.

use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

/// Session-scoped state, created once per session and shared with the
/// reconciler.
#[derive(Debug)]
pub struct SessionState {
    participant_id: Uuid,
    warned_no_authority: AtomicBool,
}

impl SessionState {
    /// Creates state for the local participant.
    #[must_use]
    pub fn new(participant_id: Uuid) -> Self {
        Self {
            participant_id,
            warned_no_authority: AtomicBool::new(false),
        }
    }

    /// The local participant identifier.
    #[must_use]
    pub fn participant_id(&self) -> Uuid {
        self.participant_id
    }

    /// Latches the missing-authority warning. Returns `true` only the first
    /// time it is called in this session.
    pub fn mark_no_authority_warned(&self) -> bool {
        !self.warned_no_authority.swap(true, Ordering::AcqRel)
    }

    /// Whether the missing-authority warning has been shown.
    #[must_use]
    pub fn has_warned_no_authority(&self) -> bool {
        self.warned_no_authority.load(Ordering::Acquire)
    }
}
