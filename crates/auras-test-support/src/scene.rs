//! Scene and movement tracker double.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use auras_core::error::DomainError;
use auras_core::geometry::{Position, TokenPlacement};
use auras_core::scene::{MovementTracker, SceneReader};
use uuid::Uuid;

#[derive(Debug, Default)]
struct SceneState {
    tokens: Vec<TokenPlacement>,
    pending: HashMap<Uuid, Position>,
    final_segment: HashMap<Uuid, bool>,
    settled: usize,
}

/// Token positions held in memory. Moves are staged and become visible
/// once the reconciler waits for them to settle, the way an animated move
/// reaches its rendered position.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    state: Mutex<SceneState>,
}

impl InMemoryScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a token at its current position.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn place(&self, token: TokenPlacement) {
        let mut state = self.state.lock().unwrap();
        state.tokens.retain(|t| t.token_id != token.token_id);
        state.tokens.push(token);
    }

    /// Stages a single-segment move to `to`.
    pub fn begin_move(&self, token_id: Uuid, to: Position) {
        self.begin_segment(token_id, to, true);
    }

    /// Stages one segment of a multi-segment path.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn begin_segment(&self, token_id: Uuid, to: Position, is_final: bool) {
        let mut state = self.state.lock().unwrap();
        state.pending.insert(token_id, to);
        state.final_segment.insert(token_id, is_final);
    }

    /// Returns the token's current placement.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn token(&self, token_id: Uuid) -> Option<TokenPlacement> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .iter()
            .find(|t| t.token_id == token_id)
            .cloned()
    }

    /// How many times a move was awaited.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn settle_count(&self) -> usize {
        self.state.lock().unwrap().settled
    }
}

#[async_trait]
impl SceneReader for InMemoryScene {
    async fn scene_tokens(&self, scene_id: Uuid) -> Result<Vec<TokenPlacement>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tokens
            .iter()
            .filter(|t| t.scene_id == scene_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MovementTracker for InMemoryScene {
    async fn await_movement_settled(&self, token_id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.settled += 1;
        if let Some(to) = state.pending.remove(&token_id) {
            if let Some(token) = state.tokens.iter_mut().find(|t| t.token_id == token_id) {
                token.position = to;
            }
        }
        Ok(())
    }

    fn is_final_path_segment(&self, token_id: Uuid) -> bool {
        self.state
            .lock()
            .unwrap()
            .final_segment
            .get(&token_id)
            .copied()
            .unwrap_or(true)
    }
}
