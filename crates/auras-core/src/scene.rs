//! Scene and movement ports.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::geometry::TokenPlacement;

/// Read access to the tokens on a scene.
#[async_trait]
pub trait SceneReader: Send + Sync {
    /// Returns every token on the scene at its current rendered position.
    async fn scene_tokens(&self, scene_id: Uuid) -> Result<Vec<TokenPlacement>, DomainError>;
}

/// Tracks in-flight token movement.
#[async_trait]
pub trait MovementTracker: Send + Sync {
    /// Resolves once the token has reached its final rendered position.
    /// Resolves immediately when the token is not animating.
    async fn await_movement_settled(&self, token_id: Uuid) -> Result<(), DomainError>;

    /// Whether the token's current movement is the last segment of its path.
    fn is_final_path_segment(&self, token_id: Uuid) -> bool;
}
