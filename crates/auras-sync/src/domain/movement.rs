//! Token movement notifications.

use serde::{Deserialize, Serialize};

/// The fields of a token update that changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDelta {
    /// New horizontal coordinate, if it changed.
    pub x: Option<f64>,
    /// New vertical coordinate, if it changed.
    pub y: Option<f64>,
    /// New elevation, if it changed.
    pub elevation: Option<f64>,
}

impl PositionDelta {
    /// Whether the update moved the token at all.
    #[must_use]
    pub fn moves_token(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.elevation.is_some()
    }
}

/// Options the host attached to a token update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementOptions {
    /// Whether the move is animated. The movement tracker settles
    /// unanimated moves as soon as they are accepted.
    pub animate: bool,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self { animate: true }
    }
}
