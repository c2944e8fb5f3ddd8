//! Straight-line geometry with configurable walls.

use std::collections::HashSet;
use std::sync::Mutex;

use auras_core::geometry::{CollisionPolicy, GeometryService, TokenPlacement};
use uuid::Uuid;

/// Euclidean distance over x, y and elevation. Pairs of tokens can be
/// separated by a wall that blocks one collision policy.
#[derive(Debug, Default)]
pub struct GridGeometry {
    walls: Mutex<HashSet<(Uuid, Uuid, CollisionPolicy)>>,
}

impl GridGeometry {
    /// Creates geometry with no walls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a wall between two tokens that blocks `policy`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn block(&self, a: Uuid, b: Uuid, policy: CollisionPolicy) {
        let mut walls = self.walls.lock().unwrap();
        walls.insert((a, b, policy));
        walls.insert((b, a, policy));
    }
}

impl GeometryService for GridGeometry {
    fn compute_distance(
        &self,
        from: &TokenPlacement,
        to: &TokenPlacement,
        collision: CollisionPolicy,
    ) -> f64 {
        if collision != CollisionPolicy::None
            && self
                .walls
                .lock()
                .unwrap()
                .contains(&(from.token_id, to.token_id, collision))
        {
            return f64::INFINITY;
        }
        let dx = from.position.x - to.position.x;
        let dy = from.position.y - to.position.y;
        let dz = from.position.elevation - to.position.elevation;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
