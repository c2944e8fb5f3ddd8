//! Geometry port and radius queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::disposition::{AuraDisposition, SecretDispositionPolicy, TokenDisposition};

/// A token's rendered position on its scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Elevation above the scene floor.
    pub elevation: f64,
}

/// Which obstructions block an aura's reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Nothing blocks the aura.
    None,
    /// Walls that block movement block the aura.
    #[default]
    Move,
    /// Walls that block sight block the aura.
    Sight,
    /// Walls that block light block the aura.
    Light,
    /// Walls that block sound block the aura.
    Sound,
}

/// A token as the geometry layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPlacement {
    /// The token identifier.
    pub token_id: Uuid,
    /// The actor the token represents.
    pub actor_id: Uuid,
    /// The scene the token is on.
    pub scene_id: Uuid,
    /// The token's faction disposition.
    pub disposition: TokenDisposition,
    /// Current rendered position.
    pub position: Position,
}

/// Filter for [`find_tokens_within_radius`].
#[derive(Debug, Clone, Copy)]
pub struct RadiusQuery {
    /// Maximum distance, inclusive.
    pub radius: f64,
    /// Which relations to the source token are admitted.
    pub disposition: AuraDisposition,
    /// Obstruction rules the distance honors.
    pub collision: CollisionPolicy,
    /// How secret tokens are matched.
    pub secret_policy: SecretDispositionPolicy,
}

/// Distance computation honoring obstruction rules.
pub trait GeometryService: Send + Sync {
    /// Returns the distance between two tokens under `collision`.
    /// A blocked path yields `f64::INFINITY`.
    fn compute_distance(
        &self,
        from: &TokenPlacement,
        to: &TokenPlacement,
        collision: CollisionPolicy,
    ) -> f64;
}

/// Returns the tokens in `candidates`, other than `source` itself, that lie
/// within `query.radius` of `source` and match its disposition filter.
pub fn find_tokens_within_radius<'a>(
    geometry: &dyn GeometryService,
    source: &TokenPlacement,
    candidates: &'a [TokenPlacement],
    query: &RadiusQuery,
) -> Vec<&'a TokenPlacement> {
    candidates
        .iter()
        .filter(|candidate| candidate.token_id != source.token_id)
        .filter(|candidate| {
            query
                .secret_policy
                .relation(source.disposition, candidate.disposition)
                .is_some_and(|relation| query.disposition.admits(relation))
        })
        .filter(|candidate| {
            geometry.compute_distance(source, candidate, query.collision) <= query.radius
        })
        .collect()
}
