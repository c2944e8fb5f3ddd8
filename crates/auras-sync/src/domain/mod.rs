//! Domain layer for movement reconciliation.

pub mod movement;
pub mod plan;
pub mod proximity;
pub mod session;
