//! Route modules.

pub mod actors;
pub mod effects;
pub mod gateway;
pub mod health;
