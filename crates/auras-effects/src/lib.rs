//! Token auras: Effects bounded context.
//!
//! Responsible for creating derived aura effects on target actors,
//! removing them by origin, and switching effects in and out of aura mode.

pub mod application;
pub mod domain;
