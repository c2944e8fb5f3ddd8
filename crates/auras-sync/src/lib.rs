//! Token auras: Movement reconciliation.
//!
//! Keeps derived aura effects in step with token positions. Every accepted
//! token move is reconciled twice: once from the perspective of the auras
//! the moving token emits, and once from the perspective of the auras it
//! may have walked into or out of.

pub mod application;
pub mod config;
pub mod domain;
