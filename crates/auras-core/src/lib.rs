//! Auras Core: shared domain abstractions.
//!
//! This crate defines the effect data model, dispositions, geometry, and
//! the ports every other crate depends on. It contains no infrastructure
//! code.

pub mod authority;
pub mod command;
pub mod disposition;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod notify;
pub mod repository;
pub mod scene;
