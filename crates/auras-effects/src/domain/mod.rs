//! Domain layer for the Effects context.

pub mod commands;
