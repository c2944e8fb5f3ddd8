//! Application layer for the Effects context.

pub mod command_handlers;
pub mod query_handlers;
