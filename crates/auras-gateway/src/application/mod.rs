//! Application layer for the gateway.

pub mod client;
pub mod dispatcher;
