//! Domain layer for the gateway.

pub mod channel;
pub mod requests;
