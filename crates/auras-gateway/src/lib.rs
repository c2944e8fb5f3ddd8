//! Token auras: Arbitration Gateway.
//!
//! Every mutation of shared effect state is funneled through the one
//! participant that currently holds authority. Callers use
//! [`application::client::ArbitrationGateway`]; the authority runs
//! [`application::dispatcher::GatewayDispatcher`].

pub mod application;
pub mod domain;
