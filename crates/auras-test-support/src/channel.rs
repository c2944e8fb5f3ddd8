//! Authority channel doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use auras_core::authority::AuthorityHandle;
use auras_core::error::DomainError;
use auras_gateway::application::dispatcher::GatewayDispatcher;
use auras_gateway::domain::channel::AuthorityChannel;
use auras_gateway::domain::requests::GatewayRequest;

/// A channel that records every request and acknowledges it without
/// applying anything.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<GatewayRequest>>,
}

impl RecordingChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the requests sent so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorityChannel for RecordingChannel {
    async fn send(
        &self,
        _authority: AuthorityHandle,
        request: GatewayRequest,
    ) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(request);
        Ok(())
    }
}

/// A channel that hands every request straight to an in-process
/// authority, recording it first.
#[derive(Debug)]
pub struct LoopbackChannel {
    dispatcher: GatewayDispatcher,
    sent: Mutex<Vec<GatewayRequest>>,
}

impl LoopbackChannel {
    /// Creates a channel delivering to `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: GatewayDispatcher) -> Self {
        Self {
            dispatcher,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Returns the requests sent so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorityChannel for LoopbackChannel {
    async fn send(
        &self,
        authority: AuthorityHandle,
        request: GatewayRequest,
    ) -> Result<(), DomainError> {
        if authority.participant_id != self.dispatcher.participant_id() {
            return Err(DomainError::Infrastructure(format!(
                "no route to participant {}",
                authority.participant_id
            )));
        }
        self.sent.lock().unwrap().push(request.clone());
        self.dispatcher.dispatch(request).await.map(|_| ())
    }
}

/// A channel whose authority refuses every request.
#[derive(Debug)]
pub struct FailingChannel {
    reason: String,
}

impl FailingChannel {
    /// Creates a channel that rejects with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AuthorityChannel for FailingChannel {
    async fn send(
        &self,
        _authority: AuthorityHandle,
        request: GatewayRequest,
    ) -> Result<(), DomainError> {
        Err(DomainError::GatewayRejected {
            operation: request.operation().to_owned(),
            reason: self.reason.clone(),
        })
    }
}

/// A channel whose authority never answers.
#[derive(Debug)]
pub struct HangingChannel;

#[async_trait]
impl AuthorityChannel for HangingChannel {
    async fn send(
        &self,
        _authority: AuthorityHandle,
        _request: GatewayRequest,
    ) -> Result<(), DomainError> {
        std::future::pending().await
    }
}
