//! Application layer for movement reconciliation.

pub mod reconciler;
