//! User-facing notifications.

/// Surfaces messages to the local participant.
pub trait Notifier: Send + Sync {
    /// Shows a warning.
    fn warn(&self, message: &str);
}
