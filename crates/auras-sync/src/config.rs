//! Runtime settings for aura reconciliation.

use std::time::Duration;

use auras_core::disposition::SecretDispositionPolicy;
use auras_core::error::DomainError;

/// Setting key holding the gateway timeout in milliseconds.
pub const GATEWAY_TIMEOUT_KEY: &str = "gateway_timeout_ms";

/// Setting key holding the secret disposition policy.
pub const SECRET_DISPOSITION_KEY: &str = "secret_disposition";

const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by the reconciler and the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuraSettings {
    /// How long to wait for the authority to acknowledge a request.
    pub gateway_timeout: Duration,
    /// How secret tokens take part in disposition matching.
    pub secret_disposition: SecretDispositionPolicy,
}

impl Default for AuraSettings {
    fn default() -> Self {
        Self {
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            secret_disposition: SecretDispositionPolicy::default(),
        }
    }
}

impl AuraSettings {
    /// Reads settings through `lookup`, typically the host's world settings,
    /// falling back to defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a value is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let mut settings = Self::default();

        if let Some(raw) = lookup(GATEWAY_TIMEOUT_KEY) {
            let millis: u64 = raw.trim().parse().map_err(|e| {
                DomainError::Validation(format!("{GATEWAY_TIMEOUT_KEY} must be a valid u64: {e}"))
            })?;
            if millis == 0 {
                return Err(DomainError::Validation(format!(
                    "{GATEWAY_TIMEOUT_KEY} must be greater than zero"
                )));
            }
            settings.gateway_timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(SECRET_DISPOSITION_KEY) {
            settings.secret_disposition = raw.parse()?;
        }

        Ok(settings)
    }
}
