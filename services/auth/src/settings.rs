//! Authentication policy switches

use common::error::SettingsError;
use config::{Config, Environment};
use serde::Deserialize;

/// Loaded from `AUTH_ALLOW_PLAINTEXT_PASSWORDS` (default true) and
/// `AUTH_ALLOW_PASSWORD_RESET` (default false).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Accept rows whose password column is not a recognised hash
    pub allow_plaintext_passwords: bool,
    /// Expose the unauthenticated reset-by-email endpoint
    pub allow_password_reset: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            allow_plaintext_passwords: true,
            allow_password_reset: false,
        }
    }
}

impl AuthSettings {
    pub fn load() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("allow_plaintext_passwords", defaults.allow_plaintext_passwords)?
            .set_default("allow_password_reset", defaults.allow_password_reset)?
            .add_source(Environment::with_prefix("AUTH"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
