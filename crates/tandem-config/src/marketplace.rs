//! Task-marketplace gateway configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketplaceConfig {
    /// Gateway root, e.g. `https://market.example.com`.
    #[serde(default)]
    pub base_url: String,

    /// Access key id, sent as the basic-auth user.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key, sent as the basic-auth password.
    #[serde(default)]
    pub secret_access_key: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MarketplaceConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fail unless every required field is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the missing fields.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "marketplace".into(),
                missing: missing.join(", "),
            })
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            ("base_url", &self.base_url),
            ("access_key_id", &self.access_key_id),
            ("secret_access_key", &self.secret_access_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
