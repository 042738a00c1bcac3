//! # tandem-config
//!
//! Layered configuration loading for Tandem using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TANDEM_*` prefix, `__` as separator)
//! 2. Project-level `.tandem/config.toml`
//! 3. User-level `~/.config/tandem/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TANDEM_MARKETPLACE__BASE_URL` -> `marketplace.base_url`,
//! `TANDEM_SURVEY__TASK_IDS='[T1, T2]'` -> `survey.task_ids`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tandem_config::TandemConfig;
//!
//! let config = TandemConfig::load_with_dotenv().expect("config");
//! if config.marketplace.is_configured() {
//!     println!("gateway: {}", config.marketplace.base_url);
//! }
//! ```

mod error;
mod marketplace;
mod sheets;
mod survey;

pub use error::ConfigError;
pub use marketplace::MarketplaceConfig;
pub use sheets::SheetsConfig;
pub use survey::SurveyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".tandem/config.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "TANDEM_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TandemConfig {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl TandemConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            tracing::debug!(path = %global_path.display(), "merging user config");
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            tracing::debug!(path = PROJECT_CONFIG_PATH, "merging project config");
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tandem").join("config.toml"))
    }

    /// Load `.env` from the current directory or one of its parents.
    /// Silently does nothing if none is found.
    fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(error) if error.not_found() => {}
            Err(error) => tracing::warn!(%error, "ignoring unreadable .env"),
        }
    }
}
