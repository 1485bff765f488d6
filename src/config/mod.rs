use std::time::Duration;

use serde::Deserialize;
use tokio::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{CONFIG_ENV, find_config_file, read_config, read_config_at, user_config_file};

mod error;
pub use error::{ConfigError, ConfigResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct Config {
    store: Store,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    database_uri: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes)?;
        let config: Self = toml::from_str(text)?;
        config.store.validate()?;
        Ok(config)
    }

    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        Self::from_slice(&bytes)
    }

    /// Loads the config once per process.
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> ConfigResult<&'static Config> {
        CONFIG
            .get_or_try_init(|| async {
                Self::load(use_local).inspect_err(|e| {
                    if let ConfigError::ConfigNotFound(path) = e {
                        tracing::error!(
                            "no config at {}, create one or point {CONFIG_ENV} at it",
                            path.display()
                        );
                    }
                })
            })
            .await
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Store {
    /// Store settings given outside the config file, e.g. `DATABASE_URL`.
    /// A missing timeout falls back to the config default.
    pub fn new(database_uri: impl Into<String>, timeout_secs: Option<u64>) -> ConfigResult<Self> {
        let store = Self {
            database_uri: database_uri.into(),
            timeout_secs: timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        store.validate()?;
        Ok(store)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.database_uri.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "store.database_uri",
                reason: "must not be empty",
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "store.timeout_secs",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
