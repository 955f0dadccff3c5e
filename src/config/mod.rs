use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

pub mod loader;
pub mod validator;

pub use loader::{load_config, parse_config};

/// Environment variable pointing at an optional JSON override file.
pub const CONFIG_ENV_VAR: &str = "CRYPTO_TRACKER_CONFIG";

pub const DEFAULT_DATA_URL_TEMPLATE: &str = "https://api.coincap.io/v2/assets?search={symbol}";
pub const DEFAULT_LOGO_URL_TEMPLATE: &str = "https://static.coinpaprika.com/coin/{slug}/logo.png";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("crypto-tracker/", env!("CARGO_PKG_VERSION"));

/// URL templates used to build the per-asset data and logo endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub data_url_template: String,
    pub logo_url_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Extra request headers. Values may reference `${VAR}` environment placeholders.
    pub headers: HashMap<String, String>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn builtin() -> Self {
        Self {
            endpoints: EndpointConfig {
                data_url_template: DEFAULT_DATA_URL_TEMPLATE.to_string(),
                logo_url_template: DEFAULT_LOGO_URL_TEMPLATE.to_string(),
            },
            http: HttpConfig {
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                headers: HashMap::new(),
            },
        }
    }

    /// Load a JSON override file; fields it omits keep their builtin values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path.as_ref())
    }

    /// Use the file named by `CRYPTO_TRACKER_CONFIG` when set, the builtin defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::builtin()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}
