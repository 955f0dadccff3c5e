use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::config::validator;
use crate::error::{Context, Result};

use super::Config;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    endpoints: RawEndpoints,
    http: RawHttp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawEndpoints {
    data_url_template: Option<String>,
    logo_url_template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawHttp {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
}

impl RawConfig {
    fn into_config(self) -> Config {
        let mut config = Config::builtin();

        if let Some(template) = self.endpoints.data_url_template {
            config.endpoints.data_url_template = template;
        }
        if let Some(template) = self.endpoints.logo_url_template {
            config.endpoints.logo_url_template = template;
        }
        if let Some(timeout) = self.http.timeout_secs {
            config.http.timeout_secs = timeout;
        }
        if let Some(agent) = self.http.user_agent {
            config.http.user_agent = agent;
        }
        config.http.headers.extend(self.http.headers);

        config
    }
}

/// Read and validate a JSON configuration file layered over the builtin defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let config =
        parse_config(&json).with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(config)
}

/// Parse and validate configuration from a JSON string.
pub fn parse_config(json: &str) -> Result<Config> {
    let raw: RawConfig = serde_json::from_str(json).context("failed to parse config JSON")?;
    let config = raw.into_config();
    validator::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DATA_URL_TEMPLATE, DEFAULT_TIMEOUT_SECS};

    #[test]
    fn empty_object_yields_builtin() {
        let config = parse_config("{}").expect("empty config parses");
        assert_eq!(config, Config::builtin());
    }

    #[test]
    fn overrides_only_named_fields() {
        let config = parse_config(
            r#"{
                "endpoints": { "logo_url_template": "https://img.example.com/{slug}.png" },
                "http": { "headers": { "Authorization": "Bearer ${COINCAP_API_KEY}" } }
            }"#,
        )
        .expect("partial config parses");

        assert_eq!(config.endpoints.data_url_template, DEFAULT_DATA_URL_TEMPLATE);
        assert_eq!(
            config.endpoints.logo_url_template,
            "https://img.example.com/{slug}.png"
        );
        assert_eq!(config.http.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            config.http.headers.get("Authorization").map(String::as_str),
            Some("Bearer ${COINCAP_API_KEY}")
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_config(r#"{ "endpoint": {} }"#).expect_err("typo should be rejected");
        assert!(
            err.to_string().contains("failed to parse config JSON"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn validation_runs_after_merge() {
        let err = parse_config(r#"{ "http": { "timeout_secs": 0 } }"#)
            .expect_err("zero timeout should fail");
        assert!(
            err.to_string().contains("timeout_secs"),
            "unexpected error message: {err}"
        );
    }
}
