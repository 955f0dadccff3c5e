use reqwest::header::HeaderName;

use crate::error::{AppError, Result};
use crate::fetch::request::{template_placeholders, KNOWN_PLACEHOLDERS};

use super::{Config, EndpointConfig, HttpConfig};

/// Validate a merged configuration, reporting every issue at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_endpoints(&config.endpoints, &mut issues);
    validate_http(&config.http, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_endpoints(endpoints: &EndpointConfig, issues: &mut Vec<String>) {
    validate_template(
        "endpoints.data_url_template",
        &endpoints.data_url_template,
        &["symbol", "symbol_lower", "id"],
        issues,
    );
    validate_template(
        "endpoints.logo_url_template",
        &endpoints.logo_url_template,
        &["slug"],
        issues,
    );
}

fn validate_template(field: &str, template: &str, any_of: &[&str], issues: &mut Vec<String>) {
    if template.trim().is_empty() {
        issues.push(format!("{field} must not be empty"));
        return;
    }

    let placeholders = match template_placeholders(template) {
        Ok(placeholders) => placeholders,
        Err(err) => {
            issues.push(format!("{field}: {err}"));
            return;
        }
    };

    let unknown: Vec<&str> = placeholders
        .iter()
        .map(String::as_str)
        .filter(|key| !KNOWN_PLACEHOLDERS.contains(key))
        .collect();
    if !unknown.is_empty() {
        issues.push(format!(
            "{field} references unknown placeholders: {}",
            unknown.join(", ")
        ));
    }

    if !placeholders.iter().any(|key| any_of.contains(&key.as_str())) {
        let expected: Vec<String> = any_of.iter().map(|key| format!("{{{key}}}")).collect();
        issues.push(format!(
            "{field} must reference one of {}",
            expected.join(", ")
        ));
    }
}

fn validate_http(http: &HttpConfig, issues: &mut Vec<String>) {
    if http.timeout_secs == 0 {
        issues.push("http.timeout_secs must be greater than zero".to_string());
    }

    if http.user_agent.trim().is_empty() {
        issues.push("http.user_agent must not be empty".to_string());
    }

    let mut invalid: Vec<&str> = http
        .headers
        .keys()
        .map(String::as_str)
        .filter(|name| HeaderName::from_bytes(name.as_bytes()).is_err())
        .collect();
    if !invalid.is_empty() {
        invalid.sort_unstable();
        issues.push(format!("http.headers has invalid names: {}", invalid.join(", ")));
    }
}
