use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

use crate::error::{AppError, Result};

/// Placeholders a URL template may reference.
pub const KNOWN_PLACEHOLDERS: &[&str] = &["symbol", "symbol_lower", "slug", "id"];

/// Values substituted into a URL template for one tracked asset.
pub struct TemplateContext<'a> {
    pub id: &'a str,
    pub symbol: &'a str,
    pub slug: &'a str,
}

impl TemplateContext<'_> {
    fn replacements(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("id", self.id.to_string()),
            ("symbol", self.symbol.to_string()),
            ("symbol_lower", self.symbol.to_lowercase()),
            ("slug", self.slug.to_string()),
        ])
    }
}

/// Render a template such as `https://host/assets?search={symbol}` and parse the result.
pub fn render_url(template: &str, context: &TemplateContext<'_>) -> Result<Url> {
    let rendered = render_template(template, &context.replacements())?;
    Url::parse(&rendered).map_err(|source| AppError::Url {
        url: rendered.clone(),
        source,
    })
}

/// List the placeholder names referenced by a template, in order of appearance.
pub fn template_placeholders(template: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    scan_template(template, |segment| {
        if let Segment::Placeholder(key) = segment {
            keys.push(key.to_string());
        }
        Ok(())
    })?;
    Ok(keys)
}

fn render_template(template: &str, replacements: &HashMap<&'static str, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    scan_template(template, |segment| {
        match segment {
            Segment::Literal(ch) => result.push(ch),
            Segment::Placeholder(key) => {
                let value = replacements.get(key).ok_or_else(|| {
                    AppError::message(format!(
                        "No replacement provided for placeholder `{}` in template",
                        key
                    ))
                })?;
                result.push_str(value);
            }
        }
        Ok(())
    })?;
    Ok(result)
}

enum Segment<'a> {
    Literal(char),
    Placeholder(&'a str),
}

fn scan_template<'a>(
    template: &'a str,
    mut visit: impl FnMut(Segment<'a>) -> Result<()>,
) -> Result<()> {
    let mut rest = template;

    while let Some(ch) = rest.chars().next() {
        if ch == '{' {
            let body = &rest[1..];
            let Some(end) = body.find('}') else {
                return Err(AppError::message(format!(
                    "Unterminated placeholder in template: {{{body}"
                )));
            };
            let key = &body[..end];
            if key.is_empty() {
                return Err(AppError::message(
                    "Encountered empty placeholder `{}` in template",
                ));
            }
            visit(Segment::Placeholder(key))?;
            rest = &body[end + 1..];
        } else {
            visit(Segment::Literal(ch))?;
            rest = &rest[ch.len_utf8()..];
        }
    }

    Ok(())
}

/// Substitute `${VAR}` references in the value configured for `header`.
pub fn expand_env_vars(header: &str, value: &str) -> Result<String> {
    let mut expanded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let reference = &rest[start + 2..];
        let end = reference.find('}').ok_or_else(|| {
            AppError::message(format!("header {header}: unterminated `${{` reference"))
        })?;

        let name = reference[..end].trim();
        if name.is_empty() {
            return Err(AppError::message(format!(
                "header {header}: empty `${{}}` reference"
            )));
        }
        let resolved = std::env::var(name).map_err(|_| {
            AppError::message(format!(
                "header {header} references unset environment variable {name}"
            ))
        })?;
        expanded.push_str(&resolved);
        rest = &reference[end + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}

/// Resolve configured extra headers into the client's default header map.
pub fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    headers
        .iter()
        .map(|(name, value)| -> Result<(HeaderName, HeaderValue)> {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| AppError::message(format!("header {name}: invalid name")))?;
            let value = HeaderValue::from_str(&expand_env_vars(name, value)?).map_err(|_| {
                AppError::message(format!("header {name}: value is not valid header text"))
            })?;
            Ok((header, value))
        })
        .collect()
}
