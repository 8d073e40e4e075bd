//! Connection string parsing.
//!
//! Profiles may hold either a URL (`mysql://user:pw@host:3306/db`) or the
//! `Key=Value;` form common in application settings files
//! (`Server=db;Port=3306;Database=tpc;User Id=app;Password=pw;`).

use common::errors::{AppError, AppResult};

/// Parsed form of a profile's connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSpec {
    /// URL form, handed to the driver unchanged.
    Url(String),
    /// `Key=Value;` form, split into known fields.
    KeyValue(ConnectionParams),
}

/// Fields recognized in the `Key=Value;` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Parses `raw` for the profile named `profile` (used in error messages).
pub fn parse(profile: &str, raw: &str) -> AppResult<ConnectionSpec> {
    let raw = raw.trim();
    let invalid = |reason: String| AppError::InvalidConnectionString {
        profile: profile.to_string(),
        reason,
    };

    if has_url_scheme(raw) {
        return Ok(ConnectionSpec::Url(raw.to_string()));
    }

    let mut host = None;
    let mut params = ConnectionParams::default();

    for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| invalid(format!("segment '{}' is not Key=Value", segment)))?;
        let value = unquote(value.trim()).to_string();

        match normalize_key(key).as_str() {
            "server" | "host" | "datasource" | "address" | "addr" => host = Some(value),
            "port" => {
                let port = value
                    .parse()
                    .map_err(|_| invalid(format!("port '{}' is not a number", value)))?;
                params.port = Some(port);
            }
            "database" | "initialcatalog" => params.database = Some(value),
            "userid" | "uid" | "user" | "username" => params.username = Some(value),
            "password" | "pwd" => params.password = Some(value),
            // Driver tuning keys (SslMode, Pooling, ...) are not carried over.
            _ => {}
        }
    }

    params.host = host
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("missing Server/Host".to_string()))?;
    Ok(ConnectionSpec::KeyValue(params))
}

/// `scheme://` at the very start, per RFC 3986 scheme syntax.
fn has_url_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
