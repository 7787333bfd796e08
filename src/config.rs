use anyhow::{Context, Result};
use axum::http::HeaderName;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Negotiation
    pub default_language: String,
    pub query_param: String,
    pub country_header: HeaderName,

    // Persisted preference cookie
    pub cookie_name: String,
    pub cookie_max_age_days: i64,
    pub force_secure_cookies: bool,

    // Session slot
    pub session_cookie_name: String,
    pub session_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let country_header = env_or("COUNTRY_HEADER", "CF-IPCountry");

        Ok(Self {
            // Server
            port: env_parse("PORT", 8080),

            // Negotiation
            default_language: env_or("DEFAULT_LANGUAGE", "en"),
            query_param: env_or("LANGUAGE_QUERY_PARAM", "lang"),
            country_header: HeaderName::from_bytes(country_header.as_bytes()).with_context(
                || format!("COUNTRY_HEADER '{}' is not a valid header name", country_header),
            )?,

            // Cookie
            cookie_name: env_or("LANGUAGE_COOKIE_NAME", "language"),
            cookie_max_age_days: env_parse("LANGUAGE_COOKIE_MAX_AGE_DAYS", 30),
            force_secure_cookies: env_flag("FORCE_SECURE_COOKIES", false),

            // Session
            session_cookie_name: env_or("SESSION_COOKIE_NAME", "session_id"),
            session_capacity: env_parse("SESSION_CAPACITY", 100_000),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            default_language: "en".to_string(),
            query_param: "lang".to_string(),
            country_header: HeaderName::from_static("cf-ipcountry"),
            cookie_name: "language".to_string(),
            cookie_max_age_days: 30,
            force_secure_cookies: false,
            session_cookie_name: "session_id".to_string(),
            session_capacity: 100_000,
        }
    }
}

/// Read a string variable; unset or blank values fall back to the default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable; unset or unparsable values fall back to the default.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag. Accepts true/false, 1/0, yes/no and on/off in any
/// case; anything else logs a warning and falls back to the default.
fn env_flag(name: &str, default: bool) -> bool {
    let raw = match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        _ => return default,
    };

    match parse_flag(&raw) {
        Some(value) => value,
        None => {
            warn!("Ignoring {}='{}': expected true or false", name, raw);
            default
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
