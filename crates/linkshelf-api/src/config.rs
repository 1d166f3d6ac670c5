//! Server configuration from environment variables.

use std::time::Duration;

use axum::http::HeaderValue;
use tracing::warn;

use linkshelf_core::{Error, Result};
use linkshelf_crypto::DEFAULT_TOKEN_TTL_DAYS;
use linkshelf_db::pool::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_LIFETIME_SECS, DEFAULT_MIN_CONNECTIONS,
};
use linkshelf_db::PoolConfig;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/linkshelf";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Signing secret used when `JWT_SECRET` is unset. Development only.
pub const DEVELOPMENT_JWT_SECRET: &str = "linkshelf-development-secret";

/// Maximum accepted request body, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout: Duration,
    pub db_idle_timeout: Duration,
    /// `None` when `DB_MAX_LIFETIME_SECS=0`.
    pub db_max_lifetime: Option<Duration>,
    pub development: bool,
    pub seed_defaults: bool,
    pub allowed_origins: String,
}

impl ServerConfig {
    /// Read the process environment (after `dotenvy::dotenv()`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; used directly by tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, using the development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            jwt_secret,
            token_ttl: chrono::Duration::days(parse_var(
                &lookup,
                "TOKEN_TTL_DAYS",
                DEFAULT_TOKEN_TTL_DAYS,
            )?),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            db_min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
            db_connect_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
            db_idle_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                DEFAULT_IDLE_TIMEOUT_SECS,
            )?),
            db_max_lifetime: match parse_var(
                &lookup,
                "DB_MAX_LIFETIME_SECS",
                DEFAULT_MAX_LIFETIME_SECS,
            )? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            development: lookup("APP_ENV").is_some_and(|v| v == "development"),
            seed_defaults: parse_bool(lookup("SEED_DEFAULTS").as_deref(), true),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        })
    }

    /// Connection pool settings for [`linkshelf_db::Database::connect_with_config`].
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .connect_timeout(self.db_connect_timeout)
            .idle_timeout(self.db_idle_timeout)
            .max_lifetime(self.db_max_lifetime)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        parse_allowed_origins(&self.allowed_origins)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "true" || v == "1" || v == "yes" => true,
        Some(v) if v == "false" || v == "0" || v == "no" => false,
        _ => default,
    }
}

/// Parse a comma-separated CORS origin whitelist. Invalid entries are
/// dropped with a warning; an empty list falls back to the defaults.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    let source = if origins.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        origins
    };

    source
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
