//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use bookshelf_auth::config::MAX_TTL_SECS;
use bookshelf_auth::{AuthConfig, AuthConfigError, SigningSecret};

pub const DEFAULT_TTL_SECS: i64 = 86_400;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthConfigError),
}

#[derive(Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub bind_addr: SocketAddr,
    /// Selects the Postgres stores when present.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("auth", &self.auth)
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let ttl_secs = match lookup("JWT_TTL_SECS") {
            Some(raw) => parse_var::<i64>("JWT_TTL_SECS", &raw)?,
            None => DEFAULT_TTL_SECS,
        };
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_TTL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let ttl = Duration::try_seconds(ttl_secs)
            .filter(|_| ttl_secs <= MAX_TTL_SECS)
            .ok_or_else(|| ConfigError::Invalid {
                var: "JWT_TTL_SECS",
                reason: format!("must not exceed {MAX_TTL_SECS} seconds"),
            })?;

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| bookshelf_auth::config::DEFAULT_ISSUER.to_string());
        let scheme = lookup("AUTH_SCHEME").unwrap_or_else(|| bookshelf_auth::config::DEFAULT_SCHEME.to_string());

        let auth = AuthConfig::new(
            SigningSecret::new(secret.into_bytes()),
            ttl,
            issuer,
            scheme,
        )?;

        let bind_addr = parse_var::<SocketAddr>(
            "BIND_ADDR",
            &lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let db_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse_var::<u32>("DATABASE_MAX_CONNECTIONS", &raw)?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            auth,
            bind_addr,
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            db_max_connections,
        })
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.auth.ttl(), Duration::seconds(DEFAULT_TTL_SECS));
        assert_eq!(config.auth.issuer(), "bookshelf");
        assert_eq!(config.auth.scheme(), "Bearer");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn missing_or_empty_secret_is_fatal() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "")])),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
    }

    #[test]
    fn ttl_must_be_positive_and_bounded() {
        for bad in ["0", "-5", "soon", "100000000000000", "9223372036854775807"] {
            let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("JWT_TTL_SECS", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var: "JWT_TTL_SECS", .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("JWT_TTL_SECS", "60"),
            ("JWT_ISSUER", "library"),
            ("AUTH_SCHEME", "Token"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://u:p@localhost/db"),
        ]))
        .unwrap();
        assert_eq!(config.auth.ttl(), Duration::seconds(60));
        assert_eq!(config.auth.issuer(), "library");
        assert_eq!(config.auth.scheme(), "Token");
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.database_url.is_some());
        assert!(!format!("{config:?}").contains("u:p"));
    }
}
