use chrono::Duration;
use thiserror::Error;

/// Default bearer scheme prefix expected in the `Authorization` header.
pub const DEFAULT_SCHEME: &str = "Bearer";

/// Default issuer name embedded in minted tokens.
pub const DEFAULT_ISSUER: &str = "bookshelf";

/// Longest accepted token lifetime (ten years).
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token ttl must be positive")]
    NonPositiveTtl,

    #[error("token ttl must not exceed {MAX_TTL_SECS} seconds")]
    TtlTooLong,

    #[error("issuer must not be empty")]
    EmptyIssuer,

    #[error("auth scheme must be a single non-empty word")]
    InvalidScheme,
}

/// Symmetric signing key. Never printed.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Process-wide token settings, built once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    secret: SigningSecret,
    ttl: Duration,
    issuer: String,
    scheme: String,
}

impl AuthConfig {
    pub fn new(
        secret: SigningSecret,
        ttl: Duration,
        issuer: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Result<Self, AuthConfigError> {
        let issuer = issuer.into();
        let scheme = scheme.into();

        if secret.as_bytes().is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }
        if ttl <= Duration::zero() {
            return Err(AuthConfigError::NonPositiveTtl);
        }
        if ttl > Duration::seconds(MAX_TTL_SECS) {
            return Err(AuthConfigError::TtlTooLong);
        }
        if issuer.trim().is_empty() {
            return Err(AuthConfigError::EmptyIssuer);
        }
        if scheme.is_empty() || scheme.chars().any(char::is_whitespace) {
            return Err(AuthConfigError::InvalidScheme);
        }

        Ok(Self {
            secret,
            ttl,
            issuer,
            scheme,
        })
    }

    /// Config with default issuer and scheme.
    pub fn with_defaults(secret: SigningSecret, ttl: Duration) -> Result<Self, AuthConfigError> {
        Self::new(secret, ttl, DEFAULT_ISSUER, DEFAULT_SCHEME)
    }

    pub fn secret(&self) -> &SigningSecret {
        &self.secret
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_settings() {
        let secret = || SigningSecret::new("s3cret");
        assert_eq!(
            AuthConfig::with_defaults(SigningSecret::new(""), Duration::hours(1)).unwrap_err(),
            AuthConfigError::EmptySecret
        );
        assert_eq!(
            AuthConfig::with_defaults(secret(), Duration::zero()).unwrap_err(),
            AuthConfigError::NonPositiveTtl
        );
        assert_eq!(
            AuthConfig::with_defaults(secret(), Duration::seconds(MAX_TTL_SECS + 1)).unwrap_err(),
            AuthConfigError::TtlTooLong
        );
        assert!(AuthConfig::with_defaults(secret(), Duration::seconds(MAX_TTL_SECS)).is_ok());
        assert_eq!(
            AuthConfig::new(secret(), Duration::hours(1), " ", "Bearer").unwrap_err(),
            AuthConfigError::EmptyIssuer
        );
        assert_eq!(
            AuthConfig::new(secret(), Duration::hours(1), "x", "Bear er").unwrap_err(),
            AuthConfigError::InvalidScheme
        );
    }

    #[test]
    fn debug_never_prints_secret() {
        let cfg = AuthConfig::with_defaults(SigningSecret::new("hunter2"), Duration::hours(1)).unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }
}
