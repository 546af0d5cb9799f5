//! HS256 token codec.
//!
//! Signature and structure checks are delegated to `jsonwebtoken`; the time
//! window and issuer are checked here against an injected `now` so validation
//! stays deterministic.

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use bookshelf_core::UserId;

use crate::claims::{validate_claims, JwtClaims, TokenError};
use crate::config::AuthConfig;

/// Verifies a compact token string and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// A freshly minted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints and validates HS256-signed tokens with a process-wide secret.
pub struct Hs256JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
    issuer: String,
}

impl Hs256JwtCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry and issuer are enforced by `validate` against the injected clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl(),
            issuer: config.issuer().to_string(),
        }
    }

    /// Sign a claim set for `subject`, valid from `now` for the configured ttl.
    pub fn mint(&self, subject: UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        // The wire format carries whole seconds.
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry is out of the representable range".into()))?;
        let claims = JwtClaims {
            sub: subject,
            iss: self.issuer.clone(),
            issued_at,
            expires_at,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at,
        })
    }
}

impl JwtValidator for Hs256JwtCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::malformed("empty token"));
        }

        let claims = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(map_decode_error)?
            .claims;

        if claims.iss != self.issuer {
            return Err(TokenError::UnknownIssuer(claims.iss));
        }
        validate_claims(&claims, now)?;

        Ok(claims)
    }
}

impl core::fmt::Debug for Hs256JwtCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtCodec")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        other => TokenError::malformed(format!("{other:?}")),
    }
}
