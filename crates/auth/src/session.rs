use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use bookshelf_core::DomainError;

use crate::claims::TokenError;
use crate::credentials::{CredentialError, CredentialVerifier};
use crate::identity::{Identity, NewProfile};
use crate::jwt::{Hs256JwtCodec, IssuedToken};
use crate::store::{CredentialStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("already registered: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Store(other),
        }
    }
}

/// Login and registration flows.
#[derive(Clone)]
pub struct SessionIssuer {
    store: Arc<dyn CredentialStore>,
    verifier: CredentialVerifier,
    codec: Arc<Hs256JwtCodec>,
}

impl SessionIssuer {
    pub fn new(store: Arc<dyn CredentialStore>, codec: Arc<Hs256JwtCodec>) -> Self {
        Self {
            verifier: CredentialVerifier::new(store.clone()),
            store,
            codec,
        }
    }

    /// Verify credentials and mint a token for the resolved identity.
    pub async fn login(&self, identifier: &str, secret: &str, now: DateTime<Utc>) -> Result<IssuedToken, LoginError> {
        let identity = self.verifier.verify(identifier, secret).await?;
        let issued = self.codec.mint(identity.id, now)?;
        info!(user_id = %identity.id, expires_at = %issued.expires_at, "token issued");
        Ok(issued)
    }

    /// Create an account. No token is minted: the caller logs in afterwards.
    pub async fn register(&self, profile: NewProfile) -> Result<Identity, RegistrationError> {
        profile.validate()?;
        let identity = self.store.insert(profile).await?;
        info!(user_id = %identity.id, "account registered");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, SigningSecret};
    use crate::credentials::test_support::PlainStore;
    use crate::jwt::JwtValidator;

    fn issuer() -> SessionIssuer {
        let cfg = AuthConfig::with_defaults(SigningSecret::new("test-secret"), chrono::Duration::hours(1)).unwrap();
        SessionIssuer::new(Arc::new(PlainStore::default()), Arc::new(Hs256JwtCodec::new(&cfg)))
    }

    fn profile(email: &str) -> NewProfile {
        NewProfile {
            name: "A".into(),
            email: email.into(),
            secret: "s1".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let sessions = issuer();

        let identity = sessions.register(profile("a@x.com")).await.unwrap();
        assert_ne!(identity.id.get(), 0);
        assert_eq!(identity.email, "a@x.com");

        let now = Utc::now();
        let issued = sessions.login("a@x.com", "s1", now).await.unwrap();
        assert!(!issued.token.is_empty());

        let claims = sessions.codec.validate(&issued.token, now).unwrap();
        assert_eq!(claims.sub, identity.id);
    }

    #[tokio::test]
    async fn login_propagates_verifier_errors() {
        let sessions = issuer();
        sessions.register(profile("a@x.com")).await.unwrap();

        assert_eq!(
            sessions.login("a@x.com", "wrong", Utc::now()).await,
            Err(LoginError::Credentials(CredentialError::InvalidCredentials))
        );
        assert_eq!(
            sessions.login("nobody@x.com", "s1", Utc::now()).await,
            Err(LoginError::Credentials(CredentialError::NotFound))
        );
    }

    #[tokio::test]
    async fn register_validates_and_reports_conflicts() {
        let sessions = issuer();

        let err = sessions
            .register(NewProfile {
                secret: String::new(),
                ..profile("a@x.com")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Validation(_)));

        sessions.register(profile("a@x.com")).await.unwrap();
        let err = sessions.register(profile("a@x.com")).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Conflict(_)));
    }
}
