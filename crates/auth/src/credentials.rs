use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::identity::Identity;
use crate::store::{CredentialStore, StoreError};

/// Credential check failure.
///
/// `NotFound` and `InvalidCredentials` are kept apart for logging only; callers
/// exposing them externally must collapse both into one authentication failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no account for identifier")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Checks an identifier + secret pair against the credential store.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn verify(&self, identifier: &str, presented_secret: &str) -> Result<Identity, CredentialError> {
        let Some(identity) = self.store.find_by_identifier(identifier).await? else {
            debug!("credential check failed: unknown identifier");
            return Err(CredentialError::NotFound);
        };

        if !self.store.verify_secret(&identity, presented_secret).await? {
            debug!(user_id = %identity.id, "credential check failed: secret mismatch");
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(identity)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::PlainStore;
    use super::*;
    use crate::identity::NewProfile;

    async fn verifier_with_alice() -> CredentialVerifier {
        let store = Arc::new(PlainStore::default());
        store
            .insert(NewProfile {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                secret: "s1".into(),
            })
            .await
            .unwrap();
        CredentialVerifier::new(store)
    }

    #[tokio::test]
    async fn matching_secret_returns_identity() {
        let verifier = verifier_with_alice().await;
        let identity = verifier.verify("alice@example.com", "s1").await.unwrap();
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.name, "Alice");
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_identifier_differ_internally() {
        let verifier = verifier_with_alice().await;
        assert_eq!(
            verifier.verify("alice@example.com", "wrong").await,
            Err(CredentialError::InvalidCredentials)
        );
        assert_eq!(
            verifier.verify("bob@example.com", "s1").await,
            Err(CredentialError::NotFound)
        );
    }

    #[tokio::test]
    async fn store_failure_is_propagated() {
        let verifier = CredentialVerifier::new(Arc::new(PlainStore::failing()));
        assert!(matches!(
            verifier.verify("alice@example.com", "s1").await,
            Err(CredentialError::Store(StoreError::Unavailable(_)))
        ));
    }
}
