use std::collections::HashMap;
use std::sync::RwLock;

use bookshelf_auth::{CredentialStore, Identity, NewProfile, ProfileUpdate, StoreError};
use bookshelf_core::UserId;

use crate::password;

#[derive(Debug, Clone)]
struct UserRow {
    identity: Identity,
    secret_hash: String,
}

#[derive(Debug, Default)]
struct Users {
    rows: HashMap<UserId, UserRow>,
    last_id: u64,
}

impl Users {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|r| r.identity.email == email && Some(r.identity.id) != except)
    }
}

/// In-memory credential store for tests/dev.
///
/// Ids are assigned sequentially starting at 1. Secrets are stored as argon2
/// hashes, exactly like the persistent store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Users>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::unavailable("credential store lock poisoned")
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users
            .rows
            .values()
            .find(|r| r.identity.email == identifier)
            .map(|r| r.identity.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.rows.get(&id).map(|r| r.identity.clone()))
    }

    async fn insert(&self, profile: NewProfile) -> Result<Identity, StoreError> {
        let NewProfile { name, email, secret } = profile;
        let secret_hash = password::hash_secret_blocking(secret).await?;

        let mut users = self.inner.write().map_err(|_| poisoned())?;
        if users.email_taken(&email, None) {
            return Err(StoreError::conflict(format!("email '{email}' is already registered")));
        }

        users.last_id += 1;
        let identity = Identity {
            id: UserId::new(users.last_id),
            name,
            email,
        };
        users.rows.insert(
            identity.id,
            UserRow {
                identity: identity.clone(),
                secret_hash,
            },
        );
        Ok(identity)
    }

    async fn verify_secret(&self, identity: &Identity, presented: &str) -> Result<bool, StoreError> {
        let hash = {
            let users = self.inner.read().map_err(|_| poisoned())?;
            match users.rows.get(&identity.id) {
                Some(row) => row.secret_hash.clone(),
                None => return Ok(false),
            }
        };
        password::verify_secret_blocking(hash, presented.to_string()).await
    }

    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<Option<Identity>, StoreError> {
        let ProfileUpdate { name, email, secret } = update;
        let secret_hash = match secret {
            Some(secret) => Some(password::hash_secret_blocking(secret).await?),
            None => None,
        };

        let mut users = self.inner.write().map_err(|_| poisoned())?;
        if !users.rows.contains_key(&id) {
            return Ok(None);
        }
        if users.email_taken(&email, Some(id)) {
            return Err(StoreError::conflict(format!("email '{email}' is already registered")));
        }

        let Some(row) = users.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.identity.name = name;
        row.identity.email = email;
        if let Some(hash) = secret_hash {
            row.secret_hash = hash;
        }
        Ok(Some(row.identity.clone()))
    }
}
