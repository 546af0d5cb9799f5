//! Storage boundaries consumed by the auth layer.
//!
//! Implementations live in `bookshelf-infra`; this crate only states what it
//! needs from them.

use std::sync::Arc;

use thiserror::Error;

use bookshelf_core::UserId;

use crate::identity::{Identity, NewProfile, ProfileUpdate};

/// Store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing storage could not serve the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Persists identities and owns their hashed secrets.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an identity by its login identifier (email).
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError>;

    /// Insert a new identity, hashing its secret. Duplicate identifiers fail
    /// with [`StoreError::Conflict`].
    async fn insert(&self, profile: NewProfile) -> Result<Identity, StoreError>;

    /// One-way comparison of `presented` against the stored hash.
    async fn verify_secret(&self, identity: &Identity, presented: &str) -> Result<bool, StoreError>;

    /// Replace name/email (and the secret when given). `Ok(None)` when the id is unknown.
    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<Option<Identity>, StoreError>;
}

#[async_trait::async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_identifier(identifier).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, profile: NewProfile) -> Result<Identity, StoreError> {
        (**self).insert(profile).await
    }

    async fn verify_secret(&self, identity: &Identity, presented: &str) -> Result<bool, StoreError> {
        (**self).verify_secret(identity, presented).await
    }

    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<Option<Identity>, StoreError> {
        (**self).update_profile(id, update).await
    }
}

/// A resource with a single, fixed owner.
pub trait Owned {
    type Id: Copy + core::fmt::Display + Send + Sync + 'static;

    fn owner_id(&self) -> UserId;
}

impl Owned for bookshelf_core::Book {
    type Id = bookshelf_core::BookId;

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Read access to owned resources, as needed for ownership checks.
#[async_trait::async_trait]
pub trait ResourceStore<R: Owned>: Send + Sync {
    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError>;
}

#[async_trait::async_trait]
impl<R, S> ResourceStore<R> for Arc<S>
where
    R: Owned + 'static,
    S: ResourceStore<R> + ?Sized,
{
    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        (**self).find_by_id(id).await
    }
}
