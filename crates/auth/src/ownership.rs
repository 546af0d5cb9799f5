//! Resource ownership checks for mutating operations.
//!
//! Mutations follow a fixed protocol:
//! 1. fetch the resource,
//! 2. absent -> [`OwnershipError::NotFound`],
//! 3. compare the owner with the authenticated subject,
//! 4. mismatch -> [`OwnershipError::Forbidden`],
//! 5. otherwise hand the resource back for mutation.

use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use bookshelf_core::UserId;

use crate::store::{Owned, ResourceStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("resource not found")]
    NotFound,

    #[error("forbidden: caller does not own the resource")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decides whether an authenticated subject owns a resource.
pub struct OwnershipAuthorizer<R, S: ?Sized> {
    store: Arc<S>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S: ?Sized> Clone for OwnershipAuthorizer<R, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R, S> OwnershipAuthorizer<R, S>
where
    R: Owned + Send + 'static,
    S: ResourceStore<R> + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// `true` iff the resource exists and its owner's decimal id equals `subject`.
    ///
    /// Never fails: a missing resource or an unreachable store both yield `false`.
    /// Mutating handlers use [`Self::authorize_mutation`] instead, which keeps
    /// not-found and forbidden apart.
    pub async fn is_owner(&self, subject: &str, resource_id: R::Id) -> bool {
        match ResourceStore::<R>::find_by_id(&*self.store, resource_id).await {
            Ok(Some(resource)) => owner_matches(&resource, subject),
            Ok(None) => false,
            Err(e) => {
                warn!(resource_id = %resource_id, error = %e, "ownership lookup failed");
                false
            }
        }
    }

    /// Run the full not-found / forbidden / allowed protocol with a single fetch.
    pub async fn authorize_mutation(&self, subject: UserId, resource_id: R::Id) -> Result<R, OwnershipError> {
        let resource = ResourceStore::<R>::find_by_id(&*self.store, resource_id)
            .await?
            .ok_or(OwnershipError::NotFound)?;

        if !owner_matches(&resource, &subject.to_string()) {
            debug!(%subject, resource_id = %resource_id, "mutation rejected: not owner");
            return Err(OwnershipError::Forbidden);
        }

        Ok(resource)
    }
}

fn owner_matches<R: Owned>(resource: &R, subject: &str) -> bool {
    resource.owner_id().to_string() == subject
}
