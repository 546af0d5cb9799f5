//! Registered identities and the inputs that create or change them.
//!
//! The hashed secret never appears here: it is owned by the credential store.

use serde::{Deserialize, Serialize};

use bookshelf_core::{DomainError, DomainResult, UserId};

/// A registered account as seen outside the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Registration input. The plaintext secret is consumed by the store and never
/// persisted or printed.
#[derive(Clone, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    #[serde(alias = "password")]
    pub secret: String,
}

impl NewProfile {
    /// Structural checks only; uniqueness is the store's concern.
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_secret(&self.secret)
    }
}

impl core::fmt::Debug for NewProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewProfile")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Profile update input. `secret: None` keeps the current one.
#[derive(Clone, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(default, alias = "password")]
    pub secret: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        match &self.secret {
            Some(secret) => validate_secret(secret),
            None => Ok(()),
        }
    }
}

impl core::fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    bookshelf_core::error::require_non_blank("name", name)
}

fn validate_email(email: &str) -> DomainResult<()> {
    bookshelf_core::error::require_non_blank("email", email)?;
    if !email.contains('@') {
        return Err(DomainError::validation("email must contain '@'"));
    }
    Ok(())
}

fn validate_secret(secret: &str) -> DomainResult<()> {
    if secret.is_empty() {
        return Err(DomainError::validation("secret must not be empty"));
    }
    Ok(())
}
