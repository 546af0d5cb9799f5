//! Credential store implementations.
//!
//! The [`CredentialStore`] contract itself is owned by `bookshelf-auth`.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use bookshelf_auth::CredentialStore;
pub use in_memory::InMemoryCredentialStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCredentialStore;
