//! Infrastructure layer: credential/book persistence and secret hashing.

pub mod book_store;
pub mod credential_store;
#[cfg(feature = "postgres")]
pub mod db;
pub mod password;

pub use book_store::{BookStore, InMemoryBookStore};
pub use credential_store::InMemoryCredentialStore;
#[cfg(feature = "postgres")]
pub use book_store::PostgresBookStore;
#[cfg(feature = "postgres")]
pub use credential_store::PostgresCredentialStore;
