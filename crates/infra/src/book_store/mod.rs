//! Book persistence.

use bookshelf_auth::{ResourceStore, StoreError};
use bookshelf_core::{Book, BookId, NewBook};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryBookStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresBookStore;

/// Full CRUD over books. Reads by id come from [`ResourceStore`], which is all
/// the ownership checks need.
#[async_trait::async_trait]
pub trait BookStore: ResourceStore<Book> {
    /// All books ordered by id.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Persist new field values. `Ok(None)` if the book no longer exists.
    async fn update(&self, book: Book) -> Result<Option<Book>, StoreError>;

    /// `Ok(false)` if nothing was deleted.
    async fn delete(&self, id: BookId) -> Result<bool, StoreError>;
}
