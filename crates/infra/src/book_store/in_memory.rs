use std::collections::BTreeMap;
use std::sync::RwLock;

use bookshelf_auth::{ResourceStore, StoreError};
use bookshelf_core::{Book, BookId, NewBook};

use super::BookStore;

#[derive(Debug, Default)]
struct Books {
    rows: BTreeMap<BookId, Book>,
    last_id: u64,
}

/// In-memory book store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    inner: RwLock<Books>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::unavailable("book store lock poisoned")
}

#[async_trait::async_trait]
impl ResourceStore<Book> for InMemoryBookStore {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let books = self.inner.read().map_err(|_| poisoned())?;
        Ok(books.rows.get(&id).cloned())
    }
}

#[async_trait::async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let books = self.inner.read().map_err(|_| poisoned())?;
        Ok(books.rows.values().cloned().collect())
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut books = self.inner.write().map_err(|_| poisoned())?;
        books.last_id += 1;
        let book = book.into_book(BookId::new(books.last_id));
        books.rows.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: Book) -> Result<Option<Book>, StoreError> {
        let mut books = self.inner.write().map_err(|_| poisoned())?;
        match books.rows.get_mut(&book.id) {
            Some(slot) => {
                *slot = book.clone();
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: BookId) -> Result<bool, StoreError> {
        let mut books = self.inner.write().map_err(|_| poisoned())?;
        Ok(books.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_core::{BookUpdate, UserId};

    use super::*;

    fn new_book(title: &str, owner: u64) -> NewBook {
        NewBook::new(title.into(), "about".into(), UserId::new(owner)).unwrap()
    }

    #[tokio::test]
    async fn crud_lifecycle() {
        let store = InMemoryBookStore::new();

        let a = store.insert(new_book("A", 1)).await.unwrap();
        let b = store.insert(new_book("B", 2)).await.unwrap();
        assert_eq!(a.id, BookId::new(1));
        assert_eq!(b.id, BookId::new(2));
        assert_eq!(store.list().await.unwrap(), vec![a.clone(), b.clone()]);

        let mut changed = a.clone();
        changed.apply_update(BookUpdate::new("A2".into(), "new".into()).unwrap());
        assert_eq!(store.update(changed.clone()).await.unwrap(), Some(changed.clone()));
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(changed));

        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert_eq!(store.find_by_id(a.id).await.unwrap(), None);
        assert_eq!(store.update(a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryBookStore::new();
        let a = store.insert(new_book("A", 1)).await.unwrap();
        store.delete(a.id).await.unwrap();
        let b = store.insert(new_book("B", 1)).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
