//! Book entity: the owned resource exposed by the API.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_blank, DomainResult};
use crate::id::{BookId, UserId};

/// A stored book.
///
/// # Invariants
/// - `owner_id` is set once at creation and never transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub owner_id: UserId,
}

impl Book {
    /// Overwrite the mutable fields. `id` and `owner_id` are left untouched.
    pub fn apply_update(&mut self, update: BookUpdate) {
        self.title = update.title;
        self.description = update.description;
    }
}

/// A book that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub owner_id: UserId,
}

impl NewBook {
    pub fn new(title: String, description: String, owner_id: UserId) -> DomainResult<Self> {
        require_non_blank("title", &title)?;
        require_non_blank("description", &description)?;
        Ok(Self {
            title,
            description,
            owner_id,
        })
    }

    /// Attach the id assigned by the store.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            description: self.description,
            owner_id: self.owner_id,
        }
    }
}

/// Replacement values for a book's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: String,
    pub description: String,
}

impl BookUpdate {
    pub fn new(title: String, description: String) -> DomainResult<Self> {
        require_non_blank("title", &title)?;
        require_non_blank("description", &description)?;
        Ok(Self { title, description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    #[test]
    fn new_book_rejects_blank_fields() {
        let err = NewBook::new("  ".into(), "d".into(), UserId::new(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("title")));

        let err = NewBook::new("t".into(), "".into(), UserId::new(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("description")));
    }

    #[test]
    fn update_keeps_identity_and_owner() {
        let mut book = NewBook::new("Dune".into(), "spice".into(), UserId::new(3))
            .unwrap()
            .into_book(BookId::new(7));

        book.apply_update(BookUpdate::new("Dune Messiah".into(), "more spice".into()).unwrap());

        assert_eq!(book.id, BookId::new(7));
        assert_eq!(book.owner_id, UserId::new(3));
        assert_eq!(book.title, "Dune Messiah");
        assert_eq!(book.description, "more spice");
    }
}
