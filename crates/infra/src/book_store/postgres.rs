//! Postgres-backed book store over the `books` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use bookshelf_auth::{ResourceStore, StoreError};
use bookshelf_core::{Book, BookId, NewBook, UserId};

use super::BookStore;
use crate::db::{from_db_id, map_sqlx_error, to_db_id};

#[derive(Debug, Clone)]
pub struct PostgresBookStore {
    pool: PgPool,
}

impl PostgresBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn book_from_row(row: &PgRow) -> Result<Book, StoreError> {
    let read = |e| map_sqlx_error("read books row", e);
    let id: i64 = row.try_get("id").map_err(read)?;
    let owner_id: i64 = row.try_get("owner_id").map_err(read)?;
    Ok(Book {
        id: BookId::new(from_db_id(id)?),
        title: row.try_get("title").map_err(read)?,
        description: row.try_get("description").map_err(read)?,
        owner_id: UserId::new(from_db_id(owner_id)?),
    })
}

fn db_owner_id(owner: UserId) -> Result<i64, StoreError> {
    to_db_id(owner.get()).ok_or_else(|| StoreError::unavailable(format!("owner id {owner} out of range")))
}

#[async_trait::async_trait]
impl ResourceStore<Book> for PostgresBookStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let Some(db_id) = to_db_id(id.get()) else {
            return Ok(None);
        };
        let row = sqlx::query("SELECT id, title, description, owner_id FROM books WHERE id = $1")
            .bind(db_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_book", e))?;
        row.as_ref().map(book_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl BookStore for PostgresBookStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query("SELECT id, title, description, owner_id FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_books", e))?;
        rows.iter().map(book_from_row).collect()
    }

    #[instrument(skip(self, book), fields(owner_id = %book.owner_id))]
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(db_owner_id(book.owner_id)?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_book", e))?;
        book_from_row(&row)
    }

    #[instrument(skip(self, book), fields(book_id = %book.id))]
    async fn update(&self, book: Book) -> Result<Option<Book>, StoreError> {
        let Some(db_id) = to_db_id(book.id.get()) else {
            return Ok(None);
        };
        // owner_id is never updated.
        let row = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, description = $3
            WHERE id = $1
            RETURNING id, title, description, owner_id
            "#,
        )
        .bind(db_id)
        .bind(&book.title)
        .bind(&book.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_book", e))?;
        row.as_ref().map(book_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: BookId) -> Result<bool, StoreError> {
        let Some(db_id) = to_db_id(id.get()) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(db_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_book", e))?;
        Ok(result.rows_affected() > 0)
    }
}
