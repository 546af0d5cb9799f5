//! Postgres connection and schema bootstrap.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (other) | any other | `Unavailable` |
//! | PoolClosed / Io / other | N/A | `Unavailable` |

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use bookshelf_auth::StoreError;

/// Connect to Postgres and make sure the tables exist.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create the `users` and `books` tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id          BIGSERIAL PRIMARY KEY,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            secret_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("create users", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id          BIGSERIAL PRIMARY KEY,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            owner_id    BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| map_sqlx_error("create books", e))?;

    Ok(())
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::unavailable(format!("connection pool closed in {operation}")),
        other => StoreError::unavailable(format!("{operation}: {other}")),
    }
}

/// Ids above `i64::MAX` cannot exist in a `BIGSERIAL` column.
pub(crate) fn to_db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

pub(crate) fn from_db_id(id: i64) -> Result<u64, StoreError> {
    u64::try_from(id).map_err(|_| StoreError::unavailable(format!("negative id {id} in database")))
}
