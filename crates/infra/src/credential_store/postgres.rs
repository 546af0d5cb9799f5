//! Postgres-backed credential store.
//!
//! Rows live in the `users` table created by [`crate::db::ensure_schema`]. The
//! unique index on `email` turns duplicate registrations into
//! `StoreError::Conflict`.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use bookshelf_auth::{CredentialStore, Identity, NewProfile, ProfileUpdate, StoreError};
use bookshelf_core::UserId;

use crate::db::{from_db_id, map_sqlx_error, to_db_id};
use crate::password;

#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn identity_from_row(row: &PgRow) -> Result<Identity, StoreError> {
    let id: i64 = row.try_get("id").map_err(|e| map_sqlx_error("read users.id", e))?;
    Ok(Identity {
        id: UserId::new(from_db_id(id)?),
        name: row.try_get("name").map_err(|e| map_sqlx_error("read users.name", e))?,
        email: row.try_get("email").map_err(|e| map_sqlx_error("read users.email", e))?,
    })
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip(self, identifier))]
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE email = $1")
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_identifier", e))?;
        row.as_ref().map(identity_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let Some(db_id) = to_db_id(id.get()) else {
            return Ok(None);
        };
        let row = sqlx::query("SELECT id, name, email FROM users WHERE id = $1")
            .bind(db_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        row.as_ref().map(identity_from_row).transpose()
    }

    #[instrument(skip(self, profile))]
    async fn insert(&self, profile: NewProfile) -> Result<Identity, StoreError> {
        let NewProfile { name, email, secret } = profile;
        let secret_hash = password::hash_secret_blocking(secret).await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, secret_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email
            "#,
        )
        .bind(&name)
        .bind(&email)
        .bind(&secret_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        identity_from_row(&row)
    }

    #[instrument(skip(self, identity, presented), fields(user_id = %identity.id))]
    async fn verify_secret(&self, identity: &Identity, presented: &str) -> Result<bool, StoreError> {
        let Some(db_id) = to_db_id(identity.id.get()) else {
            return Ok(false);
        };
        let hash: Option<String> = sqlx::query_scalar("SELECT secret_hash FROM users WHERE id = $1")
            .bind(db_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("verify_secret", e))?;

        match hash {
            Some(hash) => password::verify_secret_blocking(hash, presented.to_string()).await,
            None => Ok(false),
        }
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: UserId, update: ProfileUpdate) -> Result<Option<Identity>, StoreError> {
        let Some(db_id) = to_db_id(id.get()) else {
            return Ok(None);
        };
        let ProfileUpdate { name, email, secret } = update;
        let secret_hash = match secret {
            Some(secret) => Some(password::hash_secret_blocking(secret).await?),
            None => None,
        };

        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                secret_hash = COALESCE($4, secret_hash)
            WHERE id = $1
            RETURNING id, name, email
            "#,
        )
        .bind(db_id)
        .bind(&name)
        .bind(&email)
        .bind(secret_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_profile", e))?;

        row.as_ref().map(identity_from_row).transpose()
    }
}
