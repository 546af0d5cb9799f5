use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use bookshelf_auth::{
    AuthConfig, CredentialStore, Hs256JwtCodec, OwnershipAuthorizer, ResourceStore, SessionIssuer, StoreError,
};
use bookshelf_core::{Book, BookId};
use bookshelf_infra::{BookStore, InMemoryBookStore, InMemoryCredentialStore};

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("store initialisation failed: {0}")]
    Store(#[from] StoreError),

    #[error("DATABASE_URL is set but the binary was built without the `postgres` feature")]
    PostgresDisabled,
}

/// Everything a handler needs, built once in `main` and shared behind an `Arc`.
pub struct AppServices {
    pub codec: Arc<Hs256JwtCodec>,
    pub sessions: SessionIssuer,
    pub credentials: Arc<dyn CredentialStore>,
    pub books: Arc<dyn BookStore>,
    pub ownership: OwnershipAuthorizer<Book, dyn BookStore>,
    /// Scheme prefix clients must send back with the token.
    pub scheme: String,
}

impl AppServices {
    pub fn new(auth: &AuthConfig, credentials: Arc<dyn CredentialStore>, books: Arc<dyn BookStore>) -> Self {
        let codec = Arc::new(Hs256JwtCodec::new(auth));
        Self {
            sessions: SessionIssuer::new(credentials.clone(), codec.clone()),
            ownership: OwnershipAuthorizer::new(books.clone()),
            codec,
            credentials,
            books,
            scheme: auth.scheme().to_string(),
        }
    }

    /// In-memory stores (dev/test).
    pub fn in_memory(auth: &AuthConfig) -> Self {
        Self::new(
            auth,
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryBookStore::new()),
        )
    }

    pub async fn book(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        ResourceStore::<Book>::find_by_id(&*self.books, id).await
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StartupError> {
    match config.database_url.as_deref() {
        Some(url) => build_persistent_services(config, url).await,
        None => {
            info!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory(&config.auth))
        }
    }
}

#[cfg(feature = "postgres")]
async fn build_persistent_services(config: &AppConfig, url: &str) -> Result<AppServices, StartupError> {
    use bookshelf_infra::{PostgresBookStore, PostgresCredentialStore};

    let pool = bookshelf_infra::db::connect(url, config.db_max_connections).await?;
    info!(max_connections = config.db_max_connections, "connected to postgres");

    Ok(AppServices::new(
        &config.auth,
        Arc::new(PostgresCredentialStore::new(pool.clone())),
        Arc::new(PostgresBookStore::new(pool)),
    ))
}

#[cfg(not(feature = "postgres"))]
async fn build_persistent_services(_config: &AppConfig, _url: &str) -> Result<AppServices, StartupError> {
    Err(StartupError::PostgresDisabled)
}
