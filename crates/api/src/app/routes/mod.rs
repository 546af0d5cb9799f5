use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod books;
pub mod system;
pub mod users;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/api/user", users::router())
        .nest("/api/book", books::router())
}
