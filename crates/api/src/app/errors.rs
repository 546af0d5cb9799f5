use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, warn};

use bookshelf_auth::{CredentialError, LoginError, OwnershipError, RegistrationError, StoreError};
use bookshelf_core::DomainError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// The single response for every gate rejection.
pub fn unauthenticated() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "missing or invalid credentials")
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Unavailable(msg) => {
            error!(error = %msg, "store unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage is unavailable")
        }
    }
}

/// Unknown identifier and wrong secret are indistinguishable to the client.
pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::Credentials(CredentialError::NotFound | CredentialError::InvalidCredentials) => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        ),
        LoginError::Credentials(CredentialError::Store(e)) => store_error_to_response(e),
        LoginError::Token(e) => {
            error!(error = %e, "failed to mint token");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "could not issue token")
        }
    }
}

pub fn registration_error_to_response(err: RegistrationError) -> axum::response::Response {
    match err {
        RegistrationError::Validation(e) => domain_error_to_response(e),
        RegistrationError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RegistrationError::Store(e) => store_error_to_response(e),
    }
}

pub fn ownership_error_to_response(err: OwnershipError) -> axum::response::Response {
    match err {
        OwnershipError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "book not found"),
        OwnershipError::Forbidden => {
            warn!("ownership check rejected mutation");
            json_error(StatusCode::FORBIDDEN, "forbidden", "only the owner may modify this book")
        }
        OwnershipError::Store(e) => store_error_to_response(e),
    }
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}
