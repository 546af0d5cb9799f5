use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use bookshelf_auth::NewProfile;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewProfile>,
) -> axum::response::Response {
    match services.sessions.register(body).await {
        Ok(identity) => (StatusCode::CREATED, Json(dto::identity_to_json(&identity))).into_response(),
        Err(e) => errors::registration_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.sessions.login(&body.email, &body.secret, Utc::now()).await {
        Ok(issued) => (StatusCode::OK, Json(dto::token_to_json(&issued, &services.scheme))).into_response(),
        Err(e) => errors::login_error_to_response(e),
    }
}
