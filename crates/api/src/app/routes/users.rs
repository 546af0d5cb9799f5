use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bookshelf_auth::{CredentialStore, ProfileUpdate};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

pub async fn get_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.credentials.find_by_id(principal.user_id()).await {
        Ok(Some(identity)) => (StatusCode::OK, Json(dto::identity_to_json(&identity))).into_response(),
        Ok(None) => errors::not_found("account"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<ProfileUpdate>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.credentials.update_profile(principal.user_id(), body).await {
        Ok(Some(identity)) => (StatusCode::OK, Json(dto::identity_to_json(&identity))).into_response(),
        Ok(None) => errors::not_found("account"),
        Err(e) => errors::store_error_to_response(e),
    }
}
