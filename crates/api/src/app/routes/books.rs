use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::info;

use bookshelf_core::BookId;
use bookshelf_infra::BookStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

fn parse_book_id(raw: &str) -> Result<BookId, axum::response::Response> {
    raw.parse::<BookId>().map_err(errors::domain_error_to_response)
}

pub async fn list_books(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.books.list().await {
        Ok(books) => {
            let items = books.iter().map(dto::book_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.book(id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(dto::book_to_json(&book))).into_response(),
        Ok(None) => errors::not_found("book"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::BookRequest>,
) -> axum::response::Response {
    let new_book = match body.into_new_book(principal.user_id()) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.books.insert(new_book).await {
        Ok(book) => {
            info!(book_id = %book.id, owner_id = %book.owner_id, "book created");
            (StatusCode::CREATED, Json(dto::book_to_json(&book))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::BookRequest>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let update = match body.into_update() {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut book = match services.ownership.authorize_mutation(principal.user_id(), id).await {
        Ok(book) => book,
        Err(e) => return errors::ownership_error_to_response(e),
    };
    book.apply_update(update);

    match services.books.update(book).await {
        Ok(Some(book)) => (StatusCode::OK, Json(dto::book_to_json(&book))).into_response(),
        // Deleted between the ownership check and the write.
        Ok(None) => errors::not_found("book"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    if let Err(e) = services.ownership.authorize_mutation(principal.user_id(), id).await {
        return errors::ownership_error_to_response(e);
    }

    match services.books.delete(id).await {
        Ok(true) => {
            info!(book_id = %id, "book deleted");
            (StatusCode::OK, Json(serde_json::json!({ "id": id.get(), "deleted": true }))).into_response()
        }
        Ok(false) => errors::not_found("book"),
        Err(e) => errors::store_error_to_response(e),
    }
}
