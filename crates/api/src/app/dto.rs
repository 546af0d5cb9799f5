use serde::Deserialize;
use serde_json::json;

use bookshelf_auth::{Identity, IssuedToken};
use bookshelf_core::{Book, BookUpdate, DomainResult, NewBook, UserId};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(alias = "password")]
    pub secret: String,
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/book` and `PUT /api/book/:id`.
///
/// Carries no owner: the owner is always the token subject.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub description: String,
}

impl BookRequest {
    pub fn into_new_book(self, owner: UserId) -> DomainResult<NewBook> {
        NewBook::new(self.title, self.description, owner)
    }

    pub fn into_update(self) -> DomainResult<BookUpdate> {
        BookUpdate::new(self.title, self.description)
    }
}

pub fn identity_to_json(identity: &Identity) -> serde_json::Value {
    json!({
        "id": identity.id.get(),
        "name": identity.name,
        "email": identity.email,
    })
}

pub fn book_to_json(book: &Book) -> serde_json::Value {
    json!({
        "id": book.id.get(),
        "title": book.title,
        "description": book.description,
        "owner_id": book.owner_id.get(),
    })
}

pub fn token_to_json(issued: &IssuedToken, scheme: &str) -> serde_json::Value {
    json!({
        "token": issued.token,
        "token_type": scheme,
        "expires_at": issued.expires_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use bookshelf_core::BookId;

    use super::*;

    #[test]
    fn login_request_accepts_password_alias_and_redacts() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@x.com","password":"s1"}"#).unwrap();
        assert_eq!(req.secret, "s1");
        assert!(!format!("{req:?}").contains("s1"));
    }

    #[test]
    fn book_request_maps_owner_from_caller() {
        let req = BookRequest {
            title: "Dune".into(),
            description: "sand".into(),
        };
        let book = req.into_new_book(UserId::new(3)).unwrap().into_book(BookId::new(1));
        let body = book_to_json(&book);
        assert_eq!(body["owner_id"], 3);
        assert_eq!(body["id"], 1);
    }

    #[test]
    fn blank_book_fields_are_rejected() {
        let req = BookRequest {
            title: " ".into(),
            description: "x".into(),
        };
        assert!(req.into_update().is_err());
    }

    #[test]
    fn identity_json_has_no_secret() {
        let identity = Identity {
            id: UserId::new(1),
            name: "A".into(),
            email: "a@x.com".into(),
        };
        let body = identity_to_json(&identity);
        assert_eq!(body.as_object().unwrap().len(), 3);
    }
}
