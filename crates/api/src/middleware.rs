use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use bookshelf_auth::{JwtValidator, TokenError};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    /// Scheme prefix expected in `Authorization`, matched case-sensitively.
    pub scheme: Arc<str>,
}

impl AuthState {
    pub fn new(jwt: Arc<dyn JwtValidator>, scheme: impl Into<Arc<str>>) -> Self {
        Self {
            jwt,
            scheme: scheme.into(),
        }
    }
}

/// Authorization gate for protected routes.
///
/// Every failure (missing header, wrong scheme, bad token) becomes the same
/// 401 response and the inner handler is never called.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let claims = match extract_bearer(req.headers(), &state.scheme).and_then(|token| state.jwt.validate(token, Utc::now())) {
        Ok(claims) => claims,
        Err(reason) => {
            debug!(%reason, method = %req.method(), path = %req.uri().path(), "rejecting unauthenticated request");
            return errors::unauthenticated();
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(claims.sub));

    next.run(req).await
}

fn extract_bearer<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, TokenError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| TokenError::Malformed("missing authorization header".into()))?;

    let header = header
        .to_str()
        .map_err(|_| TokenError::Malformed("authorization header is not valid ascii".into()))?;

    let token = header
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or_else(|| TokenError::Malformed(format!("expected '{scheme}' authorization scheme")))?
        .trim();

    if token.is_empty() {
        return Err(TokenError::Malformed("empty token".into()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use axum::{body::Body, http::StatusCode, routing::get, Extension, Router};
    use bookshelf_auth::{AuthConfig, Hs256JwtCodec, SigningSecret};
    use bookshelf_core::UserId;
    use tower::ServiceExt;

    use super::*;

    fn codec() -> Arc<Hs256JwtCodec> {
        let config = AuthConfig::with_defaults(SigningSecret::new("gate-secret"), chrono::Duration::minutes(5)).unwrap();
        Arc::new(Hs256JwtCodec::new(&config))
    }

    fn probed_app(codec: Arc<Hs256JwtCodec>, hit: Arc<AtomicBool>) -> Router {
        let state = AuthState::new(codec, "Bearer");
        Router::new()
            .route(
                "/probe",
                get(move |Extension(principal): Extension<PrincipalContext>| {
                    let hit = hit.clone();
                    async move {
                        hit.store(true, Ordering::SeqCst);
                        principal.user_id().to_string()
                    }
                }),
            )
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, authorization: Option<String>) -> Response {
        let mut req = axum::http::Request::builder().uri("/probe");
        if let Some(value) = authorization {
            req = req.header(axum::http::header::AUTHORIZATION, value);
        }
        app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected_before_handler() {
        let hit = Arc::new(AtomicBool::new(false));
        let res = call(probed_app(codec(), hit.clone()), None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(!hit.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn wrong_scheme_or_bad_token_is_rejected() {
        let codec = codec();
        let token = codec.mint(UserId::new(4), Utc::now()).unwrap().token;

        for header in [
            format!("bearer {token}"),
            format!("Token {token}"),
            format!("Bearer{token}"),
            "Bearer ".to_string(),
            "Bearer not.a.jwt".to_string(),
        ] {
            let hit = Arc::new(AtomicBool::new(false));
            let res = call(probed_app(codec.clone(), hit.clone()), Some(header.clone())).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{header}");
            assert!(!hit.load(Ordering::SeqCst), "{header}");
        }
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_subject() {
        let codec = codec();
        let token = codec.mint(UserId::new(4), Utc::now()).unwrap().token;
        let hit = Arc::new(AtomicBool::new(false));

        let res = call(probed_app(codec, hit.clone()), Some(format!("Bearer {token}"))).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(hit.load(Ordering::SeqCst));
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"4");
    }

    #[test]
    fn extract_bearer_trims_token() {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, "Bearer  abc ".parse().unwrap());
        assert_eq!(extract_bearer(&headers, "Bearer").unwrap(), "abc");
    }
}
