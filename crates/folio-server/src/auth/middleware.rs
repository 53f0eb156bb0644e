//! Bearer-token middleware
//!
//! `require_auth` rejects with 401 before any handler logic runs;
//! `optional_auth` injects the user when a valid token is present and
//! stays silent otherwise (used by `GET /auth`).

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::jwt::{validate_token, AuthError, Claims};
use crate::api::response::ErrorResponse;
use crate::features::FeatureState;

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub claims: Claims,
}

pub async fn require_auth(
    State(state): State<FeatureState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&request).ok_or_else(|| {
        unauthorized(AuthError::MissingToken)
    })?;

    let claims = validate_token(&token, &state.auth, &state.db)
        .await
        .map_err(|err| match err {
            AuthError::Database(ref e) => {
                tracing::error!(error = ?e, "Token validation failed against database");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Server error")),
                )
                    .into_response()
            }
            other => unauthorized(other),
        })?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        claims,
    });

    Ok(next.run(request).await)
}

pub async fn optional_auth(
    State(state): State<FeatureState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer_token(&request) {
        if let Ok(claims) = validate_token(&token, &state.auth, &state.db).await {
            request.extensions_mut().insert(AuthUser {
                id: claims.sub,
                claims,
            });
        }
    }

    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    header_value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn unauthorized(err: AuthError) -> Response {
    tracing::debug!(%err, "Rejecting unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new(err.to_string())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/books");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        let req = request_with_auth(None);
        assert!(extract_bearer_token(&req).is_none());
    }

    #[test]
    fn test_wrong_scheme() {
        let req = request_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(extract_bearer_token(&req).is_none());
    }

    #[test]
    fn test_empty_token() {
        let req = request_with_auth(Some("Bearer "));
        assert!(extract_bearer_token(&req).is_none());
    }
}
