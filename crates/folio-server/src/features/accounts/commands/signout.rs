//! Signout command
//!
//! Stateless tokens cannot be invalidated by deletion, so signout records
//! the token's `jti` in `revoked_tokens`. The row can be reaped once the
//! token would have expired anyway.

use serde::Serialize;
use sqlx::PgPool;

use crate::auth::jwt::{revoke_token, Claims};

#[derive(Debug, Clone, Serialize)]
pub struct SignoutResponse {
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum SignoutError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for signout
#[tracing::instrument(skip(pool, claims), fields(user_id = %claims.sub))]
pub async fn handle(pool: PgPool, claims: &Claims) -> Result<SignoutResponse, SignoutError> {
    revoke_token(&pool, claims).await?;

    tracing::info!("Token revoked");

    Ok(SignoutResponse {
        message: "Successfully signed out",
    })
}
