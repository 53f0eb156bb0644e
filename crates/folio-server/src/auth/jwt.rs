//! JWT issue and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;

/// Claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Token id, the revocation handle
    pub jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Token has been revoked")]
    Revoked,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Issued token plus its lifetime, for the login response.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Sign an HS256 access token for `user_id`.
pub fn generate_token(user_id: Uuid, config: &AuthConfig) -> Result<IssuedToken, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(config.token_ttl_secs);

    let claims = Claims {
        sub: user_id,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let access_token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    Ok(IssuedToken {
        access_token,
        expires_in: config.token_ttl_secs,
    })
}

/// Decode and verify a token's signature and expiry, then check it has not
/// been revoked.
pub async fn validate_token(
    token: &str,
    config: &AuthConfig,
    pool: &PgPool,
) -> Result<Claims, AuthError> {
    let claims = decode_claims(token, config)?;

    if is_token_revoked(pool, &claims.jti).await? {
        return Err(AuthError::Revoked);
    }

    Ok(claims)
}

/// Signature/expiry check only, without the revocation lookup.
pub fn decode_claims(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Record a token id as revoked. Idempotent.
pub async fn revoke_token(pool: &PgPool, claims: &Claims) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO revoked_tokens (jti, expires_at)
        VALUES ($1, to_timestamp($2))
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(&claims.jti)
    .bind(claims.exp)
    .execute(pool)
    .await?;

    Ok(())
}

async fn is_token_revoked(pool: &PgPool, jti: &str) -> Result<bool, AuthError> {
    let revoked: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)
        "#,
    )
    .bind(jti)
    .fetch_one(pool)
    .await?;

    Ok(revoked)
}
