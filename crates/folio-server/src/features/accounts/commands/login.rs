//! Login command
//!
//! Verifies credentials against the stored argon2id hash and issues a
//! bearer token. Unknown email and wrong password produce the same error
//! so the response does not leak which one failed.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::generate_token;
use crate::config::AuthConfig;
use crate::features::shared::validation::{validate_email, EmailValidationError};

/// Command to authenticate a user
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Token plus the authenticated user's profile
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("password is required")]
    PasswordRequired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to sign token")]
    TokenSigning,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoginCommand {
    pub fn validate(&self) -> Result<(), LoginError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(LoginError::PasswordRequired);
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Handler function for login
#[tracing::instrument(skip(pool, auth, command), fields(email = %command.email))]
pub async fn handle(
    pool: PgPool,
    auth: &AuthConfig,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    command.validate()?;

    let email = command.email.trim().to_lowercase();

    let row = sqlx::query_as::<_, CredentialRow>(
        r#"
        SELECT id, name, email, password_hash, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    let parsed_hash =
        PasswordHash::new(&row.password_hash).map_err(|_| LoginError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(command.password.as_bytes(), &parsed_hash)
        .map_err(|_| LoginError::InvalidCredentials)?;

    let issued = generate_token(row.id, auth).map_err(|_| LoginError::TokenSigning)?;

    tracing::info!(user_id = %row.id, "User logged in");

    Ok(LoginResponse {
        access_token: issued.access_token,
        token_type: "bearer",
        expires_in: issued.expires_in,
        user: UserProfile {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let command = LoginCommand {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_empty_password_rejected() {
        let command = LoginCommand {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert!(matches!(
            command.validate(),
            Err(LoginError::PasswordRequired)
        ));
    }

    #[test]
    fn test_bad_email_rejected() {
        let command = LoginCommand {
            email: "nope".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            command.validate(),
            Err(LoginError::EmailValidation(_))
        ));
    }
}
