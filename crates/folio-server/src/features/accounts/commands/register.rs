//! Register command
//!
//! Creates a user account with an argon2id password hash. No token is
//! issued here; the client logs in afterwards.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_email, validate_password, validate_required_text, EmailValidationError,
    PasswordValidationError, TextValidationError,
};

/// Command to register a new user
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// The public view of a user record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    NameValidation(#[from] TextValidationError),

    #[error("{0}")]
    EmailValidation(#[from] EmailValidationError),

    #[error("{0}")]
    PasswordValidation(#[from] PasswordValidationError),

    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Failed to hash password")]
    Hashing,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RegisterCommand {
    pub fn validate(&self) -> Result<(), RegisterError> {
        validate_required_text("name", &self.name, 255)?;
        validate_email(&self.email)?;
        validate_password(&self.password, &self.password_confirmation)?;
        Ok(())
    }
}

/// Handler function for user registration
#[tracing::instrument(skip(pool, command), fields(email = %command.email))]
pub async fn handle(
    pool: PgPool,
    command: RegisterCommand,
) -> Result<RegisterResponse, RegisterError> {
    command.validate()?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(command.password.as_bytes(), &salt)
        .map_err(|_| RegisterError::Hashing)?
        .to_string();

    let email = command.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, RegisterResponse>(
        r#"
        INSERT INTO users (name, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, created_at
        "#,
    )
    .bind(command.name.trim())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return RegisterError::DuplicateEmail(email.clone());
            }
        }
        RegisterError::Database(e)
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_command() -> RegisterCommand {
        RegisterCommand {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "engine-no-9".to_string(),
            password_confirmation: "engine-no-9".to_string(),
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(valid_command().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut command = valid_command();
        command.name = "  ".to_string();
        assert!(matches!(
            command.validate(),
            Err(RegisterError::NameValidation(_))
        ));
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut command = valid_command();
        command.email = "not-an-email".to_string();
        assert!(matches!(
            command.validate(),
            Err(RegisterError::EmailValidation(_))
        ));
    }

    #[test]
    fn test_mismatched_confirmation_rejected() {
        let mut command = valid_command();
        command.password_confirmation = "different".to_string();
        assert!(matches!(
            command.validate(),
            Err(RegisterError::PasswordValidation(
                PasswordValidationError::ConfirmationMismatch
            ))
        ));
    }
}
