//! Update author command
//!
//! JSON partial patch. The slug is recomputed from the merged name only
//! when the derived value differs from the stored one, so renames that do
//! not change the slug leave it (and the avatar key) untouched.

use folio_common::slug::slugify;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::types::AuthorRecord;
use crate::features::shared::validation::{validate_required_text, TextValidationError};

/// Command to patch an existing author
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAuthorCommand {
    /// Set from the path parameter, not the body.
    #[serde(skip)]
    pub id: Uuid,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub biography: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateAuthorError {
    #[error("{0}")]
    FieldValidation(#[from] TextValidationError),

    #[error("Author '{0}' not found")]
    NotFound(Uuid),

    #[error("An author with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateAuthorCommand {
    /// Provided fields must still pass the create-time rules.
    pub fn validate(&self) -> Result<(), UpdateAuthorError> {
        if let Some(ref first_name) = self.first_name {
            validate_required_text("first_name", first_name, 255)?;
        }
        if let Some(ref last_name) = self.last_name {
            validate_required_text("last_name", last_name, 255)?;
        }
        if let Some(ref biography) = self.biography {
            validate_required_text("biography", biography, 65_535)?;
        }
        Ok(())
    }
}

/// Handler function for updating authors
#[tracing::instrument(skip(pool, command), fields(author_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateAuthorCommand,
) -> Result<AuthorRecord, UpdateAuthorError> {
    command.validate()?;

    let existing = sqlx::query_as::<_, AuthorRecord>(
        r#"
        SELECT id, first_name, last_name, slug, biography, profile_image,
               created_at, updated_at
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateAuthorError::NotFound(command.id))?;

    let first_name = command
        .first_name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.first_name)
        .to_string();
    let last_name = command
        .last_name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.last_name)
        .to_string();
    let biography = command
        .biography
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.biography)
        .to_string();

    // Recompute only when the merged name derives a different slug.
    let derived = slugify(&format!("{} {}", first_name, last_name));
    let slug = if derived != existing.slug {
        derived
    } else {
        existing.slug.clone()
    };

    let updated = sqlx::query_as::<_, AuthorRecord>(
        r#"
        UPDATE authors
        SET first_name = $1, last_name = $2, biography = $3, slug = $4,
            updated_at = now()
        WHERE id = $5
        RETURNING id, first_name, last_name, slug, biography, profile_image,
                  created_at, updated_at
        "#,
    )
    .bind(&first_name)
    .bind(&last_name)
    .bind(&biography)
    .bind(&slug)
    .bind(command.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return UpdateAuthorError::DuplicateSlug(slug.clone());
            }
        }
        UpdateAuthorError::Database(e)
    })?;

    tracing::info!(slug = %updated.slug, "Author updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_is_valid() {
        let command = UpdateAuthorCommand {
            id: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            biography: None,
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_blank_provided_field_rejected() {
        let command = UpdateAuthorCommand {
            id: Uuid::new_v4(),
            first_name: Some("  ".to_string()),
            last_name: None,
            biography: None,
        };
        assert!(matches!(
            command.validate(),
            Err(UpdateAuthorError::FieldValidation(
                TextValidationError::Required { field: "first_name" }
            ))
        ));
    }
}
