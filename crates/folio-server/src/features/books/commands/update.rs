//! Update book command
//!
//! JSON partial patch, no file re-upload (that lives in the media
//! replacement endpoint). The status resolver still runs over the merged
//! record so the no-file ⇒ Unavailable invariant holds on this path too.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::status::{resolve_update, BookStatus, ParseStatusError};
use crate::features::books::types::BookRecord;
use crate::features::shared::validation::{validate_required_text, TextValidationError};

/// Command to patch an existing book
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookCommand {
    /// Set from the path parameter, not the body.
    #[serde(skip)]
    pub id: Uuid,

    pub title: Option<String>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub published_at: Option<String>,
    pub status: Option<String>,
    pub author_id: Option<Uuid>,
    /// URL of an already-stored file; absent keeps the stored value.
    pub book_file: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBookError {
    #[error("{0}")]
    FieldValidation(#[from] TextValidationError),

    #[error("published_at must be a valid YYYY-MM-DD date")]
    InvalidDate,

    #[error("{0}")]
    InvalidStatus(#[from] ParseStatusError),

    #[error("Book '{0}' not found")]
    NotFound(Uuid),

    #[error("A book titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Author '{0}' not found")]
    AuthorNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateBookCommand {
    pub fn validate(&self) -> Result<(), UpdateBookError> {
        if let Some(ref title) = self.title {
            validate_required_text("title", title, 255)?;
        }
        if let Some(ref description) = self.description {
            validate_required_text("description", description, 65_535)?;
        }
        self.parsed_date()?;
        self.parsed_status()?;
        Ok(())
    }

    pub fn parsed_date(&self) -> Result<Option<NaiveDate>, UpdateBookError> {
        self.published_at
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| UpdateBookError::InvalidDate)
    }

    pub fn parsed_status(&self) -> Result<Option<BookStatus>, UpdateBookError> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<BookStatus>())
            .transpose()
            .map_err(UpdateBookError::from)
    }
}

/// Handler function for updating books
#[tracing::instrument(skip(pool, command), fields(book_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateBookCommand) -> Result<BookRecord, UpdateBookError> {
    command.validate()?;

    let existing = sqlx::query_as::<_, BookRecord>(
        r#"
        SELECT id, title, description, published_at, cover_image, book_file,
               status, author_id, created_at, updated_at
        FROM books
        WHERE id = $1
        "#,
    )
    .bind(command.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateBookError::NotFound(command.id))?;

    let title = command
        .title
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.title)
        .to_string();
    let description = command
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.description)
        .to_string();
    let published_at = command.parsed_date()?.unwrap_or(existing.published_at);
    let author_id = command.author_id.or(existing.author_id);
    let book_file = command.book_file.clone().or_else(|| existing.book_file.clone());

    let stored_status = existing
        .status
        .parse::<BookStatus>()
        .unwrap_or(BookStatus::Unavailable);
    let status = resolve_update(book_file.is_some(), command.parsed_status()?, stored_status);

    let updated = sqlx::query_as::<_, BookRecord>(
        r#"
        UPDATE books
        SET title = $1, description = $2, published_at = $3, book_file = $4,
            status = $5, author_id = $6, updated_at = now()
        WHERE id = $7
        RETURNING id, title, description, published_at, cover_image, book_file,
                  status, author_id, created_at, updated_at
        "#,
    )
    .bind(&title)
    .bind(&description)
    .bind(published_at)
    .bind(&book_file)
    .bind(status.as_str())
    .bind(author_id)
    .bind(command.id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return UpdateBookError::DuplicateTitle(title.clone());
            }
            if db_err.is_foreign_key_violation() {
                if let Some(author_id) = author_id {
                    return UpdateBookError::AuthorNotFound(author_id);
                }
            }
        }
        UpdateBookError::Database(e)
    })?;

    tracing::info!(status = %updated.status, "Book updated");

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_patch() -> UpdateBookCommand {
        UpdateBookCommand {
            id: Uuid::new_v4(),
            title: None,
            description: None,
            published_at: None,
            status: None,
            author_id: None,
            book_file: None,
        }
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(empty_patch().validate().is_ok());
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut command = empty_patch();
        command.published_at = Some("yesterday".to_string());
        assert!(matches!(
            command.validate(),
            Err(UpdateBookError::InvalidDate)
        ));
    }

    #[test]
    fn test_bad_status_rejected() {
        let mut command = empty_patch();
        command.status = Some("Lost".to_string());
        assert!(matches!(
            command.validate(),
            Err(UpdateBookError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut command = empty_patch();
        command.title = Some(" ".to_string());
        assert!(matches!(
            command.validate(),
            Err(UpdateBookError::FieldValidation(_))
        ));
    }
}
