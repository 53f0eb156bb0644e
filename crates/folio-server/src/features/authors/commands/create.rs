//! Create author command
//!
//! Multipart create: the avatar is uploaded only after field validation and
//! the slug uniqueness pre-check pass, so a rejected request leaves nothing
//! in the blob store. If the insert itself still fails, the freshly uploaded
//! avatar is deleted before the error is returned.

use folio_common::slug::slugify;
use sqlx::PgPool;

use crate::features::authors::types::AuthorRecord;
use crate::features::shared::upload::{
    validate_image, FileValidationError, MultipartForm, UploadedFile,
};
use crate::features::shared::validation::{validate_required_text, TextValidationError};
use crate::storage::{BlobStore, Storage, AVATAR_NAMESPACE};

/// Command to create a new author
#[derive(Debug)]
pub struct CreateAuthorCommand {
    pub first_name: String,
    pub last_name: String,
    pub biography: String,
    pub profile_image: UploadedFile,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateAuthorError {
    #[error("{0}")]
    FieldValidation(#[from] TextValidationError),

    #[error("{0}")]
    FileValidation(#[from] FileValidationError),

    #[error("An author with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateAuthorCommand {
    /// Build the command from a drained multipart form.
    pub fn from_form(mut form: MultipartForm) -> Result<Self, CreateAuthorError> {
        let profile_image = form
            .take_file("profile_image")
            .ok_or(FileValidationError::Missing {
                field: "profile_image",
            })?;

        Ok(Self {
            first_name: form.text("first_name").unwrap_or_default().to_string(),
            last_name: form.text("last_name").unwrap_or_default().to_string(),
            biography: form.text("biography").unwrap_or_default().to_string(),
            profile_image,
        })
    }

    pub fn validate(&self) -> Result<(), CreateAuthorError> {
        validate_required_text("first_name", &self.first_name, 255)?;
        validate_required_text("last_name", &self.last_name, 255)?;
        validate_required_text("biography", &self.biography, 65_535)?;
        validate_image("profile_image", &self.profile_image)?;
        Ok(())
    }

    /// Slug derived from the trimmed full name.
    pub fn slug(&self) -> String {
        slugify(&format!(
            "{} {}",
            self.first_name.trim(),
            self.last_name.trim()
        ))
    }
}

/// Handler function for creating authors
#[tracing::instrument(
    skip(pool, storage, command),
    fields(first_name = %command.first_name, last_name = %command.last_name)
)]
pub async fn handle<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    command: CreateAuthorCommand,
) -> Result<AuthorRecord, CreateAuthorError> {
    command.validate()?;

    let slug = command.slug();

    let exists: bool =
        sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM authors WHERE slug = $1)"#)
            .bind(&slug)
            .fetch_one(&pool)
            .await?;
    if exists {
        return Err(CreateAuthorError::DuplicateSlug(slug));
    }

    let extension = command
        .profile_image
        .extension()
        .unwrap_or_else(|| "jpg".to_string());
    let key = Storage::object_key(AVATAR_NAMESPACE, &slug, &extension);
    let avatar_url = storage
        .store(
            &key,
            command.profile_image.bytes.clone(),
            command.profile_image.content_type.clone(),
        )
        .await?;

    let inserted = sqlx::query_as::<_, AuthorRecord>(
        r#"
        INSERT INTO authors (first_name, last_name, slug, biography, profile_image)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, first_name, last_name, slug, biography, profile_image,
                  created_at, updated_at
        "#,
    )
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(&slug)
    .bind(command.biography.trim())
    .bind(&avatar_url)
    .fetch_one(&pool)
    .await;

    match inserted {
        Ok(author) => {
            tracing::info!(author_id = %author.id, slug = %author.slug, "Author created");
            Ok(author)
        }
        Err(e) => {
            // Compensate: the avatar was uploaded for a record that never landed.
            if let Err(del_err) = storage.delete_url(&avatar_url).await {
                tracing::warn!(
                    error = %del_err,
                    url = %avatar_url,
                    "Failed to remove avatar after insert failure"
                );
            }
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return Err(CreateAuthorError::DuplicateSlug(slug));
                }
            }
            Err(CreateAuthorError::Database(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar() -> UploadedFile {
        UploadedFile {
            file_name: "portrait.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0u8; 128],
        }
    }

    fn valid_command() -> CreateAuthorCommand {
        CreateAuthorCommand {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            biography: "Wrote the Earthsea cycle.".to_string(),
            profile_image: avatar(),
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(valid_command().validate().is_ok());
    }

    #[test]
    fn test_slug_derivation() {
        assert_eq!(valid_command().slug(), "ursula-le-guin");
    }

    #[test]
    fn test_blank_first_name_rejected() {
        let mut command = valid_command();
        command.first_name = String::new();
        assert!(matches!(
            command.validate(),
            Err(CreateAuthorError::FieldValidation(
                TextValidationError::Required { field: "first_name" }
            ))
        ));
    }

    #[test]
    fn test_non_image_avatar_rejected() {
        let mut command = valid_command();
        command.profile_image.content_type = Some("application/pdf".to_string());
        assert!(matches!(
            command.validate(),
            Err(CreateAuthorError::FileValidation(
                FileValidationError::NotAnImage { .. }
            ))
        ));
    }

    #[test]
    fn test_from_form_requires_avatar() {
        let form = MultipartForm::from_parts(vec![("first_name", "Ursula")], vec![]);
        assert!(matches!(
            CreateAuthorCommand::from_form(form),
            Err(CreateAuthorError::FileValidation(
                FileValidationError::Missing { field: "profile_image" }
            ))
        ));
    }
}
