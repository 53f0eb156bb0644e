//! Replace media command
//!
//! `POST /upload` swaps stored blobs for an existing record. The old blob
//! is deleted leniently before the replacement goes up; if the database
//! update then fails, the replacement blobs are deleted again so the store
//! matches what the record still references.

use std::str::FromStr;

use folio_common::slug::slugify;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::types::AuthorRecord;
use crate::features::books::types::BookRecord;
use crate::features::shared::upload::{
    validate_document, validate_image, FileValidationError, MultipartForm, UploadedFile,
};
use crate::storage::{BlobStore, Storage, AVATAR_NAMESPACE, BOOKS_NAMESPACE, COVERS_NAMESPACE};

/// Which kind of record the upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaGroup {
    Author,
    Book,
}

impl FromStr for MediaGroup {
    type Err = ReplaceMediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(MediaGroup::Author),
            "book" => Ok(MediaGroup::Book),
            _ => Err(ReplaceMediaError::InvalidGroup),
        }
    }
}

/// Command to replace stored media
#[derive(Debug)]
pub struct ReplaceMediaCommand {
    pub group: String,
    pub id: String,
    pub image: Option<UploadedFile>,
    pub book: Option<UploadedFile>,
}

/// The updated record, author or book depending on the group
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplaceMediaResponse {
    Author(AuthorRecord),
    Book(BookRecord),
}

#[derive(Debug, thiserror::Error)]
pub enum ReplaceMediaError {
    #[error("group must be 'author' or 'book'")]
    InvalidGroup,

    #[error("id must be a valid UUID")]
    InvalidId,

    #[error("at least one of image or book is required")]
    FileRequired,

    #[error("image is required when group is 'author'")]
    ImageRequiredForAuthor,

    #[error("{0}")]
    FileValidation(#[from] FileValidationError),

    #[error("Author '{0}' not found")]
    AuthorNotFound(Uuid),

    #[error("Book '{0}' not found")]
    BookNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ReplaceMediaCommand {
    /// Build the command from a drained multipart form.
    pub fn from_form(mut form: MultipartForm) -> Self {
        Self {
            group: form.text("group").unwrap_or_default().to_string(),
            id: form.text("id").unwrap_or_default().to_string(),
            image: form.take_file("image"),
            book: form.take_file("book"),
        }
    }

    pub fn validate(&self) -> Result<(), ReplaceMediaError> {
        let group = self.parsed_group()?;
        self.parsed_id()?;

        if self.image.is_none() && self.book.is_none() {
            return Err(ReplaceMediaError::FileRequired);
        }
        if group == MediaGroup::Author && self.image.is_none() {
            return Err(ReplaceMediaError::ImageRequiredForAuthor);
        }

        if let Some(ref image) = self.image {
            validate_image("image", image)?;
        }
        if let Some(ref book) = self.book {
            validate_document("book", book)?;
        }
        Ok(())
    }

    pub fn parsed_group(&self) -> Result<MediaGroup, ReplaceMediaError> {
        self.group.trim().parse()
    }

    pub fn parsed_id(&self) -> Result<Uuid, ReplaceMediaError> {
        Uuid::parse_str(self.id.trim()).map_err(|_| ReplaceMediaError::InvalidId)
    }
}

/// Handler function for media replacement
#[tracing::instrument(skip(pool, storage, command), fields(group = %command.group, id = %command.id))]
pub async fn handle<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    command: ReplaceMediaCommand,
) -> Result<ReplaceMediaResponse, ReplaceMediaError> {
    command.validate()?;

    let id = command.parsed_id()?;

    match command.parsed_group()? {
        MediaGroup::Author => replace_author_avatar(pool, storage, id, command).await,
        MediaGroup::Book => replace_book_media(pool, storage, id, command).await,
    }
}

async fn replace_author_avatar<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    id: Uuid,
    command: ReplaceMediaCommand,
) -> Result<ReplaceMediaResponse, ReplaceMediaError> {
    let author = sqlx::query_as::<_, AuthorRecord>(
        r#"
        SELECT id, first_name, last_name, slug, biography, profile_image,
               created_at, updated_at
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(ReplaceMediaError::AuthorNotFound(id))?;

    let image = command.image.ok_or(ReplaceMediaError::ImageRequiredForAuthor)?;

    if let Some(ref old) = author.profile_image {
        if let Err(err) = storage.delete_url(old).await {
            tracing::warn!(error = %err, url = %old, "Failed to delete old avatar blob");
        }
    }

    let ext = image.extension().unwrap_or_else(|| "jpg".to_string());
    let key = Storage::object_key(AVATAR_NAMESPACE, &author.slug, &ext);
    let url = storage
        .store(&key, image.bytes.clone(), image.content_type.clone())
        .await?;

    let updated = sqlx::query_as::<_, AuthorRecord>(
        r#"
        UPDATE authors
        SET profile_image = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, first_name, last_name, slug, biography, profile_image,
                  created_at, updated_at
        "#,
    )
    .bind(&url)
    .bind(id)
    .fetch_one(&pool)
    .await;

    match updated {
        Ok(author) => {
            tracing::info!(slug = %author.slug, "Author avatar replaced");
            Ok(ReplaceMediaResponse::Author(author))
        }
        Err(e) => {
            compensate(storage, &[url]).await;
            Err(ReplaceMediaError::Database(e))
        }
    }
}

async fn replace_book_media<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    id: Uuid,
    command: ReplaceMediaCommand,
) -> Result<ReplaceMediaResponse, ReplaceMediaError> {
    let book = sqlx::query_as::<_, BookRecord>(
        r#"
        SELECT id, title, description, published_at, cover_image, book_file,
               status, author_id, created_at, updated_at
        FROM books
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(ReplaceMediaError::BookNotFound(id))?;

    let slug = slugify(&book.title);
    let mut uploaded: Vec<String> = Vec::new();

    let cover_url = match command.image {
        Some(ref image) => {
            if let Some(ref old) = book.cover_image {
                if let Err(err) = storage.delete_url(old).await {
                    tracing::warn!(error = %err, url = %old, "Failed to delete old cover blob");
                }
            }
            let ext = image.extension().unwrap_or_else(|| "jpg".to_string());
            let key = Storage::object_key(COVERS_NAMESPACE, &slug, &ext);
            let url = storage
                .store(&key, image.bytes.clone(), image.content_type.clone())
                .await?;
            uploaded.push(url.clone());
            Some(url)
        }
        None => None,
    };

    let file_url = match command.book {
        Some(ref file) => {
            if let Some(ref old) = book.book_file {
                if let Err(err) = storage.delete_url(old).await {
                    tracing::warn!(error = %err, url = %old, "Failed to delete old book blob");
                }
            }
            let ext = file.extension().unwrap_or_else(|| "pdf".to_string());
            let key = Storage::object_key(BOOKS_NAMESPACE, &slug, &ext);
            match storage
                .store(&key, file.bytes.clone(), file.content_type.clone())
                .await
            {
                Ok(url) => {
                    uploaded.push(url.clone());
                    Some(url)
                }
                Err(err) => {
                    compensate(storage, &uploaded).await;
                    return Err(ReplaceMediaError::Storage(err));
                }
            }
        }
        None => None,
    };

    let updated = sqlx::query_as::<_, BookRecord>(
        r#"
        UPDATE books
        SET cover_image = COALESCE($1, cover_image),
            book_file = COALESCE($2, book_file),
            updated_at = now()
        WHERE id = $3
        RETURNING id, title, description, published_at, cover_image, book_file,
                  status, author_id, created_at, updated_at
        "#,
    )
    .bind(&cover_url)
    .bind(&file_url)
    .bind(id)
    .fetch_one(&pool)
    .await;

    match updated {
        Ok(book) => {
            tracing::info!(title = %book.title, "Book media replaced");
            Ok(ReplaceMediaResponse::Book(book))
        }
        Err(e) => {
            compensate(storage, &uploaded).await;
            Err(ReplaceMediaError::Database(e))
        }
    }
}

/// Delete every blob uploaded during a failed replacement. Best effort.
async fn compensate<S: BlobStore>(storage: &S, uploaded: &[String]) {
    for url in uploaded {
        if let Err(err) = storage.delete_url(url).await {
            tracing::warn!(
                error = %err,
                url = %url,
                "Failed to remove blob after replacement failure"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> UploadedFile {
        UploadedFile {
            file_name: "new-cover.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0u8; 32],
        }
    }

    fn document() -> UploadedFile {
        UploadedFile {
            file_name: "book.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![0u8; 32],
        }
    }

    fn command(group: &str, image_file: Option<UploadedFile>, book_file: Option<UploadedFile>) -> ReplaceMediaCommand {
        ReplaceMediaCommand {
            group: group.to_string(),
            id: Uuid::new_v4().to_string(),
            image: image_file,
            book: book_file,
        }
    }

    #[test]
    fn test_valid_author_replacement() {
        assert!(command("author", Some(image()), None).validate().is_ok());
    }

    #[test]
    fn test_valid_book_replacement() {
        assert!(command("book", None, Some(document())).validate().is_ok());
        assert!(command("book", Some(image()), Some(document()))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_unknown_group_rejected() {
        assert!(matches!(
            command("publisher", Some(image()), None).validate(),
            Err(ReplaceMediaError::InvalidGroup)
        ));
    }

    #[test]
    fn test_no_files_rejected() {
        assert!(matches!(
            command("book", None, None).validate(),
            Err(ReplaceMediaError::FileRequired)
        ));
    }

    #[test]
    fn test_author_without_image_rejected() {
        assert!(matches!(
            command("author", None, Some(document())).validate(),
            Err(ReplaceMediaError::ImageRequiredForAuthor)
        ));
    }

    #[test]
    fn test_bad_id_rejected() {
        let mut cmd = command("author", Some(image()), None);
        cmd.id = "42".to_string();
        assert!(matches!(
            cmd.validate(),
            Err(ReplaceMediaError::InvalidId)
        ));
    }
}
