//! Create book command
//!
//! Multipart create with up to two blob uploads. Ordering matters:
//! validation and the title uniqueness pre-check run before any upload, and
//! every blob written during the operation is deleted again if a later step
//! fails, so a failed create leaves neither rows nor orphaned objects.

use chrono::NaiveDate;
use folio_common::slug::slugify;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::status::{resolve_create, BookStatus, ParseStatusError};
use crate::features::books::types::BookRecord;
use crate::features::shared::upload::{
    validate_document, validate_image, FileValidationError, MultipartForm, UploadedFile,
};
use crate::features::shared::validation::{validate_required_text, TextValidationError};
use crate::storage::{BlobStore, Storage, BOOKS_NAMESPACE, COVERS_NAMESPACE};

/// Command to create a new book
#[derive(Debug)]
pub struct CreateBookCommand {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub published_at: String,
    pub status: Option<String>,
    pub author_id: Option<String>,
    pub cover_image: UploadedFile,
    pub book_file: Option<UploadedFile>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateBookError {
    #[error("{0}")]
    FieldValidation(#[from] TextValidationError),

    #[error("{0}")]
    FileValidation(#[from] FileValidationError),

    #[error("published_at must be a valid YYYY-MM-DD date")]
    InvalidDate,

    #[error("{0}")]
    InvalidStatus(#[from] ParseStatusError),

    #[error("author_id must be a valid UUID")]
    InvalidAuthorId,

    #[error("A book titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Author '{0}' not found")]
    AuthorNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateBookCommand {
    /// Build the command from a drained multipart form.
    pub fn from_form(mut form: MultipartForm) -> Result<Self, CreateBookError> {
        let cover_image = form
            .take_file("cover_image")
            .ok_or(FileValidationError::Missing {
                field: "cover_image",
            })?;

        Ok(Self {
            title: form.text("title").unwrap_or_default().to_string(),
            description: form.text("description").unwrap_or_default().to_string(),
            published_at: form.text("published_at").unwrap_or_default().to_string(),
            status: form.text("status").map(str::to_string),
            author_id: form.text("author_id").map(str::to_string),
            cover_image,
            book_file: form.take_file("book_file"),
        })
    }

    pub fn validate(&self) -> Result<(), CreateBookError> {
        validate_required_text("title", &self.title, 255)?;
        validate_required_text("description", &self.description, 65_535)?;
        self.parsed_date()?;
        self.parsed_status()?;
        self.parsed_author_id()?;
        validate_image("cover_image", &self.cover_image)?;
        if let Some(ref book_file) = self.book_file {
            validate_document("book_file", book_file)?;
        }
        Ok(())
    }

    pub fn parsed_date(&self) -> Result<NaiveDate, CreateBookError> {
        NaiveDate::parse_from_str(self.published_at.trim(), "%Y-%m-%d")
            .map_err(|_| CreateBookError::InvalidDate)
    }

    pub fn parsed_status(&self) -> Result<Option<BookStatus>, CreateBookError> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<BookStatus>())
            .transpose()
            .map_err(CreateBookError::from)
    }

    pub fn parsed_author_id(&self) -> Result<Option<Uuid>, CreateBookError> {
        self.author_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| CreateBookError::InvalidAuthorId)
    }

    /// Storage base name derived from the trimmed title.
    pub fn slug(&self) -> String {
        slugify(self.title.trim())
    }
}

/// Handler function for creating books
#[tracing::instrument(skip(pool, storage, command), fields(title = %command.title))]
pub async fn handle<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    command: CreateBookCommand,
) -> Result<BookRecord, CreateBookError> {
    command.validate()?;

    let title = command.title.trim().to_string();
    let published_at = command.parsed_date()?;
    let requested_status = command.parsed_status()?;
    let author_id = command.parsed_author_id()?;

    // Uniqueness and author existence are checked before any blob leaves
    // the request. The DB constraints stay as a safety net below.
    let title_taken: bool = sqlx::query_scalar(
        r#"SELECT EXISTS (SELECT 1 FROM books WHERE lower(title) = lower($1))"#,
    )
    .bind(&title)
    .fetch_one(&pool)
    .await?;
    if title_taken {
        return Err(CreateBookError::DuplicateTitle(title));
    }

    if let Some(author_id) = author_id {
        let author_exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM authors WHERE id = $1)"#)
                .bind(author_id)
                .fetch_one(&pool)
                .await?;
        if !author_exists {
            return Err(CreateBookError::AuthorNotFound(author_id));
        }
    }

    let slug = command.slug();

    let cover_ext = command
        .cover_image
        .extension()
        .unwrap_or_else(|| "jpg".to_string());
    let cover_key = Storage::object_key(COVERS_NAMESPACE, &slug, &cover_ext);
    let cover_url = storage
        .store(
            &cover_key,
            command.cover_image.bytes.clone(),
            command.cover_image.content_type.clone(),
        )
        .await?;

    let mut uploaded = vec![cover_url.clone()];

    let book_url = match command.book_file {
        Some(ref book_file) => {
            let ext = book_file.extension().unwrap_or_else(|| "pdf".to_string());
            let key = Storage::object_key(BOOKS_NAMESPACE, &slug, &ext);
            match storage
                .store(&key, book_file.bytes.clone(), book_file.content_type.clone())
                .await
            {
                Ok(url) => {
                    uploaded.push(url.clone());
                    Some(url)
                }
                Err(err) => {
                    compensate(storage, &uploaded).await;
                    return Err(CreateBookError::Storage(err));
                }
            }
        }
        None => None,
    };

    let status = resolve_create(book_url.is_some(), requested_status);

    let inserted = sqlx::query_as::<_, BookRecord>(
        r#"
        INSERT INTO books (title, description, published_at, cover_image,
                           book_file, status, author_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, description, published_at, cover_image, book_file,
                  status, author_id, created_at, updated_at
        "#,
    )
    .bind(&title)
    .bind(command.description.trim())
    .bind(published_at)
    .bind(&cover_url)
    .bind(&book_url)
    .bind(status.as_str())
    .bind(author_id)
    .fetch_one(&pool)
    .await;

    match inserted {
        Ok(book) => {
            tracing::info!(book_id = %book.id, status = %book.status, "Book created");
            Ok(book)
        }
        Err(e) => {
            compensate(storage, &uploaded).await;
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return Err(CreateBookError::DuplicateTitle(title));
                }
            }
            Err(CreateBookError::Database(e))
        }
    }
}

/// Delete every blob uploaded during a failed create. Best effort.
async fn compensate<S: BlobStore>(storage: &S, uploaded: &[String]) {
    for url in uploaded {
        if let Err(err) = storage.delete_url(url).await {
            tracing::warn!(error = %err, url = %url, "Failed to remove blob after create failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cover() -> UploadedFile {
        UploadedFile {
            file_name: "cover.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0u8; 64],
        }
    }

    fn manuscript() -> UploadedFile {
        UploadedFile {
            file_name: "dune.epub".to_string(),
            content_type: Some("application/epub+zip".to_string()),
            bytes: vec![0u8; 1024],
        }
    }

    fn valid_command() -> CreateBookCommand {
        CreateBookCommand {
            title: "Dune".to_string(),
            description: "Desert planet epic.".to_string(),
            published_at: "1965-08-01".to_string(),
            status: Some("Completed".to_string()),
            author_id: None,
            cover_image: cover(),
            book_file: Some(manuscript()),
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(valid_command().validate().is_ok());
    }

    #[test]
    fn test_slug_from_title() {
        assert_eq!(valid_command().slug(), "dune");
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut command = valid_command();
        command.published_at = "01/08/1965".to_string();
        assert!(matches!(
            command.validate(),
            Err(CreateBookError::InvalidDate)
        ));
    }

    #[test]
    fn test_bad_status_rejected() {
        let mut command = valid_command();
        command.status = Some("Published".to_string());
        assert!(matches!(
            command.validate(),
            Err(CreateBookError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_bad_author_id_rejected() {
        let mut command = valid_command();
        command.author_id = Some("not-a-uuid".to_string());
        assert!(matches!(
            command.validate(),
            Err(CreateBookError::InvalidAuthorId)
        ));
    }

    #[test]
    fn test_wrong_book_file_type_rejected() {
        let mut command = valid_command();
        command.book_file = Some(UploadedFile {
            file_name: "dune.exe".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            bytes: vec![0u8; 10],
        });
        assert!(matches!(
            command.validate(),
            Err(CreateBookError::FileValidation(
                FileValidationError::UnsupportedDocumentType { .. }
            ))
        ));
    }

    #[test]
    fn test_from_form_requires_cover() {
        let form = MultipartForm::from_parts(vec![("title", "Dune")], vec![]);
        assert!(matches!(
            CreateBookCommand::from_form(form),
            Err(CreateBookError::FileValidation(
                FileValidationError::Missing { field: "cover_image" }
            ))
        ));
    }
}
