//! Delete book command
//!
//! Both blobs are released before the record goes, leniently: a storage
//! failure is logged and the row is still removed.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::types::BookRecord;
use crate::storage::BlobStore;

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBookResponse {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBookError {
    #[error("Book '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for deleting books
#[tracing::instrument(skip(pool, storage))]
pub async fn handle<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    id: Uuid,
) -> Result<DeleteBookResponse, DeleteBookError> {
    let existing = sqlx::query_as::<_, BookRecord>(
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
    .ok_or(DeleteBookError::NotFound(id))?;

    for url in [&existing.cover_image, &existing.book_file]
        .into_iter()
        .flatten()
    {
        if let Err(err) = storage.delete_url(url).await {
            tracing::warn!(error = %err, url = %url, "Failed to delete book blob");
        }
    }

    sqlx::query(r#"DELETE FROM books WHERE id = $1"#)
        .bind(id)
        .execute(&pool)
        .await?;

    tracing::info!(title = %existing.title, "Book deleted");

    Ok(DeleteBookResponse {
        id: existing.id,
        title: existing.title,
    })
}
