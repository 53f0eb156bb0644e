//! Delete author command
//!
//! The avatar blob is removed first, leniently: a storage failure is
//! logged and record deletion proceeds, so a wedged blob store cannot
//! strand database rows. Books keep their rows; the FK sets their
//! `author_id` to NULL.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::types::AuthorRecord;
use crate::storage::BlobStore;

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAuthorResponse {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAuthorError {
    #[error("Author '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for deleting authors
#[tracing::instrument(skip(pool, storage))]
pub async fn handle<S: BlobStore>(
    pool: PgPool,
    storage: &S,
    id: Uuid,
) -> Result<DeleteAuthorResponse, DeleteAuthorError> {
    let existing = sqlx::query_as::<_, AuthorRecord>(
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
    .ok_or(DeleteAuthorError::NotFound(id))?;

    if let Some(ref url) = existing.profile_image {
        if let Err(err) = storage.delete_url(url).await {
            tracing::warn!(error = %err, url = %url, "Failed to delete avatar blob");
        }
    }

    sqlx::query(r#"DELETE FROM authors WHERE id = $1"#)
        .bind(id)
        .execute(&pool)
        .await?;

    tracing::info!(slug = %existing.slug, "Author deleted");

    Ok(DeleteAuthorResponse {
        id: existing.id,
        slug: existing.slug,
    })
}
