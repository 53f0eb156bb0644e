//! Get author query
//!
//! Returns the author plus every book attributed to them.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::authors::types::{AuthorBookSummary, AuthorRecord};

#[derive(Debug, Clone, Serialize)]
pub struct GetAuthorResponse {
    #[serde(flatten)]
    pub author: AuthorRecord,
    pub books: Vec<AuthorBookSummary>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAuthorError {
    #[error("Author '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for fetching a single author
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, id: Uuid) -> Result<GetAuthorResponse, GetAuthorError> {
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
    .ok_or(GetAuthorError::NotFound(id))?;

    let books = sqlx::query_as::<_, AuthorBookSummary>(
        r#"
        SELECT id, title, status, published_at, cover_image, book_file
        FROM books
        WHERE author_id = $1
        ORDER BY published_at DESC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(GetAuthorResponse { author, books })
}
