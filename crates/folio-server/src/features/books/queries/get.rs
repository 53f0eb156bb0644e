//! Get book query
//!
//! Returns the book plus its author, when it still has one.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::books::types::{BookAuthorSummary, BookRecord};

#[derive(Debug, Clone, Serialize)]
pub struct GetBookResponse {
    #[serde(flatten)]
    pub book: BookRecord,
    pub author: Option<BookAuthorSummary>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBookError {
    #[error("Book '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for fetching a single book
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, id: Uuid) -> Result<GetBookResponse, GetBookError> {
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
    .ok_or(GetBookError::NotFound(id))?;

    let author = match book.author_id {
        Some(author_id) => {
            sqlx::query_as::<_, BookAuthorSummary>(
                r#"
                SELECT id, first_name, last_name, slug
                FROM authors
                WHERE id = $1
                "#,
            )
            .bind(author_id)
            .fetch_optional(&pool)
            .await?
        }
        None => None,
    };

    Ok(GetBookResponse { book, author })
}
