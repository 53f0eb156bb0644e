//! List books query

use serde::Deserialize;
use sqlx::PgPool;

use crate::features::books::types::BookRecord;
use crate::features::shared::pagination::{Paginated, PaginationParams};

/// Query parameters for `GET /books`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListBooksQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListBooksQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.page_size)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListBooksError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for listing books, newest first
#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    query: ListBooksQuery,
) -> Result<Paginated<BookRecord>, ListBooksError> {
    let pagination = query.pagination();

    let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM books"#)
        .fetch_one(&pool)
        .await?;

    let items = sqlx::query_as::<_, BookRecord>(
        r#"
        SELECT id, title, description, published_at, cover_image, book_file,
               status, author_id, created_at, updated_at
        FROM books
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}
