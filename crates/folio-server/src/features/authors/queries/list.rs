//! List authors query

use serde::Deserialize;
use sqlx::PgPool;

use crate::features::authors::types::AuthorRecord;
use crate::features::shared::pagination::{Paginated, PaginationParams};

/// Query parameters for `GET /authors`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListAuthorsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListAuthorsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.page_size)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListAuthorsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for listing authors, newest first
#[tracing::instrument(skip(pool, query))]
pub async fn handle(
    pool: PgPool,
    query: ListAuthorsQuery,
) -> Result<Paginated<AuthorRecord>, ListAuthorsError> {
    let pagination = query.pagination();

    let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM authors"#)
        .fetch_one(&pool)
        .await?;

    let items = sqlx::query_as::<_, AuthorRecord>(
        r#"
        SELECT id, first_name, last_name, slug, biography, profile_image,
               created_at, updated_at
        FROM authors
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
