//! Search query
//!
//! Case-insensitive substring match (`ILIKE`) of one term against book
//! titles and author first/last names. Both result sets are always present
//! in the response, empty or not. Validation happens before any DB access.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::authors::types::AuthorRecord;
use crate::features::books::types::BookRecord;

pub const MAX_QUERY_LENGTH: usize = 255;

/// Query parameters for `GET /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub books: Vec<BookRecord>,
    pub authors: Vec<AuthorRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("query is required")]
    QueryRequired,

    #[error("query must be at most {MAX_QUERY_LENGTH} characters")]
    QueryTooLong,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(), SearchError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SearchError::QueryRequired);
        }
        if query.chars().count() > MAX_QUERY_LENGTH {
            return Err(SearchError::QueryTooLong);
        }
        Ok(())
    }
}

/// Handler function for search
#[tracing::instrument(skip(pool, query), fields(term = %query.query))]
pub async fn handle(pool: PgPool, query: SearchQuery) -> Result<SearchResponse, SearchError> {
    query.validate()?;

    let pattern = format!("%{}%", query.query.trim());

    let books = sqlx::query_as::<_, BookRecord>(
        r#"
        SELECT id, title, description, published_at, cover_image, book_file,
               status, author_id, created_at, updated_at
        FROM books
        WHERE title ILIKE $1
        ORDER BY title
        "#,
    )
    .bind(&pattern)
    .fetch_all(&pool)
    .await?;

    let authors = sqlx::query_as::<_, AuthorRecord>(
        r#"
        SELECT id, first_name, last_name, slug, biography, profile_image,
               created_at, updated_at
        FROM authors
        WHERE first_name ILIKE $1 OR last_name ILIKE $1
        ORDER BY last_name, first_name
        "#,
    )
    .bind(&pattern)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(
        books = books.len(),
        authors = authors.len(),
        "Search completed"
    );

    Ok(SearchResponse { books, authors })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_query() {
        let query = SearchQuery {
            query: "John".to_string(),
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_empty_query_rejected() {
        let query = SearchQuery {
            query: "  ".to_string(),
        };
        assert!(matches!(query.validate(), Err(SearchError::QueryRequired)));
    }

    #[test]
    fn test_overlong_query_rejected() {
        let query = SearchQuery {
            query: "x".repeat(MAX_QUERY_LENGTH + 1),
        };
        assert!(matches!(query.validate(), Err(SearchError::QueryTooLong)));
    }
}
