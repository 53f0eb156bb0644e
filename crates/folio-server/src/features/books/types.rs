//! Book row types shared by commands and queries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A full book row, as returned by every book endpoint
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub published_at: NaiveDate,
    pub cover_image: Option<String>,
    pub book_file: Option<String>,
    pub status: String,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author fields embedded in `GET /books/:id`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BookAuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub slug: String,
}
