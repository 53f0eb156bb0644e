//! Author row types shared by commands and queries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A full author row, as returned by every author endpoint
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub slug: String,
    pub biography: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book fields embedded in `GET /authors/:id`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorBookSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub published_at: NaiveDate,
    pub cover_image: Option<String>,
    pub book_file: Option<String>,
}
