//! Session probe query
//!
//! Backs `GET /auth`: reports whether the presented token (if any) maps to
//! a live user. Never fails for anonymous callers.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::accounts::commands::login::UserProfile;

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for the session probe
///
/// `user_id` comes from `optional_auth`; `None` means no valid token was
/// presented. A valid token for a since-deleted user also reports
/// unauthenticated.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    user_id: Option<Uuid>,
) -> Result<SessionResponse, SessionError> {
    let Some(user_id) = user_id else {
        return Ok(SessionResponse {
            authenticated: false,
            user: None,
        });
    };

    let user = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT id, name, email, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    Ok(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}
