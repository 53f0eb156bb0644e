//! Media API routes
//!
//! - `POST /upload` - Replace an author avatar or book media (multipart)

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::upload::MultipartForm;
use crate::features::FeatureState;

use super::commands::{replace, ReplaceMediaCommand, ReplaceMediaError};

pub fn media_routes() -> Router<FeatureState> {
    Router::new().route("/upload", post(replace_media))
}

#[tracing::instrument(skip(state, multipart))]
async fn replace_media(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Result<Response, MediaApiError> {
    let form = MultipartForm::read(multipart)
        .await
        .map_err(|_| MediaApiError::Multipart)?;
    let command = ReplaceMediaCommand::from_form(form);

    let response = replace::handle(state.db, &state.storage, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for the upload endpoint
#[derive(Debug)]
enum MediaApiError {
    /// The multipart payload could not be read at all.
    Multipart,
    Replace(ReplaceMediaError),
}

impl From<ReplaceMediaError> for MediaApiError {
    fn from(err: ReplaceMediaError) -> Self {
        Self::Replace(err)
    }
}

impl IntoResponse for MediaApiError {
    fn into_response(self) -> Response {
        match self {
            MediaApiError::Multipart => {
                error_response(StatusCode::BAD_REQUEST, "Invalid multipart payload")
            }

            MediaApiError::Replace(
                err @ (ReplaceMediaError::InvalidGroup
                | ReplaceMediaError::InvalidId
                | ReplaceMediaError::FileRequired
                | ReplaceMediaError::ImageRequiredForAuthor
                | ReplaceMediaError::FileValidation(_)),
            ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            MediaApiError::Replace(
                err @ (ReplaceMediaError::AuthorNotFound(_) | ReplaceMediaError::BookNotFound(_)),
            ) => error_response(StatusCode::NOT_FOUND, err.to_string()),
            MediaApiError::Replace(ReplaceMediaError::Storage(err)) => {
                tracing::error!(error = %err, "Storage error during media replacement");
                error_response(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
            }
            MediaApiError::Replace(ReplaceMediaError::Database(err)) => {
                tracing::error!(error = %err, "Database error during media replacement");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
