//! Author API routes
//!
//! - `POST /authors` - Create an author (multipart, avatar required)
//! - `GET /authors` - List authors with pagination
//! - `GET /authors/:id` - Get one author with their books
//! - `PUT /authors/:id` - Patch an author (JSON)
//! - `DELETE /authors/:id` - Delete an author and their avatar blob

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::upload::MultipartForm;
use crate::features::FeatureState;

use super::commands::{
    create, delete, update, CreateAuthorCommand, CreateAuthorError, DeleteAuthorError,
    UpdateAuthorCommand, UpdateAuthorError,
};
use super::queries::{get as get_query, list, GetAuthorError, ListAuthorsError, ListAuthorsQuery};

pub fn authors_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/:id",
            get(get_author).put(update_author).delete(delete_author),
        )
}

#[tracing::instrument(skip(state, multipart))]
async fn create_author(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Result<Response, AuthorApiError> {
    let form = MultipartForm::read(multipart)
        .await
        .map_err(|_| AuthorApiError::Multipart)?;
    let command = CreateAuthorCommand::from_form(form)?;

    let response = create::handle(state.db, &state.storage, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(author_id = %id))]
async fn update_author(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateAuthorCommand>,
) -> Result<Response, AuthorApiError> {
    command.id = id;

    let response = update::handle(state.db, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(author_id = %id))]
async fn delete_author(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AuthorApiError> {
    let response = delete::handle(state.db, &state.storage, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(author_id = %id))]
async fn get_author(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AuthorApiError> {
    let response = get_query::handle(state.db, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, query))]
async fn list_authors(
    State(state): State<FeatureState>,
    Query(query): Query<ListAuthorsQuery>,
) -> Result<Response, AuthorApiError> {
    let response = list::handle(state.db, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(response.items, meta)),
    )
        .into_response())
}

/// Unified error type for author endpoints
#[derive(Debug)]
enum AuthorApiError {
    /// The multipart payload could not be read at all.
    Multipart,
    Create(CreateAuthorError),
    Update(UpdateAuthorError),
    Delete(DeleteAuthorError),
    Get(GetAuthorError),
    List(ListAuthorsError),
}

impl From<CreateAuthorError> for AuthorApiError {
    fn from(err: CreateAuthorError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateAuthorError> for AuthorApiError {
    fn from(err: UpdateAuthorError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteAuthorError> for AuthorApiError {
    fn from(err: DeleteAuthorError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetAuthorError> for AuthorApiError {
    fn from(err: GetAuthorError) -> Self {
        Self::Get(err)
    }
}

impl From<ListAuthorsError> for AuthorApiError {
    fn from(err: ListAuthorsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for AuthorApiError {
    fn into_response(self) -> Response {
        match self {
            AuthorApiError::Multipart => {
                error_response(StatusCode::BAD_REQUEST, "Invalid multipart payload")
            }

            AuthorApiError::Create(
                err @ (CreateAuthorError::FieldValidation(_)
                | CreateAuthorError::FileValidation(_)
                | CreateAuthorError::DuplicateSlug(_)),
            ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            AuthorApiError::Create(CreateAuthorError::Storage(err)) => {
                tracing::error!(error = %err, "Storage error during author create");
                error_response(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
            }
            AuthorApiError::Create(CreateAuthorError::Database(err)) => {
                tracing::error!(error = %err, "Database error during author create");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            AuthorApiError::Update(
                err @ (UpdateAuthorError::FieldValidation(_) | UpdateAuthorError::DuplicateSlug(_)),
            ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            AuthorApiError::Update(err @ UpdateAuthorError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            AuthorApiError::Update(UpdateAuthorError::Database(err)) => {
                tracing::error!(error = %err, "Database error during author update");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            AuthorApiError::Delete(err @ DeleteAuthorError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            AuthorApiError::Delete(DeleteAuthorError::Database(err)) => {
                tracing::error!(error = %err, "Database error during author delete");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            AuthorApiError::Get(err @ GetAuthorError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            AuthorApiError::Get(GetAuthorError::Database(err)) => {
                tracing::error!(error = %err, "Database error during author get");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            AuthorApiError::List(ListAuthorsError::Database(err)) => {
                tracing::error!(error = %err, "Database error during author list");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
