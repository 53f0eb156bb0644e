//! Book API routes
//!
//! - `POST /books` - Create a book (multipart, cover required)
//! - `GET /books` - List books with pagination
//! - `GET /books/:id` - Get one book with its author
//! - `PUT /books/:id` - Patch a book (JSON)
//! - `DELETE /books/:id` - Delete a book and its blobs

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
    create, delete, update, CreateBookCommand, CreateBookError, DeleteBookError,
    UpdateBookCommand, UpdateBookError,
};
use super::queries::{get as get_query, list, GetBookError, ListBooksError, ListBooksQuery};

pub fn books_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

#[tracing::instrument(skip(state, multipart))]
async fn create_book(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Result<Response, BookApiError> {
    let form = MultipartForm::read(multipart)
        .await
        .map_err(|_| BookApiError::Multipart)?;
    let command = CreateBookCommand::from_form(form)?;

    let response = create::handle(state.db, &state.storage, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command), fields(book_id = %id))]
async fn update_book(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateBookCommand>,
) -> Result<Response, BookApiError> {
    command.id = id;

    let response = update::handle(state.db, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(book_id = %id))]
async fn delete_book(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, BookApiError> {
    let response = delete::handle(state.db, &state.storage, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(book_id = %id))]
async fn get_book(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, BookApiError> {
    let response = get_query::handle(state.db, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, query))]
async fn list_books(
    State(state): State<FeatureState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Response, BookApiError> {
    let response = list::handle(state.db, query).await?;

    let meta = json!({ "pagination": response.pagination });
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_meta(response.items, meta)),
    )
        .into_response())
}

/// Unified error type for book endpoints
#[derive(Debug)]
enum BookApiError {
    /// The multipart payload could not be read at all.
    Multipart,
    Create(CreateBookError),
    Update(UpdateBookError),
    Delete(DeleteBookError),
    Get(GetBookError),
    List(ListBooksError),
}

impl From<CreateBookError> for BookApiError {
    fn from(err: CreateBookError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateBookError> for BookApiError {
    fn from(err: UpdateBookError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteBookError> for BookApiError {
    fn from(err: DeleteBookError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetBookError> for BookApiError {
    fn from(err: GetBookError) -> Self {
        Self::Get(err)
    }
}

impl From<ListBooksError> for BookApiError {
    fn from(err: ListBooksError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for BookApiError {
    fn into_response(self) -> Response {
        match self {
            BookApiError::Multipart => {
                error_response(StatusCode::BAD_REQUEST, "Invalid multipart payload")
            }

            BookApiError::Create(
                err @ (CreateBookError::FieldValidation(_)
                | CreateBookError::FileValidation(_)
                | CreateBookError::InvalidDate
                | CreateBookError::InvalidStatus(_)
                | CreateBookError::InvalidAuthorId
                | CreateBookError::DuplicateTitle(_)
                | CreateBookError::AuthorNotFound(_)),
            ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            BookApiError::Create(CreateBookError::Storage(err)) => {
                tracing::error!(error = %err, "Storage error during book create");
                error_response(StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
            }
            BookApiError::Create(CreateBookError::Database(err)) => {
                tracing::error!(error = %err, "Database error during book create");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            BookApiError::Update(
                err @ (UpdateBookError::FieldValidation(_)
                | UpdateBookError::InvalidDate
                | UpdateBookError::InvalidStatus(_)
                | UpdateBookError::DuplicateTitle(_)
                | UpdateBookError::AuthorNotFound(_)),
            ) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            BookApiError::Update(err @ UpdateBookError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            BookApiError::Update(UpdateBookError::Database(err)) => {
                tracing::error!(error = %err, "Database error during book update");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            BookApiError::Delete(err @ DeleteBookError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            BookApiError::Delete(DeleteBookError::Database(err)) => {
                tracing::error!(error = %err, "Database error during book delete");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            BookApiError::Get(err @ GetBookError::NotFound(_)) => {
                error_response(StatusCode::NOT_FOUND, err.to_string())
            }
            BookApiError::Get(GetBookError::Database(err)) => {
                tracing::error!(error = %err, "Database error during book get");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }

            BookApiError::List(ListBooksError::Database(err)) => {
                tracing::error!(error = %err, "Database error during book list");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
