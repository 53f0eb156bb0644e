//! Search API routes
//!
//! - `GET /search?query=` - Combined book/author search

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;

use super::queries::{search, SearchError, SearchQuery};

pub fn search_routes() -> Router<FeatureState> {
    Router::new().route("/search", get(run_search))
}

#[tracing::instrument(skip(state, query), fields(term = %query.query))]
async fn run_search(
    State(state): State<FeatureState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, SearchApiError> {
    let response = search::handle(state.db, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for the search endpoint
#[derive(Debug)]
struct SearchApiError(SearchError);

impl From<SearchError> for SearchApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        match self.0 {
            err @ (SearchError::QueryRequired | SearchError::QueryTooLong) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response(),
            SearchError::Database(err) => {
                tracing::error!(error = %err, "Database error during search");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Server error")),
                )
                    .into_response()
            }
        }
    }
}
