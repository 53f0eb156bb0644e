//! API response envelope
//!
//! Every success is `{"data": <payload>}` and every failure is
//! `{"message": <string>}`; list endpoints additionally carry pagination
//! metadata next to the data.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in the success envelope
    pub fn success(data: T) -> Self {
        Self { data, meta: None }
    }

    /// Wrap a payload with metadata (pagination, counts)
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Standard error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let body = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(body, serde_json::json!({"data": "ok"}));
    }

    #[test]
    fn test_success_with_meta_shape() {
        let body = serde_json::to_value(ApiResponse::success_with_meta(
            vec![1, 2],
            serde_json::json!({"total": 2}),
        ))
        .unwrap();
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert_eq!(body["meta"]["total"], 2);
    }

    #[test]
    fn test_error_shape() {
        let body = serde_json::to_value(ErrorResponse::new("nope")).unwrap();
        assert_eq!(body, serde_json::json!({"message": "nope"}));
    }
}
