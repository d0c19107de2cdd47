//! The JSON envelope every endpoint responds with.
//!
//! ```json
//! { "success": true, "message": "...", "data": {...}, "meta": {...} }
//! { "success": false, "message": "...", "error": "not_found" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use bazaar_core::PageMeta;

/// Envelope body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// A successful response: status code plus envelope.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            body: Envelope {
                success: true,
                message: message.into(),
                data,
                meta: None,
                error: None,
            },
        }
    }

    /// 200 with data.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::OK, message, Some(data))
    }

    /// 201 with data.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(StatusCode::CREATED, message, Some(data))
    }

    /// 200 with one page of data and its metadata.
    pub fn paginated(message: impl Into<String>, data: T, meta: PageMeta) -> Self {
        let mut response = Self::success(StatusCode::OK, message, Some(data));
        response.body.meta = Some(meta);
        response
    }
}

impl ApiResponse<()> {
    /// 200 with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Machine-readable code for an error status.
#[must_use]
pub const fn error_code(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "bad_request",
        401 => "unauthorized",
        403 => "forbidden",
        404 => "not_found",
        408 => "request_timeout",
        429 => "too_many_requests",
        503 => "service_unavailable",
        _ => "internal_error",
    }
}

/// Render an error envelope.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body: Envelope<()> = Envelope {
        success: false,
        message: message.into(),
        data: None,
        meta: None,
        error: Some(error_code(status)),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::Pagination;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ok_envelope() {
        let response = ApiResponse::ok("Category retrieved successfully", json!({"id": 1}))
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": true,
                "message": "Category retrieved successfully",
                "data": {"id": 1}
            })
        );
    }

    #[tokio::test]
    async fn test_paginated_envelope_carries_meta() {
        let meta = Pagination::new(2, 10).meta(25);
        let response = ApiResponse::paginated("Products retrieved successfully", vec![1, 2], meta)
            .into_response();
        let body = body_json(response).await;
        assert_eq!(
            body["meta"],
            json!({"page": 2, "limit": 10, "total": 25, "total_pages": 3})
        );
    }

    #[tokio::test]
    async fn test_created_and_message() {
        let created = ApiResponse::created("User registered successfully", 1).into_response();
        assert_eq!(created.status(), StatusCode::CREATED);

        let body = body_json(ApiResponse::message("Cart cleared").into_response()).await;
        assert_eq!(body, json!({"success": true, "message": "Cart cleared"}));
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = error_response(StatusCode::NOT_FOUND, "product not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "message": "product not found", "error": "not_found"})
        );
    }
}
