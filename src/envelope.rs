use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// ApiResponse
///
/// Wrapper for successful API responses that applies the uniform
/// `{success: true, data}` envelope. List endpoints additionally carry
/// `count`/`total`/`page`/`pages`, and destructive endpoints a human-readable
/// `message`, matching the wire contract of every endpoint in the API.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub message: Option<String>,
    pub count: Option<usize>,
    pub total: Option<i64>,
    pub page: Option<i64>,
    pub pages: Option<i64>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status.
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            message: None,
            count: None,
            total: None,
            page: None,
            pages: None,
        }
    }

    /// Create a 201 Created response.
    pub fn created(data: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(data)
        }
    }

    /// Attach the `message` field (used by delete endpoints alongside `data: {}`).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the `count` field (unpaginated list endpoints).
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attach the full pagination block: `count`, `total`, `page`, `pages`.
    pub fn with_pagination(mut self, count: usize, total: i64, page: i64, pages: i64) -> Self {
        self.count = Some(count);
        self.total = Some(total);
        self.page = Some(page);
        self.pages = Some(pages);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data up front so serialization failures surface as a proper
        // error envelope instead of a broken body.
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Server error",
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value,
        });

        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }
        if let Some(count) = self.count {
            envelope["count"] = json!(count);
        }
        if let Some(total) = self.total {
            envelope["total"] = json!(total);
        }
        if let Some(page) = self.page {
            envelope["page"] = json!(page);
        }
        if let Some(pages) = self.pages {
            envelope["pages"] = json!(pages);
        }

        (status, Json(envelope)).into_response()
    }
}

/// The result type every handler returns: a success envelope or an ApiError
/// rendered as the `{success:false, message}` envelope.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
