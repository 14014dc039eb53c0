//! API Response types
//!
//! Every route answers with the same envelope:
//! ```json
//! {
//!     "statusCode": 200,
//!     "message": ["Enrollment created"],
//!     "data": { ... },
//!     "pagination": { "page": 1, "limit": 10, "total": 3, "totalPages": 1 }
//! }
//! ```
//! `message`, `error` and `pagination` are omitted when absent. Error
//! responses carry `"data": null`.

use crate::error::AppError;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Unified API response structure
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Mirrors the HTTP status of the response
    pub status_code: u16,
    /// Informational messages (success responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<String>>,
    /// Error message (error responses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response payload, `null` on errors
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// 200 with data
    pub fn success(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    /// 201 with data
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    /// Success response with an explicit status code
    pub fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: None,
            error: None,
            data: Some(data),
            pagination: None,
        }
    }

    /// Attach an informational message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message
            .get_or_insert_with(Vec::new)
            .push(message.into());
        self
    }

    /// Error envelope for an [`AppError`]
    pub fn error(err: &AppError) -> Self {
        Self {
            status_code: err.http_status().as_u16(),
            message: None,
            error: Some(err.message.clone()),
            data: None,
            pagination: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status_code)
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

/// Pagination metadata
///
/// Part of the envelope's wire shape for clients. The server's listing routes
/// return whole result sets and never set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}
