use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::Result as StoreResult;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// API error that converts to a proper HTTP response
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// A rendered HTML document plus its status and crawl-control signal.
pub struct HtmlPage {
    pub status: StatusCode,
    pub body: String,
    /// Emits `X-Robots-Tag: noai, noimageai` when set.
    pub no_ai_training: bool,
}

impl HtmlPage {
    #[must_use]
    pub fn ok(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            no_ai_training: false,
        }
    }

    #[must_use]
    pub fn not_found(body: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body,
            no_ai_training: false,
        }
    }

    #[must_use]
    pub fn with_no_ai_training(mut self, flag: bool) -> Self {
        self.no_ai_training = flag;
        self
    }
}

impl IntoResponse for HtmlPage {
    fn into_response(self) -> Response {
        let mut response = (self.status, axum::response::Html(self.body)).into_response();
        if self.no_ai_training {
            response.headers_mut().insert(
                "X-Robots-Tag",
                HeaderValue::from_static("noai, noimageai"),
            );
        }
        response
    }
}

/// A site bundle asset (css or js) served with its content type.
pub struct Asset {
    pub content_type: &'static str,
    pub body: String,
}

impl IntoResponse for Asset {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Extension trait for converting store results to API errors with a custom message.
pub trait StoreResultExt<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            ApiError::internal(message)
        })
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(message))
    }
}
