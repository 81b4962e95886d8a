use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use worksphere_auth::{AccessError, ErrorCode, TokenValidationError};
use worksphere_core::DomainError;
use worksphere_infra::ServiceError;

/// Every handler failure. Rendered as `{"error": {"code", "message"}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("token signing failed: {0}")]
    TokenSigning(TokenValidationError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Service(AccessError::BadRequest(message.into()).into())
    }

    pub fn not_found(kind: &'static str) -> Self {
        Self::Service(AccessError::NotFound(kind).into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Service(e) => e.code(),
            ApiError::TokenSigning(_) => ErrorCode::Internal,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            ApiError::Service(e) => e.public_message(),
            ApiError::TokenSigning(_) => "internal server error".to_string(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        Self::Service(value.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::Service(value.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        if code == ErrorCode::Internal {
            tracing::error!(error = %self, "request failed");
        }
        let status = StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        json_error(status, code.as_str(), self.public_message())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": {
                "code": code,
                "message": message.into(),
            }
        })),
    )
        .into_response()
}
