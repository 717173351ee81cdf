//! Handler errors and their JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or blank caller input; no provider call was made.
    #[error("{0}")]
    BadRequest(&'static str),

    /// Missing or rejected bearer token, or rejected credentials.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Provider validation error passed through to the caller, causes untouched.
    #[error("{summary}")]
    Validation { summary: String, causes: Vec<Value> },

    /// Provider failure collapsed to a generic message.
    #[error("{0}")]
    Internal(&'static str),
}

/// Failure body: `success` is always `false`.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub errors: Option<Vec<Value>>,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation { summary, causes } => ErrorResponse {
                success: false,
                message: summary,
                errors: Some(causes),
            },
            other => ErrorResponse {
                success: false,
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
