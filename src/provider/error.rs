//! Decoding of identity provider error responses.
//!
//! Every failed provider call is classified exactly once, here, so handlers
//! only have to pick a status code per variant.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Structured error: a summary plus the provider's list of causes, possibly empty.
    #[error("{summary}")]
    Recognized {
        status: StatusCode,
        summary: String,
        causes: Vec<Value>,
    },

    /// Any other non-success response.
    #[error("provider returned {0}")]
    Unrecognized(StatusCode),

    /// The request never produced a usable response (connect, timeout, body decode).
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A success response missing data the gateway depends on.
    #[error("unexpected provider response: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_summary: Option<String>,
    error_causes: Option<Vec<Value>>,
}

impl UpstreamError {
    /// Classify a non-success status and its raw body.
    #[must_use]
    pub fn decode(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody {
                error_summary: Some(summary),
                error_causes: Some(causes),
            }) => Self::Recognized {
                status,
                summary,
                causes,
            },
            _ => Self::Unrecognized(status),
        }
    }

    /// Consume a failed response and classify it.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        match response.bytes().await {
            Ok(body) => {
                debug!("provider error {}: {}", status, String::from_utf8_lossy(&body));
                Self::decode(status, &body)
            }
            Err(_) => Self::Unrecognized(status),
        }
    }

    /// Status reported by the provider, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Recognized { status, .. } | Self::Unrecognized(status) => Some(*status),
            Self::Request(err) => err.status(),
            Self::Malformed(_) => None,
        }
    }
}
