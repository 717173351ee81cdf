use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        handlers::types::{present, MessageResponse, ResetPasswordRequest},
    },
    provider::Provider,
};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses (
        (status = 200, description = "Reset email requested", body = MessageResponse, content_type = "application/json"),
        (status = 400, description = "Missing email or the reset could not be started", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn reset_password(
    provider: Extension<Arc<Provider>>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let Some(email) = present(request.email.as_ref()) else {
        return Err(ApiError::BadRequest("Email is required"));
    };

    // unknown accounts and provider errors look the same to the caller
    provider.reset_password(email).await.map_err(|e| {
        debug!("reset password failed: {}", e);

        ApiError::BadRequest("Unable to process password reset request")
    })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Password reset email sent")),
    ))
}
