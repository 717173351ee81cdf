use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        handlers::types::{present, LogoutRequest, MessageResponse},
    },
    provider::Provider,
};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, instrument};

#[utoipa::path(
    post,
    path= "/auth/logout",
    request_body = LogoutRequest,
    responses (
        (status = 200, description = "Token revoked", body = MessageResponse, content_type = "application/json"),
        (status = 400, description = "Missing token", body = ErrorResponse),
        (status = 500, description = "Revocation failed", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn logout(
    provider: Extension<Arc<Provider>>,
    payload: Option<Json<LogoutRequest>>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let Some(token) = present(request.token.as_ref()) else {
        return Err(ApiError::BadRequest("Token is required"));
    };

    provider.revoke(token).await.map_err(|e| {
        error!("Error revoking token: {}", e);

        ApiError::Internal("Failed to revoke token")
    })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::ok("Logged out successfully")),
    ))
}
