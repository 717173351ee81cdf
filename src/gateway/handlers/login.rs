use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        handlers::types::{present, LoginRequest, LoginResponse},
    },
    provider::Provider,
};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, instrument};

#[utoipa::path(
    post,
    path= "/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn login(
    provider: Extension<Arc<Provider>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let (Some(username), Some(password)) = (
        present(request.username.as_ref()),
        present(request.password.as_ref()),
    ) else {
        return Err(ApiError::BadRequest("Username and password are required"));
    };

    // every provider failure gets the same answer, so callers cannot tell
    // an unknown user from a wrong password
    let tokens = provider
        .password_grant(username, password)
        .await
        .map_err(|e| {
            debug!("login failed: {}", e);

            ApiError::Unauthorized("Authentication failed")
        })?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token: tokens.access_token,
            id_token: tokens.id_token,
            expires_in: tokens.expires_in,
        }),
    ))
}
