use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        field_map::{profile_patch, LOGIN_FIELD},
        handlers::{
            bearer_token,
            types::{MessageResponse, ProfileResponse},
        },
    },
    provider::{Provider, UpstreamError},
};
use axum::{extract::Extension, http::HeaderMap, http::StatusCode, Json};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

const MISSING_TOKEN: &str = "Authorization header missing or malformed";
const INVALID_TOKEN: &str = "Invalid or expired token";

#[utoipa::path(
    get,
    path= "/auth/profile",
    responses (
        (status = 200, description = "Profile claims for the bearer token", body = ProfileResponse, content_type = "application/json"),
        (status = 401, description = "Missing, malformed or rejected bearer token", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag= "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn get_profile(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthorized(MISSING_TOKEN))?;

    let profile = provider.userinfo(token).await.map_err(|e| {
        debug!("userinfo failed: {}", e);

        ApiError::Unauthorized(INVALID_TOKEN)
    })?;

    Ok((
        StatusCode::OK,
        Json(ProfileResponse {
            success: true,
            message: "Profile retrieved successfully".to_string(),
            profile,
        }),
    ))
}

#[utoipa::path(
    put,
    path= "/auth/profile",
    request_body(content = Object, description = "Any subset of the allowed profile fields, plus optional `login`"),
    responses (
        (status = 200, description = "Profile updated", body = MessageResponse, content_type = "application/json"),
        (status = 400, description = "No recognized fields or provider validation error", body = ErrorResponse),
        (status = 401, description = "Missing, malformed or rejected bearer token", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag= "auth"
)]
#[instrument(skip(provider, headers, payload))]
pub async fn update_profile(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
    payload: Option<Json<Map<String, Value>>>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthorized(MISSING_TOKEN))?;

    let body = payload.map(|Json(body)| body).unwrap_or_default();

    if body.contains_key(LOGIN_FIELD) {
        if provider.login_passthrough() {
            // the provider does not re-verify a changed login
            warn!("forwarding login change without verification");
        } else {
            warn!("dropping login change, passthrough disabled");
        }
    }

    let patch = profile_patch(&body, provider.login_passthrough());
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No valid profile fields provided"));
    }

    // resolve the subject first, the patch is never sent for a rejected token
    let claims = provider.userinfo(token).await.map_err(|e| {
        debug!("userinfo failed: {}", e);

        ApiError::Unauthorized(INVALID_TOKEN)
    })?;

    let Some(user_id) = claims.get("sub").and_then(Value::as_str) else {
        error!("userinfo response has no subject");

        return Err(ApiError::Internal("Failed to update profile"));
    };

    debug!("updating {} profile fields for {}", patch.len(), user_id);

    match provider.update_profile(user_id, &patch).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(MessageResponse::ok("Profile updated successfully")),
        )),

        Err(UpstreamError::Recognized {
            summary, causes, ..
        }) => Err(ApiError::Validation { summary, causes }),

        Err(e) => {
            error!("Error updating profile: {} (status {:?})", e, e.status());

            Err(ApiError::Internal("Failed to update profile"))
        }
    }
}
