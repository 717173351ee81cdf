use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        handlers::types::AuthorizeUrlResponse,
    },
    provider::Provider,
};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{error, instrument};
use ulid::Ulid;

#[utoipa::path(
    get,
    path= "/auth/authorize-url",
    responses (
        (status = 200, description = "Provider authorization URL for the code flow", body = AuthorizeUrlResponse, content_type = "application/json"),
        (status = 500, description = "Authorization URL could not be built", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(provider))]
pub async fn authorize_url(
    provider: Extension<Arc<Provider>>,
) -> Result<(StatusCode, Json<AuthorizeUrlResponse>), ApiError> {
    // the caller keeps `state` and compares it on the redirect back
    let state = Ulid::new().to_string();

    let url = provider.authorize_url(&state).map_err(|e| {
        error!("Error building authorize URL: {}", e);

        ApiError::Internal("Failed to build authorization URL")
    })?;

    Ok((
        StatusCode::OK,
        Json(AuthorizeUrlResponse {
            success: true,
            message: "Authorization URL created".to_string(),
            url: url.to_string(),
            state,
        }),
    ))
}
