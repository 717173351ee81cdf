use crate::{
    gateway::{
        error::{ApiError, ErrorResponse},
        handlers::types::{present, SignupRequest, SignupResponse},
    },
    provider::{NewUser, Provider, UpstreamError},
};
use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[utoipa::path(
    post,
    path= "/auth/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "User created and activated", body = SignupResponse, content_type = "application/json"),
        (status = 400, description = "Missing fields or provider validation error", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn signup(
    provider: Extension<Arc<Provider>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    debug!("signup: {:?}", request);

    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        present(request.first_name.as_ref()),
        present(request.last_name.as_ref()),
        present(request.email.as_ref()),
        present(request.password.as_ref()),
    ) else {
        return Err(ApiError::BadRequest(
            "First name, last name, email, and password are required",
        ));
    };

    let user = NewUser {
        first_name,
        last_name,
        email,
        password,
    };

    match provider.create_user(&user).await {
        Ok(user_id) => {
            debug!("user created: {}", user_id);

            Ok((
                StatusCode::CREATED,
                Json(SignupResponse {
                    success: true,
                    message: "User created successfully".to_string(),
                    user_id,
                }),
            ))
        }

        Err(UpstreamError::Recognized {
            summary, causes, ..
        }) => {
            debug!("signup rejected by provider: {}", summary);

            Err(ApiError::Validation { summary, causes })
        }

        Err(e) => {
            error!("Error creating user: {} (status {:?})", e, e.status());

            Err(ApiError::Internal("Failed to create user"))
        }
    }
}
