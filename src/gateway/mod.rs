#![allow(clippy::needless_for_each)]

use crate::{
    gateway::handlers::{
        authorize, authorize::__path_authorize_url, health, health::__path_health, login,
        login::__path_login, logout, logout::__path_logout, profile,
        profile::__path_get_profile, profile::__path_update_profile, reset_password,
        reset_password::__path_reset_password, signup, signup::__path_signup, types,
    },
    provider::Provider,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod field_map;
pub(crate) mod handlers;

/// Prefix for every caller-facing auth route.
pub const AUTH_PREFIX: &str = "/auth";

#[derive(OpenApi)]
#[openapi(
    paths(health, signup, login, get_profile, update_profile, reset_password, logout, authorize_url),
    components(schemas(
        health::Health,
        types::SignupRequest,
        types::SignupResponse,
        types::LoginRequest,
        types::LoginResponse,
        types::ProfileResponse,
        types::ResetPasswordRequest,
        types::LogoutRequest,
        types::MessageResponse,
        types::AuthorizeUrlResponse,
        error::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Signup, login, profile, password reset and logout"),
        (name = "health", description = "Gateway and identity provider status")
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router around a provider client.
pub fn router(provider: Arc<Provider>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(Any);

    let auth = Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/reset-password", post(reset_password::reset_password))
        .route("/logout", post(logout::logout))
        .route("/authorize-url", get(authorize::authorize_url));

    Router::new()
        .route("/", get(|| async { "🔑" }))
        .route("/health", get(health::health).options(health::health))
        .nest(AUTH_PREFIX, auth)
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(provider)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, provider: Arc<Provider>) -> Result<()> {
    let app = router(provider);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
mod tests;
