use super::*;
use crate::provider::tests::globals;
use anyhow::{bail, Result};
use axum::{
    body::to_bytes,
    http::{header::CONTENT_TYPE, StatusCode},
};
use serde_json::{json, Value};
use std::net::TcpListener as StdTcpListener;
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    StdTcpListener::bind("127.0.0.1:0").is_ok()
}

fn app(server: &MockServer) -> Result<Router> {
    let provider = Provider::new(&globals(&server.uri()))?;
    Ok(router(Arc::new(provider)))
}

fn json_request(method: Method, uri: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

fn bearer_request(method: Method, uri: &str, token: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))?)
}

async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

async fn provider_calls(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}

#[test]
fn openapi_documents_auth_routes() {
    let spec = openapi();
    for route in [
        "/auth/signup",
        "/auth/login",
        "/auth/profile",
        "/auth/reset-password",
        "/auth/logout",
        "/auth/authorize-url",
        "/health",
    ] {
        assert!(spec.paths.paths.contains_key(route), "missing {route}");
    }

    let schemes = spec
        .components
        .map(|components| components.security_schemes)
        .unwrap_or_default();
    assert!(schemes.contains_key("bearer"));
}

#[tokio::test]
async fn missing_input_never_reaches_provider() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;

    let cases = [
        (
            json_request(Method::POST, "/auth/signup", &json!({ "firstName": "Ada" }))?,
            StatusCode::BAD_REQUEST,
            "First name, last name, email, and password are required",
        ),
        (
            json_request(Method::POST, "/auth/login", &json!({ "username": "ada" }))?,
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ),
        (
            json_request(Method::GET, "/auth/profile", &json!({}))?,
            StatusCode::UNAUTHORIZED,
            "Authorization header missing or malformed",
        ),
        (
            json_request(Method::PUT, "/auth/profile", &json!({ "firstName": "Ada" }))?,
            StatusCode::UNAUTHORIZED,
            "Authorization header missing or malformed",
        ),
        (
            json_request(Method::POST, "/auth/reset-password", &json!({ "email": "  " }))?,
            StatusCode::BAD_REQUEST,
            "Email is required",
        ),
        (
            json_request(Method::POST, "/auth/logout", &json!({}))?,
            StatusCode::BAD_REQUEST,
            "Token is required",
        ),
    ];

    for (request, status, message) in cases {
        let (got_status, body) = send(app(&server)?, request).await?;
        assert_eq!(got_status, status, "{message}");
        assert_eq!(body, json!({ "success": false, "message": message }));
    }

    assert_eq!(provider_calls(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn signup_without_body_is_bad_request() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/signup")
        .body(Body::empty())?;

    let (status, body) = send(app(&server)?, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(provider_calls(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn signup_returns_provider_user_id() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(query_param("activate", "true"))
        .and(header("authorization", "SSWS api-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "00uNEW", "status": "ACTIVE" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/signup",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Secr3t!pass"
            }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "success": true, "message": "User created successfully", "userId": "00uNEW" })
    );
    Ok(())
}

#[tokio::test]
async fn signup_passes_validation_errors_through() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorCode": "E0000001",
            "errorSummary": "Api validation failed: login",
            "errorCauses": [{ "errorSummary": "login: An object with this field already exists" }]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/signup",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Secr3t!pass"
            }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Api validation failed: login"));
    assert_eq!(
        body["errors"],
        json!([{ "errorSummary": "login: An object with this field already exists" }])
    );
    Ok(())
}

#[tokio::test]
async fn signup_summary_with_empty_causes_is_bad_request() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorSummary": "Api validation failed: password",
            "errorCauses": []
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/signup",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "short"
            }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Api validation failed: password",
            "errors": []
        })
    );
    Ok(())
}

#[tokio::test]
async fn signup_unrecognized_failure_is_generic() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/signup",
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Secr3t!pass"
            }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to create user" })
    );
    Ok(())
}

#[tokio::test]
async fn login_success_returns_tokens() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/default/v1/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-123",
            "id_token": "idt-123",
            "expires_in": 3600,
            "token_type": "Bearer",
            "scope": "openid profile email"
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/login",
            &json!({ "username": "ada@example.com", "password": "Secr3t!pass" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["token"], json!("at-123"));
    assert_eq!(body["id_token"], json!("idt-123"));
    assert_eq!(body["expires_in"], json!(3600));
    Ok(())
}

#[tokio::test]
async fn login_rejections_are_indistinguishable() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    for (status, provider_body) in [
        (
            400_u16,
            json!({ "error": "invalid_grant", "error_description": "The credentials provided were invalid." }),
        ),
        (
            400,
            json!({ "errorSummary": "Api validation failed", "errorCauses": [{ "errorSummary": "username" }] }),
        ),
        (500, json!({})),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/default/v1/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(provider_body))
            .mount(&server)
            .await;

        let (got, body) = send(
            app(&server)?,
            json_request(
                Method::POST,
                "/auth/login",
                &json!({ "username": "ada@example.com", "password": "wrong" }),
            )?,
        )
        .await?;

        assert_eq!(got, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Authentication failed" })
        );
    }
    Ok(())
}

#[tokio::test]
async fn get_profile_returns_claims() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .and(header("authorization", "Bearer at-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "00u1",
            "email": "ada@example.com",
            "given_name": "Ada"
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(Method::GET, "/auth/profile", "at-123", &json!({}))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["sub"], json!("00u1"));
    assert_eq!(body["profile"]["given_name"], json!("Ada"));
    Ok(())
}

#[tokio::test]
async fn get_profile_rejected_token_is_unauthorized() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(Method::GET, "/auth/profile", "expired", &json!({}))?,
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Invalid or expired token" })
    );
    Ok(())
}

#[tokio::test]
async fn update_profile_with_only_unknown_fields_makes_no_calls() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "isAdmin": true, "status": "SUSPENDED" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "No valid profile fields provided" })
    );
    assert_eq!(provider_calls(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn update_profile_sends_only_allowed_fields() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .and(header("authorization", "Bearer at-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "00u1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .and(header("authorization", "SSWS api-token"))
        .and(body_json(json!({ "profile": { "firstName": "Grace" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "00u1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "firstName": "Grace", "isAdmin": true }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Profile updated successfully" })
    );
    Ok(())
}

#[tokio::test]
async fn update_profile_rejected_token_sends_no_patch() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "forged",
            &json!({ "firstName": "Mallory" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid or expired token"));
    Ok(())
}

#[tokio::test]
async fn update_profile_validation_error_is_passed_through() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "00u1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorSummary": "Api validation failed: email",
            "errorCauses": [{ "errorSummary": "email: Does not match required pattern" }]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "email": "not-an-email" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Api validation failed: email"));
    assert_eq!(
        body["errors"],
        json!([{ "errorSummary": "email: Does not match required pattern" }])
    );
    Ok(())
}

#[tokio::test]
async fn update_profile_clears_field_with_null() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "00u1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .and(body_json(json!({ "profile": { "middleName": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "00u1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "middleName": null }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    Ok(())
}

#[tokio::test]
async fn update_profile_unrecognized_failure_is_generic() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "00u1" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errorCode": "E0000006",
            "errorSummary": "You do not have permission to perform the requested action"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "firstName": "Grace" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to update profile" })
    );
    Ok(())
}

#[tokio::test]
async fn update_profile_without_subject_is_server_error() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/default/v1/userinfo"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/00u1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        bearer_request(
            Method::PUT,
            "/auth/profile",
            "at-123",
            &json!({ "firstName": "Grace" }),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to update profile" })
    );
    Ok(())
}

#[tokio::test]
async fn reset_password_hides_account_existence() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users/ada@example.com/lifecycle/reset_password"))
        .and(query_param("sendEmail", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/nobody@example.com/lifecycle/reset_password"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorCode": "E0000007",
            "errorSummary": "Not found: Resource not found: nobody@example.com (User)",
            "errorCauses": []
        })))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/reset-password",
            &json!({ "email": "ada@example.com" }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Password reset email sent" })
    );

    let (status, body) = send(
        app(&server)?,
        json_request(
            Method::POST,
            "/auth/reset-password",
            &json!({ "email": "nobody@example.com" }),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let text = body.to_string();
    if text.contains("nobody") || text.contains("Not found") {
        bail!("reset response leaks provider detail: {text}");
    }
    assert_eq!(
        body,
        json!({ "success": false, "message": "Unable to process password reset request" })
    );
    Ok(())
}

#[tokio::test]
async fn logout_revokes_token() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/default/v1/revoke"))
        .and(body_string_contains("token=at-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(Method::POST, "/auth/logout", &json!({ "token": "at-123" }))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Logged out successfully" })
    );
    Ok(())
}

#[tokio::test]
async fn logout_revoke_failure_is_server_error() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/default/v1/revoke"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_client" })),
        )
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server)?,
        json_request(Method::POST, "/auth/logout", &json!({ "token": "at-123" }))?,
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Failed to revoke token" })
    );
    Ok(())
}

#[tokio::test]
async fn authorize_url_returns_state() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth/authorize-url")
        .body(Body::empty())?;

    let (status, body) = send(app(&server)?, request).await?;
    assert_eq!(status, StatusCode::OK);

    let Some(state) = body["state"].as_str() else {
        bail!("missing state: {body}");
    };
    let Some(url) = body["url"].as_str() else {
        bail!("missing url: {body}");
    };
    assert!(url.contains("/oauth2/default/v1/authorize"));
    assert!(url.contains(&format!("state={state}")));
    assert_eq!(provider_calls(&server).await, 0);
    Ok(())
}

#[tokio::test]
async fn health_reflects_provider() -> Result<()> {
    if !can_bind_localhost() {
        return Ok(());
    }

    let server = MockServer::start().await;
    let health = || {
        Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
    };

    let (status, body) = send(app(&server)?, health()?).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["provider"], json!("error"));

    Mock::given(method("GET"))
        .and(path("/oauth2/default/.well-known/openid-configuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "issuer": server.uri() })))
        .mount(&server)
        .await;

    let response = app(&server)?.oneshot(health()?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));
    Ok(())
}
