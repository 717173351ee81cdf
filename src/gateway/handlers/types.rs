//! Request/response types for gateway endpoints.
//!
//! Request fields are optional so a missing field reaches the handler and is
//! answered with the operation's own `400`, not a framework rejection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(ToSchema, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub id_token: Option<String>,
    pub expires_in: u64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub profile: Map<String, Value>,
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
}

#[derive(ToSchema, Deserialize, Default)]
#[serde(default)]
pub struct LogoutRequest {
    pub token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthorizeUrlResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
    pub state: String,
}

/// Return the value if present and not blank.
#[must_use]
pub fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}
