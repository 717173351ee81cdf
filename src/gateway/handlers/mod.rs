//! Route handlers and the helpers they share.

pub mod authorize;
pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod reset_password;
pub mod signup;
pub mod types;

use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Token from an `Authorization: Bearer <token>` header.
///
/// Any other scheme, a blank token or a non-ASCII header counts as missing.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() || token.contains(' ') {
        None
    } else {
        Some(token)
    }
}
