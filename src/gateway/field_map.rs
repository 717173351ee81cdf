//! Allow-list for profile updates.
//!
//! Caller keys outside the table are dropped without being reported. `login`
//! is not in the table: it is forwarded separately and only when enabled,
//! because the provider does not re-verify a changed login.

use serde_json::{Map, Value};

/// Caller field name -> provider profile attribute.
pub const PROFILE_FIELDS: [(&str, &str); 29] = [
    ("firstName", "firstName"),
    ("lastName", "lastName"),
    ("middleName", "middleName"),
    ("honorificPrefix", "honorificPrefix"),
    ("honorificSuffix", "honorificSuffix"),
    ("email", "email"),
    ("secondEmail", "secondEmail"),
    ("title", "title"),
    ("displayName", "displayName"),
    ("nickName", "nickName"),
    ("profileUrl", "profileUrl"),
    ("primaryPhone", "primaryPhone"),
    ("mobilePhone", "mobilePhone"),
    ("streetAddress", "streetAddress"),
    ("city", "city"),
    ("state", "state"),
    ("zipCode", "zipCode"),
    ("countryCode", "countryCode"),
    ("preferredLanguage", "preferredLanguage"),
    ("locale", "locale"),
    ("timezone", "timezone"),
    ("userType", "userType"),
    ("employeeNumber", "employeeNumber"),
    ("costCenter", "costCenter"),
    ("organization", "organization"),
    ("division", "division"),
    ("department", "department"),
    ("managerId", "managerId"),
    ("manager", "manager"),
];

pub const LOGIN_FIELD: &str = "login";

/// Provider attribute for a caller field, if the field is allowed.
#[must_use]
pub fn provider_field(caller_field: &str) -> Option<&'static str> {
    PROFILE_FIELDS
        .iter()
        .find(|(caller, _)| *caller == caller_field)
        .map(|(_, provider)| *provider)
}

/// Build the provider profile patch from a caller body.
///
/// Values are copied as sent, so `null` clears the attribute at the provider.
/// `login` is copied only when `login_passthrough` is set.
#[must_use]
pub fn profile_patch(body: &Map<String, Value>, login_passthrough: bool) -> Map<String, Value> {
    let mut patch = Map::new();

    for (key, value) in body {
        if let Some(field) = provider_field(key) {
            patch.insert(field.to_string(), value.clone());
        } else if key == LOGIN_FIELD && login_passthrough {
            patch.insert(LOGIN_FIELD.to_string(), value.clone());
        }
    }

    patch
}
