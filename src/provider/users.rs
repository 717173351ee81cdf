use super::{check, Provider, UpstreamError};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info_span, instrument, Instrument};

/// Profile and password for a new account.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserProfile<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    login: &'a str,
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    profile: CreateUserProfile<'a>,
    credentials: Value,
}

#[derive(Deserialize)]
struct CreatedUser {
    id: String,
}

impl Provider {
    /// Create and activate a user; returns the provider user id.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the provider rejects the user or cannot be reached.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &NewUser<'_>) -> Result<String, UpstreamError> {
        let mut url = self.endpoint_url(["api", "v1", "users"])?;
        url.query_pairs_mut().append_pair("activate", "true");

        let payload = CreateUserRequest {
            profile: CreateUserProfile {
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                login: user.email,
            },
            credentials: json!({ "password": { "value": user.password } }),
        };

        let span = info_span!(
            "provider.request",
            http.method = "POST",
            provider.op = "create_user"
        );
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.ssws())
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        let created: CreatedUser = check(response).await?.json().await?;

        Ok(created.id)
    }

    /// Partially update a user's profile; only keys in `patch` change.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the provider rejects the patch or cannot be reached.
    #[instrument(skip(self, patch), fields(fields = patch.len()))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<(), UpstreamError> {
        let url = self.endpoint_url(["api", "v1", "users", user_id])?;

        let span = info_span!(
            "provider.request",
            http.method = "POST",
            provider.op = "update_profile"
        );
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.ssws())
            .header(ACCEPT, "application/json")
            .json(&json!({ "profile": patch }))
            .send()
            .instrument(span)
            .await?;

        check(response).await?;

        Ok(())
    }

    /// Start the reset-password lifecycle; the provider emails the user.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the provider refuses or cannot be reached.
    #[instrument(skip(self, login))]
    pub async fn reset_password(&self, login: &str) -> Result<(), UpstreamError> {
        let mut url =
            self.endpoint_url(["api", "v1", "users", login, "lifecycle", "reset_password"])?;
        url.query_pairs_mut().append_pair("sendEmail", "true");

        let span = info_span!(
            "provider.request",
            http.method = "POST",
            provider.op = "reset_password"
        );
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.ssws())
            .header(ACCEPT, "application/json")
            .send()
            .instrument(span)
            .await?;

        check(response).await?;

        Ok(())
    }
}
