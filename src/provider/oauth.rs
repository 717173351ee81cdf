use super::{check, Provider, UpstreamError};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info_span, instrument, Instrument};
use url::Url;

/// Tokens returned by a successful password grant.
#[derive(Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub id_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"***")
            .field("id_token", &self.id_token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

impl Provider {
    /// Exchange username and password for tokens (resource owner password grant).
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the credentials are rejected or the provider
    /// cannot be reached.
    #[instrument(skip(self, password))]
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenSet, UpstreamError> {
        let url = self.oauth_url("v1/token")?;

        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", self.scope.as_str()),
        ];

        let span = info_span!("provider.request", http.method = "POST", provider.op = "token");
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.client_basic())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .instrument(span)
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Fetch the OIDC userinfo claims for an access token.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the token is rejected or the provider cannot be reached.
    #[instrument(skip(self, access_token))]
    pub async fn userinfo(&self, access_token: &str) -> Result<Map<String, Value>, UpstreamError> {
        let url = self.oauth_url("v1/userinfo")?;

        let span = info_span!("provider.request", http.method = "GET", provider.op = "userinfo");
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .instrument(span)
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Revoke an access token.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the provider refuses or cannot be reached.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<(), UpstreamError> {
        let url = self.oauth_url("v1/revoke")?;

        let form = [("token", token), ("token_type_hint", "access_token")];

        let span = info_span!("provider.request", http.method = "POST", provider.op = "revoke");
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.client_basic())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .instrument(span)
            .await?;

        check(response).await?;

        Ok(())
    }

    /// Authorization-code flow entry point for browser clients.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the authorization server URL cannot be built.
    pub fn authorize_url(&self, state: &str) -> Result<Url, UpstreamError> {
        let mut url = self.oauth_url("v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", state);
        Ok(url)
    }

    /// Fetch the OIDC discovery document, used as a reachability probe.
    ///
    /// # Errors
    /// Returns an [`UpstreamError`] if the document cannot be fetched.
    pub async fn discovery(&self) -> Result<(), UpstreamError> {
        let url = self.oauth_url(".well-known/openid-configuration")?;

        let span = info_span!("provider.request", http.method = "GET", provider.op = "discovery");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .instrument(span)
            .await?;

        check(response).await?;

        Ok(())
    }
}
