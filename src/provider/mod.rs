//! HTTP client for the upstream identity provider.
//!
//! User management calls (`/api/v1/users...`) authenticate with the provider
//! API token (`SSWS` scheme). OAuth2 calls go to the configured authorization
//! server and authenticate the gateway with its client id/secret.

pub mod error;
pub mod oauth;
pub mod users;

pub use self::error::UpstreamError;
pub use self::oauth::TokenSet;
pub use self::users::NewUser;

use crate::{cli::globals::GlobalArgs, APP_USER_AGENT};
use anyhow::{anyhow, Context, Result};
use base64ct::{Base64, Encoding};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

pub struct Provider {
    client: Client,
    base_url: Url,
    api_token: SecretString,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    auth_server: String,
    scope: String,
    login_passthrough: bool,
}

impl Provider {
    /// Build a provider client from the global settings.
    ///
    /// # Errors
    /// Returns an error if the provider URL is invalid or the HTTP client cannot be built.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let base_url = Url::parse(&globals.provider_url)
            .with_context(|| format!("Invalid provider URL: {}", globals.provider_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Provider URL cannot be a base: {}", globals.provider_url));
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(globals.timeout_seconds))
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_token: globals.provider_api_token.clone(),
            client_id: globals.client_id.clone(),
            client_secret: globals.client_secret.clone(),
            redirect_uri: globals.redirect_uri.clone(),
            auth_server: globals.auth_server.clone(),
            scope: globals.scope.clone(),
            login_passthrough: globals.login_passthrough,
        })
    }

    /// Whether caller-supplied `login` values are forwarded on profile update.
    #[must_use]
    pub const fn login_passthrough(&self) -> bool {
        self.login_passthrough
    }

    /// Append path segments to the provider base URL, percent-encoding each one.
    fn endpoint_url<'a, I>(&self, segments: I) -> Result<Url, UpstreamError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::Malformed("provider URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of an endpoint under the configured authorization server, e.g. `v1/token`.
    fn oauth_url(&self, endpoint: &str) -> Result<Url, UpstreamError> {
        self.endpoint_url(
            self.auth_server
                .split('/')
                .chain(endpoint.split('/'))
                .filter(|segment| !segment.is_empty()),
        )
    }

    fn ssws(&self) -> String {
        format!("SSWS {}", self.api_token.expose_secret())
    }

    fn client_basic(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret.expose_secret());
        format!("Basic {}", Base64::encode_string(credentials.as_bytes()))
    }
}

/// Pass success responses through, classify everything else.
async fn check(response: Response) -> Result<Response, UpstreamError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::from_response(response).await)
    }
}
