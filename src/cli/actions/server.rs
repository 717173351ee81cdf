use crate::{cli::globals::GlobalArgs, gateway, provider::Provider};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct Args {
    pub port: u16,
    pub provider_url: String,
    pub provider_api_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_server: String,
    pub scope: String,
    pub timeout_seconds: u64,
    pub login_passthrough: bool,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("provider_url", &self.provider_url)
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_server", &self.auth_server)
            .finish_non_exhaustive()
    }
}

/// Build the global settings from parsed arguments.
///
/// # Errors
/// Returns an error if the provider or redirect URL is not a valid http(s) URL.
pub fn globals(args: Args) -> Result<GlobalArgs> {
    let provider_url = Url::parse(&args.provider_url)
        .with_context(|| format!("Invalid provider URL: {}", args.provider_url))?;
    if !matches!(provider_url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "Provider URL must use http or https: {}",
            args.provider_url
        ));
    }

    Url::parse(&args.redirect_uri)
        .with_context(|| format!("Invalid redirect URI: {}", args.redirect_uri))?;

    let mut globals = GlobalArgs::new(args.provider_url);
    globals.set_api_token(SecretString::from(args.provider_api_token));
    globals.set_client(args.client_id, SecretString::from(args.client_secret));
    globals.redirect_uri = args.redirect_uri;
    globals.auth_server = format!("/{}", args.auth_server.trim_matches('/'));
    globals.scope = args.scope;
    globals.timeout_seconds = args.timeout_seconds;
    globals.login_passthrough = args.login_passthrough;

    Ok(globals)
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let port = args.port;
    let globals = globals(args)?;

    debug!("Global args: {:?}", globals);

    let provider = Arc::new(Provider::new(&globals).context("Failed to build provider client")?);

    gateway::new(port, provider).await
}
