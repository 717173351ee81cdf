//! Map parsed CLI arguments to the action the binary executes.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::provider;
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or blank.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let provider_opts = provider::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        provider_url: provider_opts.url,
        provider_api_token: provider_opts.api_token,
        client_id: provider_opts.client_id,
        client_secret: provider_opts.client_secret,
        redirect_uri: provider_opts.redirect_uri,
        auth_server: provider_opts.auth_server,
        scope: provider_opts.scope,
        timeout_seconds: provider_opts.timeout_seconds,
        login_passthrough: provider_opts.login_passthrough,
    }))
}
