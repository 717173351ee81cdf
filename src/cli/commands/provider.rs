use crate::cli::globals::{DEFAULT_AUTH_SERVER, DEFAULT_SCOPE};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_PROVIDER_API_TOKEN: &str = "provider-api-token";
pub const ARG_CLIENT_ID: &str = "client-id";
pub const ARG_CLIENT_SECRET: &str = "client-secret";
pub const ARG_REDIRECT_URI: &str = "redirect-uri";
pub const ARG_AUTH_SERVER: &str = "auth-server";
pub const ARG_SCOPE: &str = "scope";
pub const ARG_PROVIDER_TIMEOUT: &str = "provider-timeout";
pub const ARG_LOGIN_PASSTHROUGH: &str = "login-passthrough";

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub api_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_server: String,
    pub scope: String,
    pub timeout_seconds: u64,
    pub login_passthrough: bool,
}

impl Options {
    /// Parse provider arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // clap passes empty env values through, treat them as missing
        let required = |id: &str| -> anyhow::Result<String> {
            match matches.get_one::<String>(id).cloned() {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => anyhow::bail!("missing required argument: --{id}"),
            }
        };

        Ok(Self {
            url: required(ARG_PROVIDER_URL)?,
            api_token: required(ARG_PROVIDER_API_TOKEN)?,
            client_id: required(ARG_CLIENT_ID)?,
            client_secret: required(ARG_CLIENT_SECRET)?,
            redirect_uri: required(ARG_REDIRECT_URI)?,
            auth_server: matches
                .get_one::<String>(ARG_AUTH_SERVER)
                .cloned()
                .unwrap_or_else(|| DEFAULT_AUTH_SERVER.to_string()),
            scope: matches
                .get_one::<String>(ARG_SCOPE)
                .cloned()
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            timeout_seconds: matches
                .get_one::<u64>(ARG_PROVIDER_TIMEOUT)
                .copied()
                .unwrap_or(10),
            login_passthrough: matches
                .get_one::<bool>(ARG_LOGIN_PASSTHROUGH)
                .copied()
                .unwrap_or(true),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Identity provider base URL, example: https://dev-123456.okta.com")
                .env("IDGATE_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_API_TOKEN)
                .long(ARG_PROVIDER_API_TOKEN)
                .help("Identity provider API token used for user management calls")
                .env("IDGATE_PROVIDER_API_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLIENT_ID)
                .long(ARG_CLIENT_ID)
                .help("OAuth client id")
                .env("IDGATE_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLIENT_SECRET)
                .long(ARG_CLIENT_SECRET)
                .help("OAuth client secret")
                .env("IDGATE_CLIENT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_REDIRECT_URI)
                .long(ARG_REDIRECT_URI)
                .help("OAuth redirect URI registered for the client")
                .env("IDGATE_REDIRECT_URI")
                .required(true),
        )
        .arg(
            Arg::new(ARG_AUTH_SERVER)
                .long(ARG_AUTH_SERVER)
                .help("Authorization server path on the provider")
                .env("IDGATE_AUTH_SERVER")
                .default_value(DEFAULT_AUTH_SERVER),
        )
        .arg(
            Arg::new(ARG_SCOPE)
                .long(ARG_SCOPE)
                .help("Scopes requested on login, space separated")
                .env("IDGATE_SCOPE")
                .default_value(DEFAULT_SCOPE),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT)
                .long(ARG_PROVIDER_TIMEOUT)
                .help("Timeout in seconds for each identity provider request")
                .env("IDGATE_PROVIDER_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_LOGIN_PASSTHROUGH)
                .long(ARG_LOGIN_PASSTHROUGH)
                .help("Forward `login` changes on profile update without extra verification")
                .env("IDGATE_LOGIN_PASSTHROUGH")
                .action(ArgAction::Set)
                .default_value("true")
                .value_parser(clap::value_parser!(bool)),
        )
}
