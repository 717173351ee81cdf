use secrecy::SecretString;

pub const DEFAULT_AUTH_SERVER: &str = "/oauth2/default";
pub const DEFAULT_SCOPE: &str = "openid profile email";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Provider settings read once at startup and shared read-only by every handler.
#[derive(Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_api_token: SecretString,
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub auth_server: String,
    pub scope: String,
    pub timeout_seconds: u64,
    pub login_passthrough: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(purl: String) -> Self {
        Self {
            provider_url: purl,
            provider_api_token: SecretString::default(),
            client_id: String::new(),
            client_secret: SecretString::default(),
            redirect_uri: String::new(),
            auth_server: DEFAULT_AUTH_SERVER.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            login_passthrough: true,
        }
    }

    pub fn set_api_token(&mut self, token: SecretString) {
        self.provider_api_token = token;
    }

    pub fn set_client(&mut self, client_id: String, client_secret: SecretString) {
        self.client_id = client_id;
        self.client_secret = client_secret;
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("provider_url", &self.provider_url)
            .field("provider_api_token", &"***")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_server", &self.auth_server)
            .field("scope", &self.scope)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("login_passthrough", &self.login_passthrough)
            .finish()
    }
}
