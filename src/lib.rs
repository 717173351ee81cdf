//! # Idgate (Identity Gateway)
//!
//! `idgate` is a thin HTTP gateway in front of an upstream identity provider
//! (an Okta-style user management + OAuth2 API). It owns only the translation
//! boundary: each route validates a few required fields, forwards a request to
//! the provider and reshapes the result into one JSON envelope:
//!
//! ```json
//! { "success": true, "message": "...", "...": "operation payload" }
//! ```
//!
//! ## Error shapes
//!
//! Provider error bodies are decoded once per call into
//! [`provider::UpstreamError`]. Structured validation errors (a summary plus a
//! list of causes) are surfaced to the caller at `400`; everything else
//! collapses to a generic message. Login, password reset and logout never
//! expose provider details so callers cannot probe for account existence.
//!
//! ## State
//!
//! Nothing persists inside the gateway. Configuration is read once at startup
//! into [`cli::globals::GlobalArgs`] and handed to the provider client.

pub mod cli;
pub mod gateway;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
