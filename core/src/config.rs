//! Connection settings and the endpoint table for the KwikDesk platform.
//!
//! # Design
//! Every endpoint path lives in `Endpoint::path`, a read-only table keyed by
//! operation. `ClientConfig` resolves the host and base URL; it defaults to
//! the public platform over HTTPS and can be pointed at any other base URL
//! (a local mock server, a self-hosted deployment).

/// Public KwikDesk platform host.
pub const DEFAULT_HOST: &str = "platform.kwikdesk.com";

/// Content type attached to every request.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the token on authenticated calls.
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Header carrying the application name when requesting a token.
pub const APP_NAME_HEADER: &str = "X-Appname";

/// The remote operations exposed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Token,
    Messages,
    Channel,
    Search,
    ServerTime,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Token => "/token",
            Endpoint::Messages => "/messages",
            Endpoint::Channel => "/channel",
            Endpoint::Search => "/search",
            Endpoint::ServerTime => "/server-time",
        }
    }
}

/// Where requests go and how their bodies are labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    pub content_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            content_type: CONTENT_TYPE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a config from an explicit base URL such as `http://127.0.0.1:3000`.
    ///
    /// A URL without a scheme is treated as HTTPS. Trailing slashes are
    /// stripped so endpoint paths can be appended directly.
    pub fn with_base_url(base_url: &str) -> Self {
        let trimmed = base_url.trim_end_matches('/');
        let (scheme, host) = match trimmed.split_once("://") {
            Some((scheme, host)) => (scheme, host),
            None => ("https", trimmed),
        };
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            content_type: CONTENT_TYPE.to_string(),
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_public_platform_over_https() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "https://platform.kwikdesk.com");
        assert_eq!(config.content_type, "application/json");
    }

    #[test]
    fn base_url_is_split_into_scheme_and_host() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:3000/");
        assert_eq!(config.scheme, "http");
        assert_eq!(config.host, "127.0.0.1:3000");
        assert_eq!(config.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn missing_scheme_defaults_to_https() {
        let config = ClientConfig::with_base_url("api.example.com");
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn endpoint_table() {
        assert_eq!(Endpoint::Token.path(), "/token");
        assert_eq!(Endpoint::Messages.path(), "/messages");
        assert_eq!(Endpoint::Channel.path(), "/channel");
        assert_eq!(Endpoint::Search.path(), "/search");
        assert_eq!(Endpoint::ServerTime.path(), "/server-time");
    }
}
