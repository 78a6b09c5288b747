//! Request builder and response parser for the KwikDesk API.
//!
//! # Design
//! `KwikDeskClient` holds the connection settings and the current token.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip (see `BlockingClient`
//! for the ready-made one), keeping this half deterministic and free of
//! I/O.
//!
//! All operations share one dispatch path: `build_request` assembles the
//! URL and headers, `parse_envelope` classifies the status and decodes the
//! body. Operations differ only in endpoint, verb, body and headers, and in
//! which envelope fields they lift into a typed result.

use log::warn;

use crate::config::{ClientConfig, Endpoint, API_TOKEN_HEADER, APP_NAME_HEADER};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, Message, Results, TokenResult};

/// Status codes treated as success. Everything else is an error, including
/// codes such as 203 or 210 that a prefix check on "20" would accept.
pub const SUCCESS_STATUSES: [u16; 4] = [200, 201, 202, 204];

pub fn is_success(status: u16) -> bool {
    SUCCESS_STATUSES.contains(&status)
}

/// Synchronous request builder for the KwikDesk API.
///
/// The token starts as whatever was passed to the constructor (an empty
/// string is fine if `create_token` will be called first) and is replaced
/// by `set_token` or a successful `parse_create_token`.
#[derive(Debug, Clone)]
pub struct KwikDeskClient {
    config: ClientConfig,
    base_url: String,
    token: String,
}

impl KwikDeskClient {
    /// Client for the public platform.
    pub fn new(token: &str) -> Self {
        Self::with_config(ClientConfig::default(), token)
    }

    pub fn with_config(config: ClientConfig, token: &str) -> Self {
        let base_url = config.base_url();
        Self {
            config,
            base_url,
            token: token.to_string(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Build a request for an arbitrary endpoint.
    ///
    /// `endpoint` is appended verbatim to the base URL, so it may carry a
    /// query string. The content type header comes first; a caller header
    /// with the same name (ignoring case) replaces it, and later caller
    /// headers replace earlier ones.
    pub fn build_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> HttpRequest {
        let mut all: Vec<(String, String)> =
            vec![("Content-Type".to_string(), self.config.content_type.clone())];
        for (name, value) in headers {
            all.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            all.push((name.to_string(), value.to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}{endpoint}", self.base_url),
            headers: all,
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Like `build_request`, but takes the verb as text in any case.
    pub fn build_dispatch(
        &self,
        endpoint: &str,
        verb: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let method = verb.parse::<HttpMethod>()?;
        Ok(self.build_request(endpoint, method, body.map(str::to_string), headers))
    }

    /// Classify a response and decode its body into an envelope.
    pub fn parse_envelope(&self, response: HttpResponse) -> Result<Envelope, ApiError> {
        if !is_success(response.status) {
            warn!("request failed with HTTP {}", response.status);
            return Err(ApiError::Status {
                status: response.status,
                payload: best_effort_envelope(&response.body),
            });
        }
        if response.status == 204 && response.body.trim().is_empty() {
            return Ok(Envelope::new());
        }
        serde_json::from_str::<Envelope>(&response.body).map_err(|e| {
            warn!("response body is not a JSON object: {e}");
            ApiError::Deserialization {
                message: e.to_string(),
                payload: best_effort_envelope(&response.body),
            }
        })
    }

    // -----------------------------------------------------------------------
    // Token
    // -----------------------------------------------------------------------

    pub fn build_create_token(&self, app_name: &str) -> HttpRequest {
        self.build_request(
            Endpoint::Token.path(),
            HttpMethod::Post,
            None,
            &[(APP_NAME_HEADER, app_name)],
        )
    }

    /// Parse a token response and, on success, adopt the new token.
    pub fn parse_create_token(&mut self, response: HttpResponse) -> Result<TokenResult, ApiError> {
        let result = TokenResult::try_from(self.parse_envelope(response)?)?;
        self.token = result.token.clone();
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    pub fn build_messages(&self, message: &Message) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(message).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build_request(
            Endpoint::Messages.path(),
            HttpMethod::Post,
            Some(body),
            &[(API_TOKEN_HEADER, self.token.as_str())],
        ))
    }

    pub fn parse_messages(&self, response: HttpResponse) -> Result<Envelope, ApiError> {
        self.parse_envelope(response)
    }

    // -----------------------------------------------------------------------
    // Channel
    // -----------------------------------------------------------------------

    pub fn build_channel(&self) -> HttpRequest {
        self.authenticated_get(Endpoint::Channel.path())
    }

    pub fn parse_channel(&self, response: HttpResponse) -> Result<Results, ApiError> {
        Results::try_from(self.parse_envelope(response)?)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// The term is form-encoded, so `#test` travels as `%23test`.
    pub fn build_search(&self, term: &str) -> HttpRequest {
        let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
        let endpoint = format!("{}?q={encoded}", Endpoint::Search.path());
        self.authenticated_get(&endpoint)
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<Results, ApiError> {
        Results::try_from(self.parse_envelope(response)?)
    }

    // -----------------------------------------------------------------------
    // Server time
    // -----------------------------------------------------------------------

    pub fn build_server_time(&self) -> HttpRequest {
        self.authenticated_get(Endpoint::ServerTime.path())
    }

    pub fn parse_server_time(&self, response: HttpResponse) -> Result<Envelope, ApiError> {
        self.parse_envelope(response)
    }

    fn authenticated_get(&self, endpoint: &str) -> HttpRequest {
        self.build_request(
            endpoint,
            HttpMethod::Get,
            None,
            &[(API_TOKEN_HEADER, self.token.as_str())],
        )
    }
}

/// Decode `body` as a JSON object, falling back to an empty envelope.
pub(crate) fn best_effort_envelope(body: &str) -> Envelope {
    serde_json::from_str(body).unwrap_or_default()
}
