//! Network execution of `HttpRequest` values.
//!
//! `HttpExecutor` is the seam between the deterministic request/response
//! half of the crate and the network. `Transport` is the production
//! implementation on top of a `ureq` agent.

use log::debug;
use ureq::{Agent, Proxy, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Envelope;

/// Executes one HTTP round-trip.
///
/// Implementations must hand back every response that arrived, whatever its
/// status code; classification happens in `KwikDeskClient::parse_envelope`.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking HTTP transport backed by a pooled `ureq` agent.
#[derive(Clone)]
pub struct Transport {
    agent: Agent,
}

impl Transport {
    /// Build a transport that honors `ALL_PROXY` / `HTTPS_PROXY` /
    /// `HTTP_PROXY` (and lowercase variants). Without a usable proxy
    /// setting, requests go direct.
    pub fn from_env() -> Self {
        let proxy = Proxy::try_from_env();
        if proxy.is_some() {
            debug!("routing requests through proxy from environment");
        }
        Self::with_proxy(proxy)
    }

    pub fn with_proxy(proxy: Option<Proxy>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .proxy(proxy)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HttpExecutor for Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", request.method, request.url);

        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), request).send(body)
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), request).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), request).send_empty(),
        };

        let mut response = result.map_err(|e| ApiError::Transport {
            message: e.to_string(),
            payload: Envelope::new(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        // Bytes, not text: an error page that is not UTF-8 must still reach
        // status classification.
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::BodyRead {
                message: e.to_string(),
                payload: Envelope::new(),
            })?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!("{} {} -> {status}", request.method, request.url);
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
