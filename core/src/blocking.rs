//! One-call blocking API over `KwikDeskClient` and an `HttpExecutor`.
//!
//! Every operation builds its request, executes it, and parses the
//! response. Errors are always returned to the caller; nothing in here
//! prints or exits.

use crate::client::KwikDeskClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{HttpExecutor, Transport};
use crate::types::{Envelope, Message, Results, TokenResult};

/// Blocking KwikDesk client.
///
/// Token updates take `&mut self`; share a client across threads behind
/// your own lock.
pub struct BlockingClient<E = Transport> {
    inner: KwikDeskClient,
    executor: E,
}

impl BlockingClient<Transport> {
    /// Client for the public platform, routed through any proxy found in
    /// the environment. Pass an empty token if `create_token` comes next.
    pub fn new(token: &str) -> Self {
        Self::with_config(ClientConfig::default(), token)
    }

    pub fn with_config(config: ClientConfig, token: &str) -> Self {
        Self::with_executor(
            KwikDeskClient::with_config(config, token),
            Transport::from_env(),
        )
    }
}

impl<E: HttpExecutor> BlockingClient<E> {
    pub fn with_executor(inner: KwikDeskClient, executor: E) -> Self {
        Self { inner, executor }
    }

    pub fn inner(&self) -> &KwikDeskClient {
        &self.inner
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn host(&self) -> &str {
        self.inner.host()
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn token(&self) -> &str {
        self.inner.token()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.inner.set_token(token);
    }

    /// Send a request to any endpoint and decode the JSON envelope.
    ///
    /// `verb` is case-insensitive. `headers` are added after the content
    /// type; the stored token is not attached automatically.
    pub fn dispatch(
        &self,
        endpoint: &str,
        verb: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> Result<Envelope, ApiError> {
        let request = self.inner.build_dispatch(endpoint, verb, body, headers)?;
        let response = self.executor.execute(&request)?;
        self.inner.parse_envelope(response)
    }

    /// Request a token for `app_name` and keep it for later calls.
    pub fn create_token(&mut self, app_name: &str) -> Result<TokenResult, ApiError> {
        let request = self.inner.build_create_token(app_name);
        let response = self.executor.execute(&request)?;
        self.inner.parse_create_token(response)
    }

    /// Post a message. `delete` is the time-to-live before the platform
    /// removes it; private messages are left out of search results.
    pub fn messages(
        &self,
        content: &str,
        delete: i64,
        private: bool,
    ) -> Result<Envelope, ApiError> {
        self.post_message(&Message::new(content, delete, private))
    }

    pub fn post_message(&self, message: &Message) -> Result<Envelope, ApiError> {
        let request = self.inner.build_messages(message)?;
        let response = self.executor.execute(&request)?;
        self.inner.parse_messages(response)
    }

    pub fn channel(&self) -> Result<Results, ApiError> {
        let response = self.executor.execute(&self.inner.build_channel())?;
        self.inner.parse_channel(response)
    }

    pub fn search(&self, term: &str) -> Result<Results, ApiError> {
        let response = self.executor.execute(&self.inner.build_search(term))?;
        self.inner.parse_search(response)
    }

    pub fn server_time(&self) -> Result<Envelope, ApiError> {
        let response = self.executor.execute(&self.inner.build_server_time())?;
        self.inner.parse_server_time(response)
    }
}
