//! Waypoint HTTP client

pub mod auth;
pub mod error;
pub mod users;

use error::{ClientError, ErrorBody};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("waypoint-client/", env!("CARGO_PKG_VERSION"));

/// Source of the bearer token attached to outgoing requests.
///
/// The client reads the token on every request and never validates it.
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` to send the request without credentials
    fn token(&self) -> Option<String>;
}

/// Per-request options.
///
/// Only the fields that were set are sent: without a body no body is written,
/// without a query no query string is appended.
#[derive(Debug, Clone)]
pub struct RequestOptions<B = ()> {
    method: Option<Method>,
    body: Option<B>,
    headers: HeaderMap,
    query: Option<Vec<(String, String)>>,
}

impl RequestOptions {
    /// Empty options: `GET`, no body, no extra headers, no query
    pub fn new() -> Self {
        Self {
            method: None,
            body: None,
            headers: HeaderMap::new(),
            query: None,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> RequestOptions<B> {
    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a header. Headers set here override the client defaults.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append query parameters
    #[must_use]
    pub fn query<K: Into<String>, V: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.query
            .get_or_insert_with(Vec::new)
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the JSON body
    pub fn body<C: Serialize>(self, body: C) -> RequestOptions<C> {
        RequestOptions {
            method: self.method,
            body: Some(body),
            headers: self.headers,
            query: self.query,
        }
    }
}

/// API client bound to one base URL
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token_source", &self.tokens.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client without a token source
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request against `base_url + path` and decode the JSON response.
    ///
    /// `Content-Type: application/json` is sent unless `options` overrides it.
    /// When the token source holds a token, `Authorization: Bearer <token>` is
    /// added after the caller's headers.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx responses and undecodable payloads are
    /// returned unchanged as [`ClientError`].
    pub async fn request<T, B>(
        &self,
        path: &str,
        options: RequestOptions<B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let method = options.method.unwrap_or(Method::GET);
        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.extend(options.headers);

        if let Some(token) = self.tokens.as_ref().and_then(|source| source.token()) {
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }

        debug!(%method, %url, "Sending API request");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(query) = options.query {
            request = request.query(&query);
        }
        if let Some(body) = options.body {
            request = request.body(serde_json::to_vec(&body)?);
        }

        self.execute(request).await
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                Ok(serde_json::from_slice(b"null")?)
            } else {
                Ok(serde_json::from_slice(&bytes)?)
            }
        } else {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "API request failed");
            Err(ClientError::from_status(
                status,
                ErrorBody::from_text(text, &status.to_string()),
            ))
        }
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl ApiClientBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout. Ignored on WASM.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set where bearer tokens are read from
    #[must_use]
    pub fn token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when no base URL was set.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        #[allow(unused_mut)]
        let mut client_builder = ClientBuilder::new()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            tokens: self.tokens,
        })
    }
}
