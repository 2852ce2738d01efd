//! Transports that deliver an Overpass query to a single mirror.
//!
//! [`OverpassTransport`] is synchronous so the fetcher and everything above it
//! stay embeddable in synchronous callers. [`HttpOverpassTransport`] bridges to
//! `reqwest` by blocking on a Tokio runtime internally.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::{
    MirrorAttemptError, MirrorEndpoint, OverpassQuery, OverpassResponse, TransportBuildError,
    decode_body,
};

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "footprint-overpass/0.1";

/// Default per-attempt request timeout.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(90);

/// One request/response exchange with one mirror.
///
/// Implementations must not retry and must not contact any endpoint other
/// than the one given.
pub trait OverpassTransport {
    /// Send `query` to `endpoint` and decode the response.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorAttemptError`] describing why the attempt failed.
    fn post_query(
        &self,
        endpoint: &MirrorEndpoint,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, MirrorAttemptError>;
}

/// Configuration for [`HttpOverpassTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Per-attempt timeout covering connect, send and body download.
    pub timeout: Duration,
    /// User agent string sent with every request.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP transport posting query text to an Overpass interpreter.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the transport blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime it reuses that runtime's handle via
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it falls
/// back to its own runtime, which can deadlock if the caller's runtime drives
/// IO this request depends on.
pub struct HttpOverpassTransport {
    client: Client,
    config: HttpTransportConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpOverpassTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOverpassTransport")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpOverpassTransport {
    /// Create a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(TransportBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    async fn post_query_async(
        &self,
        url: &str,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, MirrorAttemptError> {
        let response = self
            .client
            .post(url)
            .body(query.as_str().to_owned())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(MirrorAttemptError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        debug!("received {} bytes from {url}", body.len());
        decode_body(url, &body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> MirrorAttemptError {
        if error.is_timeout() {
            return MirrorAttemptError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return MirrorAttemptError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            };
        }

        if error.is_decode() {
            return MirrorAttemptError::Decode {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }

        MirrorAttemptError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl OverpassTransport for HttpOverpassTransport {
    /// Post the query, blocking until the attempt completes or times out.
    ///
    /// # Runtime requirements
    ///
    /// When called from within a Tokio runtime, that runtime should be
    /// multi-threaded; see the type-level documentation.
    fn post_query(
        &self,
        endpoint: &MirrorEndpoint,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, MirrorAttemptError> {
        let future = self.post_query_async(endpoint.url(), query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
