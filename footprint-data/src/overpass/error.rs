//! Error types produced while fetching from Overpass mirrors.

use std::io;

use thiserror::Error;

/// Why a single mirror attempt failed.
///
/// Every variant is recoverable: the fetcher moves on to the next mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MirrorAttemptError {
    /// The request exceeded the per-attempt timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Mirror URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Mirror URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The mirror answered with a status other than 200.
    #[error("mirror {url} responded with HTTP status {status}")]
    HttpStatus {
        /// Mirror URL.
        url: String,
        /// Returned status code.
        status: u16,
    },
    /// The body was not an Overpass JSON document.
    #[error("mirror {url} returned an undecodable body: {message}")]
    Decode {
        /// Mirror URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

impl MirrorAttemptError {
    /// URL of the mirror that failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. }
            | Self::Network { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Decode { url, .. } => url,
        }
    }
}

/// Terminal failure of a [`MirrorFetcher`](super::MirrorFetcher) run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Every configured mirror failed, or none were configured.
    #[error("all {} Overpass mirrors failed", attempts.len())]
    ExhaustedMirrors {
        /// Failures in the order the mirrors were tried.
        attempts: Vec<MirrorAttemptError>,
    },
}

impl FetchError {
    /// Per-mirror failures in attempt order.
    #[must_use]
    pub fn attempts(&self) -> &[MirrorAttemptError] {
        match self {
            Self::ExhaustedMirrors { attempts } => attempts,
        }
    }
}

/// Error returned when an [`HttpOverpassTransport`](super::HttpOverpassTransport)
/// cannot be constructed.
#[derive(Debug, Error)]
pub enum TransportBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] io::Error),
}
