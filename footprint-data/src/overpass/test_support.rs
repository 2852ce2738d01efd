//! Test utilities for Overpass transports.
//!
//! [`ScriptedTransport`] is a deterministic test double for
//! [`OverpassTransport`] that answers from a per-URL script and records every
//! request instead of making HTTP calls.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{
    MirrorAttemptError, MirrorEndpoint, OverpassQuery, OverpassResponse, OverpassTransport,
    decode_body,
};

#[derive(Debug, Clone)]
enum ScriptedReply {
    Body(String),
    Failure(MirrorAttemptError),
}

/// Scripted `OverpassTransport` for tests.
///
/// Mirrors without a script entry fail with a "connection refused" network
/// error, so an unexpected contact shows up as a failed attempt and in
/// [`ScriptedTransport::contacted`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, ScriptedReply>,
    calls: RefCell<Vec<(String, String)>>,
}

/// Per-attempt timeout reported by [`ScriptedTransport::with_timeout`].
pub const SCRIPTED_TIMEOUT_SECS: u64 = 90;

impl ScriptedTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a 200 response carrying `body`.
    ///
    /// The body goes through the same decoder as live responses, so invalid
    /// JSON produces a decode failure.
    #[must_use]
    pub fn with_json(mut self, url: &str, body: impl Into<String>) -> Self {
        self.replies
            .insert(url.to_owned(), ScriptedReply::Body(body.into()));
        self
    }

    /// Fail requests to `url` with `error`.
    #[must_use]
    pub fn with_failure(mut self, url: &str, error: MirrorAttemptError) -> Self {
        self.replies
            .insert(url.to_owned(), ScriptedReply::Failure(error));
        self
    }

    /// Answer `url` with a non-200 status.
    #[must_use]
    pub fn with_status(self, url: &str, status: u16) -> Self {
        let error = MirrorAttemptError::HttpStatus {
            url: url.to_owned(),
            status,
        };
        self.with_failure(url, error)
    }

    /// Make requests to `url` time out.
    #[must_use]
    pub fn with_timeout(self, url: &str) -> Self {
        let error = MirrorAttemptError::Timeout {
            url: url.to_owned(),
            timeout_secs: SCRIPTED_TIMEOUT_SECS,
        };
        self.with_failure(url, error)
    }

    /// URLs contacted so far, in order.
    #[must_use]
    pub fn contacted(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Query texts sent so far, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, query)| query.clone())
            .collect()
    }
}

impl OverpassTransport for ScriptedTransport {
    fn post_query(
        &self,
        endpoint: &MirrorEndpoint,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, MirrorAttemptError> {
        let url = endpoint.url();
        self.calls
            .borrow_mut()
            .push((url.to_owned(), query.as_str().to_owned()));
        match self.replies.get(url) {
            Some(ScriptedReply::Body(body)) => decode_body(url, body),
            Some(ScriptedReply::Failure(error)) => Err(error.clone()),
            None => Err(MirrorAttemptError::Network {
                url: url.to_owned(),
                message: "connection refused".to_owned(),
            }),
        }
    }
}
