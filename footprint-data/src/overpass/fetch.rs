//! Ordered failover across equivalent Overpass mirrors.

use log::{info, warn};

use super::{
    FetchError, MirrorAttemptError, MirrorEndpoint, OverpassQuery, OverpassResponse,
    OverpassTransport,
};

/// Successful outcome of [`MirrorFetcher::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResponse {
    /// Mirror that served the response.
    pub endpoint: MirrorEndpoint,
    /// Decoded response document.
    pub response: OverpassResponse,
    /// Failures of the mirrors tried before `endpoint`, in order.
    pub failed_attempts: Vec<MirrorAttemptError>,
}

/// Tries mirrors strictly in list order until one succeeds.
///
/// Each mirror is contacted at most once per fetch. The first success is
/// returned immediately and later mirrors are never contacted.
///
/// # Examples
/// ```
/// use footprint_core::GeoBounds;
/// use footprint_data::overpass::test_support::ScriptedTransport;
/// use footprint_data::overpass::{MirrorEndpoint, MirrorFetcher, OverpassQuery};
///
/// let mirrors = vec![
///     MirrorEndpoint::parse("https://a.example/api")?,
///     MirrorEndpoint::parse("https://b.example/api")?,
/// ];
/// let transport = ScriptedTransport::new()
///     .with_status("https://a.example/api", 504)
///     .with_json("https://b.example/api", r#"{"elements": []}"#);
/// let bounds = GeoBounds::new(1.0, 0.0, 1.0, 0.0)?;
///
/// let fetched = MirrorFetcher::new(mirrors).fetch(&transport, &OverpassQuery::buildings(&bounds))?;
/// assert_eq!(fetched.endpoint.name(), "b.example");
/// assert_eq!(fetched.failed_attempts.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFetcher {
    mirrors: Vec<MirrorEndpoint>,
}

impl MirrorFetcher {
    /// Create a fetcher over `mirrors`, preserving their order.
    #[must_use]
    pub fn new(mirrors: Vec<MirrorEndpoint>) -> Self {
        Self { mirrors }
    }

    /// Configured mirrors in attempt order.
    #[must_use]
    pub fn mirrors(&self) -> &[MirrorEndpoint] {
        &self.mirrors
    }

    /// Fetch `query` from the first mirror that answers successfully.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ExhaustedMirrors`] when every mirror fails or the
    /// mirror list is empty.
    pub fn fetch<T>(
        &self,
        transport: &T,
        query: &OverpassQuery,
    ) -> Result<FetchedResponse, FetchError>
    where
        T: OverpassTransport + ?Sized,
    {
        let total = self.mirrors.len();
        let mut failed_attempts = Vec::new();
        for (index, endpoint) in self.mirrors.iter().enumerate() {
            info!(
                "querying Overpass mirror {} ({}/{total})",
                endpoint.name(),
                index + 1
            );
            match transport.post_query(endpoint, query) {
                Ok(response) => {
                    info!(
                        "mirror {} returned {} elements",
                        endpoint.name(),
                        response.elements.len()
                    );
                    if let Some(remark) = &response.remark {
                        warn!("mirror {} remarked: {remark}", endpoint.name());
                    }
                    return Ok(FetchedResponse {
                        endpoint: endpoint.clone(),
                        response,
                        failed_attempts,
                    });
                }
                Err(err) => {
                    warn!("mirror {} failed: {err}", endpoint.name());
                    failed_attempts.push(err);
                }
            }
        }
        Err(FetchError::ExhaustedMirrors {
            attempts: failed_attempts,
        })
    }
}
