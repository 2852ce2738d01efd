//! Typed identities for Overpass mirrors.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Public Overpass mirrors, in the order they are tried by default.
pub const DEFAULT_MIRRORS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

/// Error returned when a mirror address is not an absolute HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mirror address {address:?} is not a valid http(s) URL: {reason}")]
pub struct InvalidEndpoint {
    /// The rejected address.
    pub address: String,
    /// Why it was rejected.
    pub reason: String,
}

/// One Overpass interpreter endpoint.
///
/// Endpoints are equivalent by contract: any of them may serve a query. Their
/// order in a mirror list is the only thing that distinguishes them.
///
/// # Examples
/// ```
/// # use footprint_data::overpass::MirrorEndpoint;
/// let mirror = MirrorEndpoint::parse("https://overpass-api.de/api/interpreter")?;
/// assert_eq!(mirror.name(), "overpass-api.de");
/// # Ok::<(), footprint_data::overpass::InvalidEndpoint>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEndpoint {
    url: String,
    name: String,
}

impl MirrorEndpoint {
    /// Parse and validate a mirror address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEndpoint`] when the address does not parse as a URL,
    /// uses a scheme other than `http`/`https`, or has no host.
    pub fn parse(address: &str) -> Result<Self, InvalidEndpoint> {
        let reject = |reason: String| InvalidEndpoint {
            address: address.to_owned(),
            reason,
        };
        let parsed = Url::parse(address.trim()).map_err(|err| reject(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(reject(format!("unsupported scheme `{}`", parsed.scheme())));
        }
        let name = parsed
            .host_str()
            .ok_or_else(|| reject("missing host".to_owned()))?
            .to_owned();
        Ok(Self {
            url: parsed.into(),
            name,
        })
    }

    /// The default public mirror list.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_MIRRORS
            .iter()
            .filter_map(|address| Self::parse(address).ok())
            .collect()
    }

    /// Full request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host name, used to identify the mirror in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl AsRef<str> for MirrorEndpoint {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for MirrorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
