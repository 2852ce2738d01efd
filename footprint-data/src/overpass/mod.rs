//! Overpass API acquisition: query text, mirrors and ordered failover.
//!
//! [`OverpassQuery`] renders the building query for a [`GeoBounds`] box.
//! [`MirrorFetcher`] sends it to each [`MirrorEndpoint`] in turn through an
//! [`OverpassTransport`] and returns the first decoded [`OverpassResponse`].
//!
//! # Example
//!
//! ```no_run
//! use footprint_core::GeoBounds;
//! use footprint_data::overpass::{
//!     HttpOverpassTransport, HttpTransportConfig, MirrorEndpoint, MirrorFetcher, OverpassQuery,
//! };
//! use std::time::Duration;
//!
//! let transport = HttpOverpassTransport::with_config(
//!     HttpTransportConfig::default().with_timeout(Duration::from_secs(30)),
//! )?;
//! let bounds = GeoBounds::new(51.4595, 51.4495, -2.5829, -2.5929)?;
//! let fetched = MirrorFetcher::new(MirrorEndpoint::defaults())
//!     .fetch(&transport, &OverpassQuery::buildings(&bounds))?;
//! println!("{} elements from {}", fetched.response.elements.len(), fetched.endpoint.name());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`GeoBounds`]: footprint_core::GeoBounds

mod endpoint;
mod error;
mod fetch;
mod query;
mod response;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use endpoint::{DEFAULT_MIRRORS, InvalidEndpoint, MirrorEndpoint};
pub use error::{FetchError, MirrorAttemptError, TransportBuildError};
pub use fetch::{FetchedResponse, MirrorFetcher};
pub use query::{DEFAULT_SERVER_TIMEOUT, OverpassQuery};
pub use response::{
    OverpassResponse, RawElement, RawGeometry, RawRelation, RawVertex, RawWay, Tags, decode_body,
};
pub use transport::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_USER_AGENT, HttpOverpassTransport, HttpTransportConfig,
    OverpassTransport,
};
