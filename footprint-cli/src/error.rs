//! Error types emitted by the footprint CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use footprint_core::GeoBoundsError;
use footprint_data::overpass::{InvalidEndpoint, TransportBuildError};
use footprint_data::{CollectError, ExportError};
use thiserror::Error;

/// Errors emitted by the footprint CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The merged bounding box is invalid.
    #[error("invalid bounding box: {0}")]
    InvalidBounds(#[from] GeoBoundsError),
    /// A configured mirror address is invalid.
    #[error(transparent)]
    InvalidMirror(#[from] InvalidEndpoint),
    /// The mirror list was explicitly configured as empty.
    #[error("no Overpass mirrors configured (set --{field} or {env})")]
    NoMirrors {
        field: &'static str,
        env: &'static str,
    },
    /// A timeout was configured as zero seconds.
    #[error("{field} must be at least one second")]
    ZeroTimeout { field: &'static str },
    /// The output path names an existing directory.
    #[error("output path {path:?} is a directory")]
    OutputIsDirectory { path: Utf8PathBuf },
    /// The output path could not be inspected due to an IO error.
    #[error("failed to inspect output path {path:?}: {source}")]
    InspectOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing the HTTP transport failed.
    #[error("failed to build Overpass transport: {0}")]
    BuildTransport(#[source] TransportBuildError),
    /// Fetching or normalising buildings failed.
    #[error(transparent)]
    Collect(#[from] CollectError),
    /// Writing the GeoJSON artefact failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
