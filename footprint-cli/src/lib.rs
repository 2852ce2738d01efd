//! Command-line interface for building footprint acquisition.
#![forbid(unsafe_code)]

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use footprint_core::{EmptyResultPolicy, GeoBounds};
use footprint_data::overpass::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_SERVER_TIMEOUT, DEFAULT_USER_AGENT, HttpOverpassTransport,
    HttpTransportConfig, MirrorEndpoint, OverpassTransport,
};
use footprint_data::{CollectReport, CollectRequest, collect_buildings, write_geojson};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

mod error;

pub use error::CliError;

const ARG_MIRROR: &str = "mirror";
const ARG_ATTEMPT_TIMEOUT: &str = "attempt-timeout-secs";
const ARG_QUERY_TIMEOUT: &str = "query-timeout-secs";
const ENV_MIRRORS: &str = "FOOTPRINT_CMDS_FETCH_MIRRORS";

/// Northern edge of the default area (central Bristol).
pub const DEFAULT_NORTH: f64 = 51.4595;
/// Southern edge of the default area.
pub const DEFAULT_SOUTH: f64 = 51.4495;
/// Eastern edge of the default area.
pub const DEFAULT_EAST: f64 = -2.5829;
/// Western edge of the default area.
pub const DEFAULT_WEST: f64 = -2.5929;
/// Output file written when none is configured.
pub const DEFAULT_OUTPUT: &str = "bristol_buildings_tiny.geojson";

/// Run the footprint CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when configuration is invalid or the run fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Fetch(args) => {
            run_fetch(args)?;
        }
    }
    Ok(())
}

fn run_fetch(args: FetchArgs) -> Result<CollectReport, CliError> {
    let config = resolve_fetch_config(args)?;
    let transport = HttpOverpassTransport::with_config(config.transport_config())
        .map_err(CliError::BuildTransport)?;
    execute_fetch(&config, &transport)
}

fn resolve_fetch_config(args: FetchArgs) -> Result<FetchConfig, CliError> {
    let config = args.into_config()?;
    config.validate_output()?;
    Ok(config)
}

/// Collect buildings and persist them; nothing is written on failure.
fn execute_fetch<T>(config: &FetchConfig, transport: &T) -> Result<CollectReport, CliError>
where
    T: OverpassTransport + ?Sized,
{
    info!(
        "fetching buildings for N {} S {} E {} W {}",
        config.bounds.north(),
        config.bounds.south(),
        config.bounds.east(),
        config.bounds.west()
    );
    let report = collect_buildings(&config.collect_request(), transport)?;
    write_geojson(&report.collection, &config.output)?;
    info!(
        "wrote {} buildings to {}",
        report.collection.len(),
        config.output
    );
    Ok(report)
}

#[derive(Debug, Parser)]
#[command(
    name = "footprint",
    about = "Building footprint acquisition from public Overpass mirrors",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch building footprints for an area and write them as GeoJSON.
    Fetch(FetchArgs),
}

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query Overpass mirrors in order for every building inside \
                 a bounding box and write the footprints as GeoJSON. Values \
                 can come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Fetch building footprints for a bounding box"
)]
#[ortho_config(prefix = "FOOTPRINT")]
struct FetchArgs {
    /// Northern latitude of the bounding box.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    north: Option<f64>,
    /// Southern latitude of the bounding box.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    south: Option<f64>,
    /// Eastern longitude of the bounding box.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    east: Option<f64>,
    /// Western longitude of the bounding box.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    west: Option<f64>,
    /// Overpass interpreter URL; repeat to list mirrors in attempt order.
    #[arg(long = ARG_MIRROR, value_name = "url")]
    #[serde(default)]
    mirrors: Option<Vec<String>>,
    /// Per-mirror request timeout in seconds.
    #[arg(long = ARG_ATTEMPT_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    attempt_timeout_secs: Option<u64>,
    /// Server-side query timeout in seconds.
    #[arg(long = ARG_QUERY_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    query_timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    user_agent: Option<String>,
    /// Destination GeoJSON file.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    output: Option<Utf8PathBuf>,
    /// Whether an empty result fails the run (`fail`) or is written (`allow`).
    #[arg(long, value_name = "policy")]
    #[serde(default)]
    empty_result: Option<EmptyResultPolicy>,
}

impl FetchArgs {
    fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Fully resolved and validated settings for one fetch run.
#[derive(Debug, Clone, PartialEq)]
struct FetchConfig {
    bounds: GeoBounds,
    mirrors: Vec<MirrorEndpoint>,
    attempt_timeout: Duration,
    server_timeout: Duration,
    user_agent: String,
    output: Utf8PathBuf,
    empty_result: EmptyResultPolicy,
}

impl FetchConfig {
    fn collect_request(&self) -> CollectRequest {
        CollectRequest {
            bounds: self.bounds,
            mirrors: self.mirrors.clone(),
            server_timeout: self.server_timeout,
            empty_result: self.empty_result,
        }
    }

    fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig::default()
            .with_timeout(self.attempt_timeout)
            .with_user_agent(self.user_agent.clone())
    }

    fn validate_output(&self) -> Result<(), CliError> {
        match footprint_fs::is_directory(&self.output) {
            Ok(false) => Ok(()),
            Ok(true) => Err(CliError::OutputIsDirectory {
                path: self.output.clone(),
            }),
            Err(source) => Err(CliError::InspectOutput {
                path: self.output.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let bounds = GeoBounds::new(
            args.north.unwrap_or(DEFAULT_NORTH),
            args.south.unwrap_or(DEFAULT_SOUTH),
            args.east.unwrap_or(DEFAULT_EAST),
            args.west.unwrap_or(DEFAULT_WEST),
        )?;
        let mirrors = match args.mirrors {
            None => MirrorEndpoint::defaults(),
            Some(addresses) if addresses.is_empty() => {
                return Err(CliError::NoMirrors {
                    field: ARG_MIRROR,
                    env: ENV_MIRRORS,
                });
            }
            Some(addresses) => addresses
                .iter()
                .map(|address| MirrorEndpoint::parse(address))
                .collect::<Result<_, _>>()?,
        };
        let attempt_timeout = seconds_or(
            args.attempt_timeout_secs,
            DEFAULT_ATTEMPT_TIMEOUT,
            ARG_ATTEMPT_TIMEOUT,
        )?;
        let server_timeout = seconds_or(
            args.query_timeout_secs,
            DEFAULT_SERVER_TIMEOUT,
            ARG_QUERY_TIMEOUT,
        )?;
        Ok(Self {
            bounds,
            mirrors,
            attempt_timeout,
            server_timeout,
            user_agent: args
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            empty_result: args.empty_result.unwrap_or_default(),
        })
    }
}

fn seconds_or(
    value: Option<u64>,
    default: Duration,
    field: &'static str,
) -> Result<Duration, CliError> {
    match value {
        None => Ok(default),
        Some(0) => Err(CliError::ZeroTimeout { field }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests;
