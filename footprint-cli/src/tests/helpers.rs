//! Test helpers for parsing fetch arguments and layering overrides.

use super::*;
use camino::Utf8PathBuf;
use footprint_data::overpass::test_support::ScriptedTransport;
use tempfile::TempDir;

pub(super) const MIRROR_A: &str = "https://mirror-a.example/api/interpreter";
pub(super) const MIRROR_B: &str = "https://mirror-b.example/api/interpreter";

pub(super) const TWO_BUILDINGS: &str = r#"{"elements": [
    {"type": "way", "id": 1, "geometry": [
        {"lat": 51.4500, "lon": -2.5900}, {"lat": 51.4500, "lon": -2.5895},
        {"lat": 51.4504, "lon": -2.5895}, {"lat": 51.4504, "lon": -2.5900}
    ], "tags": {"building": "house"}},
    {"type": "way", "id": 2, "geometry": [
        {"lat": 51.4510, "lon": -2.5880}, {"lat": 51.4510, "lon": -2.5875},
        {"lat": 51.4513, "lon": -2.5875}
    ], "tags": {"building": "garage", "building:levels": "1"}},
    {"type": "way", "id": 3}
]}"#;

pub(super) const ONLY_MALFORMED: &str = r#"{"elements": [
    {"type": "way", "id": 9, "geometry": [{"lat": 51.45, "lon": -2.59}]}
]}"#;

/// Parse `footprint fetch <args>` without consulting files or environment.
pub(super) fn parse_fetch(args: &[&str]) -> Result<FetchArgs, CliError> {
    let invocation = ["footprint", "fetch"].into_iter().chain(args.iter().copied());
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Fetch(args) => Ok(args),
    }
}

/// Temporary directory plus the GeoJSON path inside it.
pub(super) struct OutputTarget {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl OutputTarget {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("buildings.geojson"))
            .expect("utf-8 temp path");
        Self { _dir: dir, path }
    }

    pub(super) fn path(&self) -> &Utf8PathBuf {
        &self.path
    }
}

/// Configuration targeting the two scripted mirrors and `output`.
pub(super) fn scripted_config(output: &Utf8PathBuf, policy: &str) -> FetchConfig {
    let args = parse_fetch(&[
        "--mirror",
        MIRROR_A,
        "--mirror",
        MIRROR_B,
        "--output",
        output.as_str(),
        "--empty-result",
        policy,
    ])
    .expect("arguments parse");
    FetchConfig::try_from(args).expect("valid configuration")
}

/// Transport where the first mirror is down and the second serves `body`.
pub(super) fn fallback_transport(body: &str) -> ScriptedTransport {
    ScriptedTransport::new()
        .with_status(MIRROR_A, 502)
        .with_json(MIRROR_B, body)
}

/// Values a configuration file or the environment may contribute.
#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) north: Option<f64>,
    pub(super) output: Option<Utf8PathBuf>,
}

/// Layer CLI over environment over file values, as configuration merging does.
pub(super) fn merge_layers(
    mut cli_args: FetchArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<FetchConfig, CliError> {
    merge_field(
        &mut cli_args.north,
        extract_field(&env_layer, |layer| &layer.north),
        extract_field(&file_layer, |layer| &layer.north),
    );
    merge_field(
        &mut cli_args.output,
        extract_field(&env_layer, |layer| &layer.output),
        extract_field(&file_layer, |layer| &layer.output),
    );
    FetchConfig::try_from(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: &Option<LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.as_ref().and_then(|entry| accessor(entry).clone())
}
