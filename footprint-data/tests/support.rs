use footprint_core::GeoBounds;
use std::{fs, path::PathBuf};

/// Directory containing the Overpass response fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a JSON fixture by stem.
pub fn fixture(stem: &str) -> String {
    let path = fixtures_dir().join(format!("{stem}.json"));
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read fixture {path:?}: {err}");
    })
}

/// The small central Bristol area used throughout the tests.
pub fn bristol_bounds() -> GeoBounds {
    GeoBounds::new(51.4595, 51.4495, -2.5829, -2.5929)
        .unwrap_or_else(|err| panic!("Bristol bounds should be valid: {err}"))
}
