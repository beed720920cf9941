//! Shared helpers for the `speedlimit-data` integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use base64::{Engine as _, engine::general_purpose};
use std::{fs, path::PathBuf};

/// Epsilon for floating-point coordinate comparisons in tests.
const COORDINATE_EPSILON: f64 = 1.0e-7;

/// Directory containing the encoded fixture blobs.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Decode the Base64-encoded sample extract.
///
/// The extract holds six nodes and five ways:
/// - way 10: `residential`, `maxspeed=30`, a 12 m north-bound segment;
/// - way 11: `primary`, `maxspeed=50 mph`, three nodes under a metre apart;
/// - way 12: `service` without `maxspeed`;
/// - way 13: `track`, `maxspeed=walk`;
/// - way 14: `primary`, `maxspeed=70`, referencing the missing node 999.
pub fn sample_extract() -> Vec<u8> {
    let encoded_path = fixtures_dir().join("speed_limits.osm.pbf.b64");
    let encoded = fs::read_to_string(&encoded_path).unwrap_or_else(|err| {
        panic!("failed to read base64 fixture {encoded_path:?}: {err}");
    });
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .unwrap_or_else(|err| {
            panic!("failed to decode base64 fixture {encoded_path:?}: {err}");
        })
}

/// Compare floating-point coordinates within a small epsilon.
pub fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= COORDINATE_EPSILON,
        "expected {expected}, got {actual} (|Δ| = {delta})"
    );
}
