//! Shared fixtures for the integration tests.

use std::path::PathBuf;

use serde_json::{json, Value};
use tubular_lib::{Material, MaterialCatalog, MemberDefinition};

/// Path to the fixtures directory (materials table, sample members).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Catalog loaded from the fixture materials table.
#[allow(dead_code)]
pub fn fixture_catalog() -> MaterialCatalog {
    MaterialCatalog::from_path(&fixtures_dir().join("materials.csv"))
        .expect("load fixture materials.csv")
}

/// In-memory catalog with a single steel of the given density.
#[allow(dead_code)]
pub fn steel_catalog(rho: f64) -> MaterialCatalog {
    MaterialCatalog::from_materials([Material {
        name: "steel".to_string(),
        e: 200e9,
        g: 79.3e9,
        sigma_y: 345e6,
        sigma_ult: 450e6,
        rho,
        unit_cost: 0.7,
    }])
    .expect("valid steel")
}

/// Uniform vertical cylinder from `z0` to `z0 + length`.
///
/// `extra` is merged into the definition, so tests can add features without
/// repeating the geometry.
#[allow(dead_code)]
pub fn cylinder(z0: f64, length: f64, diameter: f64, wall: f64, extra: Value) -> MemberDefinition {
    let mut value = json!({
        "name": "cylinder",
        "joint1": [0.0, 0.0, z0],
        "joint2": [0.0, 0.0, z0 + length],
        "grid": [0.0, 1.0],
        "outer": {"shape": "circular", "diameter": [diameter, diameter]},
        "layers": [{"material": "steel", "thickness": [wall, wall]}]
    });
    if let (Some(base), Value::Object(additions)) = (value.as_object_mut(), extra) {
        base.extend(additions);
    }
    serde_json::from_value(value).expect("valid member definition")
}

#[allow(dead_code)]
pub fn assert_relative(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    assert!(
        ((actual - expected) / scale).abs() <= tolerance,
        "{actual} differs from {expected} by more than {tolerance} (relative)"
    );
}
