//! Shared fixtures for integration tests.

use std::path::PathBuf;

use evacroute_lib::{Building, FloorDefinition, HazardKind, HazardSnapshot};

/// Path to the sample building definition shipped with the crate.
#[allow(dead_code)]
pub fn sample_building_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_building.json")
}

/// Every floor of the sample building, in declaration order.
#[allow(dead_code)]
pub fn sample_floors() -> Vec<FloorDefinition> {
    Building::sample().floors.clone()
}

/// The ground floor of the sample building.
#[allow(dead_code)]
pub fn ground_floor() -> FloorDefinition {
    Building::sample()
        .floor("ground")
        .cloned()
        .expect("sample building has a ground floor")
}

/// Snapshot of the ground floor with the given hazards.
#[allow(dead_code)]
pub fn ground_hazards(assignments: &[(&str, HazardKind)]) -> HazardSnapshot {
    HazardSnapshot::from_assignments("ground", assignments.iter().copied())
}
