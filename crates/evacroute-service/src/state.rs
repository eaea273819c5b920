//! Shared state handed to every handler.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use evacroute_lib::{load_building, Building, HazardStore, Result as LibResult};

/// Building topology plus the live hazard store.
///
/// Cheap to clone; handlers receive it through axum's `State` extractor.
/// Hazard writes go through the store's own lock, and routing reads one
/// snapshot per request.
#[derive(Clone)]
pub struct AppState {
    building: Arc<Building>,
    hazards: Arc<HazardStore>,
}

impl AppState {
    pub fn new(building: Building) -> Self {
        Self {
            building: Arc::new(building),
            hazards: Arc::new(HazardStore::new()),
        }
    }

    /// Load the building definition at `path`, or the built-in sample.
    pub fn load(path: Option<&Path>) -> LibResult<Self> {
        let building = match path {
            Some(path) => load_building(path)?,
            None => {
                info!("no building configured; serving the built-in sample");
                Building::sample()
            }
        };
        Ok(Self::new(building))
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn hazards(&self) -> &HazardStore {
        &self.hazards
    }
}
