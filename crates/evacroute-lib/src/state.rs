//! Application state owned by a front-end.
//!
//! [`EvacuationState`] holds the building, the live hazard store, and the
//! currently viewed floor and selected position. Front-ends mutate it through
//! the methods here and call [`EvacuationState::route`] after every change;
//! the routing engine itself only ever sees the values extracted from it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::building::{Building, FloorDefinition, FloorId, NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::hazard::{HazardKind, HazardSnapshot, HazardStore};
use crate::output::{node_statuses, NodeStatus, RouteSummary};
use crate::routing::{route_with_snapshot, RouteOutcome};

/// Routing computed from a single snapshot, with everything needed to render it.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub snapshot: HazardSnapshot,
    pub outcome: RouteOutcome,
    pub summary: RouteSummary,
    pub nodes: Vec<NodeStatus>,
}

/// Floor, position, and hazard state for one session.
#[derive(Debug)]
pub struct EvacuationState {
    building: Arc<Building>,
    hazards: Arc<HazardStore>,
    floor: FloorId,
    position: Option<NodeId>,
}

impl EvacuationState {
    /// Start on the building's first floor with nothing selected.
    pub fn new(building: Arc<Building>) -> Result<Self> {
        Self::with_store(building, Arc::new(HazardStore::new()))
    }

    /// Like [`EvacuationState::new`], sharing an existing hazard store.
    pub fn with_store(building: Arc<Building>, hazards: Arc<HazardStore>) -> Result<Self> {
        let floor = building
            .default_floor()
            .map(|floor| floor.id.clone())
            .ok_or(Error::EmptyBuilding)?;
        Ok(Self {
            building,
            hazards,
            floor,
            position: None,
        })
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    pub fn hazards(&self) -> &HazardStore {
        &self.hazards
    }

    pub fn floor_id(&self) -> &str {
        &self.floor
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    /// Definition of the currently viewed floor.
    pub fn current_floor(&self) -> Result<&FloorDefinition> {
        self.building.require_floor(&self.floor)
    }

    /// Switch the viewed floor. The selected position belongs to the old
    /// floor and is cleared.
    pub fn select_floor(&mut self, floor: &str) -> Result<()> {
        self.building.require_floor(floor)?;
        if self.floor != floor {
            info!(from = %self.floor, to = floor, "floor switched");
            self.floor = floor.to_string();
            self.position = None;
        }
        Ok(())
    }

    /// Select (or with `None`, deselect) the current position on this floor.
    /// Exits are rejected: a position is always a room to evacuate from.
    pub fn select_position(&mut self, node: Option<&str>) -> Result<()> {
        if let Some(node) = node {
            self.current_floor()?.require_position(node)?;
        }
        debug!(floor = %self.floor, position = ?node, "position selected");
        self.position = node.map(str::to_string);
        Ok(())
    }

    /// Record a hazard on a node of the given floor.
    pub fn set_hazard(&self, floor: &str, node: &str, kind: HazardKind) -> Result<()> {
        self.require_hazard_target(floor, node)?;
        self.hazards.set_hazard(floor, node, kind);
        Ok(())
    }

    /// Remove the hazard on a node, returning what was there.
    pub fn clear_hazard(&self, floor: &str, node: &str) -> Result<HazardKind> {
        self.require_hazard_target(floor, node)?;
        Ok(self.hazards.clear_hazard(floor, node))
    }

    /// Remove every hazard on a floor.
    pub fn clear_floor_hazards(&self, floor: &str) -> Result<usize> {
        self.building.require_floor(floor)?;
        Ok(self.hazards.clear_floor(floor))
    }

    fn require_hazard_target(&self, floor: &str, node: &str) -> Result<()> {
        let result = self
            .building
            .require_floor(floor)
            .and_then(|definition| definition.require_node(node));
        if let Err(err) = &result {
            warn!(floor, node, error = %err, "rejected hazard change");
        }
        result.map(|_| ())
    }

    /// Move from the current stair node to the first stair on `target`.
    ///
    /// Floors are connected only through stairs, never by a corridor, so this
    /// is the sole way a position changes floor.
    pub fn take_stairs(&mut self, target: &str) -> Result<&str> {
        let position = self.position.as_deref().ok_or(Error::NoPositionSelected)?;
        let current = self.current_floor()?;
        if current.node_kind(position) != Some(NodeKind::Stair) {
            return Err(Error::NotOnStairs {
                floor: current.id.clone(),
                node: position.to_string(),
            });
        }

        let arrival = self
            .building
            .require_floor(target)?
            .stair_ids()
            .next()
            .ok_or_else(|| Error::NoStairsOnFloor {
                floor: target.to_string(),
            })?
            .to_string();

        info!(from = %self.floor, to = target, stair = %arrival, "took stairs");
        self.floor = target.to_string();
        self.position = Some(arrival);
        Ok(self.position.as_deref().unwrap_or_default())
    }

    /// Route from the current position with a fresh hazard snapshot.
    pub fn route(&self) -> Result<RouteView> {
        let floor = self.current_floor()?;
        let snapshot = self.hazards.snapshot(&floor.id);
        let position = self.position();
        let outcome = route_with_snapshot(floor, position, &snapshot);
        let summary = RouteSummary::from_outcome(floor, position, &snapshot, &outcome);
        let nodes = node_statuses(floor, &snapshot, position, &outcome);
        Ok(RouteView {
            snapshot,
            outcome,
            summary,
            nodes,
        })
    }
}
