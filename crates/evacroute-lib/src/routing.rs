//! Evacuation route selection.
//!
//! [`find_route`] is the public entry point: it takes one hazard snapshot,
//! runs the shortest-path search from the selected position, picks the
//! nearest exit that is not `exit-blocked`, and verifies the resulting path
//! before handing it back. Every outcome is a value; nothing here fails with
//! an error.
//!
//! # Example
//!
//! ```
//! use evacroute_lib::{find_route, Building, HazardKind, HazardStore};
//!
//! let building = Building::sample();
//! let ground = building.floor("ground").unwrap();
//! let hazards = HazardStore::new();
//! hazards.set_hazard("ground", "washroom", HazardKind::Blocked);
//!
//! let outcome = find_route(ground, Some("main_hall"), &hazards);
//! let route = outcome.route().unwrap();
//! assert_eq!(route.exit_id, "B");
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, error};

use crate::building::{FloorDefinition, NodeId};
use crate::hazard::{HazardSnapshot, SnapshotSource};
use crate::path::{compute_distances, reconstruct_path, Distance, ShortestPaths};

/// Verified, hazard-free route from the selected position to an exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteResult {
    pub exit_id: NodeId,
    pub distance: u64,
    pub path: Vec<NodeId>,
}

impl RouteResult {
    /// Number of corridors traversed.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

/// Why no route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoRouteReason {
    /// No position has been selected yet.
    AwaitingInput,
    /// The selected position is itself hazardous.
    StartImpassable,
    /// Every exit on the floor is marked `exit-blocked`.
    AllExitsBlocked,
    /// No open exit can be reached without crossing a hazard.
    NoReachableExit,
}

impl NoRouteReason {
    /// Short description of the outcome.
    pub fn message(self) -> &'static str {
        match self {
            NoRouteReason::AwaitingInput => "awaiting input: select your current location",
            NoRouteReason::StartImpassable => "your current location is hazardous",
            NoRouteReason::AllExitsBlocked => "all exits blocked",
            NoRouteReason::NoReachableExit => "all paths blocked or all exits closed",
        }
    }

    /// What the occupant should do in this situation.
    pub fn guidance(self) -> &'static str {
        match self {
            NoRouteReason::AwaitingInput => {
                "Select the room you are in to compute the safest way out."
            }
            NoRouteReason::StartImpassable => {
                "Leave the hazard immediately if it is safe to move, stay low beneath smoke, and contact emergency services with your location."
            }
            NoRouteReason::AllExitsBlocked | NoRouteReason::NoReachableExit => {
                "Shelter in place: close doors between you and the hazard, seal gaps, signal from a window, and call emergency services."
            }
        }
    }

    /// Whether this outcome represents a genuine failure rather than missing input.
    pub fn is_failure(self) -> bool {
        !matches!(self, NoRouteReason::AwaitingInput)
    }
}

impl fmt::Display for NoRouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of one routing computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Found(RouteResult),
    NoRoute { reason: NoRouteReason },
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NoRoute { .. } => None,
        }
    }

    pub fn into_route(self) -> Option<RouteResult> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NoRoute { .. } => None,
        }
    }

    pub fn no_route_reason(&self) -> Option<NoRouteReason> {
        match self {
            RouteOutcome::Found(_) => None,
            RouteOutcome::NoRoute { reason } => Some(*reason),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }

    fn none(reason: NoRouteReason) -> Self {
        RouteOutcome::NoRoute { reason }
    }
}

/// Compute the route to the nearest open exit.
///
/// Exactly one snapshot is taken from `hazards` on entry; every later step
/// uses it, so concurrent store writes cannot affect this computation.
pub fn find_route<S>(floor: &FloorDefinition, start: Option<&str>, hazards: &S) -> RouteOutcome
where
    S: SnapshotSource + ?Sized,
{
    let snapshot = hazards.snapshot(&floor.id);
    route_with_snapshot(floor, start, &snapshot)
}

/// Compute the route using an already-taken snapshot.
pub fn route_with_snapshot(
    floor: &FloorDefinition,
    start: Option<&str>,
    snapshot: &HazardSnapshot,
) -> RouteOutcome {
    let Some(start) = start else {
        return RouteOutcome::none(NoRouteReason::AwaitingInput);
    };

    if snapshot.is_impassable(start) {
        debug!(floor = %floor.id, start, hazard = %snapshot.kind(start), "start position is impassable");
        return RouteOutcome::none(NoRouteReason::StartImpassable);
    }

    if floor.exits.is_empty() {
        debug!(floor = %floor.id, start, "floor declares no exits");
        return RouteOutcome::none(NoRouteReason::NoReachableExit);
    }

    let candidates: Vec<&str> = floor
        .exit_ids()
        .filter(|exit| !snapshot.is_exit_blocked(exit))
        .collect();
    if candidates.is_empty() {
        debug!(floor = %floor.id, start, "every exit is marked exit-blocked");
        return RouteOutcome::none(NoRouteReason::AllExitsBlocked);
    }

    let paths = compute_distances(floor, start, snapshot);
    let Some((exit, distance)) = select_exit(&candidates, &paths) else {
        debug!(
            floor = %floor.id,
            start,
            reachable = paths.reachable_count(),
            "no open exit reachable"
        );
        return RouteOutcome::none(NoRouteReason::NoReachableExit);
    };

    let Some(path) = reconstruct_path(&paths, start, exit) else {
        error!(floor = %floor.id, start, exit, "predecessor chain broken; discarding route");
        return RouteOutcome::none(NoRouteReason::NoReachableExit);
    };

    if let Some(offender) = first_impassable_intermediate(&path, snapshot) {
        error!(
            floor = %floor.id,
            start,
            exit,
            node = offender,
            hazard = %snapshot.kind(offender),
            "route crossed an impassable node; discarding"
        );
        return RouteOutcome::none(NoRouteReason::NoReachableExit);
    }

    debug!(floor = %floor.id, start, exit, distance, hops = path.len() - 1, "route found");
    RouteOutcome::Found(RouteResult {
        exit_id: exit.to_string(),
        distance,
        path,
    })
}

/// Nearest reachable candidate; the first declared wins ties.
fn select_exit<'a>(candidates: &[&'a str], paths: &ShortestPaths) -> Option<(&'a str, u64)> {
    let mut best: Option<(&'a str, u64)> = None;
    for &exit in candidates {
        let Distance::Finite(distance) = paths.distance(exit) else {
            continue;
        };
        match best {
            Some((_, current)) if current <= distance => {}
            _ => best = Some((exit, distance)),
        }
    }
    best
}

/// Re-check every node strictly between the endpoints.
fn first_impassable_intermediate<'a>(
    path: &'a [NodeId],
    snapshot: &HazardSnapshot,
) -> Option<&'a str> {
    if path.len() < 3 {
        return None;
    }
    path[1..path.len() - 1]
        .iter()
        .map(String::as_str)
        .find(|node| snapshot.is_impassable(node))
}
