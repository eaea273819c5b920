//! Evacuation routing library entry points.
//!
//! This crate loads building floor plans, tracks hazards per floor, and
//! computes the shortest hazard-free path from a selected location to the
//! nearest open exit. Higher-level consumers (CLI, HTTP service) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod building;
pub mod error;
pub mod graph;
pub mod hazard;
pub mod output;
pub mod path;
pub mod routing;
pub mod state;

pub use building::{
    load_building, Building, Corridor, Exit, FloorDefinition, FloorId, NodeId, NodeKind, Room,
};
pub use error::{Error, Result};
pub use graph::{build_traversable_adjacency, Adjacency, Edge};
pub use hazard::{HazardKind, HazardSnapshot, HazardStore, SnapshotSource};
pub use output::{
    node_statuses, HazardEntry, NodeRef, NodeStatus, RouteRenderMode, RouteStatus, RouteStep,
    RouteSummary,
};
pub use path::{compute_distances, reconstruct_path, Distance, ShortestPaths};
pub use routing::{find_route, route_with_snapshot, NoRouteReason, RouteOutcome, RouteResult};
pub use state::{EvacuationState, RouteView};
