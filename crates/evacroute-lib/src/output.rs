use std::fmt::Write;

use serde::Serialize;

use crate::building::{FloorDefinition, NodeId, NodeKind};
use crate::hazard::{HazardKind, HazardSnapshot};
use crate::routing::{NoRouteReason, RouteOutcome};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// High-level status shown to the occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Route,
    NoRoute,
}

/// Named node reference used for endpoints and hazard listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub name: String,
}

impl NodeRef {
    fn new(floor: &FloorDefinition, id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: floor.node_name(id).to_string(),
        }
    }
}

/// Step taken while following a route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
}

/// Active hazard on the floor at the time the route was computed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HazardEntry {
    pub id: NodeId,
    pub name: String,
    pub hazard: HazardKind,
}

/// Structured representation of a routing outcome that front-ends can
/// serialise or render.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub floor: NodeRef,
    pub status: RouteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u64>,
    pub hops: usize,
    pub steps: Vec<RouteStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoRouteReason>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    pub hazards: Vec<HazardEntry>,
}

impl RouteSummary {
    /// Convert a [`RouteOutcome`] into a summary with resolved node names.
    ///
    /// `snapshot` should be the one the outcome was computed from so the
    /// hazard listing matches the route.
    pub fn from_outcome(
        floor: &FloorDefinition,
        start: Option<&str>,
        snapshot: &HazardSnapshot,
        outcome: &RouteOutcome,
    ) -> Self {
        let hazards = snapshot
            .active()
            .into_iter()
            .map(|(id, hazard)| HazardEntry {
                name: floor.node_name(&id).to_string(),
                id,
                hazard,
            })
            .collect();
        let floor_ref = NodeRef {
            id: floor.id.clone(),
            name: floor.display_name().to_string(),
        };
        let start = start.map(|id| NodeRef::new(floor, id));

        match outcome {
            RouteOutcome::Found(route) => {
                let steps = route
                    .path
                    .iter()
                    .enumerate()
                    .map(|(index, id)| RouteStep {
                        index,
                        id: id.clone(),
                        name: floor.node_name(id).to_string(),
                        kind: floor.node_kind(id),
                    })
                    .collect();
                let exit = NodeRef::new(floor, &route.exit_id);
                Self {
                    message: format!("Evacuate via {}", exit.name),
                    floor: floor_ref,
                    status: RouteStatus::Route,
                    start,
                    exit: Some(exit),
                    distance: Some(route.distance),
                    hops: route.hop_count(),
                    steps,
                    reason: None,
                    guidance: None,
                    hazards,
                }
            }
            RouteOutcome::NoRoute { reason } => Self {
                floor: floor_ref,
                status: RouteStatus::NoRoute,
                start,
                exit: None,
                distance: None,
                hops: 0,
                steps: Vec::new(),
                reason: Some(*reason),
                message: reason.message().to_string(),
                guidance: Some(reason.guidance().to_string()),
                hazards,
            },
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        match (&self.exit, self.distance) {
            (Some(exit), Some(distance)) => {
                let _ = writeln!(
                    buffer,
                    "Route on {}: {} -> {} (distance {}, {} hops)",
                    self.floor.name,
                    self.start_name(),
                    exit.name,
                    distance,
                    self.hops
                );
                for step in &self.steps {
                    let _ = writeln!(
                        buffer,
                        "{:>3}: {} ({}){}",
                        step.index,
                        step.name,
                        step.id,
                        step_marker(step.kind)
                    );
                }
            }
            _ => {
                let _ = writeln!(
                    buffer,
                    "No route on {} from {}: {}",
                    self.floor.name,
                    self.start_name(),
                    self.message
                );
                if let Some(guidance) = &self.guidance {
                    let _ = writeln!(buffer, "{guidance}");
                }
            }
        }
        self.render_hazards(&mut buffer, "Hazards:", "  - ");
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        match (&self.exit, self.distance) {
            (Some(exit), Some(distance)) => {
                let _ = writeln!(
                    buffer,
                    "**Route** on _{}_ to **{}** (distance {}, {} hops)",
                    self.floor.name, exit.name, distance, self.hops
                );
                for step in &self.steps {
                    let _ = writeln!(
                        buffer,
                        "* {:>2}. **{}** (`{}`){}",
                        step.index,
                        step.name,
                        step.id,
                        step_marker(step.kind)
                    );
                }
            }
            _ => {
                let _ = writeln!(
                    buffer,
                    "**No route** on _{}_: {}",
                    self.floor.name, self.message
                );
                if let Some(guidance) = &self.guidance {
                    let _ = writeln!(buffer, "> {guidance}");
                }
            }
        }
        self.render_hazards(&mut buffer, "**Hazards**", "* ");
        buffer
    }

    fn render_hazards(&self, buffer: &mut String, heading: &str, bullet: &str) {
        if self.hazards.is_empty() {
            return;
        }
        let _ = writeln!(buffer, "{heading}");
        for hazard in &self.hazards {
            let _ = writeln!(
                buffer,
                "{bullet}{} ({}): {}",
                hazard.name, hazard.id, hazard.hazard
            );
        }
    }

    fn start_name(&self) -> &str {
        self.start
            .as_ref()
            .map(|start| start.name.as_str())
            .unwrap_or("<none selected>")
    }
}

fn step_marker(kind: Option<NodeKind>) -> &'static str {
    match kind {
        Some(NodeKind::Stair) => " [stairs]",
        Some(NodeKind::Exit) => " [exit]",
        _ => "",
    }
}

/// Per-node view used to highlight a floor map.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeStatus {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub hazard: HazardKind,
    pub impassable: bool,
    pub on_route: bool,
    pub selected: bool,
}

/// Highlight information for every declared node on a floor.
///
/// Uses the same impassability predicate as routing.
pub fn node_statuses(
    floor: &FloorDefinition,
    snapshot: &HazardSnapshot,
    position: Option<&str>,
    outcome: &RouteOutcome,
) -> Vec<NodeStatus> {
    let route = outcome.route();
    floor
        .node_ids()
        .filter_map(|id| {
            let kind = floor.node_kind(id)?;
            Some(NodeStatus {
                id: id.to_string(),
                name: floor.node_name(id).to_string(),
                kind,
                hazard: snapshot.kind(id),
                impassable: snapshot.is_impassable(id),
                on_route: route.is_some_and(|route| route.path.iter().any(|step| step == id)),
                selected: position == Some(id),
            })
        })
        .collect()
}
