//! Rendering of routes, floor listings and node status views.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use evacroute_lib::{
    Building, FloorDefinition, HazardStore, NodeKind, NodeStatus, RouteRenderMode, RouteSummary,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text.
    #[default]
    Text,
    /// Markdown-flavoured text for chat or notes.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    fn render_mode(self) -> Option<RouteRenderMode> {
        match self {
            OutputFormat::Text => Some(RouteRenderMode::PlainText),
            OutputFormat::Rich => Some(RouteRenderMode::RichText),
            OutputFormat::Json => None,
        }
    }
}

/// Render a route summary in the requested format.
pub fn render_summary(summary: &RouteSummary, format: OutputFormat) -> Result<String> {
    match format.render_mode() {
        Some(mode) => Ok(summary.render(mode)),
        None => Ok(format!("{}\n", serde_json::to_string_pretty(summary)?)),
    }
}

/// One row of the `floors` listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FloorInfo {
    pub id: String,
    pub name: String,
    pub rooms: usize,
    pub exits: Vec<String>,
    pub stairs: Vec<String>,
    pub active_hazards: usize,
}

impl FloorInfo {
    pub fn new(floor: &FloorDefinition, hazards: &HazardStore) -> Self {
        Self {
            id: floor.id.clone(),
            name: floor.display_name().to_string(),
            rooms: floor.rooms.len(),
            exits: floor.exit_ids().map(str::to_string).collect(),
            stairs: floor.stair_ids().map(str::to_string).collect(),
            active_hazards: hazards.snapshot(&floor.id).len(),
        }
    }
}

/// Render every floor of the building with its exits and stairs.
pub fn render_floors(
    building: &Building,
    hazards: &HazardStore,
    format: OutputFormat,
) -> Result<String> {
    let floors: Vec<FloorInfo> = building
        .floors
        .iter()
        .map(|floor| FloorInfo::new(floor, hazards))
        .collect();

    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&floors)?));
    }

    let mut buffer = String::new();
    let _ = writeln!(buffer, "{} ({} floors)", building.name, floors.len());
    for floor in &floors {
        let (open, close) = match format {
            OutputFormat::Rich => ("* **", "**"),
            _ => ("  ", ""),
        };
        let _ = writeln!(
            buffer,
            "{open}{}{close} {}: {} rooms, exits [{}], stairs [{}]",
            floor.id,
            floor.name,
            floor.rooms,
            floor.exits.join(", "),
            floor.stairs.join(", ")
        );
    }
    Ok(buffer)
}

/// Render per-node highlight information for the current floor.
pub fn render_node_statuses(
    floor: &FloorDefinition,
    nodes: &[NodeStatus],
    format: OutputFormat,
    palette: ColorPalette,
) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(nodes)?));
    }

    let mut buffer = String::new();
    let _ = writeln!(buffer, "Floor {} ({})", floor.display_name(), floor.id);
    for node in nodes {
        let marker = if node.selected {
            '@'
        } else if node.on_route {
            '*'
        } else if node.impassable {
            'x'
        } else {
            ' '
        };
        let color = if node.impassable {
            palette.impassable
        } else if node.hazard.blocks_exit() {
            palette.exit_blocked
        } else if node.selected {
            palette.selected
        } else if node.on_route {
            palette.on_route
        } else {
            palette.name
        };
        let kind = match node.kind {
            NodeKind::Room => "room",
            NodeKind::Stair => "stairs",
            NodeKind::Exit => "exit",
        };
        let _ = write!(
            buffer,
            " [{marker}] {color}{}{reset} {muted}({}, {kind}){reset}",
            node.name,
            node.id,
            reset = palette.reset,
            muted = palette.muted,
        );
        if !node.hazard.is_clear() {
            let _ = write!(buffer, " {color}{}{}", node.hazard, palette.reset);
        }
        buffer.push('\n');
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evacroute_lib::{node_statuses, route_with_snapshot, HazardKind, HazardSnapshot};

    fn ground() -> FloorDefinition {
        Building::sample()
            .floor("ground")
            .cloned()
            .expect("ground floor")
    }

    #[test]
    fn floors_listing_shows_exits_and_stairs() {
        let building = Building::sample();
        let hazards = HazardStore::new();
        hazards.set_hazard("first", "lab", HazardKind::Smoke);

        let text = render_floors(&building, &hazards, OutputFormat::Text).unwrap();
        assert!(text.contains("ground Ground Floor: 7 rooms, exits [A, B], stairs [stair_g]"));

        let json = render_floors(&building, &hazards, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[1]["id"], "first");
        assert_eq!(parsed[1]["active_hazards"], 1);
    }

    #[test]
    fn status_view_marks_route_hazards_and_selection() {
        let floor = ground();
        let snapshot = HazardSnapshot::from_assignments(
            "ground",
            [
                ("washroom", HazardKind::Blocked),
                ("A", HazardKind::ExitBlocked),
            ],
        );
        let outcome = route_with_snapshot(&floor, Some("main_hall"), &snapshot);
        let nodes = node_statuses(&floor, &snapshot, Some("main_hall"), &outcome);

        let text =
            render_node_statuses(&floor, &nodes, OutputFormat::Text, ColorPalette::plain())
                .unwrap();
        assert!(text.contains(" [@] Main Hall (main_hall, room)"));
        assert!(text.contains(" [x] Washroom (washroom, room) blocked"));
        assert!(text.contains(" [*] Kitchen (kitchen, room)"));
        assert!(text.contains(" [ ] Exit A (A, exit) exit-blocked"));
        assert!(text.contains(" [*] Exit B (B, exit)"));
    }

    #[test]
    fn json_summary_is_parseable() {
        let floor = ground();
        let snapshot = HazardSnapshot::empty("ground");
        let outcome = route_with_snapshot(&floor, Some("control"), &snapshot);
        let summary = RouteSummary::from_outcome(&floor, Some("control"), &snapshot, &outcome);

        let json = render_summary(&summary, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"], "route");
        assert_eq!(parsed["exit"]["id"], "B");
        assert_eq!(parsed["distance"], 1);
    }
}
