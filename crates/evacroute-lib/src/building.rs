use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Identifier for a room or exit. Unique within a floor.
pub type NodeId = String;

/// Identifier for a floor within a building.
pub type FloorId = String;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Building definition shipped with the crate and used when no file is given.
const SAMPLE_BUILDING_JSON: &str = include_str!("../data/sample_building.json");

static SAMPLE_BUILDING: Lazy<Building> = Lazy::new(|| {
    Building::from_json_str(SAMPLE_BUILDING_JSON).expect("embedded sample building is valid")
});

/// Classification of a declared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Room,
    Stair,
    Exit,
}

impl NodeKind {
    pub fn is_exit(self) -> bool {
        matches!(self, NodeKind::Exit)
    }

    pub fn is_stair(self) -> bool {
        matches!(self, NodeKind::Stair)
    }
}

/// A room on a floor. Stair rooms connect floors through a floor switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub stair: bool,
}

/// A building exit; candidate destination for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Undirected corridor between two nodes on the same floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub a: NodeId,
    pub b: NodeId,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Static topology for one floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorDefinition {
    pub id: FloorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub corridors: Vec<Corridor>,
}

impl FloorDefinition {
    /// Human-readable floor label, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// All declared node ids: rooms first, then exits, in declaration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms
            .iter()
            .map(|room| room.id.as_str())
            .chain(self.exits.iter().map(|exit| exit.id.as_str()))
    }

    /// Exit ids in declaration order.
    pub fn exit_ids(&self) -> impl Iterator<Item = &str> {
        self.exits.iter().map(|exit| exit.id.as_str())
    }

    /// Stair room ids in declaration order.
    pub fn stair_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms
            .iter()
            .filter(|room| room.stair)
            .map(|room| room.id.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.rooms.len() + self.exits.len()
    }

    /// Classify a node, or `None` if the floor does not declare it.
    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        if let Some(room) = self.rooms.iter().find(|room| room.id == id) {
            return Some(if room.stair {
                NodeKind::Stair
            } else {
                NodeKind::Room
            });
        }
        self.exits
            .iter()
            .any(|exit| exit.id == id)
            .then_some(NodeKind::Exit)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_kind(id).is_some()
    }

    pub fn is_exit(&self, id: &str) -> bool {
        self.exits.iter().any(|exit| exit.id == id)
    }

    /// Display label for a node, falling back to its identifier.
    pub fn node_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.rooms
            .iter()
            .find(|room| room.id == id)
            .and_then(|room| room.name.as_deref())
            .or_else(|| {
                self.exits
                    .iter()
                    .find(|exit| exit.id == id)
                    .and_then(|exit| exit.name.as_deref())
            })
            .unwrap_or(id)
    }

    /// Resolve a node id, producing an [`Error::UnknownNode`] with suggestions
    /// when the floor does not declare it.
    pub fn require_node(&self, id: &str) -> Result<NodeKind> {
        self.node_kind(id).ok_or_else(|| Error::UnknownNode {
            floor: self.id.clone(),
            node: id.to_string(),
            suggestions: self.fuzzy_node_matches(id, 3),
        })
    }

    /// Resolve a node that can be a starting position: any room, never an exit.
    pub fn require_position(&self, id: &str) -> Result<NodeKind> {
        match self.require_node(id)? {
            NodeKind::Exit => Err(Error::PositionIsExit {
                floor: self.id.clone(),
                node: id.to_string(),
            }),
            kind => Ok(kind),
        }
    }

    /// Node ids similar to `query`, best match first.
    pub fn fuzzy_node_matches(&self, query: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(self.node_ids(), query, limit)
    }

    /// Check the floor graph invariants: unique ids, corridor endpoints
    /// declared, positive weights, no self loops.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for id in self.node_ids() {
            if !seen.insert(id) {
                return Err(Error::DuplicateNode {
                    floor: self.id.clone(),
                    node: id.to_string(),
                });
            }
        }

        for corridor in &self.corridors {
            for endpoint in [&corridor.a, &corridor.b] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(Error::DanglingCorridor {
                        floor: self.id.clone(),
                        a: corridor.a.clone(),
                        b: corridor.b.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if corridor.a == corridor.b {
                return Err(Error::SelfLoop {
                    floor: self.id.clone(),
                    node: corridor.a.clone(),
                });
            }
            if corridor.weight == 0 {
                return Err(Error::NonPositiveWeight {
                    floor: self.id.clone(),
                    a: corridor.a.clone(),
                    b: corridor.b.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Complete building definition: one graph per floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub floors: Vec<FloorDefinition>,
}

impl Building {
    /// The sample two-floor building embedded in the crate.
    pub fn sample() -> Self {
        SAMPLE_BUILDING.clone()
    }

    /// Parse and validate a building definition from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let building: Building = serde_json::from_str(json)?;
        building.validate()?;
        Ok(building)
    }

    /// Look up the static topology for a floor.
    pub fn floor(&self, id: &str) -> Option<&FloorDefinition> {
        self.floors.iter().find(|floor| floor.id == id)
    }

    /// Like [`Building::floor`], but reports unknown floors with suggestions.
    pub fn require_floor(&self, id: &str) -> Result<&FloorDefinition> {
        self.floor(id).ok_or_else(|| Error::UnknownFloor {
            floor: id.to_string(),
            suggestions: fuzzy_matches(self.floor_ids(), id, 3),
        })
    }

    pub fn floor_ids(&self) -> impl Iterator<Item = &str> {
        self.floors.iter().map(|floor| floor.id.as_str())
    }

    /// The first declared floor, used as the initial view.
    pub fn default_floor(&self) -> Option<&FloorDefinition> {
        self.floors.first()
    }

    pub fn validate(&self) -> Result<()> {
        if self.floors.is_empty() {
            return Err(Error::EmptyBuilding);
        }
        let mut seen = HashSet::new();
        for floor in &self.floors {
            if !seen.insert(floor.id.as_str()) {
                return Err(Error::DuplicateFloor {
                    floor: floor.id.clone(),
                });
            }
            floor.validate()?;
        }
        Ok(())
    }
}

/// Load and validate a building definition from a JSON file.
pub fn load_building(path: &Path) -> Result<Building> {
    if !path.exists() {
        return Err(Error::BuildingNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "reading building definition");
    let contents = fs::read_to_string(path)?;
    let building = Building::from_json_str(&contents)?;
    info!(
        building = %building.name,
        floors = building.floors.len(),
        "building definition loaded"
    );
    Ok(building)
}

fn fuzzy_matches<'a>(
    candidates: impl Iterator<Item = &'a str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let query = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| {
            (
                strsim::jaro_winkler(&query, &candidate.to_lowercase()),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(corridors: Vec<Corridor>) -> FloorDefinition {
        FloorDefinition {
            id: "f".to_string(),
            name: None,
            rooms: vec![
                Room {
                    id: "r1".to_string(),
                    name: Some("Room One".to_string()),
                    stair: false,
                },
                Room {
                    id: "s".to_string(),
                    name: None,
                    stair: true,
                },
            ],
            exits: vec![Exit {
                id: "x".to_string(),
                name: None,
            }],
            corridors,
        }
    }

    fn corridor(a: &str, b: &str, weight: u32) -> Corridor {
        Corridor {
            a: a.to_string(),
            b: b.to_string(),
            weight,
        }
    }

    #[test]
    fn node_kind_distinguishes_rooms_stairs_and_exits() {
        let floor = floor(vec![]);
        assert_eq!(floor.node_kind("r1"), Some(NodeKind::Room));
        assert_eq!(floor.node_kind("s"), Some(NodeKind::Stair));
        assert_eq!(floor.node_kind("x"), Some(NodeKind::Exit));
        assert_eq!(floor.node_kind("nope"), None);
        assert_eq!(floor.node_name("r1"), "Room One");
        assert_eq!(floor.node_name("x"), "x");
    }

    #[test]
    fn exits_are_not_positions() {
        let sample = Building::sample();
        let ground = sample.require_floor("ground").expect("ground");
        assert_eq!(ground.require_position("kitchen").ok(), Some(NodeKind::Room));
        assert_eq!(ground.require_position("stair_g").ok(), Some(NodeKind::Stair));
        assert!(matches!(
            ground.require_position("A"),
            Err(Error::PositionIsExit { ref node, .. }) if node == "A"
        ));
        assert!(matches!(
            ground.require_position("kitchn"),
            Err(Error::UnknownNode { .. })
        ));
    }

    #[test]
    fn dangling_corridor_is_rejected() {
        let floor = floor(vec![corridor("r1", "ghost", 1)]);
        let err = floor.validate().expect_err("dangling endpoint");
        assert!(matches!(err, Error::DanglingCorridor { missing, .. } if missing == "ghost"));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let floor = floor(vec![corridor("r1", "x", 0)]);
        assert!(matches!(
            floor.validate(),
            Err(Error::NonPositiveWeight { .. })
        ));
    }

    #[test]
    fn shared_namespace_rejects_room_exit_collision() {
        let mut floor = floor(vec![]);
        floor.exits.push(Exit {
            id: "r1".to_string(),
            name: None,
        });
        assert!(matches!(floor.validate(), Err(Error::DuplicateNode { .. })));
    }

    #[test]
    fn corridor_weight_defaults_to_one() {
        let json = r#"{"name":"t","floors":[{"id":"g","rooms":[{"id":"a"}],
            "exits":[{"id":"e"}],"corridors":[{"a":"a","b":"e"}]}]}"#;
        let building = Building::from_json_str(json).expect("valid building");
        assert_eq!(building.floors[0].corridors[0].weight, 1);
    }

    #[test]
    fn sample_building_is_valid() {
        let building = Building::sample();
        assert_eq!(building.floor_ids().collect::<Vec<_>>(), ["ground", "first"]);
        let ground = building.floor("ground").expect("ground floor");
        assert_eq!(ground.exit_ids().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(ground.stair_ids().collect::<Vec<_>>(), ["stair_g"]);
    }

    #[test]
    fn unknown_floor_suggests_close_names() {
        let building = Building::sample();
        let err = building.require_floor("grund").expect_err("typo");
        assert!(err.to_string().contains("Did you mean 'ground'?"));
    }

    #[test]
    fn empty_building_is_rejected() {
        let err = Building::from_json_str(r#"{"name":"t","floors":[]}"#).expect_err("no floors");
        assert!(matches!(err, Error::EmptyBuilding));
    }
}
