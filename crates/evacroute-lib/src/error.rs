use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the evacuation routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Routing itself never fails with an error (see [`crate::RouteOutcome`]);
/// these variants cover loading building definitions and validating the
/// identifiers callers pass in.
#[derive(Debug, Error)]
pub enum Error {
    /// Building definition file could not be located.
    #[error("building definition not found at {path}")]
    BuildingNotFound { path: PathBuf },

    /// Raised when a building definition declares no floors.
    #[error("building definition declares no floors")]
    EmptyBuilding,

    /// Raised when a floor identifier is not part of the loaded building.
    #[error("unknown floor: {floor}{}", format_suggestions(.suggestions))]
    UnknownFloor {
        floor: String,
        suggestions: Vec<String>,
    },

    /// Raised when a node identifier is not declared on the given floor.
    #[error("unknown node {node} on floor {floor}{}", format_suggestions(.suggestions))]
    UnknownNode {
        floor: String,
        node: String,
        suggestions: Vec<String>,
    },

    /// Raised when two floors share an identifier.
    #[error("duplicate floor id: {floor}")]
    DuplicateFloor { floor: String },

    /// Raised when a node id is declared twice on one floor (rooms and exits
    /// share a namespace).
    #[error("duplicate node {node} on floor {floor}")]
    DuplicateNode { floor: String, node: String },

    /// Raised when a corridor references a node the floor does not declare.
    #[error("corridor {a} <-> {b} on floor {floor} references undeclared node {missing}")]
    DanglingCorridor {
        floor: String,
        a: String,
        b: String,
        missing: String,
    },

    /// Raised when a corridor weight is zero.
    #[error("corridor {a} <-> {b} on floor {floor} must have a positive weight")]
    NonPositiveWeight { floor: String, a: String, b: String },

    /// Raised when a corridor connects a node to itself.
    #[error("corridor on floor {floor} loops back to {node}")]
    SelfLoop { floor: String, node: String },

    /// Raised when a hazard string is not one of the supported kinds.
    #[error("invalid hazard kind '{value}'; expected fire, smoke, blocked, closed, exit-blocked or clear")]
    InvalidHazardKind { value: String },

    /// Raised when a floor switch via stairs is attempted away from a stair node.
    #[error("current position {node} on floor {floor} is not a stair")]
    NotOnStairs { floor: String, node: String },

    /// Raised when the target floor of a stair transition has no stair node.
    #[error("floor {floor} has no stair to arrive at")]
    NoStairsOnFloor { floor: String },

    /// Raised when an exit is chosen as the starting position.
    #[error("{node} on floor {floor} is an exit, not a position to evacuate from")]
    PositionIsExit { floor: String, node: String },

    /// Raised when a stair transition is requested without a selected position.
    #[error("no position selected")]
    NoPositionSelected,

    /// Wrapper for JSON parsing errors in building definitions.
    #[error("failed to parse building definition: {0}")]
    BuildingParse(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
