use std::collections::HashMap;

use crate::building::{FloorDefinition, NodeId};
use crate::hazard::HazardSnapshot;

/// Directed half of a corridor within the traversable adjacency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: u32,
}

/// Hazard-filtered adjacency for one floor.
///
/// Holds an entry for every declared node, including impassable ones, which
/// simply have no neighbours. Absence of a key means the floor does not
/// declare the node.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    edges: HashMap<NodeId, Vec<Edge>>,
}

impl Adjacency {
    /// Return the neighbours for a given node identifier.
    pub fn neighbours(&self, node: &str) -> &[Edge] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the adjacency carries an entry for the node.
    pub fn contains(&self, node: &str) -> bool {
        self.edges.contains_key(node)
    }

    /// Number of node entries (equals the floor's declared node count).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of directed edges; twice the retained corridor count.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Build the adjacency used for routing on a floor.
///
/// A corridor with an impassable endpoint is dropped in both directions, so
/// no path can pass through a hazardous node. Neighbour lists follow the
/// floor's corridor declaration order.
pub fn build_traversable_adjacency(
    floor: &FloorDefinition,
    snapshot: &HazardSnapshot,
) -> Adjacency {
    let mut edges: HashMap<NodeId, Vec<Edge>> = floor
        .node_ids()
        .map(|id| (id.to_string(), Vec::new()))
        .collect();

    for corridor in &floor.corridors {
        if snapshot.is_impassable(&corridor.a) || snapshot.is_impassable(&corridor.b) {
            continue;
        }

        edges.entry(corridor.a.clone()).or_default().push(Edge {
            target: corridor.b.clone(),
            weight: corridor.weight,
        });
        edges.entry(corridor.b.clone()).or_default().push(Edge {
            target: corridor.a.clone(),
            weight: corridor.weight,
        });
    }

    Adjacency { edges }
}
