use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::building::{FloorDefinition, NodeId};
use crate::graph::build_traversable_adjacency;
use crate::hazard::HazardSnapshot;

/// Tentative or final path cost. `Infinite` orders after every finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u64),
    Infinite,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0);

    pub fn finite(self) -> Option<u64> {
        match self {
            Distance::Finite(value) => Some(value),
            Distance::Infinite => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Extend by one corridor weight; infinity absorbs.
    pub fn extend(self, weight: u32) -> Distance {
        match self {
            Distance::Finite(value) => Distance::Finite(value.saturating_add(u64::from(weight))),
            Distance::Infinite => Distance::Infinite,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(value) => write!(f, "{value}"),
            Distance::Infinite => f.write_str("inf"),
        }
    }
}

/// Single-source shortest-path tables for one floor.
///
/// Every declared node has an entry; unreachable nodes are `Infinite` with
/// no predecessor.
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    distances: HashMap<NodeId, Distance>,
    predecessors: HashMap<NodeId, Option<NodeId>>,
}

impl ShortestPaths {
    fn unreached(floor: &FloorDefinition) -> Self {
        let distances = floor
            .node_ids()
            .map(|id| (id.to_string(), Distance::Infinite))
            .collect();
        let predecessors = floor.node_ids().map(|id| (id.to_string(), None)).collect();
        Self {
            distances,
            predecessors,
        }
    }

    /// Distance from the source; undeclared nodes are `Infinite`.
    pub fn distance(&self, node: &str) -> Distance {
        self.distances
            .get(node)
            .copied()
            .unwrap_or(Distance::Infinite)
    }

    pub fn predecessor(&self, node: &str) -> Option<&str> {
        self.predecessors
            .get(node)
            .and_then(|previous| previous.as_deref())
    }

    pub fn is_reachable(&self, node: &str) -> bool {
        self.distance(node).is_finite()
    }

    /// Number of nodes with a finite distance (including the source).
    pub fn reachable_count(&self) -> usize {
        self.distances
            .values()
            .filter(|distance| distance.is_finite())
            .count()
    }
}

/// Run Dijkstra's algorithm from `start` over the hazard-filtered floor graph.
///
/// Hazards are excluded at three points: an impassable start yields no
/// traversal at all, an impassable node is never expanded, and an
/// impassable neighbour is never relaxed. The adjacency itself already drops
/// corridors touching impassable nodes.
pub fn compute_distances(
    floor: &FloorDefinition,
    start: &str,
    snapshot: &HazardSnapshot,
) -> ShortestPaths {
    let mut paths = ShortestPaths::unreached(floor);

    if snapshot.is_impassable(start) || !paths.distances.contains_key(start) {
        return paths;
    }

    let adjacency = build_traversable_adjacency(floor, snapshot);
    let mut queue = BinaryHeap::new();

    paths.distances.insert(start.to_string(), Distance::ZERO);
    queue.push(QueueEntry::new(start.to_string(), 0));

    while let Some(entry) = queue.pop() {
        if Distance::Finite(entry.cost) > paths.distance(&entry.node) {
            continue;
        }

        if snapshot.is_impassable(&entry.node) {
            continue;
        }

        for edge in adjacency.neighbours(&entry.node) {
            if snapshot.is_impassable(&edge.target) {
                continue;
            }

            let candidate = Distance::Finite(entry.cost).extend(edge.weight);
            if candidate < paths.distance(&edge.target) {
                paths.distances.insert(edge.target.clone(), candidate);
                paths
                    .predecessors
                    .insert(edge.target.clone(), Some(entry.node.clone()));
                if let Some(cost) = candidate.finite() {
                    queue.push(QueueEntry::new(edge.target.clone(), cost));
                }
            }
        }
    }

    paths
}

/// Walk predecessor links back from `goal` to `start`.
///
/// Returns `None` if the chain does not lead back to `start`.
pub fn reconstruct_path(paths: &ShortestPaths, start: &str, goal: &str) -> Option<Vec<NodeId>> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    // A well-formed chain visits each node at most once.
    let limit = paths.distances.len();

    while current != start {
        let previous = paths.predecessor(current)?;
        path.push(previous.to_string());
        if path.len() > limit {
            return None;
        }
        current = previous;
    }

    path.reverse();
    Some(path)
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: u64,
}

impl QueueEntry {
    fn new(node: NodeId, cost: u64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
