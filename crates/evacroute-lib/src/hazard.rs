//! Hazard kinds, the per-floor hazard store, and immutable snapshots.
//!
//! The store keeps one copy-on-write map per floor. Writers take the lock and
//! replace or clone-then-mutate the floor's map; [`HazardStore::snapshot`]
//! only clones the `Arc`, so a snapshot is atomic with respect to a floor and
//! can never observe a later write.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::building::{FloorId, NodeId};
use crate::error::Error;

/// Hazard state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HazardKind {
    #[default]
    Clear,
    Fire,
    Smoke,
    Blocked,
    Closed,
    /// The exit may not be used as a destination; traversal is unaffected.
    ExitBlocked,
}

impl HazardKind {
    /// Every non-clear kind, in display order.
    pub const ACTIVE: [HazardKind; 5] = [
        HazardKind::Fire,
        HazardKind::Smoke,
        HazardKind::Blocked,
        HazardKind::Closed,
        HazardKind::ExitBlocked,
    ];

    /// Whether a node carrying this hazard may not be traversed at all.
    pub fn is_impassable(self) -> bool {
        match self {
            HazardKind::Fire | HazardKind::Smoke | HazardKind::Blocked | HazardKind::Closed => true,
            HazardKind::Clear | HazardKind::ExitBlocked => false,
        }
    }

    /// Whether an exit carrying this hazard is ineligible as a destination.
    pub fn blocks_exit(self) -> bool {
        matches!(self, HazardKind::ExitBlocked)
    }

    pub fn is_clear(self) -> bool {
        matches!(self, HazardKind::Clear)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HazardKind::Clear => "clear",
            HazardKind::Fire => "fire",
            HazardKind::Smoke => "smoke",
            HazardKind::Blocked => "blocked",
            HazardKind::Closed => "closed",
            HazardKind::ExitBlocked => "exit-blocked",
        }
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardKind {
    type Err = Error;

    /// Parses the hazard vocabulary. Empty input means clear.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "clear" | "none" => Ok(HazardKind::Clear),
            "fire" => Ok(HazardKind::Fire),
            "smoke" => Ok(HazardKind::Smoke),
            "blocked" => Ok(HazardKind::Blocked),
            "closed" => Ok(HazardKind::Closed),
            "exit-blocked" | "exit_blocked" => Ok(HazardKind::ExitBlocked),
            _ => Err(Error::InvalidHazardKind {
                value: value.to_string(),
            }),
        }
    }
}

type HazardMap = HashMap<NodeId, HazardKind>;

/// Immutable, point-in-time copy of one floor's hazard assignment.
///
/// Never contains [`HazardKind::Clear`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardSnapshot {
    floor: FloorId,
    hazards: Arc<HazardMap>,
}

impl HazardSnapshot {
    /// Snapshot with no hazards.
    pub fn empty(floor: impl Into<FloorId>) -> Self {
        Self {
            floor: floor.into(),
            hazards: Arc::new(HashMap::new()),
        }
    }

    /// Build a snapshot from explicit assignments. Clear entries are dropped.
    pub fn from_assignments<I, K>(floor: impl Into<FloorId>, assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, HazardKind)>,
        K: Into<NodeId>,
    {
        let hazards = assignments
            .into_iter()
            .filter(|(_, kind)| !kind.is_clear())
            .map(|(node, kind)| (node.into(), kind))
            .collect();
        Self {
            floor: floor.into(),
            hazards: Arc::new(hazards),
        }
    }

    pub fn floor(&self) -> &str {
        &self.floor
    }

    /// Hazard kind recorded for a node; missing entries are clear.
    pub fn kind(&self, node: &str) -> HazardKind {
        self.hazards.get(node).copied().unwrap_or_default()
    }

    /// Impassability predicate shared by routing and highlighting.
    pub fn is_impassable(&self, node: &str) -> bool {
        self.kind(node).is_impassable()
    }

    /// Destination-eligibility predicate, independent of impassability.
    pub fn is_exit_blocked(&self, node: &str) -> bool {
        self.kind(node).blocks_exit()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    /// Active hazards sorted by node id.
    pub fn active(&self) -> Vec<(NodeId, HazardKind)> {
        let mut active: Vec<_> = self
            .hazards
            .iter()
            .map(|(node, kind)| (node.clone(), *kind))
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));
        active
    }
}

/// Anything that can produce a hazard snapshot for a floor.
///
/// The routing engine takes exactly one snapshot from its source per call.
pub trait SnapshotSource {
    fn snapshot(&self, floor: &str) -> HazardSnapshot;
}

impl SnapshotSource for HazardSnapshot {
    /// A snapshot is its own source. Requests for another floor see no hazards.
    fn snapshot(&self, floor: &str) -> HazardSnapshot {
        if self.floor == floor {
            self.clone()
        } else {
            HazardSnapshot::empty(floor)
        }
    }
}

/// Live, per-floor hazard assignments.
///
/// Safe to share across threads; writes are serialised by an internal lock.
#[derive(Debug, Default)]
pub struct HazardStore {
    floors: RwLock<HashMap<FloorId, Arc<HazardMap>>>,
}

impl HazardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hazard for a node; missing entries are clear.
    pub fn get_hazard(&self, floor: &str, node: &str) -> HazardKind {
        let floors = self.floors.read().unwrap_or_else(PoisonError::into_inner);
        floors
            .get(floor)
            .and_then(|hazards| hazards.get(node).copied())
            .unwrap_or_default()
    }

    /// Record a hazard. Setting [`HazardKind::Clear`] removes the entry.
    pub fn set_hazard(&self, floor: &str, node: &str, kind: HazardKind) {
        if kind.is_clear() {
            self.clear_hazard(floor, node);
            return;
        }

        let mut floors = self.floors.write().unwrap_or_else(PoisonError::into_inner);
        let hazards = floors.entry(floor.to_string()).or_default();
        Arc::make_mut(hazards).insert(node.to_string(), kind);
        debug!(floor, node, hazard = %kind, "hazard set");
    }

    /// Remove any hazard on a node, returning what was there.
    pub fn clear_hazard(&self, floor: &str, node: &str) -> HazardKind {
        let mut floors = self.floors.write().unwrap_or_else(PoisonError::into_inner);
        let Some(hazards) = floors.get_mut(floor) else {
            return HazardKind::Clear;
        };
        if !hazards.contains_key(node) {
            return HazardKind::Clear;
        }
        let previous = Arc::make_mut(hazards)
            .remove(node)
            .unwrap_or_default();
        if hazards.is_empty() {
            floors.remove(floor);
        }
        debug!(floor, node, previous = %previous, "hazard cleared");
        previous
    }

    /// Remove every hazard on a floor, returning how many were removed.
    pub fn clear_floor(&self, floor: &str) -> usize {
        let mut floors = self.floors.write().unwrap_or_else(PoisonError::into_inner);
        floors
            .remove(floor)
            .map(|hazards| hazards.len())
            .unwrap_or(0)
    }

    /// Active hazards on a floor sorted by node id.
    pub fn active_hazards(&self, floor: &str) -> Vec<(NodeId, HazardKind)> {
        self.snapshot(floor).active()
    }

    /// Floors that currently carry at least one hazard, sorted.
    pub fn floors_with_hazards(&self) -> Vec<FloorId> {
        let floors = self.floors.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = floors.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Immutable copy of a floor's current hazards.
    pub fn snapshot(&self, floor: &str) -> HazardSnapshot {
        let floors = self.floors.read().unwrap_or_else(PoisonError::into_inner);
        HazardSnapshot {
            floor: floor.to_string(),
            hazards: floors.get(floor).cloned().unwrap_or_default(),
        }
    }
}

impl SnapshotSource for HazardStore {
    fn snapshot(&self, floor: &str) -> HazardSnapshot {
        HazardStore::snapshot(self, floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impassable_and_exit_blocked_are_independent() {
        for kind in [
            HazardKind::Fire,
            HazardKind::Smoke,
            HazardKind::Blocked,
            HazardKind::Closed,
        ] {
            assert!(kind.is_impassable(), "{kind} should be impassable");
            assert!(!kind.blocks_exit());
        }
        assert!(!HazardKind::ExitBlocked.is_impassable());
        assert!(HazardKind::ExitBlocked.blocks_exit());
        assert!(!HazardKind::Clear.is_impassable());
        assert!(!HazardKind::Clear.blocks_exit());
    }

    #[test]
    fn parses_hazard_vocabulary() {
        assert_eq!("fire".parse::<HazardKind>().unwrap(), HazardKind::Fire);
        assert_eq!(
            "Exit-Blocked".parse::<HazardKind>().unwrap(),
            HazardKind::ExitBlocked
        );
        assert_eq!("".parse::<HazardKind>().unwrap(), HazardKind::Clear);
        assert!("lava".parse::<HazardKind>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&HazardKind::ExitBlocked).unwrap();
        assert_eq!(json, "\"exit-blocked\"");
        let kind: HazardKind = serde_json::from_str("\"smoke\"").unwrap();
        assert_eq!(kind, HazardKind::Smoke);
    }

    #[test]
    fn setting_clear_removes_entry() {
        let store = HazardStore::new();
        store.set_hazard("ground", "kitchen", HazardKind::Fire);
        assert_eq!(store.active_hazards("ground").len(), 1);

        store.set_hazard("ground", "kitchen", HazardKind::Clear);
        assert!(store.active_hazards("ground").is_empty());
        assert_eq!(store.get_hazard("ground", "kitchen"), HazardKind::Clear);
        assert!(store.floors_with_hazards().is_empty());
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let store = HazardStore::new();
        store.set_hazard("ground", "washroom", HazardKind::Blocked);
        let snapshot = store.snapshot("ground");

        store.set_hazard("ground", "washroom", HazardKind::Clear);
        store.set_hazard("ground", "kitchen", HazardKind::Fire);

        assert_eq!(snapshot.kind("washroom"), HazardKind::Blocked);
        assert_eq!(snapshot.kind("kitchen"), HazardKind::Clear);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn floors_are_isolated() {
        let store = HazardStore::new();
        store.set_hazard("ground", "stair", HazardKind::Smoke);
        assert!(store.snapshot("first").is_empty());
        assert_eq!(store.get_hazard("first", "stair"), HazardKind::Clear);
    }

    #[test]
    fn clear_hazard_reports_previous_kind() {
        let store = HazardStore::new();
        store.set_hazard("ground", "A", HazardKind::ExitBlocked);
        assert_eq!(store.clear_hazard("ground", "A"), HazardKind::ExitBlocked);
        assert_eq!(store.clear_hazard("ground", "A"), HazardKind::Clear);
    }

    #[test]
    fn clear_floor_leaves_other_floors() {
        let store = HazardStore::new();
        store.set_hazard("ground", "A", HazardKind::Fire);
        store.set_hazard("ground", "B", HazardKind::Fire);
        store.set_hazard("first", "C", HazardKind::Fire);
        assert_eq!(store.clear_floor("ground"), 2);
        assert_eq!(store.floors_with_hazards(), vec!["first".to_string()]);
    }

    #[test]
    fn snapshot_source_for_other_floor_is_empty() {
        let snapshot = HazardSnapshot::from_assignments("ground", [("A", HazardKind::Fire)]);
        assert!(SnapshotSource::snapshot(&snapshot, "first").is_empty());
        assert_eq!(
            SnapshotSource::snapshot(&snapshot, "ground").kind("A"),
            HazardKind::Fire
        );
    }

    #[test]
    fn from_assignments_drops_clear_entries() {
        let snapshot = HazardSnapshot::from_assignments(
            "ground",
            [("A", HazardKind::Clear), ("B", HazardKind::Smoke)],
        );
        assert_eq!(snapshot.active(), vec![("B".to_string(), HazardKind::Smoke)]);
    }
}
