//! Troop (marching formation) entities.
//!
//! A troop is the mobile avatar of a military that has left its
//! settlement: a grid coordinate, a pending order, and the transient
//! context of the order execution in progress. The stepping logic that
//! consumes paths and movement budget lives on the scenario, which owns
//! the registries the engine has to consult.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{Fixed, MapPoint};
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry, NO_ENTITY};

/// Record file for troops.
pub const TROOP_SAVE_FILE: &str = "Troop.csv";

const TROOP_HEADER: [&str; 4] = ["id", "location", "order", "order_target"];

/// The current order of a troop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Order {
    /// Hold position, no active order.
    #[default]
    Idle,
    /// March to the target point.
    MoveTo(MapPoint),
}

impl Order {
    /// Persisted (kind token, target) pair. The target field is empty
    /// for an idle order.
    #[must_use]
    pub fn to_record(self) -> (&'static str, String) {
        match self {
            Self::Idle => ("idle", String::new()),
            Self::MoveTo(target) => ("move", target.to_record()),
        }
    }

    /// Decode the persisted (kind token, target) pair.
    #[must_use]
    pub fn from_record(kind: &str, target: &str) -> Option<Self> {
        match kind {
            "idle" => Some(Self::Idle),
            "move" => MapPoint::parse_record(target).map(Self::MoveTo),
            _ => None,
        }
    }
}

/// Result of advancing a troop by one path node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The troop moved onto the next node and paid its cost.
    Advanced,
    /// The next node cost more than the remaining budget. The node is
    /// consumed regardless; the step cycle ends here.
    Blocked,
    /// No nodes remain; the order is complete.
    PathExhausted,
}

/// Transient state of an order execution cycle.
///
/// Never persisted: a reloaded troop starts its next cycle from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
    /// Path nodes still to be visited, current position excluded.
    pub path: VecDeque<MapPoint>,
    /// Movement budget left in this cycle.
    pub movability_left: Fixed,
}

fn no_entity() -> EntityId {
    NO_ENTITY
}

/// A marching formation on the campaign map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Troop {
    /// Unique ID within the troop registry.
    pub id: EntityId,
    /// Current grid coordinate.
    pub location: MapPoint,
    /// Pending order.
    pub order: Order,
    /// Section the troop marched out under, [`NO_ENTITY`] when unknown.
    /// Set at departure, not persisted.
    #[serde(skip, default = "no_entity")]
    pub belonged_section_id: EntityId,
    /// Settlement the troop departed from, [`NO_ENTITY`] when unknown.
    /// Set at departure, not persisted.
    #[serde(skip, default = "no_entity")]
    pub start_architecture_id: EntityId,
    /// In-progress execution context, if a cycle is underway.
    #[serde(skip)]
    pub exec: Option<ExecContext>,
}

impl Troop {
    /// Create an idle troop at the given point.
    #[must_use]
    pub fn new(id: EntityId, location: MapPoint) -> Self {
        Self {
            id,
            location,
            order: Order::Idle,
            belonged_section_id: NO_ENTITY,
            start_architecture_id: NO_ENTITY,
            exec: None,
        }
    }

    /// Order the troop to march to `target`.
    ///
    /// Overwrites any order in progress; the execution context of the
    /// abandoned order is discarded, so the next cycle recomputes the
    /// path from the current position.
    pub fn give_move_to_order(&mut self, target: MapPoint) {
        self.order = Order::MoveTo(target);
        self.exec = None;
    }

    /// Drop the current order and any execution context.
    pub fn cancel_order(&mut self) {
        self.order = Order::Idle;
        self.exec = None;
    }

    /// Whether an execution cycle is currently initialized.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.exec.is_some()
    }
}

impl GameEntity for Troop {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Load the troop registry from `dir`.
///
/// Execution context is transient and comes back uninitialized.
pub fn load_troops(dir: &Path) -> Result<Registry<Troop>> {
    let path = dir.join(TROOP_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;

        let id = records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?;
        let location_field = records::field(&record, 1, &path)?;
        let location =
            MapPoint::parse_record(location_field).ok_or_else(|| GameError::Corrupted {
                file: path.display().to_string(),
                message: format!("unparseable location: '{location_field}'"),
            })?;

        let order_kind = records::field(&record, 2, &path)?;
        let order_target = records::field(&record, 3, &path)?;
        let order =
            Order::from_record(order_kind, order_target).ok_or_else(|| GameError::Corrupted {
                file: path.display().to_string(),
                message: format!("unparseable order: '{order_kind}' '{order_target}'"),
            })?;

        let mut troop = Troop::new(id, location);
        troop.order = order;
        result.add(troop)?;
    }

    Ok(result)
}

/// Write the troop registry to `dir`.
pub fn save_troops(dir: &Path, troops: &Registry<Troop>) -> Result<()> {
    let path = dir.join(TROOP_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, TROOP_HEADER, &path)?;
    for troop in troops {
        let (order_kind, order_target) = troop.order.to_record();
        records::write_row(
            &mut writer,
            [
                troop.id.to_string(),
                troop.location.to_record(),
                order_kind.to_string(),
                order_target,
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_order_record_codec() {
        assert_eq!(Order::Idle.to_record(), ("idle", String::new()));
        assert_eq!(
            Order::MoveTo(MapPoint::new(3, 4)).to_record(),
            ("move", "3 4".to_string())
        );
        assert_eq!(Order::from_record("idle", ""), Some(Order::Idle));
        assert_eq!(
            Order::from_record("move", "3 4"),
            Some(Order::MoveTo(MapPoint::new(3, 4)))
        );
        assert_eq!(Order::from_record("charge", ""), None);
        assert_eq!(Order::from_record("move", ""), None);
    }

    #[test]
    fn test_new_order_discards_execution_context() {
        let mut troop = Troop::new(0, MapPoint::new(1, 1));
        troop.give_move_to_order(MapPoint::new(9, 9));
        troop.exec = Some(ExecContext {
            path: VecDeque::from([MapPoint::new(2, 1)]),
            movability_left: Fixed::from_num(10),
        });

        troop.give_move_to_order(MapPoint::new(0, 0));
        assert_eq!(troop.order, Order::MoveTo(MapPoint::new(0, 0)));
        assert!(!troop.is_executing());
    }

    #[test]
    fn test_cancel_order() {
        let mut troop = Troop::new(0, MapPoint::new(1, 1));
        troop.give_move_to_order(MapPoint::new(9, 9));
        troop.cancel_order();
        assert_eq!(troop.order, Order::Idle);
        assert!(troop.exec.is_none());
    }

    #[test]
    fn test_round_trip_resets_transient_state() {
        let dir = tempdir().unwrap();
        let mut troops = Registry::new();

        let mut marching = Troop::new(0, MapPoint::new(7, 2));
        marching.give_move_to_order(MapPoint::new(12, 2));
        marching.exec = Some(ExecContext {
            path: VecDeque::from([MapPoint::new(8, 2)]),
            movability_left: Fixed::from_num(5),
        });
        marching.belonged_section_id = 3;
        troops.add(marching).unwrap();
        troops.add(Troop::new(2, MapPoint::new(0, 0))).unwrap();

        save_troops(dir.path(), &troops).unwrap();
        let loaded = load_troops(dir.path()).unwrap();

        let troop = loaded.get(0).unwrap();
        assert_eq!(troop.location, MapPoint::new(7, 2));
        assert_eq!(troop.order, Order::MoveTo(MapPoint::new(12, 2)));
        assert!(troop.exec.is_none());
        assert_eq!(troop.belonged_section_id, NO_ENTITY);
        assert_eq!(loaded.get(2).unwrap().order, Order::Idle);
    }

    #[test]
    fn test_unknown_order_token_is_corruption() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(TROOP_SAVE_FILE),
            "id,location,order,order_target\n0,1 1,charge,2 2\n",
        )
        .unwrap();
        assert!(matches!(
            load_troops(dir.path()),
            Err(GameError::Corrupted { .. })
        ));
    }
}
