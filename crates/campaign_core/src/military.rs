//! Military (unit roster) entities.
//!
//! A military is the persistent record of a unit's composition and
//! strength, independent of whether it is garrisoned in an architecture
//! or marching as a troop. Strength mutations clamp against the kind's
//! capacity and the scenario's configured caps, which are passed in
//! explicitly so the arithmetic is testable in isolation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed};
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry};

/// Record file for militaries.
pub const MILITARY_SAVE_FILE: &str = "Military.csv";
/// Record file for military kinds.
pub const MILITARY_KIND_SAVE_FILE: &str = "MilitaryKind.csv";

const MILITARY_HEADER: [&str; 11] = [
    "id",
    "ai_tags",
    "name",
    "kind",
    "location_type",
    "location_id",
    "quantity",
    "morale",
    "combativity",
    "leader",
    "persons",
];
const MILITARY_KIND_HEADER: [&str; 5] =
    ["id", "name", "unit_quantity", "max_quantity", "movability"];

/// A category of military unit (footmen, cavalry, ships...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryKind {
    /// Unique ID within the kind registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Headcount represented by one displayed unit.
    pub unit_quantity: i32,
    /// Maximum headcount a military of this kind can hold.
    pub max_quantity: i32,
    /// Movement budget granted per execution cycle.
    #[serde(with = "fixed_serde")]
    pub movability: Fixed,
}

impl GameEntity for MilitaryKind {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Where a military currently is.
///
/// Exactly one variant is active: garrisoned in an architecture or
/// embodied by a marching troop, never both, never neither once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Garrisoned in a settlement.
    Architecture(EntityId),
    /// Marching as the given troop.
    Troop(EntityId),
}

impl Location {
    const ARCHITECTURE_CODE: i32 = 1;
    const TROOP_CODE: i32 = 2;

    /// Persisted (type, id) pair.
    #[must_use]
    pub fn to_record(self) -> (i32, EntityId) {
        match self {
            Self::Architecture(id) => (Self::ARCHITECTURE_CODE, id),
            Self::Troop(id) => (Self::TROOP_CODE, id),
        }
    }

    /// Decode the persisted (type, id) pair.
    #[must_use]
    pub fn from_record(type_code: i32, id: EntityId) -> Option<Self> {
        match type_code {
            Self::ARCHITECTURE_CODE => Some(Self::Architecture(id)),
            Self::TROOP_CODE => Some(Self::Troop(id)),
            _ => None,
        }
    }

    /// ID of the referenced entity, whichever variant is active.
    #[must_use]
    pub fn location_id(self) -> EntityId {
        match self {
            Self::Architecture(id) | Self::Troop(id) => id,
        }
    }
}

/// The persistent roster and strength record of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Military {
    /// Unique ID within the military registry.
    pub id: EntityId,
    /// Free-form tag string reserved for AI annotations.
    pub ai_tags: String,
    /// Display name.
    pub name: String,
    /// Kind of unit.
    pub kind_id: EntityId,
    /// Current location reference.
    pub location: Location,
    /// Headcount, between zero and the kind's maximum.
    pub quantity: i32,
    /// Training morale.
    pub morale: i32,
    /// Fighting spirit.
    pub combativity: i32,
    /// Commanding officer, if assigned.
    pub leader_id: Option<EntityId>,
    /// Roster of attached officers, excluding the leader.
    pub person_ids: Vec<EntityId>,
}

impl Military {
    /// Create an empty military garrisoned in `architecture_id`.
    #[must_use]
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        kind_id: EntityId,
        architecture_id: EntityId,
    ) -> Self {
        Self {
            id,
            ai_tags: String::new(),
            name: name.into(),
            kind_id,
            location: Location::Architecture(architecture_id),
            quantity: 0,
            morale: 0,
            combativity: 0,
            leader_id: None,
            person_ids: Vec::new(),
        }
    }

    /// Merge `delta` recruits of the given quality into this military.
    ///
    /// Morale and combativity become the headcount-weighted average of
    /// the current and added values, truncated to integer; quantity
    /// then clamps to the kind's maximum. A merge with zero total
    /// headcount carries no weight and leaves the quality values alone.
    pub fn increase_quantity(
        &mut self,
        delta: i32,
        added_morale: i32,
        added_combativity: i32,
        kind: &MilitaryKind,
    ) {
        let total = self.quantity + delta;
        if total > 0 {
            self.morale = (self.quantity * self.morale + delta * added_morale) / total;
            self.combativity =
                (self.quantity * self.combativity + delta * added_combativity) / total;
        }
        self.quantity = (self.quantity + delta).min(kind.max_quantity);
    }

    /// Remove up to `n` headcount, never going below zero.
    pub fn decrease_quantity(&mut self, n: i32) {
        self.quantity = (self.quantity - n).max(0);
    }

    /// Raise morale, clamped to the configured cap.
    pub fn increase_morale(&mut self, x: i32, config: &GameConfig) {
        self.morale = (self.morale + x).min(config.max_morale);
    }

    /// Raise combativity, clamped to the configured cap.
    pub fn increase_combativity(&mut self, x: i32, config: &GameConfig) {
        self.combativity = (self.combativity + x).min(config.max_combativity);
    }

    /// Headcount expressed in displayed units of the kind.
    #[must_use]
    pub fn unit_count(&self, kind: &MilitaryKind) -> Fixed {
        if kind.unit_quantity <= 0 {
            return Fixed::ZERO;
        }
        Fixed::from_num(self.quantity) / Fixed::from_num(kind.unit_quantity)
    }

    /// Whether the kind's capacity is reached.
    #[must_use]
    pub fn is_fully_recruited(&self, kind: &MilitaryKind) -> bool {
        self.quantity >= kind.max_quantity
    }

    /// Whether morale and combativity are both at their caps.
    #[must_use]
    pub fn is_fully_trained(&self, config: &GameConfig) -> bool {
        self.morale >= config.max_morale && self.combativity >= config.max_combativity
    }

    /// Whether more recruits can still join.
    #[must_use]
    pub fn recruitable(&self, kind: &MilitaryKind) -> bool {
        !self.is_fully_recruited(kind)
    }

    /// Whether training would still improve this military.
    #[must_use]
    pub fn trainable(&self, config: &GameConfig) -> bool {
        self.quantity > 0 && !self.is_fully_trained(config)
    }

    /// Roster plus leader, leader last.
    #[must_use]
    pub fn all_person_ids(&self) -> Vec<EntityId> {
        let mut ids = self.person_ids.clone();
        if let Some(leader) = self.leader_id {
            ids.push(leader);
        }
        ids
    }
}

impl GameEntity for Military {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Load the military-kind registry from `dir`.
pub fn load_military_kinds(dir: &Path) -> Result<Registry<MilitaryKind>> {
    let path = dir.join(MILITARY_KIND_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;
        result.add(MilitaryKind {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            name: records::field(&record, 1, &path)?.to_string(),
            unit_quantity: records::parse_i32(
                records::field(&record, 2, &path)?,
                "unit quantity",
                &path,
            )?,
            max_quantity: records::parse_i32(
                records::field(&record, 3, &path)?,
                "max quantity",
                &path,
            )?,
            movability: records::parse_fixed(
                records::field(&record, 4, &path)?,
                "movability",
                &path,
            )?,
        })?;
    }

    Ok(result)
}

/// Write the military-kind registry to `dir`.
pub fn save_military_kinds(dir: &Path, kinds: &Registry<MilitaryKind>) -> Result<()> {
    let path = dir.join(MILITARY_KIND_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, MILITARY_KIND_HEADER, &path)?;
    for kind in kinds {
        records::write_row(
            &mut writer,
            [
                kind.id.to_string(),
                kind.name.clone(),
                kind.unit_quantity.to_string(),
                kind.max_quantity.to_string(),
                kind.movability.to_string(),
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}

/// Load the military registry from `dir`.
pub fn load_militaries(dir: &Path) -> Result<Registry<Military>> {
    let path = dir.join(MILITARY_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;

        let type_code = records::parse_i32(
            records::field(&record, 4, &path)?,
            "location type",
            &path,
        )?;
        let location_id = records::parse_i32(
            records::field(&record, 5, &path)?,
            "location id",
            &path,
        )?;
        let location = Location::from_record(type_code, location_id).ok_or_else(|| {
            GameError::Corrupted {
                file: path.display().to_string(),
                message: format!("unknown location type code {type_code}"),
            }
        })?;

        let military = Military {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            ai_tags: records::field(&record, 1, &path)?.to_string(),
            name: records::field(&record, 2, &path)?.to_string(),
            kind_id: records::parse_i32(records::field(&record, 3, &path)?, "kind", &path)?,
            location,
            quantity: records::parse_i32(records::field(&record, 6, &path)?, "quantity", &path)?,
            morale: records::parse_i32(records::field(&record, 7, &path)?, "morale", &path)?,
            combativity: records::parse_i32(
                records::field(&record, 8, &path)?,
                "combativity",
                &path,
            )?,
            leader_id: records::parse_entity_ref(
                records::field(&record, 9, &path)?,
                "leader",
                &path,
            )?,
            person_ids: records::parse_id_list(
                records::field(&record, 10, &path)?,
                "persons",
                &path,
            )?,
        };
        result.add(military)?;
    }

    Ok(result)
}

/// Write the military registry to `dir`.
pub fn save_militaries(dir: &Path, militaries: &Registry<Military>) -> Result<()> {
    let path = dir.join(MILITARY_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, MILITARY_HEADER, &path)?;
    for military in militaries {
        let (type_code, location_id) = military.location.to_record();
        records::write_row(
            &mut writer,
            [
                military.id.to_string(),
                military.ai_tags.clone(),
                military.name.clone(),
                military.kind_id.to_string(),
                type_code.to_string(),
                location_id.to_string(),
                military.quantity.to_string(),
                military.morale.to_string(),
                military.combativity.to_string(),
                records::entity_ref_to_record(military.leader_id),
                records::ids_to_record(&military.person_ids),
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn cavalry() -> MilitaryKind {
        MilitaryKind {
            id: 0,
            name: "Light Cavalry".into(),
            unit_quantity: 100,
            max_quantity: 5000,
            movability: Fixed::from_num(30),
        }
    }

    fn band(quantity: i32, morale: i32, combativity: i32) -> Military {
        let mut m = Military::new(0, "First Band", 0, 0);
        m.quantity = quantity;
        m.morale = morale;
        m.combativity = combativity;
        m
    }

    #[test]
    fn test_blend_is_weighted_average() {
        let kind = cavalry();
        let mut m = band(100, 50, 40);
        m.increase_quantity(100, 100, 0, &kind);

        assert_eq!(m.quantity, 200);
        assert_eq!(m.morale, 75);
        assert_eq!(m.combativity, 20);
    }

    #[test]
    fn test_increase_clamps_to_kind_capacity() {
        let kind = cavalry();
        let mut m = band(4900, 50, 50);
        m.increase_quantity(500, 50, 50, &kind);
        assert_eq!(m.quantity, kind.max_quantity);
    }

    #[test]
    fn test_zero_total_merge_keeps_quality() {
        let kind = cavalry();
        let mut m = band(0, 30, 40);
        m.increase_quantity(0, 90, 90, &kind);
        assert_eq!(m.morale, 30);
        assert_eq!(m.combativity, 40);
        assert_eq!(m.quantity, 0);
    }

    #[test]
    fn test_decrease_floors_at_zero() {
        let mut m = band(120, 50, 50);
        m.decrease_quantity(200);
        assert_eq!(m.quantity, 0);
    }

    #[test]
    fn test_morale_cap() {
        let config = GameConfig::default();
        let mut m = band(100, 95, 95);
        m.increase_morale(20, &config);
        m.increase_combativity(3, &config);
        assert_eq!(m.morale, config.max_morale);
        assert_eq!(m.combativity, 98);
    }

    #[test]
    fn test_training_flags() {
        let config = GameConfig::default();
        let kind = cavalry();

        let fresh = band(0, 0, 0);
        assert!(!fresh.trainable(&config));
        assert!(fresh.recruitable(&kind));

        let veteran = band(5000, 100, 100);
        assert!(veteran.is_fully_trained(&config));
        assert!(veteran.is_fully_recruited(&kind));
        assert!(!veteran.trainable(&config));
    }

    #[test]
    fn test_unit_count() {
        let kind = cavalry();
        let m = band(250, 0, 0);
        assert_eq!(m.unit_count(&kind), Fixed::from_num(2.5));
    }

    #[test]
    fn test_location_codes() {
        assert_eq!(Location::from_record(1, 3), Some(Location::Architecture(3)));
        assert_eq!(Location::from_record(2, 3), Some(Location::Troop(3)));
        assert_eq!(Location::from_record(0, 3), None);
        assert_eq!(Location::Troop(9).to_record(), (2, 9));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();

        let mut kinds = Registry::new();
        kinds.add(cavalry()).unwrap();
        save_military_kinds(dir.path(), &kinds).unwrap();
        let loaded_kinds = load_military_kinds(dir.path()).unwrap();
        assert_eq!(loaded_kinds.get(0).unwrap(), kinds.get(0).unwrap());

        let mut militaries = Registry::new();
        let mut m = band(1200, 60, 70);
        m.ai_tags = "garrison".into();
        m.leader_id = Some(4);
        m.person_ids = vec![5, 6];
        militaries.add(m).unwrap();
        let mut marching = band(800, 80, 80);
        marching.id = 1;
        marching.location = Location::Troop(0);
        militaries.add(marching).unwrap();

        save_militaries(dir.path(), &militaries).unwrap();
        let loaded = load_militaries(dir.path()).unwrap();

        assert_eq!(loaded.get(0).unwrap(), militaries.get(0).unwrap());
        assert_eq!(loaded.get(1).unwrap(), militaries.get(1).unwrap());
    }

    #[test]
    fn test_unknown_location_code_is_corruption() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(MILITARY_SAVE_FILE),
            "id,ai_tags,name,kind,location_type,location_id,quantity,morale,combativity,leader,persons\n\
             0,,Band,0,7,0,100,50,50,-1,\n",
        )
        .unwrap();
        assert!(matches!(
            load_militaries(dir.path()),
            Err(GameError::Corrupted { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_quantity_never_exceeds_capacity(
            start in 0i32..5000,
            delta in 0i32..10_000,
            morale in 0i32..=100,
        ) {
            let kind = cavalry();
            let mut m = band(start, 50, 50);
            m.increase_quantity(delta, morale, morale, &kind);
            prop_assert!(m.quantity <= kind.max_quantity);
            prop_assert!(m.quantity >= 0);
        }

        #[test]
        fn prop_quantity_never_negative(start in 0i32..5000, cut in 0i32..10_000) {
            let mut m = band(start, 50, 50);
            m.decrease_quantity(cut);
            prop_assert!(m.quantity >= 0);
        }

        #[test]
        fn prop_blend_stays_within_bounds(
            start in 1i32..5000,
            delta in 1i32..5000,
            current in 0i32..=100,
            added in 0i32..=100,
        ) {
            let kind = cavalry();
            let mut m = band(start, current, current);
            m.increase_quantity(delta, added, added, &kind);
            let lo = current.min(added);
            let hi = current.max(added);
            prop_assert!(m.morale >= lo && m.morale <= hi);
        }
    }
}
