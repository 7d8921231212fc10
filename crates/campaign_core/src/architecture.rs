//! Architecture (settlement) entities.
//!
//! An architecture is a fixed settlement with a footprint of map points
//! and a resident population. Its owning section and its four resident
//! person sets are derived state: they are recomputed in the scenario's
//! `setup` pass once every registry exists, and written out verbatim.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::MapPoint;
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry, NO_ENTITY};

/// Record file for architectures.
pub const ARCHITECTURE_SAVE_FILE: &str = "Architecture.csv";
/// Record file for architecture kinds.
pub const ARCHITECTURE_KIND_SAVE_FILE: &str = "ArchitectureKind.csv";

const ARCHITECTURE_HEADER: [&str; 6] = ["id", "name_image", "name", "kind", "footprint", "section"];
const ARCHITECTURE_KIND_HEADER: [&str; 2] = ["id", "name"];

/// A category of settlement (city, pass, port...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureKind {
    /// Unique ID within the kind registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

impl GameEntity for ArchitectureKind {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A fixed settlement on the campaign map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Unique ID within the architecture registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Name-image asset reference carried through for the UI layer.
    pub name_image: String,
    /// Kind of settlement.
    pub kind_id: EntityId,
    /// Map points this settlement occupies.
    pub footprint: Vec<MapPoint>,
    /// Owning section, [`NO_ENTITY`] when unclaimed. Derived in `setup`.
    pub belonged_section_id: EntityId,
    /// Resident persons in service. Derived in `setup`.
    pub persons: BTreeSet<EntityId>,
    /// Resident persons in service, still travelling. Derived in `setup`.
    pub moving_persons: BTreeSet<EntityId>,
    /// Resident persons awaiting hire. Derived in `setup`.
    pub unhired_persons: BTreeSet<EntityId>,
    /// Unhired persons still travelling. Derived in `setup`.
    pub unhired_moving_persons: BTreeSet<EntityId>,
}

impl Architecture {
    /// Create a settlement with empty derived state.
    #[must_use]
    pub fn new(id: EntityId, name: impl Into<String>, kind_id: EntityId) -> Self {
        Self {
            id,
            name: name.into(),
            name_image: String::new(),
            kind_id,
            footprint: Vec::new(),
            belonged_section_id: NO_ENTITY,
            persons: BTreeSet::new(),
            moving_persons: BTreeSet::new(),
            unhired_persons: BTreeSet::new(),
            unhired_moving_persons: BTreeSet::new(),
        }
    }

    /// Check whether the footprint covers a map point.
    #[must_use]
    pub fn covers(&self, point: MapPoint) -> bool {
        self.footprint.contains(&point)
    }

    /// Drop all derived person residency, ahead of a `setup` rebuild.
    pub fn clear_resident_persons(&mut self) {
        self.persons.clear();
        self.moving_persons.clear();
        self.unhired_persons.clear();
        self.unhired_moving_persons.clear();
    }
}

impl GameEntity for Architecture {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Load the architecture-kind registry from `dir`.
pub fn load_architecture_kinds(dir: &Path) -> Result<Registry<ArchitectureKind>> {
    let path = dir.join(ARCHITECTURE_KIND_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;
        result.add(ArchitectureKind {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            name: records::field(&record, 1, &path)?.to_string(),
        })?;
    }

    Ok(result)
}

/// Write the architecture-kind registry to `dir`.
pub fn save_architecture_kinds(dir: &Path, kinds: &Registry<ArchitectureKind>) -> Result<()> {
    let path = dir.join(ARCHITECTURE_KIND_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, ARCHITECTURE_KIND_HEADER, &path)?;
    for kind in kinds {
        records::write_row(&mut writer, [kind.id.to_string(), kind.name.clone()], &path)?;
    }
    records::finish(&mut writer, &path)
}

/// Load the architecture registry from `dir`.
///
/// `version` is the scenario survey's schema version. Version 1 is the
/// legacy layout with the footprint at column 7 and the four resident
/// person sets persisted at columns 8-11; version 2 and later use the
/// current six-column layout and leave residency to the `setup` pass.
pub fn load_architectures(dir: &Path, version: u32) -> Result<Registry<Architecture>> {
    let path = dir.join(ARCHITECTURE_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;

        let mut data = Architecture::new(
            records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            records::field(&record, 2, &path)?.to_string(),
            records::parse_i32(records::field(&record, 3, &path)?, "kind", &path)?,
        );
        data.name_image = records::field(&record, 1, &path)?.to_string();

        if version == 1 {
            data.footprint = parse_footprint(records::field(&record, 7, &path)?, &path)?;
            data.persons = parse_id_set(&record, 8, &path)?;
            data.moving_persons = parse_id_set(&record, 9, &path)?;
            data.unhired_persons = parse_id_set(&record, 10, &path)?;
            data.unhired_moving_persons = parse_id_set(&record, 11, &path)?;
        } else {
            data.footprint = parse_footprint(records::field(&record, 4, &path)?, &path)?;
            data.belonged_section_id =
                records::parse_i32(records::field(&record, 5, &path)?, "section", &path)?;
        }

        result.add(data)?;
    }

    Ok(result)
}

fn parse_footprint(s: &str, path: &Path) -> Result<Vec<MapPoint>> {
    MapPoint::parse_record_list(s).ok_or_else(|| crate::error::GameError::Corrupted {
        file: path.display().to_string(),
        message: format!("unparseable footprint: '{s}'"),
    })
}

fn parse_id_set(
    record: &csv::StringRecord,
    idx: usize,
    path: &Path,
) -> Result<BTreeSet<EntityId>> {
    let ids = records::parse_id_list(records::field(record, idx, path)?, "person set", path)?;
    Ok(ids.into_iter().collect())
}

/// Write the architecture registry to `dir` in the current (v2) layout.
///
/// Derived state is written as it stands; nothing is recomputed here.
pub fn save_architectures(dir: &Path, architectures: &Registry<Architecture>) -> Result<()> {
    let path = dir.join(ARCHITECTURE_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, ARCHITECTURE_HEADER, &path)?;
    for arch in architectures {
        records::write_row(
            &mut writer,
            [
                arch.id.to_string(),
                arch.name_image.clone(),
                arch.name.clone(),
                arch.kind_id.to_string(),
                MapPoint::list_to_record(&arch.footprint),
                arch.belonged_section_id.to_string(),
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}
