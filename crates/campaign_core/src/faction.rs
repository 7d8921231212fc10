//! Faction and section grouping entities.
//!
//! Factions and sections are the ownership layer above settlements and
//! armies. The core only needs them for membership derivation: a
//! section belongs to a faction and claims a set of architectures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry};

/// Record file for factions.
pub const FACTION_SAVE_FILE: &str = "Faction.csv";
/// Record file for sections.
pub const SECTION_SAVE_FILE: &str = "Section.csv";

const FACTION_HEADER: [&str; 2] = ["id", "name"];
const SECTION_HEADER: [&str; 4] = ["id", "name", "faction", "architectures"];

/// A playable power on the campaign map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    /// Unique ID within the faction registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
}

impl GameEntity for Faction {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// An administrative division of a faction, claiming architectures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique ID within the section registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Owning faction, [`crate::registry::NO_ENTITY`] when unaligned.
    pub belonged_faction_id: EntityId,
    /// IDs of the architectures this section administers.
    pub architecture_ids: Vec<EntityId>,
}

impl Section {
    /// Check whether this section administers the given architecture.
    #[must_use]
    pub fn contains_architecture(&self, id: EntityId) -> bool {
        self.architecture_ids.contains(&id)
    }
}

impl GameEntity for Section {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Load the faction registry from `dir`.
pub fn load_factions(dir: &Path) -> Result<Registry<Faction>> {
    let path = dir.join(FACTION_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;
        let faction = Faction {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            name: records::field(&record, 1, &path)?.to_string(),
        };
        result.add(faction)?;
    }

    Ok(result)
}

/// Write the faction registry to `dir`.
pub fn save_factions(dir: &Path, factions: &Registry<Faction>) -> Result<()> {
    let path = dir.join(FACTION_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, FACTION_HEADER, &path)?;
    for faction in factions {
        records::write_row(
            &mut writer,
            [faction.id.to_string(), faction.name.clone()],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}

/// Load the section registry from `dir`.
pub fn load_sections(dir: &Path) -> Result<Registry<Section>> {
    let path = dir.join(SECTION_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;
        let section = Section {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            name: records::field(&record, 1, &path)?.to_string(),
            belonged_faction_id: records::parse_i32(
                records::field(&record, 2, &path)?,
                "faction",
                &path,
            )?,
            architecture_ids: records::parse_id_list(
                records::field(&record, 3, &path)?,
                "architectures",
                &path,
            )?,
        };
        result.add(section)?;
    }

    Ok(result)
}

/// Write the section registry to `dir`.
pub fn save_sections(dir: &Path, sections: &Registry<Section>) -> Result<()> {
    let path = dir.join(SECTION_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, SECTION_HEADER, &path)?;
    for section in sections {
        records::write_row(
            &mut writer,
            [
                section.id.to_string(),
                section.name.clone(),
                section.belonged_faction_id.to_string(),
                records::ids_to_record(&section.architecture_ids),
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}
