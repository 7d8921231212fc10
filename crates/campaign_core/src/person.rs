//! Person entities.
//!
//! Persons are the officers and recruits that garrison architectures,
//! lead militaries and march with troops. The core tracks just enough
//! of them to derive settlement residency and army faction membership.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry, NO_ENTITY};

/// Record file for persons.
pub const PERSON_SAVE_FILE: &str = "Person.csv";

const PERSON_HEADER: [&str; 8] = [
    "id",
    "name",
    "state",
    "moving_days",
    "location_type",
    "location_id",
    "faction",
    "section",
];

/// Employment state of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonState {
    /// In service of a faction.
    Normal,
    /// Present on the map but not yet hired.
    Unhired,
}

impl PersonState {
    /// Token used in the record files.
    #[must_use]
    pub const fn to_record(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Unhired => "unhired",
        }
    }

    /// Decode a record token.
    #[must_use]
    pub fn parse_record(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "unhired" => Some(Self::Unhired),
            _ => None,
        }
    }
}

/// Where a person currently is.
///
/// Exactly one variant is active; there is no half-way state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonLocation {
    /// Not placed on the map.
    Nowhere,
    /// Inside a settlement.
    Architecture(EntityId),
    /// Marching with a troop.
    Troop(EntityId),
}

impl PersonLocation {
    const NOWHERE_CODE: i32 = 0;
    const ARCHITECTURE_CODE: i32 = 1;
    const TROOP_CODE: i32 = 2;

    /// Persisted (type, id) pair.
    #[must_use]
    pub fn to_record(self) -> (i32, EntityId) {
        match self {
            Self::Nowhere => (Self::NOWHERE_CODE, NO_ENTITY),
            Self::Architecture(id) => (Self::ARCHITECTURE_CODE, id),
            Self::Troop(id) => (Self::TROOP_CODE, id),
        }
    }

    /// Decode the persisted (type, id) pair.
    #[must_use]
    pub fn from_record(type_code: i32, id: EntityId) -> Option<Self> {
        match type_code {
            Self::NOWHERE_CODE => Some(Self::Nowhere),
            Self::ARCHITECTURE_CODE => Some(Self::Architecture(id)),
            Self::TROOP_CODE => Some(Self::Troop(id)),
            _ => None,
        }
    }
}

/// An officer or recruit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique ID within the person registry.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Employment state.
    pub state: PersonState,
    /// Days of travel remaining; zero when settled.
    pub moving_days: i32,
    /// Current location.
    pub location: PersonLocation,
    /// Faction this person serves, [`NO_ENTITY`] when none.
    pub belonged_faction_id: EntityId,
    /// Section this person serves, [`NO_ENTITY`] when none.
    pub belonged_section_id: EntityId,
}

impl Person {
    /// Relocate into a settlement with no travel time.
    pub fn move_to_architecture_instantly(&mut self, architecture_id: EntityId) {
        self.location = PersonLocation::Architecture(architecture_id);
        self.moving_days = 0;
    }

    /// Embed in a marching troop.
    pub fn join_troop(&mut self, troop_id: EntityId) {
        self.location = PersonLocation::Troop(troop_id);
        self.moving_days = 0;
    }

    /// Check whether this person is inside the given settlement.
    #[must_use]
    pub fn is_at_architecture(&self, architecture_id: EntityId) -> bool {
        self.location == PersonLocation::Architecture(architecture_id)
    }
}

impl GameEntity for Person {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Load the person registry from `dir`.
pub fn load_persons(dir: &Path) -> Result<Registry<Person>> {
    let path = dir.join(PERSON_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;
    let mut result = Registry::new();

    for row in reader.records() {
        let record = records::next_record(row, &path)?;

        let state_token = records::field(&record, 2, &path)?;
        let state = PersonState::parse_record(state_token).ok_or_else(|| GameError::Corrupted {
            file: path.display().to_string(),
            message: format!("unknown person state '{state_token}'"),
        })?;

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
        let location =
            PersonLocation::from_record(type_code, location_id).ok_or_else(|| {
                GameError::Corrupted {
                    file: path.display().to_string(),
                    message: format!("unknown location type code {type_code}"),
                }
            })?;

        let person = Person {
            id: records::parse_i32(records::field(&record, 0, &path)?, "id", &path)?,
            name: records::field(&record, 1, &path)?.to_string(),
            state,
            moving_days: records::parse_i32(
                records::field(&record, 3, &path)?,
                "moving days",
                &path,
            )?,
            location,
            belonged_faction_id: records::parse_i32(
                records::field(&record, 6, &path)?,
                "faction",
                &path,
            )?,
            belonged_section_id: records::parse_i32(
                records::field(&record, 7, &path)?,
                "section",
                &path,
            )?,
        };
        result.add(person)?;
    }

    Ok(result)
}

/// Write the person registry to `dir`.
pub fn save_persons(dir: &Path, persons: &Registry<Person>) -> Result<()> {
    let path = dir.join(PERSON_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, PERSON_HEADER, &path)?;
    for person in persons {
        let (type_code, location_id) = person.location.to_record();
        records::write_row(
            &mut writer,
            [
                person.id.to_string(),
                person.name.clone(),
                person.state.to_record().to_string(),
                person.moving_days.to_string(),
                type_code.to_string(),
                location_id.to_string(),
                person.belonged_faction_id.to_string(),
                person.belonged_section_id.to_string(),
            ],
            &path,
        )?;
    }
    records::finish(&mut writer, &path)
}
