//! Scenario context: registries, two-phase loading and the order engine.
//!
//! One [`GameScenario`] is the authoritative state of a campaign. It
//! owns every entity registry, the terrain collaborators and the
//! pathfinder, and it is the only mutator of any of them. Advancing the
//! world is cooperative and single-threaded: external code calls
//! [`GameScenario::run_troop_orders`] once per tick.
//!
//! Loading is two-phase. Each record file is read on its own, leaving
//! cross-entity references as raw IDs; once every registry exists, the
//! [`GameScenario::setup`] pass resolves the derived relationships that
//! depend on other entity types (settlement residency, section
//! ownership). Collapsing this into one pass would require an ordering
//! of forward references that the record format does not guarantee.

use std::path::Path;

use crate::architecture::{self, Architecture, ArchitectureKind, ARCHITECTURE_SAVE_FILE};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::faction::{self, Faction, Section, SECTION_SAVE_FILE};
use crate::math::MapPoint;
use crate::military::{self, Location, Military, MilitaryKind, MILITARY_SAVE_FILE};
use crate::pathfind::PathFinder;
use crate::person::{self, Person, PersonLocation, PersonState, PERSON_SAVE_FILE};
use crate::records;
use crate::registry::{EntityId, GameEntity, Registry};
use crate::terrain::{self, AdaptabilityTable, TerrainMap};
use crate::troop::{self, ExecContext, Order, StepOutcome, Troop};

/// Record file for the scenario survey.
pub const SURVEY_SAVE_FILE: &str = "GameSurvey.csv";
/// Schema version written by [`GameScenario::save`].
pub const SCENARIO_VERSION: u32 = 2;

const SURVEY_HEADER: [&str; 4] = ["version", "title", "max_morale", "max_combativity"];

/// Scenario metadata carried in the survey record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSurvey {
    /// Record schema version of the scenario directory.
    pub version: u32,
    /// Scenario title.
    pub title: String,
}

/// The authoritative state of one campaign.
#[derive(Debug)]
pub struct GameScenario {
    /// Scenario metadata.
    pub survey: ScenarioSurvey,
    /// Global caps.
    pub config: GameConfig,
    /// All factions.
    pub factions: Registry<Faction>,
    /// All sections.
    pub sections: Registry<Section>,
    /// All architecture kinds.
    pub architecture_kinds: Registry<ArchitectureKind>,
    /// All architectures.
    pub architectures: Registry<Architecture>,
    /// All military kinds.
    pub military_kinds: Registry<MilitaryKind>,
    /// All militaries.
    pub militaries: Registry<Military>,
    /// All troops.
    pub troops: Registry<Troop>,
    /// All persons.
    pub persons: Registry<Person>,
    /// The terrain grid.
    pub terrain: TerrainMap,
    /// Terrain costs per military kind.
    pub adaptability: AdaptabilityTable,
    /// Pathfinding collaborator.
    pub pathfinder: Box<dyn PathFinder>,
}

impl GameScenario {
    /// Create an empty in-memory scenario.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        config: GameConfig,
        terrain: TerrainMap,
        pathfinder: Box<dyn PathFinder>,
    ) -> Self {
        Self {
            survey: ScenarioSurvey {
                version: SCENARIO_VERSION,
                title: title.into(),
            },
            config,
            factions: Registry::new(),
            sections: Registry::new(),
            architecture_kinds: Registry::new(),
            architectures: Registry::new(),
            military_kinds: Registry::new(),
            militaries: Registry::new(),
            troops: Registry::new(),
            persons: Registry::new(),
            terrain,
            adaptability: AdaptabilityTable::new(),
            pathfinder,
        }
    }

    // ========================================================================
    // Loading and saving
    // ========================================================================

    /// Load a scenario from a record directory.
    ///
    /// Any malformed record aborts the whole load with the offending
    /// file named; no partially-populated scenario is returned. Ends
    /// with the [`GameScenario::setup`] pass.
    pub fn load(dir: &Path, pathfinder: Box<dyn PathFinder>) -> Result<Self> {
        tracing::info!(path = %dir.display(), "loading scenario");

        let (survey, config) = load_survey(dir)?;
        let version = survey.version;

        let mut scenario = Self {
            survey,
            config,
            factions: faction::load_factions(dir)?,
            sections: faction::load_sections(dir)?,
            architecture_kinds: architecture::load_architecture_kinds(dir)?,
            architectures: architecture::load_architectures(dir, version)?,
            military_kinds: military::load_military_kinds(dir)?,
            militaries: military::load_militaries(dir)?,
            troops: troop::load_troops(dir)?,
            persons: person::load_persons(dir)?,
            terrain: terrain::load_terrain_map(dir)?,
            adaptability: terrain::load_adaptability_table(dir)?,
            pathfinder,
        };

        scenario.validate_references()?;
        scenario.setup();
        Ok(scenario)
    }

    /// Write the scenario to a record directory in the current schema.
    ///
    /// Derived state is written as it stands; the transient order
    /// execution context is not persisted.
    pub fn save(&self, dir: &Path) -> Result<()> {
        tracing::info!(path = %dir.display(), "saving scenario");

        save_survey(dir, &self.survey.title, &self.config)?;
        faction::save_factions(dir, &self.factions)?;
        faction::save_sections(dir, &self.sections)?;
        architecture::save_architecture_kinds(dir, &self.architecture_kinds)?;
        architecture::save_architectures(dir, &self.architectures)?;
        military::save_military_kinds(dir, &self.military_kinds)?;
        military::save_militaries(dir, &self.militaries)?;
        troop::save_troops(dir, &self.troops)?;
        person::save_persons(dir, &self.persons)?;
        terrain::save_terrain_map(dir, &self.terrain)?;
        terrain::save_adaptability_table(dir, &self.adaptability)
    }

    /// Resolve cross-entity derived state once all registries exist.
    ///
    /// Recomputes every architecture's owning section (by scanning
    /// sections for a claim on it) and rebuilds its four resident
    /// person sets from person location, state and travel status.
    pub fn setup(&mut self) {
        let architecture_ids = self.architectures.ids();
        for architecture_id in architecture_ids {
            let section_id = self
                .sections
                .iter()
                .find(|s| s.contains_architecture(architecture_id))
                .map(GameEntity::id);

            let mut residents = ResidentSets::default();
            for p in &self.persons {
                if !p.is_at_architecture(architecture_id) {
                    continue;
                }
                match (p.state, p.moving_days > 0) {
                    (PersonState::Normal, true) => residents.moving.push(p.id),
                    (PersonState::Normal, false) => residents.settled.push(p.id),
                    (PersonState::Unhired, true) => residents.unhired_moving.push(p.id),
                    (PersonState::Unhired, false) => residents.unhired.push(p.id),
                }
            }

            if let Some(architecture) = self.architectures.get_mut(architecture_id) {
                if let Some(section_id) = section_id {
                    architecture.belonged_section_id = section_id;
                }
                architecture.clear_resident_persons();
                architecture.persons.extend(residents.settled);
                architecture.moving_persons.extend(residents.moving);
                architecture.unhired_persons.extend(residents.unhired);
                architecture
                    .unhired_moving_persons
                    .extend(residents.unhired_moving);
            }
        }

        tracing::debug!(
            architectures = self.architectures.len(),
            persons = self.persons.len(),
            "scenario setup complete"
        );
    }

    /// Check that every persisted cross-reference resolves.
    ///
    /// A dangling reference means the record set is internally
    /// inconsistent, which is corruption, not a recoverable miss.
    fn validate_references(&self) -> Result<()> {
        for section in &self.sections {
            if section.belonged_faction_id >= 0 && !self.factions.contains(section.belonged_faction_id)
            {
                return Err(corrupt_reference(SECTION_SAVE_FILE, "faction", section.belonged_faction_id));
            }
        }
        for architecture in &self.architectures {
            if !self.architecture_kinds.contains(architecture.kind_id) {
                return Err(corrupt_reference(ARCHITECTURE_SAVE_FILE, "architecture kind", architecture.kind_id));
            }
        }
        for military in &self.militaries {
            if !self.military_kinds.contains(military.kind_id) {
                return Err(corrupt_reference(MILITARY_SAVE_FILE, "military kind", military.kind_id));
            }
            let resolvable = match military.location {
                Location::Architecture(id) => self.architectures.contains(id),
                Location::Troop(id) => self.troops.contains(id),
            };
            if !resolvable {
                return Err(corrupt_reference(MILITARY_SAVE_FILE, "location", military.location.location_id()));
            }
            if let Some(leader_id) = military.leader_id {
                if !self.persons.contains(leader_id) {
                    return Err(corrupt_reference(MILITARY_SAVE_FILE, "leader", leader_id));
                }
            }
            for &person_id in &military.person_ids {
                if !self.persons.contains(person_id) {
                    return Err(corrupt_reference(MILITARY_SAVE_FILE, "person", person_id));
                }
            }
        }
        for p in &self.persons {
            let dangling = match p.location {
                PersonLocation::Nowhere => None,
                PersonLocation::Architecture(id) => (!self.architectures.contains(id)).then_some(id),
                PersonLocation::Troop(id) => (!self.troops.contains(id)).then_some(id),
            };
            if let Some(id) = dangling {
                return Err(corrupt_reference(PERSON_SAVE_FILE, "location", id));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Derivations
    // ========================================================================

    /// Section owning an architecture, if any.
    #[must_use]
    pub fn architecture_section(&self, architecture_id: EntityId) -> Option<&Section> {
        self.sections.get(self.architecture_section_id(architecture_id)?)
    }

    /// Faction controlling an architecture, through its section.
    #[must_use]
    pub fn architecture_faction(&self, architecture_id: EntityId) -> Option<&Faction> {
        self.factions.get(self.architecture_faction_id(architecture_id)?)
    }

    /// Section a military belongs to: its architecture's when
    /// garrisoned, its leader's when marching.
    #[must_use]
    pub fn military_section(&self, military_id: EntityId) -> Option<&Section> {
        self.sections.get(self.military_section_id(military_id)?)
    }

    /// Faction a military belongs to: its architecture's when
    /// garrisoned, its leader's when marching.
    #[must_use]
    pub fn military_faction(&self, military_id: EntityId) -> Option<&Faction> {
        self.factions.get(self.military_faction_id(military_id)?)
    }

    /// Faction of a marching troop, inherited from its military's leader.
    #[must_use]
    pub fn troop_faction(&self, troop_id: EntityId) -> Option<&Faction> {
        let military_id = self.military_of_troop(troop_id)?;
        self.military_faction(military_id)
    }

    /// The military embodied by a troop.
    ///
    /// A troop is discoverable from exactly one military at a time:
    /// the one whose location reference points at it.
    #[must_use]
    pub fn military_of_troop(&self, troop_id: EntityId) -> Option<EntityId> {
        self.militaries
            .iter()
            .find(|m| m.location == Location::Troop(troop_id))
            .map(GameEntity::id)
    }

    fn architecture_section_id(&self, architecture_id: EntityId) -> Option<EntityId> {
        let architecture = self.architectures.get(architecture_id)?;
        if architecture.belonged_section_id < 0 {
            return None;
        }
        Some(architecture.belonged_section_id)
    }

    fn architecture_faction_id(&self, architecture_id: EntityId) -> Option<EntityId> {
        let section = self.sections.get(self.architecture_section_id(architecture_id)?)?;
        if section.belonged_faction_id < 0 {
            return None;
        }
        Some(section.belonged_faction_id)
    }

    fn person_faction_id(&self, person_id: EntityId) -> Option<EntityId> {
        let p = self.persons.get(person_id)?;
        if p.belonged_faction_id < 0 {
            return None;
        }
        Some(p.belonged_faction_id)
    }

    fn person_section_id(&self, person_id: EntityId) -> Option<EntityId> {
        let p = self.persons.get(person_id)?;
        if p.belonged_section_id < 0 {
            return None;
        }
        Some(p.belonged_section_id)
    }

    fn military_faction_id(&self, military_id: EntityId) -> Option<EntityId> {
        let military = self.militaries.get(military_id)?;
        match military.location {
            Location::Architecture(id) => self.architecture_faction_id(id),
            Location::Troop(_) => self.person_faction_id(military.leader_id?),
        }
    }

    fn military_section_id(&self, military_id: EntityId) -> Option<EntityId> {
        let military = self.militaries.get(military_id)?;
        match military.location {
            Location::Architecture(id) => self.architecture_section_id(id),
            Location::Troop(_) => self.person_section_id(military.leader_id?),
        }
    }

    // ========================================================================
    // Military operations
    // ========================================================================

    /// Garrison a military in an architecture.
    ///
    /// The leader and every roster member relocate with it instantly;
    /// a military's persons are always co-located with it while
    /// stationed.
    pub fn set_military_location(
        &mut self,
        military_id: EntityId,
        architecture_id: EntityId,
    ) -> Result<()> {
        if !self.architectures.contains(architecture_id) {
            return Err(GameError::EntityNotFound {
                kind: "architecture",
                id: architecture_id,
            });
        }
        let military = self.militaries.get(military_id).ok_or(GameError::EntityNotFound {
            kind: "military",
            id: military_id,
        })?;
        let person_ids = military.all_person_ids();
        for &person_id in &person_ids {
            if !self.persons.contains(person_id) {
                return Err(GameError::EntityNotFound {
                    kind: "person",
                    id: person_id,
                });
            }
        }

        if let Some(military) = self.militaries.get_mut(military_id) {
            military.location = Location::Architecture(architecture_id);
        }
        for person_id in person_ids {
            if let Some(p) = self.persons.get_mut(person_id) {
                p.move_to_architecture_instantly(architecture_id);
            }
        }
        Ok(())
    }

    /// Whether a military may depart on campaign at all.
    ///
    /// Requires headcount, morale, and a leader whose faction matches
    /// the military's own derived faction.
    #[must_use]
    pub fn is_campaignable(&self, military_id: EntityId) -> bool {
        let Some(military) = self.militaries.get(military_id) else {
            return false;
        };
        if military.quantity <= 0 || military.morale <= 0 {
            return false;
        }
        let Some(leader_id) = military.leader_id else {
            return false;
        };
        self.person_faction_id(leader_id) == self.military_faction_id(military_id)
    }

    /// March a military out of its architecture as a fresh troop.
    ///
    /// This is the sole creation point for troops and the only
    /// ARCHITECTURE to TROOP transition. Preconditions, all checked
    /// before any mutation: the military is garrisoned, has a leader,
    /// leader and every roster member are physically in that
    /// architecture, and the architecture's controlling faction matches
    /// the leader's and every member's. On success the new troop starts
    /// at `start`, anchored to the departure architecture and its
    /// section, and the leader and roster move into it.
    ///
    /// Returns the new troop's ID.
    pub fn start_campaign(&mut self, military_id: EntityId, start: MapPoint) -> Result<EntityId> {
        let military = self.militaries.get(military_id).ok_or(GameError::EntityNotFound {
            kind: "military",
            id: military_id,
        })?;

        let Location::Architecture(architecture_id) = military.location else {
            return Err(GameError::InvalidOperation(
                "military must be garrisoned in an architecture to start a campaign".into(),
            ));
        };
        let Some(leader_id) = military.leader_id else {
            return Err(GameError::InvalidOperation(
                "military must have a leader to start a campaign".into(),
            ));
        };

        let leader = self.persons.get(leader_id).ok_or(GameError::EntityNotFound {
            kind: "person",
            id: leader_id,
        })?;
        if !leader.is_at_architecture(architecture_id) {
            return Err(GameError::InvalidOperation(
                "leader must be at the military's architecture to start a campaign".into(),
            ));
        }
        for &person_id in &military.person_ids {
            let p = self.persons.get(person_id).ok_or(GameError::EntityNotFound {
                kind: "person",
                id: person_id,
            })?;
            if !p.is_at_architecture(architecture_id) {
                return Err(GameError::InvalidOperation(
                    "all roster members must be at the military's architecture to start a campaign"
                        .into(),
                ));
            }
        }

        let architecture_faction = self.architecture_faction_id(architecture_id);
        if architecture_faction != self.person_faction_id(leader_id) {
            return Err(GameError::InvalidOperation(
                "leader must be of the architecture's faction to start a campaign".into(),
            ));
        }
        for &person_id in &military.person_ids {
            if architecture_faction != self.person_faction_id(person_id) {
                return Err(GameError::InvalidOperation(
                    "all roster members must be of the architecture's faction to start a campaign"
                        .into(),
                ));
            }
        }

        let person_ids = military.person_ids.clone();
        let section_id = self
            .architecture_section_id(architecture_id)
            .unwrap_or(crate::registry::NO_ENTITY);

        let troop_id = self.troops.free_id();
        let mut new_troop = Troop::new(troop_id, start);
        new_troop.belonged_section_id = section_id;
        new_troop.start_architecture_id = architecture_id;
        self.troops.add(new_troop)?;

        if let Some(military) = self.militaries.get_mut(military_id) {
            military.location = Location::Troop(troop_id);
        }
        if let Some(leader) = self.persons.get_mut(leader_id) {
            leader.join_troop(troop_id);
        }
        for person_id in person_ids {
            if let Some(p) = self.persons.get_mut(person_id) {
                p.join_troop(troop_id);
            }
        }

        tracing::info!(military = military_id, troop = troop_id, "campaign started");
        Ok(troop_id)
    }

    // ========================================================================
    // Order execution engine
    // ========================================================================

    /// Begin an execution cycle for a troop with an active move order.
    ///
    /// Resets the movement budget to the kind's full movability and
    /// requests a fresh path from the current location to the order
    /// target. The path's leading node is the current position and is
    /// discarded; only nodes still to be visited remain. An unreachable
    /// target yields an empty remaining path, which completes the order
    /// on the next step.
    pub fn init_execute_order(&mut self, troop_id: EntityId) -> Result<()> {
        let t = self.troops.get(troop_id).ok_or(GameError::EntityNotFound {
            kind: "troop",
            id: troop_id,
        })?;
        let Order::MoveTo(target) = t.order else {
            return Err(GameError::InvalidOperation(format!(
                "troop {troop_id} has no move order to execute"
            )));
        };
        let from = t.location;

        let military_id = self
            .military_of_troop(troop_id)
            .ok_or(GameError::EntityNotFound {
                kind: "military commanding troop",
                id: troop_id,
            })?;
        let military = self.militaries.get(military_id).ok_or(GameError::EntityNotFound {
            kind: "military",
            id: military_id,
        })?;
        let kind = self
            .military_kinds
            .get(military.kind_id)
            .ok_or(GameError::EntityNotFound {
                kind: "military kind",
                id: military.kind_id,
            })?;

        let mut path: std::collections::VecDeque<MapPoint> = self
            .pathfinder
            .find_path(kind, from, target)
            .unwrap_or_default()
            .into();
        path.pop_front();
        let movability = kind.movability;

        if let Some(t) = self.troops.get_mut(troop_id) {
            t.exec = Some(ExecContext {
                path,
                movability_left: movability,
            });
        }
        Ok(())
    }

    /// Advance a troop by one path node.
    ///
    /// Pops the next node from the remaining path. With no node left
    /// the order is complete and the caller is responsible for
    /// returning the troop to idle. Otherwise the node's terrain cost
    /// is charged against the remaining budget: within budget the troop
    /// moves onto the node; over budget the step is blocked but the
    /// node stays consumed, so an over-budget node is never re-offered
    /// within the same cycle.
    pub fn step_forward(&mut self, troop_id: EntityId) -> Result<StepOutcome> {
        let military_id = self
            .military_of_troop(troop_id)
            .ok_or(GameError::EntityNotFound {
                kind: "military commanding troop",
                id: troop_id,
            })?;
        let kind_id = self
            .militaries
            .get(military_id)
            .ok_or(GameError::EntityNotFound {
                kind: "military",
                id: military_id,
            })?
            .kind_id;

        let t = self.troops.get_mut(troop_id).ok_or(GameError::EntityNotFound {
            kind: "troop",
            id: troop_id,
        })?;
        let exec = t.exec.as_mut().ok_or_else(|| {
            GameError::InvalidOperation(format!(
                "troop {troop_id} has no execution cycle in progress"
            ))
        })?;

        let Some(node) = exec.path.pop_front() else {
            return Ok(StepOutcome::PathExhausted);
        };

        let terrain = self.terrain.terrain_at(node).ok_or_else(|| {
            GameError::InvalidOperation(format!("path node {node} is off the map"))
        })?;
        let cost = self
            .adaptability
            .adaptability(kind_id, terrain)
            .ok_or(GameError::AdaptabilityMissing {
                kind: kind_id,
                terrain,
            })?;

        if cost <= exec.movability_left {
            exec.movability_left -= cost;
            t.location = node;
            Ok(StepOutcome::Advanced)
        } else {
            Ok(StepOutcome::Blocked)
        }
    }

    /// Run one tick of order execution across all troops.
    ///
    /// Each troop with an active move order gets a fresh cycle: full
    /// movement budget and a path recomputed from its current position.
    /// It then steps until blocked or until the path runs out; an
    /// exhausted path completes the order and the troop goes idle.
    /// Troops are processed in ascending ID order, which keeps ticks
    /// deterministic, but nothing may rely on that ordering for
    /// correctness.
    pub fn run_troop_orders(&mut self) -> Result<()> {
        let mut troop_ids: Vec<EntityId> = self
            .troops
            .filter(|t| matches!(t.order, Order::MoveTo(_)))
            .map(GameEntity::id)
            .collect();
        troop_ids.sort_unstable();

        for troop_id in troop_ids {
            self.init_execute_order(troop_id)?;
            loop {
                match self.step_forward(troop_id)? {
                    StepOutcome::Advanced => {}
                    StepOutcome::Blocked => break,
                    StepOutcome::PathExhausted => {
                        if let Some(t) = self.troops.get_mut(troop_id) {
                            t.cancel_order();
                        }
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct ResidentSets {
    settled: Vec<EntityId>,
    moving: Vec<EntityId>,
    unhired: Vec<EntityId>,
    unhired_moving: Vec<EntityId>,
}

/// Load the survey record from `dir`.
pub fn load_survey(dir: &Path) -> Result<(ScenarioSurvey, GameConfig)> {
    let path = dir.join(SURVEY_SAVE_FILE);
    let mut reader = records::open_reader(&path)?;

    let mut rows = reader.records();
    let record = match rows.next() {
        Some(row) => records::next_record(row, &path)?,
        None => {
            return Err(GameError::Corrupted {
                file: path.display().to_string(),
                message: "missing survey record".into(),
            })
        }
    };

    let version = records::parse_i32(records::field(&record, 0, &path)?, "version", &path)?;
    if version < 1 {
        return Err(GameError::Corrupted {
            file: path.display().to_string(),
            message: format!("unsupported schema version {version}"),
        });
    }

    let survey = ScenarioSurvey {
        version: version as u32,
        title: records::field(&record, 1, &path)?.to_string(),
    };
    let config = GameConfig {
        max_morale: records::parse_i32(records::field(&record, 2, &path)?, "max morale", &path)?,
        max_combativity: records::parse_i32(
            records::field(&record, 3, &path)?,
            "max combativity",
            &path,
        )?,
    };
    Ok((survey, config))
}

/// Write the survey record to `dir`, stamping the current schema version.
pub fn save_survey(dir: &Path, title: &str, config: &GameConfig) -> Result<()> {
    let path = dir.join(SURVEY_SAVE_FILE);
    let mut writer = records::open_writer(&path)?;
    records::write_row(&mut writer, SURVEY_HEADER, &path)?;
    records::write_row(
        &mut writer,
        [
            SCENARIO_VERSION.to_string(),
            title.to_string(),
            config.max_morale.to_string(),
            config.max_combativity.to_string(),
        ],
        &path,
    )?;
    records::finish(&mut writer, &path)
}

fn corrupt_reference(file: &str, what: &str, id: EntityId) -> GameError {
    GameError::Corrupted {
        file: file.to_string(),
        message: format!("dangling {what} reference {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_survey_round_trip_stamps_current_version() {
        let dir = tempdir().unwrap();
        let config = GameConfig {
            max_morale: 120,
            max_combativity: 90,
        };
        save_survey(dir.path(), "Border Wars", &config).unwrap();

        let (survey, loaded_config) = load_survey(dir.path()).unwrap();
        assert_eq!(survey.version, SCENARIO_VERSION);
        assert_eq!(survey.title, "Border Wars");
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_survey_reports_legacy_version() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SURVEY_SAVE_FILE),
            "version,title,max_morale,max_combativity\n1,Old Campaign,100,100\n",
        )
        .unwrap();

        let (survey, _) = load_survey(dir.path()).unwrap();
        assert_eq!(survey.version, 1);
    }

    #[test]
    fn test_missing_survey_is_a_read_failure() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_survey(dir.path()),
            Err(GameError::FileRead { .. })
        ));
    }

    #[test]
    fn test_empty_survey_is_corruption() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SURVEY_SAVE_FILE),
            "version,title,max_morale,max_combativity\n",
        )
        .unwrap();
        assert!(matches!(
            load_survey(dir.path()),
            Err(GameError::Corrupted { .. })
        ));
    }
}
