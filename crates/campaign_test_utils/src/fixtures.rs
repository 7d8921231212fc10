//! Test fixtures and helpers.
//!
//! One canonical scenario used by tests across the workspace: two
//! factions, two walled cities, a cavalry military garrisoned in the
//! north with a leader and one roster officer, and a small terrain grid
//! with plains and hills.

use fixed::types::I32F32;

use campaign_core::architecture::{Architecture, ArchitectureKind};
use campaign_core::config::GameConfig;
use campaign_core::faction::{Faction, Section};
use campaign_core::math::MapPoint;
use campaign_core::military::{Military, MilitaryKind};
use campaign_core::pathfind::DirectPathFinder;
use campaign_core::person::{Person, PersonLocation, PersonState};
use campaign_core::scenario::GameScenario;
use campaign_core::terrain::TerrainMap;

/// Faction ID of the northern power in the fixture scenario.
pub const NORTH_FACTION: i32 = 0;
/// Faction ID of the southern power in the fixture scenario.
pub const SOUTH_FACTION: i32 = 1;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Build the canonical fixture scenario.
///
/// Contents:
/// - factions 0 "Northmarch" and 1 "Southreach", one section each
/// - architecture 0 "Riverwatch" (north), architecture 1 "Stonegate" (south)
/// - military kind 0 "Light Cavalry": unit quantity 100, capacity 5000,
///   movability 30
/// - persons 0 (leader) and 1 (roster officer) garrisoned at Riverwatch,
///   person 2 unhired at Riverwatch, person 3 leading the south
/// - military 0 "First Lancers" garrisoned at Riverwatch, quantity 1200,
///   morale 80, combativity 70, leader 0, roster [1]
/// - 32x32 terrain grid of plains (terrain 0) with a hill ridge (terrain 1)
///   on column x = 16, costs 10 and 25 for cavalry
///
/// The scenario's `setup` pass has already run.
#[must_use]
pub fn campaign_scenario() -> GameScenario {
    let mut terrain = TerrainMap::filled(32, 32, 0);
    for y in 0..32 {
        terrain.set_terrain(MapPoint::new(16, y), 1);
    }

    let mut scen = GameScenario::new(
        "Fixture Campaign",
        GameConfig::default(),
        terrain,
        Box::new(DirectPathFinder),
    );

    scen.factions
        .add(Faction {
            id: NORTH_FACTION,
            name: "Northmarch".into(),
        })
        .unwrap();
    scen.factions
        .add(Faction {
            id: SOUTH_FACTION,
            name: "Southreach".into(),
        })
        .unwrap();

    scen.sections
        .add(Section {
            id: 0,
            name: "Northmarch Command".into(),
            belonged_faction_id: NORTH_FACTION,
            architecture_ids: vec![0],
        })
        .unwrap();
    scen.sections
        .add(Section {
            id: 1,
            name: "Southreach Command".into(),
            belonged_faction_id: SOUTH_FACTION,
            architecture_ids: vec![1],
        })
        .unwrap();

    scen.architecture_kinds
        .add(ArchitectureKind {
            id: 0,
            name: "City".into(),
        })
        .unwrap();

    let mut riverwatch = Architecture::new(0, "Riverwatch", 0);
    riverwatch.name_image = "riverwatch.png".into();
    riverwatch.footprint = vec![MapPoint::new(10, 10), MapPoint::new(11, 10)];
    scen.architectures.add(riverwatch).unwrap();

    let mut stonegate = Architecture::new(1, "Stonegate", 0);
    stonegate.name_image = "stonegate.png".into();
    stonegate.footprint = vec![MapPoint::new(24, 10)];
    scen.architectures.add(stonegate).unwrap();

    scen.military_kinds
        .add(MilitaryKind {
            id: 0,
            name: "Light Cavalry".into(),
            unit_quantity: 100,
            max_quantity: 5000,
            movability: fixed(30),
        })
        .unwrap();

    scen.persons
        .add(Person {
            id: 0,
            name: "General Hale".into(),
            state: PersonState::Normal,
            moving_days: 0,
            location: PersonLocation::Architecture(0),
            belonged_faction_id: NORTH_FACTION,
            belonged_section_id: 0,
        })
        .unwrap();
    scen.persons
        .add(Person {
            id: 1,
            name: "Captain Brook".into(),
            state: PersonState::Normal,
            moving_days: 0,
            location: PersonLocation::Architecture(0),
            belonged_faction_id: NORTH_FACTION,
            belonged_section_id: 0,
        })
        .unwrap();
    scen.persons
        .add(Person {
            id: 2,
            name: "Wanderer Ash".into(),
            state: PersonState::Unhired,
            moving_days: 0,
            location: PersonLocation::Architecture(0),
            belonged_faction_id: -1,
            belonged_section_id: -1,
        })
        .unwrap();
    scen.persons
        .add(Person {
            id: 3,
            name: "Marshal Reed".into(),
            state: PersonState::Normal,
            moving_days: 0,
            location: PersonLocation::Architecture(1),
            belonged_faction_id: SOUTH_FACTION,
            belonged_section_id: 1,
        })
        .unwrap();

    let mut lancers = Military::new(0, "First Lancers", 0, 0);
    lancers.quantity = 1200;
    lancers.morale = 80;
    lancers.combativity = 70;
    lancers.leader_id = Some(0);
    lancers.person_ids = vec![1];
    scen.militaries.add(lancers).unwrap();

    scen.adaptability.insert(0, 0, fixed(10));
    scen.adaptability.insert(0, 1, fixed(25));

    scen.setup();
    scen
}
