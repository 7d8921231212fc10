//! End-to-end tests of the campaign flow: setup derivation, departing
//! on campaign, order execution across ticks, and save/load.

use campaign_core::error::GameError;
use campaign_core::math::MapPoint;
use campaign_core::military::Location;
use campaign_core::person::PersonLocation;
use campaign_core::registry::NO_ENTITY;
use campaign_core::troop::{Order, StepOutcome};
use campaign_test_utils::{campaign_scenario, fixed, NORTH_FACTION, SOUTH_FACTION};

// =============================================================================
// Setup pass
// =============================================================================

#[test]
fn setup_derives_section_ownership_and_residency() {
    let scen = campaign_scenario();

    let riverwatch = scen.architectures.get(0).unwrap();
    assert_eq!(riverwatch.belonged_section_id, 0);
    assert!(riverwatch.persons.contains(&0));
    assert!(riverwatch.persons.contains(&1));
    assert!(riverwatch.unhired_persons.contains(&2));
    assert!(riverwatch.moving_persons.is_empty());

    let stonegate = scen.architectures.get(1).unwrap();
    assert_eq!(stonegate.belonged_section_id, 1);
    assert!(stonegate.persons.contains(&3));

    assert_eq!(scen.architecture_faction(0).unwrap().id, NORTH_FACTION);
    assert_eq!(scen.architecture_faction(1).unwrap().id, SOUTH_FACTION);
    assert_eq!(scen.military_faction(0).unwrap().id, NORTH_FACTION);
}

#[test]
fn resident_sets_stay_disjoint() {
    let scen = campaign_scenario();
    let a = scen.architectures.get(0).unwrap();

    for id in &a.persons {
        assert!(!a.moving_persons.contains(id));
        assert!(!a.unhired_persons.contains(id));
        assert!(!a.unhired_moving_persons.contains(id));
    }
    for id in &a.unhired_persons {
        assert!(!a.persons.contains(id));
    }
}

// =============================================================================
// Campaign preconditions (rejected without mutation)
// =============================================================================

#[test]
fn campaign_rejected_without_leader() {
    let mut scen = campaign_scenario();
    scen.militaries.get_mut(0).unwrap().leader_id = None;

    let err = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap_err();
    assert!(matches!(err, GameError::InvalidOperation(_)));

    assert!(scen.troops.is_empty());
    assert_eq!(
        scen.militaries.get(0).unwrap().location,
        Location::Architecture(0)
    );
}

#[test]
fn campaign_rejected_when_leader_not_co_located() {
    let mut scen = campaign_scenario();
    scen.persons
        .get_mut(0)
        .unwrap()
        .move_to_architecture_instantly(1);

    let err = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap_err();
    assert!(matches!(err, GameError::InvalidOperation(_)));
    assert!(scen.troops.is_empty());
    assert_eq!(
        scen.persons.get(0).unwrap().location,
        PersonLocation::Architecture(1)
    );
}

#[test]
fn campaign_rejected_when_roster_member_not_co_located() {
    let mut scen = campaign_scenario();
    scen.persons.get_mut(1).unwrap().location = PersonLocation::Nowhere;

    assert!(scen.start_campaign(0, MapPoint::new(11, 10)).is_err());
    assert!(scen.troops.is_empty());
}

#[test]
fn campaign_rejected_when_leader_faction_differs() {
    let mut scen = campaign_scenario();
    scen.persons.get_mut(0).unwrap().belonged_faction_id = SOUTH_FACTION;

    let err = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap_err();
    assert!(matches!(err, GameError::InvalidOperation(_)));
    assert!(scen.troops.is_empty());
    assert_eq!(
        scen.militaries.get(0).unwrap().location,
        Location::Architecture(0)
    );
}

#[test]
fn is_campaignable_requires_strength_and_loyal_leader() {
    let mut scen = campaign_scenario();
    assert!(scen.is_campaignable(0));

    scen.militaries.get_mut(0).unwrap().quantity = 0;
    assert!(!scen.is_campaignable(0));

    scen.militaries.get_mut(0).unwrap().quantity = 1200;
    scen.militaries.get_mut(0).unwrap().morale = 0;
    assert!(!scen.is_campaignable(0));

    scen.militaries.get_mut(0).unwrap().morale = 80;
    scen.persons.get_mut(0).unwrap().belonged_faction_id = SOUTH_FACTION;
    assert!(!scen.is_campaignable(0));
}

// =============================================================================
// Campaign transition
// =============================================================================

#[test]
fn campaign_creates_troop_and_relocates_everyone() {
    let mut scen = campaign_scenario();

    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();

    assert_eq!(scen.troops.len(), 1);
    let troop = scen.troops.get(troop_id).unwrap();
    assert_eq!(troop.location, MapPoint::new(11, 10));
    assert_eq!(troop.order, Order::Idle);
    assert_eq!(troop.belonged_section_id, 0);
    assert_eq!(troop.start_architecture_id, 0);

    assert_eq!(
        scen.militaries.get(0).unwrap().location,
        Location::Troop(troop_id)
    );
    assert_eq!(
        scen.persons.get(0).unwrap().location,
        PersonLocation::Troop(troop_id)
    );
    assert_eq!(
        scen.persons.get(1).unwrap().location,
        PersonLocation::Troop(troop_id)
    );

    assert_eq!(scen.military_of_troop(troop_id), Some(0));
    assert_eq!(scen.troop_faction(troop_id).unwrap().id, NORTH_FACTION);
    assert_eq!(scen.military_faction(0).unwrap().id, NORTH_FACTION);
}

#[test]
fn campaign_allocates_fresh_troop_ids() {
    let mut scen = campaign_scenario();
    scen.troops
        .add(campaign_core::troop::Troop::new(0, MapPoint::new(1, 1)))
        .unwrap();

    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();
    assert_eq!(troop_id, 1);
    assert_eq!(scen.troops.len(), 2);
}

#[test]
fn garrisoning_relocates_leader_and_roster() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();
    assert_eq!(
        scen.persons.get(1).unwrap().location,
        PersonLocation::Troop(troop_id)
    );

    scen.set_military_location(0, 1).unwrap();
    assert_eq!(
        scen.militaries.get(0).unwrap().location,
        Location::Architecture(1)
    );
    assert_eq!(
        scen.persons.get(0).unwrap().location,
        PersonLocation::Architecture(1)
    );
    assert_eq!(
        scen.persons.get(1).unwrap().location,
        PersonLocation::Architecture(1)
    );
}

// =============================================================================
// Order execution
// =============================================================================

#[test]
fn over_budget_node_is_consumed_not_retried() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(14, 10)).unwrap();

    // Plains cost 10; the ridge at x = 16 costs 25. Budget is 30.
    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(18, 10));
    scen.init_execute_order(troop_id).unwrap();

    // (15,10): 10 <= 30.
    assert_eq!(scen.step_forward(troop_id).unwrap(), StepOutcome::Advanced);
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(15, 10));

    // (16,10): 25 > 20. Blocked, but the node is consumed.
    assert_eq!(scen.step_forward(troop_id).unwrap(), StepOutcome::Blocked);
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(15, 10));

    // Same budget, later call: the ridge node is not re-offered. The
    // next pop is (17,10) at cost 10, so the troop skips over the ridge.
    assert_eq!(scen.step_forward(troop_id).unwrap(), StepOutcome::Advanced);
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(17, 10));

    // (18,10): 10 <= 10.
    assert_eq!(scen.step_forward(troop_id).unwrap(), StepOutcome::Advanced);
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(18, 10));

    assert_eq!(
        scen.step_forward(troop_id).unwrap(),
        StepOutcome::PathExhausted
    );
}

#[test]
fn new_order_discards_path_and_budget() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(2, 2)).unwrap();

    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(8, 2));
    scen.init_execute_order(troop_id).unwrap();
    assert_eq!(scen.step_forward(troop_id).unwrap(), StepOutcome::Advanced);
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(3, 2));

    // Overwrite mid-march: execution context is gone immediately.
    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(3, 6));
    assert!(!scen.troops.get(troop_id).unwrap().is_executing());

    // The next cycle recomputes from the current position with a full
    // budget.
    scen.init_execute_order(troop_id).unwrap();
    let exec = scen.troops.get(troop_id).unwrap().exec.clone().unwrap();
    assert_eq!(exec.movability_left, fixed(30));
    assert_eq!(exec.path.front(), Some(&MapPoint::new(3, 3)));
}

#[test]
fn tick_driver_marches_until_blocked_and_idles_on_arrival() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();
    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(17, 10));

    // Tick 1: three plains nodes exhaust the budget of 30.
    scen.run_troop_orders().unwrap();
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(14, 10));
    assert_eq!(
        scen.troops.get(troop_id).unwrap().order,
        Order::MoveTo(MapPoint::new(17, 10))
    );

    // Tick 2: one plains node, then the ridge blocks (and is consumed).
    scen.run_troop_orders().unwrap();
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(15, 10));

    // Tick 3: fresh path re-enters the ridge, pays 25, then blocks on
    // the next node.
    scen.run_troop_orders().unwrap();
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(16, 10));

    // Tick 4: final node, order complete, troop goes idle.
    scen.run_troop_orders().unwrap();
    assert_eq!(scen.troops.get(troop_id).unwrap().location, MapPoint::new(17, 10));
    assert_eq!(scen.troops.get(troop_id).unwrap().order, Order::Idle);
    assert!(!scen.troops.get(troop_id).unwrap().is_executing());
}

#[test]
fn idle_troop_cannot_start_execution() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();

    let err = scen.init_execute_order(troop_id).unwrap_err();
    assert!(matches!(err, GameError::InvalidOperation(_)));
}

#[test]
fn missing_adaptability_is_a_loud_failure() {
    let mut scen = campaign_scenario();
    let troop_id = scen.start_campaign(0, MapPoint::new(2, 2)).unwrap();

    // Swamp terrain with no cost entry for cavalry.
    scen.terrain.set_terrain(MapPoint::new(3, 2), 9);
    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(5, 2));
    scen.init_execute_order(troop_id).unwrap();

    let err = scen.step_forward(troop_id).unwrap_err();
    assert!(matches!(err, GameError::AdaptabilityMissing { .. }));
}

// =============================================================================
// Save / load round trip
// =============================================================================

#[test]
fn scenario_round_trip_preserves_state_and_resets_transients() {
    let dir = tempfile::tempdir().unwrap();
    let mut scen = campaign_scenario();

    let troop_id = scen.start_campaign(0, MapPoint::new(11, 10)).unwrap();
    // Refresh derived residency now that the leader and roster marched out.
    scen.setup();
    scen.troops
        .get_mut(troop_id)
        .unwrap()
        .give_move_to_order(MapPoint::new(17, 10));
    scen.init_execute_order(troop_id).unwrap();
    assert!(scen.troops.get(troop_id).unwrap().is_executing());

    scen.save(dir.path()).unwrap();
    let loaded = campaign_core::scenario::GameScenario::load(
        dir.path(),
        Box::new(campaign_core::pathfind::DirectPathFinder),
    )
    .unwrap();

    assert_eq!(loaded.survey.title, scen.survey.title);
    assert_eq!(loaded.config, scen.config);

    // Entities come back field-identical.
    assert_eq!(loaded.militaries.get(0), scen.militaries.get(0));
    assert_eq!(loaded.persons.get(0), scen.persons.get(0));
    assert_eq!(loaded.architectures.get(0), scen.architectures.get(0));
    assert_eq!(loaded.terrain, scen.terrain);

    // The troop keeps its order but its execution context is transient:
    // it resets to uninitialized, as does its departure anchor.
    let troop = loaded.troops.get(troop_id).unwrap();
    assert_eq!(troop.location, MapPoint::new(11, 10));
    assert_eq!(troop.order, Order::MoveTo(MapPoint::new(17, 10)));
    assert!(!troop.is_executing());
    assert_eq!(troop.belonged_section_id, NO_ENTITY);

    // Derived faction still resolves through the reloaded graph.
    assert_eq!(loaded.troop_faction(troop_id).unwrap().id, NORTH_FACTION);
}

#[test]
fn dangling_reference_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut scen = campaign_scenario();
    // Leader ID 99 resolves to nobody.
    scen.militaries.get_mut(0).unwrap().leader_id = Some(99);
    scen.save(dir.path()).unwrap();

    let err = campaign_core::scenario::GameScenario::load(
        dir.path(),
        Box::new(campaign_core::pathfind::DirectPathFinder),
    )
    .unwrap_err();
    assert!(matches!(err, GameError::Corrupted { .. }));
}
