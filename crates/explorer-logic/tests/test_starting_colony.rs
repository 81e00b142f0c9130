//! Integration tests for the starting colony and the affordability rules
//! that views poll against it.
//!
//! All tests are pure logic: no engine, no timers.

use explorer_logic::constants::{buildings, crafting, materials, research, resources};
use explorer_logic::economy::{
    can_afford_building, can_afford_crafting, can_craft_material, can_invite_explorer,
    happiness_gain, production_plan, wood_upkeep,
};
use explorer_logic::config::ProductionGate;
use explorer_logic::starting::starting_colony;

// ── Starting table ─────────────────────────────────────────────────────

#[test]
fn starting_resources_match_table() {
    let state = starting_colony();
    let expected = [
        (resources::WOOD, "Wood", 90.0, 0.5, 500.0),
        (resources::STONE, "Stone", 90.0, 0.5, 2500.0),
        (resources::CLAY, "Clay", 90.0, 0.5, 500.0),
        (resources::IRON, "Iron", 90.0, 0.5, 150.0),
        (resources::COAL, "Coal", 10.0, 0.1, 100.0),
        (resources::HAPPINESS, "Happiness", 0.0, 0.1, 1000.0),
    ];
    for (id, name, amount, rate, max) in expected {
        let r = &state.resources[id];
        assert_eq!(r.name, name);
        assert_eq!(r.amount, amount, "{} amount", id);
        assert_eq!(r.rate_per_second, rate, "{} rate", id);
        assert_eq!(r.max_amount, Some(max), "{} cap", id);
    }
}

#[test]
fn starting_buildings_match_table() {
    let state = starting_colony();

    let home = &state.buildings[buildings::HOME];
    assert_eq!(home.cost[resources::WOOD], 100.0);
    assert_eq!(home.cost[resources::CLAY], 100.0);
    assert_eq!(home.resource_produced.as_deref(), Some(resources::HAPPINESS));
    assert_eq!(home.production_rate, Some(0.5));
    assert!(home.research.is_none());

    let woodcutter = &state.buildings[buildings::WOODCUTTER];
    assert_eq!(woodcutter.cost.len(), 3);
    assert_eq!(woodcutter.resource_produced.as_deref(), Some(resources::WOOD));
    assert_eq!(woodcutter.research.as_deref(), Some(research::WOOD_CUTTER));

    let miner = &state.buildings[buildings::MINER];
    assert_eq!(miner.resource_produced.as_deref(), Some(resources::STONE));
    assert_eq!(miner.research.as_deref(), Some(research::AUTOMATIC_MINER));
}

#[test]
fn starting_crafting_materials_and_research_match_table() {
    let state = starting_colony();

    let constructor = &state.crafting[crafting::CONSTRUCTOR];
    assert_eq!(constructor.cost[resources::WOOD], 100.0);
    assert_eq!(constructor.cost[resources::STONE], 100.0);
    assert_eq!(constructor.cost[resources::IRON], 50.0);
    assert_eq!(constructor.research.as_deref(), Some(research::CONSTRUCTOR));

    let caps = [
        (materials::BEAM, 50.0),
        (materials::SLAB, 50.0),
        (materials::BAR, 25.0),
        (materials::INGOT, 10.0),
        (materials::BRICK, 100.0),
    ];
    for (id, cap) in caps {
        let m = &state.materials[id];
        assert_eq!(m.amount, 1.0);
        assert_eq!(m.max_amount, Some(cap));
    }
    assert_eq!(state.materials[materials::BRICK].cost[resources::CLAY], 10.0);

    assert_eq!(state.research[research::WOOD_CUTTER].cost[resources::HAPPINESS], 100.0);
    assert_eq!(state.research[research::AUTOMATIC_MINER].cost[resources::HAPPINESS], 100.0);
    assert_eq!(state.research[research::CONSTRUCTOR].cost[resources::HAPPINESS], 500.0);
}

// ── Affordability at the start ─────────────────────────────────────────

#[test]
fn home_needs_a_few_clicks_first() {
    let mut state = starting_colony();
    assert!(!can_afford_building(&state, buildings::HOME));

    state.resources.get_mut(resources::WOOD).unwrap().amount = 100.0;
    state.resources.get_mut(resources::CLAY).unwrap().amount = 100.0;
    assert!(can_afford_building(&state, buildings::HOME));
}

#[test]
fn gated_buildings_are_closed_until_researched() {
    let mut state = starting_colony();
    // The starting materials would cover the frame cost.
    assert!(!can_afford_building(&state, buildings::WOODCUTTER));

    state.research.get_mut(research::WOOD_CUTTER).unwrap().unlocked = true;
    assert!(can_afford_building(&state, buildings::WOODCUTTER));
    assert!(!can_afford_building(&state, buildings::MINER));
}

#[test]
fn constructor_requires_research_and_resources() {
    let mut state = starting_colony();
    assert!(!can_afford_crafting(&state, crafting::CONSTRUCTOR));

    state.research.get_mut(research::CONSTRUCTOR).unwrap().unlocked = true;
    // wood and stone are 90 of 100
    assert!(!can_afford_crafting(&state, crafting::CONSTRUCTOR));

    state.resources.get_mut(resources::WOOD).unwrap().amount = 100.0;
    state.resources.get_mut(resources::STONE).unwrap().amount = 100.0;
    assert!(can_afford_crafting(&state, crafting::CONSTRUCTOR));
}

#[test]
fn only_brick_is_craftable_at_the_start() {
    let state = starting_colony();
    assert!(can_craft_material(&state, materials::BRICK));
    assert!(!can_craft_material(&state, materials::BEAM));
    assert!(!can_craft_material(&state, materials::SLAB));
    assert!(!can_craft_material(&state, materials::BAR));
    // Steel does not exist as a resource.
    assert!(!can_craft_material(&state, materials::INGOT));
}

#[test]
fn an_empty_colony_produces_and_burns_nothing() {
    let state = starting_colony();
    assert!(production_plan(&state, ProductionGate::BuildingResearch).is_empty());
    assert_eq!(happiness_gain(&state, 10.0), 0.0);
    assert_eq!(wood_upkeep(&state), None);
    assert!(!can_invite_explorer(&state, 100.0));
}
