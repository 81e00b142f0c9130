//! The starting colony. Amounts are boosted for playtesting and must stay
//! as they are for save compatibility.

use crate::constants::{buildings, crafting, materials, research, resources};
use crate::model::{cost_table, Building, ColonyState, Crafting, Material, Research, Resource};

/// Fresh colony: one explorer, no buildings, every research locked.
pub fn starting_colony() -> ColonyState {
    let mut state = ColonyState::empty();

    let starting_resources = [
        (resources::WOOD, Resource::new("Wood", 90.0, 0.5).with_max(500.0)),
        (resources::STONE, Resource::new("Stone", 90.0, 0.5).with_max(2500.0)),
        (resources::CLAY, Resource::new("Clay", 90.0, 0.5).with_max(500.0)),
        (resources::IRON, Resource::new("Iron", 90.0, 0.5).with_max(150.0)),
        (resources::COAL, Resource::new("Coal", 10.0, 0.1).with_max(100.0)),
        (
            resources::HAPPINESS,
            Resource::new("Happiness", 0.0, 0.1).with_max(1000.0),
        ),
    ];
    for (id, resource) in starting_resources {
        state.resources.insert(id.to_string(), resource);
    }

    let frame_cost = cost_table(&[
        (materials::BEAM, 1.0),
        (materials::SLAB, 1.0),
        (materials::BAR, 1.0),
    ]);
    let starting_buildings = [
        (
            buildings::HOME,
            Building::new(
                "Home",
                cost_table(&[(resources::WOOD, 100.0), (resources::CLAY, 100.0)]),
            )
            .producing(resources::HAPPINESS, 0.5),
        ),
        (
            buildings::WOODCUTTER,
            Building::new("Woodcutter", frame_cost.clone())
                .producing(resources::WOOD, 0.5)
                .gated_by(research::WOOD_CUTTER),
        ),
        (
            buildings::MINER,
            Building::new("Miner", frame_cost)
                .producing(resources::STONE, 0.5)
                .gated_by(research::AUTOMATIC_MINER),
        ),
    ];
    for (id, building) in starting_buildings {
        state.buildings.insert(id.to_string(), building);
    }

    state.crafting.insert(
        crafting::CONSTRUCTOR.to_string(),
        Crafting::new(
            "Constructor",
            cost_table(&[
                (resources::WOOD, 100.0),
                (resources::STONE, 100.0),
                (resources::IRON, 50.0),
            ]),
        )
        .gated_by(research::CONSTRUCTOR),
    );

    // Steel is not a resource yet, so ingots cannot be crafted.
    let starting_materials = [
        (materials::BEAM, "Wooden Beam", resources::WOOD, 100.0, 50.0),
        (materials::SLAB, "Stone Slab", resources::STONE, 100.0, 50.0),
        (materials::BAR, "Iron Bar", resources::IRON, 100.0, 25.0),
        (materials::INGOT, "Steel Ingot", "steel", 100.0, 10.0),
        (materials::BRICK, "Brick", resources::CLAY, 10.0, 100.0),
    ];
    for (id, name, input, qty, max) in starting_materials {
        state.materials.insert(
            id.to_string(),
            Material::new(name, 1.0, cost_table(&[(input, qty)])).with_max(max),
        );
    }

    let starting_research = [
        (research::WOOD_CUTTER, "Woodcutter", 100.0),
        (research::AUTOMATIC_MINER, "Automatic Miner", 100.0),
        (research::CONSTRUCTOR, "Constructor", 500.0),
    ];
    for (id, name, happiness) in starting_research {
        state.research.insert(
            id.to_string(),
            Research::new(name, cost_table(&[(resources::HAPPINESS, happiness)])),
        );
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        let state = starting_colony();
        assert_eq!(state.resources.len(), 6);
        assert_eq!(state.buildings.len(), 3);
        assert_eq!(state.crafting.len(), 1);
        assert_eq!(state.materials.len(), 5);
        assert_eq!(state.research.len(), 3);
    }

    #[test]
    fn test_session_scalars() {
        let state = starting_colony();
        assert_eq!(state.explorers, 1);
        assert_eq!(state.explorer_multiplier, 1.0);
        assert!(state.player_name.is_empty());
    }

    #[test]
    fn test_nothing_owned_nothing_unlocked() {
        let state = starting_colony();
        assert!(state.buildings.values().all(|b| b.owned == 0));
        assert!(state.crafting.values().all(|c| c.owned == 0));
        assert!(state.research.values().all(|r| !r.unlocked));
    }

    #[test]
    fn test_starting_state_is_consistent() {
        assert!(starting_colony().invariant_violations().is_empty());
    }
}
