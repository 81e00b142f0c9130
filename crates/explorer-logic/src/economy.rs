//! Pure economy logic: affordability, pass arithmetic and explorer pricing.
//!
//! Nothing here mutates state. The engine asks these functions what is
//! allowed and how much moves, then applies the answer.

use crate::config::ProductionGate;
use crate::constants::resources;
use crate::model::{Building, ColonyState, CostTable};

/// Where one building cost entry is paid from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostSource {
    Resource,
    Material,
}

/// An optional research gate is open when absent or unlocked.
pub fn gate_open(state: &ColonyState, gate: Option<&str>) -> bool {
    gate.map_or(true, |id| state.is_unlocked(id))
}

/// Every entry covered by resource stock alone.
pub fn resources_cover(state: &ColonyState, cost: &CostTable) -> bool {
    cost.iter().all(|(id, qty)| state.resource_amount(id) >= *qty)
}

/// Resolve which stock pays each building cost entry: the resource when it
/// holds enough, otherwise the material. `None` if any entry is uncovered.
pub fn building_cost_sources(
    state: &ColonyState,
    cost: &CostTable,
) -> Option<Vec<(String, CostSource, f64)>> {
    cost.iter()
        .map(|(id, qty)| {
            let source = if state.resource_amount(id) >= *qty {
                CostSource::Resource
            } else if state.material_amount(id) >= *qty {
                CostSource::Material
            } else {
                return None;
            };
            Some((id.clone(), source, *qty))
        })
        .collect()
}

/// Known, research gate open, and every cost entry covered by a resource
/// or, failing that, a material of the same id.
pub fn can_afford_building(state: &ColonyState, id: &str) -> bool {
    let Some(building) = state.buildings.get(id) else {
        return false;
    };
    gate_open(state, building.research.as_deref())
        && building_cost_sources(state, &building.cost).is_some()
}

/// Known, research gate open, and every cost entry covered by resources.
pub fn can_afford_crafting(state: &ColonyState, id: &str) -> bool {
    let Some(station) = state.crafting.get(id) else {
        return false;
    };
    gate_open(state, station.research.as_deref()) && resources_cover(state, &station.cost)
}

/// Resources cover one unit. Station ownership is checked when crafting.
pub fn can_craft_material(state: &ColonyState, id: &str) -> bool {
    state
        .materials
        .get(id)
        .is_some_and(|m| resources_cover(state, &m.cost))
}

/// Whether a building's production is allowed this pass.
pub fn production_gate_open(state: &ColonyState, building: &Building, gate: ProductionGate) -> bool {
    match gate {
        ProductionGate::BuildingResearch => gate_open(state, building.research.as_deref()),
        ProductionGate::ProducedResourceKey => building
            .resource_produced
            .as_deref()
            .and_then(|id| state.research.get(id))
            .map_or(true, |r| r.unlocked),
    }
}

/// Output of one building for one pass: `(resource, owned × rate)`.
pub fn building_output(building: &Building) -> Option<(&str, f64)> {
    if building.owned == 0 {
        return None;
    }
    let rate = building.production_rate?;
    let target = building.resource_produced.as_deref()?;
    Some((target, f64::from(building.owned) * rate))
}

/// Per-building gains for one generation pass, in building-id order.
pub fn production_plan(state: &ColonyState, gate: ProductionGate) -> Vec<(String, f64)> {
    state
        .buildings
        .values()
        .filter(|b| production_gate_open(state, b, gate))
        .filter_map(building_output)
        .map(|(target, amount)| (target.to_string(), amount))
        .collect()
}

/// Add `gain` and clamp to `cap` (unbounded when `None`).
pub fn add_capped(amount: f64, gain: f64, cap: Option<f64>) -> f64 {
    (amount + gain).min(cap.unwrap_or(f64::INFINITY))
}

/// Homes kept warm by the wood in stock: `min(homes, floor(wood / per_home))`.
pub fn heated_homes(homes: u32, wood: f64, wood_per_home: f64) -> u32 {
    if !(wood > 0.0 && wood_per_home > 0.0) {
        return 0;
    }
    let warmable = (wood / wood_per_home).floor();
    if warmable >= f64::from(homes) {
        homes
    } else {
        // warmable < homes <= u32::MAX, so the cast cannot truncate
        warmable as u32
    }
}

/// Happiness earned this pass: one per heated home while anyone lives here.
pub fn happiness_gain(state: &ColonyState, wood_per_home: f64) -> f64 {
    let heated = heated_homes(
        state.homes(),
        state.resource_amount(resources::WOOD),
        wood_per_home,
    );
    if heated > 0 && state.explorers > 0 {
        f64::from(heated)
    } else {
        0.0
    }
}

/// Wood burned this pass: one per home, all or nothing.
pub fn wood_upkeep(state: &ColonyState) -> Option<f64> {
    let homes = f64::from(state.homes());
    if homes > 0.0 && state.resource_amount(resources::WOOD) >= homes {
        Some(homes)
    } else {
        None
    }
}

/// Happiness price of the next explorer.
pub fn explorer_invite_cost(base_cost: f64, multiplier: f64) -> f64 {
    base_cost * multiplier
}

/// More homes than explorers, and enough happiness to pay.
pub fn can_invite_explorer(state: &ColonyState, base_cost: f64) -> bool {
    state.homes() > state.explorers
        && state.happiness() >= explorer_invite_cost(base_cost, state.explorer_multiplier)
}
