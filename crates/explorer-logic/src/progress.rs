//! Read-only views of the colony for the progress screen and header.

use serde::{Deserialize, Serialize};

use crate::constants::crafting;
use crate::economy::can_craft_material;
use crate::model::ColonyState;

/// What the header says about the colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyStatus {
    /// The player is still alone.
    Lonely { player: String },
    /// At least one explorer has been invited.
    Growing { explorers: u32 },
}

pub fn colony_status(state: &ColonyState) -> ColonyStatus {
    if state.explorers > 1 {
        ColonyStatus::Growing {
            explorers: state.explorers,
        }
    } else {
        ColonyStatus::Lonely {
            player: state.player_name.clone(),
        }
    }
}

/// Crafting is available once a constructor is owned.
pub fn crafting_unlocked(state: &ColonyState) -> bool {
    state.stations_owned(crafting::CONSTRUCTOR) > 0
}

/// A research entry the player can still start.
pub fn research_available(state: &ColonyState, id: &str) -> bool {
    state.research.get(id).is_some_and(|r| !r.unlocked)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLine {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub max_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub craftable: bool,
}

/// Inventory summary, sorted by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub status: ColonyStatus,
    pub resources: Vec<ResourceLine>,
    pub homes: u32,
    pub explorers: u32,
    pub crafting_unlocked: bool,
    /// Empty until crafting is unlocked.
    pub materials: Vec<MaterialLine>,
}

pub fn snapshot(state: &ColonyState) -> ColonySnapshot {
    let unlocked = crafting_unlocked(state);
    let materials = if unlocked {
        state
            .materials
            .iter()
            .map(|(id, m)| MaterialLine {
                id: id.clone(),
                name: m.name.clone(),
                amount: m.amount,
                craftable: can_craft_material(state, id),
            })
            .collect()
    } else {
        Vec::new()
    };

    ColonySnapshot {
        status: colony_status(state),
        resources: state
            .resources
            .iter()
            .map(|(id, r)| ResourceLine {
                id: id.clone(),
                name: r.name.clone(),
                amount: r.amount,
                max_amount: r.max_amount,
            })
            .collect(),
        homes: state.homes(),
        explorers: state.explorers,
        crafting_unlocked: unlocked,
        materials,
    }
}
