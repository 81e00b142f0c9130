//! Colony data model: the five keyed tables plus the session scalars.
//!
//! Every table maps a stable string id to a plain record. Records carry no
//! id of their own; the key is the identifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{buildings, resources};

/// Item id → quantity. Keys may name resources or materials.
pub type CostTable = BTreeMap<String, f64>;

/// Build a cost table from literal pairs.
pub fn cost_table(entries: &[(&str, f64)]) -> CostTable {
    entries
        .iter()
        .map(|(id, qty)| ((*id).to_string(), *qty))
        .collect()
}

/// A stockpiled raw resource (wood, stone, happiness, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub amount: f64,
    /// Informational only. Actual production comes from buildings.
    pub rate_per_second: f64,
    /// `None` means unbounded.
    pub max_amount: Option<f64>,
}

impl Resource {
    pub fn new(name: impl Into<String>, amount: f64, rate_per_second: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            rate_per_second,
            max_amount: None,
        }
    }

    pub fn with_max(mut self, max_amount: f64) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    /// Upper bound used when clamping; infinite when no cap is declared.
    pub fn cap(&self) -> f64 {
        self.max_amount.unwrap_or(f64::INFINITY)
    }
}

/// A purchasable building. Homes heat and house explorers; the others
/// produce a resource per owned unit per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub cost: CostTable,
    pub owned: u32,
    pub production_rate: Option<f64>,
    pub resource_produced: Option<String>,
    /// Research that must be unlocked before the building can be bought.
    pub research: Option<String>,
}

impl Building {
    pub fn new(name: impl Into<String>, cost: CostTable) -> Self {
        Self {
            name: name.into(),
            cost,
            owned: 0,
            production_rate: None,
            resource_produced: None,
            research: None,
        }
    }

    /// Rate and target are set together: a building never has a rate
    /// without something to produce.
    pub fn producing(mut self, resource: impl Into<String>, rate: f64) -> Self {
        self.resource_produced = Some(resource.into());
        self.production_rate = Some(rate);
        self
    }

    pub fn gated_by(mut self, research: impl Into<String>) -> Self {
        self.research = Some(research.into());
        self
    }
}

/// A crafting station such as the constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crafting {
    pub name: String,
    pub cost: CostTable,
    pub owned: u32,
    pub research: Option<String>,
}

impl Crafting {
    pub fn new(name: impl Into<String>, cost: CostTable) -> Self {
        Self {
            name: name.into(),
            cost,
            owned: 0,
            research: None,
        }
    }

    pub fn gated_by(mut self, research: impl Into<String>) -> Self {
        self.research = Some(research.into());
        self
    }
}

/// A crafted intermediate (beam, slab, ...). Crafted one unit at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub amount: f64,
    /// Resources consumed per unit crafted.
    pub cost: CostTable,
    pub max_amount: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>, amount: f64, cost: CostTable) -> Self {
        Self {
            name: name.into(),
            amount,
            cost,
            max_amount: None,
        }
    }

    pub fn with_max(mut self, max_amount: f64) -> Self {
        self.max_amount = Some(max_amount);
        self
    }
}

/// A one-shot research unlock. `unlocked` never goes back to `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Research {
    pub name: String,
    pub cost: CostTable,
    pub unlocked: bool,
}

impl Research {
    pub fn new(name: impl Into<String>, cost: CostTable) -> Self {
        Self {
            name: name.into(),
            cost,
            unlocked: false,
        }
    }
}

/// Complete engine state: everything a save must reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyState {
    pub player_name: String,
    /// Always at least 1, counting the player.
    pub explorers: u32,
    /// Scales the happiness price of the next explorer. Never below 1.0.
    pub explorer_multiplier: f64,
    pub resources: BTreeMap<String, Resource>,
    pub buildings: BTreeMap<String, Building>,
    pub crafting: BTreeMap<String, Crafting>,
    pub research: BTreeMap<String, Research>,
    pub materials: BTreeMap<String, Material>,
}

impl Default for ColonyState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ColonyState {
    /// A colony with a lone explorer and empty tables.
    pub fn empty() -> Self {
        Self {
            player_name: String::new(),
            explorers: 1,
            explorer_multiplier: 1.0,
            resources: BTreeMap::new(),
            buildings: BTreeMap::new(),
            crafting: BTreeMap::new(),
            research: BTreeMap::new(),
            materials: BTreeMap::new(),
        }
    }

    /// Stock of a resource; unknown ids read as zero.
    pub fn resource_amount(&self, id: &str) -> f64 {
        self.resources.get(id).map_or(0.0, |r| r.amount)
    }

    /// Stock of a material; unknown ids read as zero.
    pub fn material_amount(&self, id: &str) -> f64 {
        self.materials.get(id).map_or(0.0, |m| m.amount)
    }

    pub fn buildings_owned(&self, id: &str) -> u32 {
        self.buildings.get(id).map_or(0, |b| b.owned)
    }

    pub fn stations_owned(&self, id: &str) -> u32 {
        self.crafting.get(id).map_or(0, |c| c.owned)
    }

    pub fn homes(&self) -> u32 {
        self.buildings_owned(buildings::HOME)
    }

    pub fn happiness(&self) -> f64 {
        self.resource_amount(resources::HAPPINESS)
    }

    /// Unknown research ids count as locked.
    pub fn is_unlocked(&self, research: &str) -> bool {
        self.research.get(research).is_some_and(|r| r.unlocked)
    }

    /// Structural problems that no engine operation should ever produce.
    ///
    /// Caps are deliberately not checked here: manual clicks, happiness and
    /// crafting may run past `max_amount` under the default rules.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.explorers < 1 {
            problems.push("explorer count dropped below 1".to_string());
        }
        if self.explorer_multiplier.is_nan() || self.explorer_multiplier < 1.0 {
            problems.push(format!(
                "explorer multiplier {} is below 1.0",
                self.explorer_multiplier
            ));
        }
        for (id, r) in &self.resources {
            if r.amount.is_nan() || r.amount < 0.0 {
                problems.push(format!("resource {} has amount {}", id, r.amount));
            }
        }
        for (id, m) in &self.materials {
            if m.amount.is_nan() || m.amount < 0.0 {
                problems.push(format!("material {} has amount {}", id, m.amount));
            }
        }
        for (id, b) in &self.buildings {
            if b.production_rate.is_some() && b.resource_produced.is_none() {
                problems.push(format!("building {} has a rate but no product", id));
            }
        }

        problems
    }
}
