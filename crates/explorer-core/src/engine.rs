//! Colony engine - owns the colony state and applies every mutation
//!
//! Player intents and timer passes all funnel through [`ColonyEngine`].
//! Each one re-validates its preconditions against the current state and
//! resolves unknown ids or missing funds to a no-op that returns `false`.

use std::io::{Read, Write};
use std::path::Path;

use explorer_logic::config::{ColonyConfig, PurchaseDeduction};
use explorer_logic::constants::{crafting, resources};
use explorer_logic::economy::{self, CostSource};
use explorer_logic::model::{ColonyState, Resource};
use explorer_logic::passes::Pass;
use explorer_logic::progress::{self, ColonySnapshot, ColonyStatus};
use explorer_logic::starting::starting_colony;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::persistence::{self, SaveError, SaveFormat};

/// Main colony engine
#[derive(Debug)]
pub struct ColonyEngine {
    state: ColonyState,
    config: ColonyConfig,
    /// Drives the coal bonus on stone clicks. Not saved.
    rng: StdRng,
    /// Latest time handed to `tick`, in seconds
    sim_time: f64,
}

impl ColonyEngine {
    /// Starting colony with default configuration
    pub fn new() -> Self {
        Self::with_config(ColonyConfig::default())
    }

    /// Starting colony with the given configuration
    pub fn with_config(config: ColonyConfig) -> Self {
        Self::from_state(starting_colony(), config)
    }

    /// Resume from an existing state (e.g. a loaded save)
    pub fn from_state(state: ColonyState, config: ColonyConfig) -> Self {
        Self {
            state,
            config,
            rng: StdRng::from_entropy(),
            sim_time: 0.0,
        }
    }

    /// Replace the entropy-seeded RNG with a deterministic one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &ColonyState {
        &self.state
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Get latest tick time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn can_afford_building(&self, id: &str) -> bool {
        economy::can_afford_building(&self.state, id)
    }

    pub fn can_afford_crafting(&self, id: &str) -> bool {
        economy::can_afford_crafting(&self.state, id)
    }

    pub fn can_craft_material(&self, id: &str) -> bool {
        economy::can_craft_material(&self.state, id)
    }

    /// Happiness price of the next explorer
    pub fn explorer_invite_cost(&self) -> f64 {
        economy::explorer_invite_cost(self.config.explorer_base_cost, self.state.explorer_multiplier)
    }

    pub fn can_invite_explorer(&self) -> bool {
        economy::can_invite_explorer(&self.state, self.config.explorer_base_cost)
    }

    pub fn crafting_unlocked(&self) -> bool {
        progress::crafting_unlocked(&self.state)
    }

    pub fn research_available(&self, id: &str) -> bool {
        progress::research_available(&self.state, id)
    }

    pub fn colony_status(&self) -> ColonyStatus {
        progress::colony_status(&self.state)
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        progress::snapshot(&self.state)
    }

    // ── Player intents ─────────────────────────────────────────────────

    /// Store the player's display name. Returns `false` for an empty name,
    /// which is still stored so the session can start.
    pub fn set_player_name(&mut self, name: impl Into<String>) -> bool {
        self.state.player_name = name.into();
        if self.state.player_name.is_empty() {
            log::warn!("Player name cannot be empty");
            return false;
        }
        true
    }

    /// Buy one building. Returns `true` if it was bought.
    pub fn purchase_building(&mut self, id: &str) -> bool {
        if !economy::can_afford_building(&self.state, id) {
            log::debug!("Cannot purchase building {}", id);
            return false;
        }
        let Some(building) = self.state.buildings.get(id) else {
            return false;
        };

        let payments: Vec<(String, CostSource, f64)> = match self.config.rules.purchase_deduction {
            PurchaseDeduction::MatchAffordability => {
                match economy::building_cost_sources(&self.state, &building.cost) {
                    Some(sources) => sources,
                    None => return false,
                }
            }
            PurchaseDeduction::ResourcesOnly => building
                .cost
                .iter()
                .map(|(item, qty)| (item.clone(), CostSource::Resource, *qty))
                .collect(),
        };

        if let Some(building) = self.state.buildings.get_mut(id) {
            building.owned = building.owned.saturating_add(1);
        }
        for (item, source, qty) in payments {
            self.spend(&item, source, qty);
        }
        log::debug!("Purchased building {}", id);
        true
    }

    /// Buy one crafting station, paid from resources only.
    pub fn purchase_crafting(&mut self, id: &str) -> bool {
        if !economy::can_afford_crafting(&self.state, id) {
            log::debug!("Cannot purchase crafting station {}", id);
            return false;
        }
        let Some(station) = self.state.crafting.get_mut(id) else {
            return false;
        };
        station.owned = station.owned.saturating_add(1);
        let cost = station.cost.clone();
        for (item, qty) in &cost {
            self.spend(item, CostSource::Resource, *qty);
        }
        log::debug!("Purchased crafting station {}", id);
        true
    }

    /// Craft one unit of a material with the constructor. All cost entries
    /// are checked before anything is spent.
    pub fn craft_material(&mut self, id: &str) -> bool {
        if self.state.stations_owned(crafting::CONSTRUCTOR) == 0 {
            log::debug!("Cannot craft {}: no constructor", id);
            return false;
        }
        let Some(material) = self.state.materials.get(id) else {
            return false;
        };
        if self.config.rules.clamp_crafted_materials
            && material.amount + 1.0 > material.max_amount.unwrap_or(f64::INFINITY)
        {
            log::debug!("Cannot craft {}: storage full", id);
            return false;
        }
        if !economy::resources_cover(&self.state, &material.cost) {
            log::debug!("Cannot craft {}: not enough resources", id);
            return false;
        }

        let cost = material.cost.clone();
        for (item, qty) in &cost {
            self.spend(item, CostSource::Resource, *qty);
        }
        if let Some(material) = self.state.materials.get_mut(id) {
            material.amount += 1.0;
        }
        true
    }

    /// Unlock a research entry. Once unlocked, further calls are no-ops.
    pub fn research(&mut self, id: &str) -> bool {
        let Some(entry) = self.state.research.get(id) else {
            return false;
        };
        if entry.unlocked {
            return false;
        }
        if !economy::resources_cover(&self.state, &entry.cost) {
            log::debug!("Cannot research {}: not enough resources", id);
            return false;
        }

        let cost = entry.cost.clone();
        for (item, qty) in &cost {
            self.spend(item, CostSource::Resource, *qty);
        }
        if let Some(entry) = self.state.research.get_mut(id) {
            entry.unlocked = true;
        }
        log::info!(
            "Research {} has been unlocked, it can now be purchased in the buildings menu",
            id
        );
        true
    }

    /// Invite another explorer into a spare home, paid in happiness.
    pub fn invite_explorer(&mut self) -> bool {
        if !self.can_invite_explorer() {
            log::debug!("Cannot invite explorer");
            return false;
        }
        let cost = self.explorer_invite_cost();
        self.spend(resources::HAPPINESS, CostSource::Resource, cost);
        self.state.explorers += 1;
        self.state.explorer_multiplier = self
            .config
            .rules
            .explorer_cost_growth
            .next(self.state.explorer_multiplier);
        log::info!(
            "Explorer invited, colony has {} explorers",
            self.state.explorers
        );
        true
    }

    /// Manual click on a wood, stone, iron or clay action.
    pub fn manual_generate(&mut self, id: &str) -> bool {
        apply_manual(&mut self.state, &self.config, id, &mut self.rng)
    }

    /// Manual click using a caller-supplied RNG for the coal roll.
    pub fn manual_generate_with<R: Rng + ?Sized>(&mut self, id: &str, rng: &mut R) -> bool {
        apply_manual(&mut self.state, &self.config, id, rng)
    }

    // ── Periodic passes ────────────────────────────────────────────────

    /// Run one pass at time `now` (seconds). Returns `true` if state changed.
    pub fn tick(&mut self, pass: Pass, now: f64) -> bool {
        self.sim_time = self.sim_time.max(now);
        log::debug!("Running pass {} at t={:.1}", pass, now);
        match pass {
            Pass::ResourceGeneration => self.generate_resources(),
            Pass::HappinessGeneration => self.generate_happiness(),
            Pass::WoodConsumption => self.consume_wood(),
        }
    }

    /// Buildings add `owned × rate` to their product, clamped to its cap.
    pub fn generate_resources(&mut self) -> bool {
        let plan = economy::production_plan(&self.state, self.config.rules.production_gate);
        let mut changed = false;
        for (target, gain) in plan {
            if let Some(resource) = self.state.resources.get_mut(&target) {
                let before = resource.amount;
                credit(resource, gain, true);
                changed |= resource.amount != before;
            }
        }
        changed
    }

    /// Heated homes add one happiness each.
    pub fn generate_happiness(&mut self) -> bool {
        let gain = economy::happiness_gain(&self.state, self.config.wood_per_heated_home);
        if gain <= 0.0 {
            return false;
        }
        let clamp = self.config.rules.clamp_happiness_generation;
        match self.state.resources.get_mut(resources::HAPPINESS) {
            Some(happiness) => {
                let before = happiness.amount;
                credit(happiness, gain, clamp);
                happiness.amount != before
            }
            None => false,
        }
    }

    /// Homes burn one wood each, or nothing at all if wood runs short.
    pub fn consume_wood(&mut self) -> bool {
        let Some(upkeep) = economy::wood_upkeep(&self.state) else {
            if self.state.homes() > 0 {
                log::debug!("Not enough wood to heat {} homes", self.state.homes());
            }
            return false;
        };
        match self.state.resources.get_mut(resources::WOOD) {
            Some(wood) => {
                wood.amount -= upkeep;
                true
            }
            None => false,
        }
    }

    // ── Persistence ────────────────────────────────────────────────────

    /// Save colony state to a writer
    pub fn save<W: Write>(
        &self,
        writer: W,
        format: SaveFormat,
        saved_at: u64,
    ) -> Result<(), SaveError> {
        persistence::save_colony(writer, format, &self.state.player_name, saved_at, &self.state)
    }

    /// Load colony state from a reader. On error the engine is untouched.
    pub fn load<R: Read>(&mut self, reader: R, format: SaveFormat) -> Result<(), SaveError> {
        let loaded = persistence::load_colony(reader, format)?;
        self.install(loaded.state);
        Ok(())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>, saved_at: u64) -> Result<(), SaveError> {
        persistence::save_to_path(path, &self.state.player_name, saved_at, &self.state)
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let loaded = persistence::load_from_path(path)?;
        self.install(loaded.state);
        Ok(())
    }

    fn install(&mut self, state: ColonyState) {
        self.state = state;
        log::info!(
            "Loaded colony of {} ({} explorers)",
            self.state.player_name,
            self.state.explorers
        );
    }

    /// Take `qty` from a resource or material, never below zero. Missing
    /// entries are skipped.
    fn spend(&mut self, item: &str, source: CostSource, qty: f64) {
        let stock = match source {
            CostSource::Resource => self.state.resources.get_mut(item).map(|r| &mut r.amount),
            CostSource::Material => self.state.materials.get_mut(item).map(|m| &mut m.amount),
        };
        if let Some(amount) = stock {
            *amount = (*amount - qty).max(0.0);
        }
    }
}

impl Default for ColonyEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn credit(resource: &mut Resource, gain: f64, clamp: bool) {
    resource.amount = if clamp {
        economy::add_capped(resource.amount, gain, resource.max_amount)
    } else {
        resource.amount + gain
    };
}

fn apply_manual<R: Rng + ?Sized>(
    state: &mut ColonyState,
    config: &ColonyConfig,
    id: &str,
    rng: &mut R,
) -> bool {
    if !resources::MANUAL.contains(&id) {
        log::debug!("No manual action for {}", id);
        return false;
    }
    let clamp = config.rules.clamp_manual_generation;
    let Some(resource) = state.resources.get_mut(id) else {
        return false;
    };
    credit(resource, config.manual_yield, clamp);

    // Rolled on every stone click, independent of the stone itself.
    if id == resources::STONE && rng.gen::<f64>() < config.coal_chance {
        if let Some(coal) = state.resources.get_mut(resources::COAL) {
            credit(coal, config.manual_yield, clamp);
            log::debug!("Found coal while mining, coal is now {}", coal.amount);
        }
    }
    true
}
