//! Colony identifiers and tuning constants.
//!
//! Every cross-reference in the colony is a string key into one of the five
//! tables. These are the keys of the starting colony, shared by the engine,
//! the harness and the tests.

pub mod resources {
    pub const WOOD: &str = "wood";
    pub const STONE: &str = "stone";
    pub const CLAY: &str = "clay";
    pub const IRON: &str = "iron";
    pub const COAL: &str = "coal";
    pub const HAPPINESS: &str = "happiness";

    /// Resources with a manual click action.
    pub const MANUAL: [&str; 4] = [WOOD, STONE, IRON, CLAY];
}

pub mod buildings {
    pub const HOME: &str = "home";
    pub const WOODCUTTER: &str = "woodcutter";
    pub const MINER: &str = "miner";
}

pub mod crafting {
    pub const CONSTRUCTOR: &str = "constructor";
}

pub mod materials {
    pub const BEAM: &str = "beam";
    pub const SLAB: &str = "slab";
    pub const BAR: &str = "bar";
    pub const INGOT: &str = "ingot";
    pub const BRICK: &str = "brick";
}

pub mod research {
    pub const WOOD_CUTTER: &str = "woodCutter";
    pub const AUTOMATIC_MINER: &str = "automaticMiner";
    pub const CONSTRUCTOR: &str = "constructor";
}

/// Default tuning values. All of them can be overridden through
/// [`crate::config::ColonyConfig`].
pub mod tuning {
    /// Seconds between resource generation passes.
    pub const GENERATION_PERIOD: f64 = 1.0;
    /// Seconds between happiness generation passes.
    pub const HAPPINESS_PERIOD: f64 = 1.0;
    /// Seconds between wood consumption passes.
    pub const WOOD_CONSUMPTION_PERIOD: f64 = 10.0;

    /// Units added per manual click (boosted x10 for playtesting).
    pub const MANUAL_YIELD: f64 = 10.0;
    /// Chance that a stone click also yields coal.
    pub const COAL_CHANCE: f64 = 0.05;

    /// Wood in stock needed to keep one home heated.
    pub const WOOD_PER_HEATED_HOME: f64 = 10.0;

    /// Happiness price of an explorer at multiplier 1.0.
    pub const EXPLORER_BASE_COST: f64 = 100.0;
    /// Additive multiplier growth per invited explorer.
    pub const EXPLORER_COST_STEP: f64 = 0.1;
}
