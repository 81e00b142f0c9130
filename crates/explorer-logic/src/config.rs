//! Engine configuration: pass periods, tuning numbers and economy rules.
//!
//! The classic game has a handful of places where two code paths treat
//! the same quantity differently (material fallback on purchase, caps that
//! only some paths respect, a production gate looked up under the wrong
//! key). Each of those is an explicit [`EconomyRules`] switch so hosts can
//! pick classic or corrected behavior.
//!
//! Configs are loaded from JSON; every field is optional and falls back to
//! the values in [`crate::constants::tuning`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::tuning;

/// Which stock a building purchase is paid from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseDeduction {
    /// Pay each cost entry from the stock that covered it during the
    /// affordability check: the resource when it has enough, otherwise the
    /// material.
    #[default]
    MatchAffordability,
    /// Classic behavior: always pay from resources. Entries without a
    /// matching resource are free, and a short resource is floored at zero.
    ResourcesOnly,
}

/// Where the production pass looks up a building's research gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionGate {
    /// The building's own `research` field. No field means always open.
    #[default]
    BuildingResearch,
    /// Classic behavior: look up the produced resource's id in the
    /// research table. A missing entry counts as open.
    ProducedResourceKey,
}

/// How the explorer price multiplier grows after each invite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorerCostGrowth {
    Additive { step: f64 },
    Doubling,
}

impl Default for ExplorerCostGrowth {
    fn default() -> Self {
        ExplorerCostGrowth::Additive {
            step: tuning::EXPLORER_COST_STEP,
        }
    }
}

impl ExplorerCostGrowth {
    /// Multiplier after one more explorer joins.
    pub fn next(&self, multiplier: f64) -> f64 {
        match self {
            ExplorerCostGrowth::Additive { step } => multiplier + step,
            ExplorerCostGrowth::Doubling => multiplier * 2.0,
        }
    }
}

/// Switches for the behaviors where classic code paths disagree.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    pub purchase_deduction: PurchaseDeduction,
    /// Clamp manual clicks to the resource cap.
    pub clamp_manual_generation: bool,
    /// Clamp the happiness pass to the happiness cap.
    pub clamp_happiness_generation: bool,
    /// Refuse to craft a material that is already at its cap.
    pub clamp_crafted_materials: bool,
    pub explorer_cost_growth: ExplorerCostGrowth,
    pub production_gate: ProductionGate,
}

impl EconomyRules {
    /// Every switch set to what the classic game does.
    pub fn classic() -> Self {
        Self {
            purchase_deduction: PurchaseDeduction::ResourcesOnly,
            clamp_manual_generation: false,
            clamp_happiness_generation: false,
            clamp_crafted_materials: false,
            explorer_cost_growth: ExplorerCostGrowth::default(),
            production_gate: ProductionGate::ProducedResourceKey,
        }
    }
}

/// Pass periods in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassPeriods {
    pub resource_generation: f64,
    pub happiness_generation: f64,
    pub wood_consumption: f64,
}

impl Default for PassPeriods {
    fn default() -> Self {
        Self {
            resource_generation: tuning::GENERATION_PERIOD,
            happiness_generation: tuning::HAPPINESS_PERIOD,
            wood_consumption: tuning::WOOD_CONSUMPTION_PERIOD,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub periods: PassPeriods,
    pub manual_yield: f64,
    pub coal_chance: f64,
    pub wood_per_heated_home: f64,
    pub explorer_base_cost: f64,
    pub rules: EconomyRules,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            periods: PassPeriods::default(),
            manual_yield: tuning::MANUAL_YIELD,
            coal_chance: tuning::COAL_CHANCE,
            wood_per_heated_home: tuning::WOOD_PER_HEATED_HOME,
            explorer_base_cost: tuning::EXPLORER_BASE_COST,
            rules: EconomyRules::default(),
        }
    }
}

impl ColonyConfig {
    /// Default tuning with every rule switched to classic behavior.
    pub fn classic() -> Self {
        Self {
            rules: EconomyRules::classic(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ColonyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("resource_generation", self.periods.resource_generation),
            ("happiness_generation", self.periods.happiness_generation),
            ("wood_consumption", self.periods.wood_consumption),
        ];
        for (name, period) in periods {
            if !(period.is_finite() && period > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "period {} must be positive, got {}",
                    name, period
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.coal_chance) {
            return Err(ConfigError::Invalid(format!(
                "coal_chance must be within [0, 1], got {}",
                self.coal_chance
            )));
        }
        if !(self.wood_per_heated_home.is_finite() && self.wood_per_heated_home > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wood_per_heated_home must be positive, got {}",
                self.wood_per_heated_home
            )));
        }
        if !(self.manual_yield.is_finite() && self.manual_yield >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "manual_yield must be non-negative, got {}",
                self.manual_yield
            )));
        }
        if !(self.explorer_base_cost.is_finite() && self.explorer_base_cost >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "explorer_base_cost must be non-negative, got {}",
                self.explorer_base_cost
            )));
        }
        if let ExplorerCostGrowth::Additive { step } = self.rules.explorer_cost_growth {
            if !(step.is_finite() && step >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "explorer cost step must be non-negative, got {}",
                    step
                )));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading a config.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ColonyConfig::default().validate().is_ok());
        assert!(ColonyConfig::classic().validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ColonyConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ColonyConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let json = r#"{
            "periods": { "wood_consumption": 5.0 },
            "rules": {
                "clamp_manual_generation": true,
                "explorer_cost_growth": { "kind": "doubling" },
                "production_gate": "produced_resource_key"
            }
        }"#;
        let config = ColonyConfig::from_json_str(json).unwrap();
        assert_eq!(config.periods.wood_consumption, 5.0);
        assert_eq!(config.periods.resource_generation, 1.0);
        assert!(config.rules.clamp_manual_generation);
        assert!(!config.rules.clamp_happiness_generation);
        assert_eq!(config.rules.explorer_cost_growth, ExplorerCostGrowth::Doubling);
        assert_eq!(config.rules.production_gate, ProductionGate::ProducedResourceKey);
        assert_eq!(config.manual_yield, 10.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ColonyConfig::classic();
        let json = config.to_json_string().unwrap();
        assert_eq!(ColonyConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_non_positive_period() {
        let json = r#"{ "periods": { "happiness_generation": 0.0 } }"#;
        assert!(matches!(
            ColonyConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_coal_chance_out_of_range() {
        let json = r#"{ "coal_chance": 1.5 }"#;
        assert!(matches!(
            ColonyConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_shrinking_multiplier() {
        let json = r#"{ "rules": { "explorer_cost_growth": { "kind": "additive", "step": -0.5 } } }"#;
        assert!(ColonyConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(
            ColonyConfig::from_json_str("{ periods: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_cost_growth_rules() {
        let additive = ExplorerCostGrowth::default();
        assert!((additive.next(1.0) - 1.1).abs() < 1e-9);
        assert!((ExplorerCostGrowth::Doubling.next(1.5) - 3.0).abs() < 1e-9);
    }
}
