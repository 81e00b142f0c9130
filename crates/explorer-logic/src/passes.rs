//! The three periodic passes and their periods.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PassPeriods;

/// One of the independently scheduled production/consumption routines.
///
/// The passes are never merged: they run on different periods and differ in
/// whether they clamp to resource caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Buildings add `owned × rate` to their product, clamped to its cap.
    ResourceGeneration,
    /// Heated homes add happiness.
    HappinessGeneration,
    /// Homes burn one wood each.
    WoodConsumption,
}

impl Pass {
    pub const ALL: [Pass; 3] = [
        Pass::ResourceGeneration,
        Pass::HappinessGeneration,
        Pass::WoodConsumption,
    ];

    pub fn period(self, periods: &PassPeriods) -> f64 {
        match self {
            Pass::ResourceGeneration => periods.resource_generation,
            Pass::HappinessGeneration => periods.happiness_generation,
            Pass::WoodConsumption => periods.wood_consumption,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Pass::ResourceGeneration => "resource_generation",
            Pass::HappinessGeneration => "happiness_generation",
            Pass::WoodConsumption => "wood_consumption",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
