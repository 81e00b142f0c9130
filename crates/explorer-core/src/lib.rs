//! Lonely Explorer Core - Colony Economy Engine
//!
//! A tick-driven idle colony simulation. The player clicks for raw
//! resources, builds homes that burn wood and make happiness, researches
//! automation, and crafts materials for better buildings.
//!
//! # Architecture
//!
//! - **Rules** live in `explorer-logic` as pure functions over plain data
//! - **[`engine::ColonyEngine`]** owns the state and applies every mutation
//! - **[`scheduler::PassScheduler`]** decides when each periodic pass is due
//! - **[`shared::SharedColony`]** serializes mutations across threads, and
//!   [`shared::Ticker`] drives the passes from wall-clock time
//! - **[`persistence`]** saves and loads whole colonies
//!
//! # Example
//!
//! ```rust,no_run
//! use explorer_core::prelude::*;
//!
//! let colony = SharedColony::new(ColonyEngine::new());
//! let ticker = Ticker::spawn(colony.clone(), TickerOptions::default()).unwrap();
//!
//! // Forward player intents from the UI
//! colony.write(|engine| engine.manual_generate("wood"));
//! colony.write(|engine| engine.purchase_building("home"));
//!
//! // Views poll read-only state
//! let snapshot = colony.snapshot();
//! println!("{} explorers", snapshot.explorers);
//!
//! ticker.shutdown();
//! ```

pub mod engine;
pub mod persistence;
pub mod scheduler;
pub mod shared;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::ColonyEngine;
    pub use crate::persistence::{SaveError, SaveFormat};
    pub use crate::scheduler::PassScheduler;
    pub use crate::shared::{SharedColony, Ticker, TickerOptions};
    pub use explorer_logic::config::{ColonyConfig, EconomyRules};
    pub use explorer_logic::passes::Pass;
}
