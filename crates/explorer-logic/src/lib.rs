//! Pure colony economy logic for Lonely Explorer.
//!
//! This crate holds every economic rule of the game independent of timers,
//! threads or storage. Functions take plain data and return results; the
//! engine crate owns the state and applies them.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Pass periods, tuning numbers, economy rule switches (JSON) |
//! | [`constants`] | Table keys and default tuning values |
//! | [`economy`] | Affordability checks, pass arithmetic, explorer pricing |
//! | [`model`] | Resource / building / crafting / material / research records |
//! | [`passes`] | The three periodic passes and their periods |
//! | [`progress`] | Header status and inventory snapshot for views |
//! | [`starting`] | The starting colony table |

pub mod config;
pub mod constants;
pub mod economy;
pub mod model;
pub mod passes;
pub mod progress;
pub mod starting;
