//! Pass scheduler - decides which passes are due at a given time
//!
//! The scheduler is owned by the host, not the engine. Each pass keeps its
//! own last-fired time and fires once when at least one period has elapsed.
//! Missed periods are dropped, never replayed, and firings stay on the
//! `start + k × period` grid however late the host wakes up.

use explorer_logic::config::PassPeriods;
use explorer_logic::passes::Pass;

use crate::engine::ColonyEngine;
use crate::shared::SharedColony;

#[derive(Debug, Clone)]
pub struct PassScheduler {
    periods: PassPeriods,
    last_fired: [f64; 3],
    stopped: bool,
}

impl PassScheduler {
    /// Arm all three passes at time `start` (seconds).
    pub fn new(periods: PassPeriods, start: f64) -> Self {
        Self {
            periods,
            last_fired: [start; 3],
            stopped: false,
        }
    }

    /// Passes due at `now`, in [`Pass::ALL`] order. Each returned pass is
    /// marked as fired at the latest period boundary not after `now`.
    pub fn due(&mut self, now: f64) -> Vec<Pass> {
        if self.stopped {
            log::warn!("Tick at t={:.1} ignored: scheduler stopped", now);
            return Vec::new();
        }
        let mut due = Vec::new();
        for pass in Pass::ALL {
            let period = pass.period(&self.periods);
            let last = &mut self.last_fired[pass.index()];
            let elapsed = now - *last;
            if elapsed >= period {
                // Advance along the period grid so a late wake-up does not
                // shift every later firing.
                *last += period * (elapsed / period).floor();
                due.push(pass);
            }
        }
        due
    }

    /// Fire every due pass on a shared colony. Each pass takes the write
    /// lock on its own, so player intents can interleave between passes but
    /// never inside one.
    pub fn drive(&mut self, colony: &SharedColony, now: f64) -> Vec<Pass> {
        let due = self.due(now);
        for pass in &due {
            colony.tick(*pass, now);
        }
        due
    }

    /// Fire every due pass on an engine the caller owns outright.
    pub fn drive_engine(&mut self, engine: &mut ColonyEngine, now: f64) -> Vec<Pass> {
        let due = self.due(now);
        for pass in &due {
            engine.tick(*pass, now);
        }
        due
    }

    /// Stop for good. Later calls fire nothing.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn last_fired(&self, pass: Pass) -> f64 {
        self.last_fired[pass.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_logic::constants::{buildings, resources};

    fn scheduler() -> PassScheduler {
        PassScheduler::new(PassPeriods::default(), 0.0)
    }

    #[test]
    fn test_nothing_due_before_first_period() {
        let mut s = scheduler();
        assert!(s.due(0.5).is_empty());
    }

    #[test]
    fn test_fast_passes_fire_every_second() {
        let mut s = scheduler();
        assert_eq!(
            s.due(1.0),
            vec![Pass::ResourceGeneration, Pass::HappinessGeneration]
        );
        assert!(s.due(1.5).is_empty());
        assert_eq!(s.due(2.0).len(), 2);
    }

    #[test]
    fn test_wood_pass_fires_every_ten_seconds() {
        let mut s = scheduler();
        let mut wood_fires = 0;
        for t in 1..=30 {
            if s.due(f64::from(t)).contains(&Pass::WoodConsumption) {
                wood_fires += 1;
            }
        }
        assert_eq!(wood_fires, 3);
        assert_eq!(s.last_fired(Pass::WoodConsumption), 30.0);
    }

    #[test]
    fn test_missed_ticks_are_not_replayed() {
        let mut s = scheduler();
        // A 35 second stall fires each pass once.
        assert_eq!(s.due(35.0), Pass::ALL.to_vec());
        assert!(s.due(35.5).is_empty());
        assert_eq!(s.last_fired(Pass::WoodConsumption), 30.0);
        assert_eq!(s.due(40.0), Pass::ALL.to_vec());
    }

    #[test]
    fn test_uneven_polling_keeps_the_period() {
        let mut s = scheduler();
        let mut fired = [0u32; 3];
        // Poll every 0.3 s for 30 s.
        for step in 1..=100u32 {
            for pass in s.due(f64::from(step * 3) / 10.0) {
                fired[pass.index()] += 1;
            }
        }
        assert_eq!(fired[Pass::ResourceGeneration.index()], 30);
        assert_eq!(fired[Pass::HappinessGeneration.index()], 30);
        assert_eq!(fired[Pass::WoodConsumption.index()], 3);
        assert_eq!(s.last_fired(Pass::ResourceGeneration), 30.0);
    }

    #[test]
    fn test_late_wake_up_stays_on_grid() {
        let mut s = scheduler();
        assert_eq!(s.due(1.7).len(), 2);
        assert_eq!(s.last_fired(Pass::ResourceGeneration), 1.0);
        // Next boundary is 2.0, not 2.7.
        assert_eq!(s.due(2.0).len(), 2);
    }

    #[test]
    fn test_stopped_scheduler_fires_nothing() {
        let mut s = scheduler();
        s.stop();
        assert!(s.is_stopped());
        assert!(s.due(100.0).is_empty());
    }

    #[test]
    fn test_drive_engine_runs_due_passes() {
        let mut engine = ColonyEngine::new().with_seed(1);
        let mut s = scheduler();
        engine.manual_generate(resources::WOOD);
        engine.manual_generate(resources::CLAY);
        assert!(engine.purchase_building(buildings::HOME));
        for _ in 0..5 {
            engine.manual_generate(resources::WOOD);
        }

        for t in 1..=10 {
            s.drive_engine(&mut engine, f64::from(t));
        }

        // 10 × (0.5 from the home + 1 heated home), and one wood burned.
        assert_eq!(engine.state().happiness(), 15.0);
        assert_eq!(engine.state().resource_amount(resources::WOOD), 49.0);
    }
}
