//! Shared colony handle and the background ticker
//!
//! [`SharedColony`] serializes every mutation behind one write lock while
//! letting views read concurrently. [`Ticker`] runs a [`PassScheduler`] on
//! its own thread against wall-clock time and stops when dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use explorer_logic::passes::Pass;
use explorer_logic::progress::ColonySnapshot;

use crate::engine::ColonyEngine;
use crate::scheduler::PassScheduler;

/// Cloneable handle to one engine
#[derive(Debug, Clone)]
pub struct SharedColony {
    inner: Arc<RwLock<ColonyEngine>>,
}

impl SharedColony {
    pub fn new(engine: ColonyEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Run one mutation with exclusive access.
    pub fn write<T>(&self, f: impl FnOnce(&mut ColonyEngine) -> T) -> T {
        // Every operation leaves the state consistent before it can panic,
        // so a poisoned lock is still safe to use.
        let mut engine = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }

    /// Read without blocking other readers.
    pub fn read<T>(&self, f: impl FnOnce(&ColonyEngine) -> T) -> T {
        let engine = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&engine)
    }

    pub fn tick(&self, pass: Pass, now: f64) -> bool {
        self.write(|engine| engine.tick(pass, now))
    }

    pub fn snapshot(&self) -> ColonySnapshot {
        self.read(ColonyEngine::snapshot)
    }
}

/// Ticker tuning
#[derive(Debug, Clone, Copy)]
pub struct TickerOptions {
    /// How often the thread wakes to check for due passes
    pub resolution: Duration,
    /// Simulated seconds per real second
    pub time_scale: f64,
}

impl Default for TickerOptions {
    fn default() -> Self {
        Self {
            resolution: Duration::from_millis(100),
            time_scale: 1.0,
        }
    }
}

/// Background thread firing the periodic passes
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Arm the passes now and start ticking.
    pub fn spawn(colony: SharedColony, options: TickerOptions) -> std::io::Result<Self> {
        let periods = colony.read(|engine| engine.config().periods);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let time_scale = options.time_scale.max(0.0);

        let handle = thread::Builder::new()
            .name("colony-ticker".to_string())
            .spawn(move || {
                let started = Instant::now();
                let mut scheduler = PassScheduler::new(periods, 0.0);
                while !thread_stop.load(Ordering::Acquire) {
                    thread::sleep(options.resolution);
                    if thread_stop.load(Ordering::Acquire) {
                        break;
                    }
                    let now = started.elapsed().as_secs_f64() * time_scale;
                    scheduler.drive(&colony, now);
                }
                scheduler.stop();
            })?;

        log::debug!("Colony ticker started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for the thread. No pass runs after this returns.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.stop.load(Ordering::Acquire)
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Colony ticker thread panicked");
            }
            log::debug!("Colony ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_logic::constants::{buildings, resources};

    fn colony_with_home() -> SharedColony {
        let mut engine = ColonyEngine::new().with_seed(11);
        engine.manual_generate(resources::WOOD);
        engine.manual_generate(resources::CLAY);
        engine.purchase_building(buildings::HOME);
        for _ in 0..9 {
            engine.manual_generate(resources::WOOD);
        }
        SharedColony::new(engine)
    }

    #[test]
    fn test_write_then_read() {
        let colony = SharedColony::new(ColonyEngine::new());
        assert!(colony.write(|e| e.manual_generate(resources::WOOD)));
        assert_eq!(colony.read(|e| e.state().resource_amount(resources::WOOD)), 100.0);
        assert_eq!(colony.snapshot().explorers, 1);
    }

    #[test]
    fn test_concurrent_clicks_are_not_lost() {
        let colony = SharedColony::new(ColonyEngine::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let colony = colony.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        colony.write(|e| e.manual_generate(resources::CLAY));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(colony.read(|e| e.state().resource_amount(resources::CLAY)), 2090.0);
    }

    #[test]
    fn test_ticker_runs_passes_until_shutdown() {
        let colony = colony_with_home();
        let ticker = Ticker::spawn(
            colony.clone(),
            TickerOptions {
                resolution: Duration::from_millis(2),
                time_scale: 1000.0,
            },
        )
        .unwrap();
        assert!(ticker.is_running());

        thread::sleep(Duration::from_millis(100));
        ticker.shutdown();

        let happiness = colony.read(|e| e.state().happiness());
        assert!(happiness > 0.0);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(colony.read(|e| e.state().happiness()), happiness);
    }

    #[test]
    fn test_dropping_ticker_stops_it() {
        let colony = colony_with_home();
        {
            let _ticker = Ticker::spawn(
                colony.clone(),
                TickerOptions {
                    resolution: Duration::from_millis(2),
                    time_scale: 1000.0,
                },
            )
            .unwrap();
            thread::sleep(Duration::from_millis(30));
        }
        let sim_time = colony.read(|e| e.sim_time());
        thread::sleep(Duration::from_millis(20));
        assert_eq!(colony.read(|e| e.sim_time()), sim_time);
    }
}
