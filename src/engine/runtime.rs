use log::info;

use crate::engine::day::{SimConfig, Simulation};
use crate::error::{Result, SimError};
use crate::models::{Catalog, DailyReport};

/// Control surface the external driver talks to: start, tick, status, stop.
///
/// The driver decides *when* a day advances (timer, loop, test harness); the
/// runtime only guarantees days run one at a time against a single live
/// simulation.
#[derive(Debug, Default)]
pub struct Runtime {
    sim: Option<Simulation>,
    running: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh simulation. Idempotent: starting while running changes
    /// nothing and leaves the current state in place.
    pub fn start(&mut self, config: SimConfig) -> Result<()> {
        if self.running {
            info!("start ignored: simulation already running");
            return Ok(());
        }
        info!(
            "starting simulation: scenario '{}', review every {} day(s), lead {} day(s)",
            config.scenario, config.review_interval, config.lead_days
        );
        self.sim = Some(Simulation::new(config)?);
        self.running = true;
        Ok(())
    }

    /// Advance exactly one simulated day.
    pub fn tick(&mut self, catalog: &Catalog) -> Result<DailyReport> {
        if !self.running {
            return Err(SimError::NotRunning);
        }
        match self.sim.as_mut() {
            Some(sim) => sim.advance_one_day(catalog),
            None => Err(SimError::NotRunning),
        }
    }

    /// Most recent day snapshot, or `None` before the first completed day or
    /// before any start.
    pub fn status(&self) -> Option<&DailyReport> {
        self.sim.as_ref().and_then(|s| s.last_report())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Halt ticking. Simulation state stays in memory until the next start
    /// replaces it.
    pub fn stop(&mut self) {
        if self.running {
            info!("simulation stopped");
        }
        self.running = false;
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }
}
