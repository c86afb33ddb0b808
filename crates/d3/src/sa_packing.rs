//! Simulated Annealing over packing solutions.
//!
//! The walk starts from a complete packing (usually FFD output) and draws one
//! random neighbor per trial from the weighted operator mix in
//! [`Neighborhood::random_neighbor`]. Improving or equal neighbors are always
//! accepted; worse ones with probability `exp(-delta / T)`.

use crate::operators::{Neighborhood, NeighborhoodConfig};
use crate::solution::Solution;
use rand::Rng;
use std::time::Duration;
use u_packing_core::{CoolingSchedule, SaConfig, SaProblem, SaResult, SaRunner, SaSolution};

/// SA problem definition for 3D bin packing.
pub struct SaPackingProblem {
    neighborhood: Neighborhood,
}

impl SaPackingProblem {
    /// Creates a new SA packing problem.
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self { neighborhood }
    }
}

impl SaProblem for SaPackingProblem {
    type Solution = Solution;

    fn neighbor<R: Rng>(&self, current: &Solution, rng: &mut R) -> Option<Solution> {
        self.neighborhood.random_neighbor(current, rng)
    }

    fn on_temperature_change(
        &self,
        temperature: f64,
        level: usize,
        best: &Solution,
        current: &Solution,
    ) {
        log::debug!(
            "SA 3D Packing level {}: temp={:.4}, best_fitness={:.2}, current_fitness={:.2}, bins={}",
            level,
            temperature,
            best.objective(),
            current.objective(),
            best.used_bins_count()
        );
    }
}

/// Simulated Annealing driver.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    /// Starting temperature.
    pub initial_temp: f64,
    /// The walk stops once the temperature drops to this value.
    pub min_temp: f64,
    /// Geometric cooling factor.
    pub cooling_rate: f64,
    /// Trials per temperature level.
    pub iterations_per_temp: usize,
    /// Cooling schedule.
    pub cooling_schedule: CoolingSchedule,
    /// Cap on total trials.
    pub max_iterations: Option<u64>,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Neighbor generation settings.
    pub neighborhood: NeighborhoodConfig,
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        let sa = SaConfig::default();
        Self {
            initial_temp: sa.initial_temp,
            min_temp: sa.min_temp,
            cooling_rate: sa.cooling_rate,
            iterations_per_temp: sa.iterations_per_temp,
            cooling_schedule: sa.cooling_schedule,
            max_iterations: sa.max_iterations,
            time_limit: sa.time_limit,
            neighborhood: NeighborhoodConfig::default(),
        }
    }
}

impl SimulatedAnnealing {
    /// Creates a driver with the given temperature schedule.
    pub fn new(
        initial_temp: f64,
        min_temp: f64,
        cooling_rate: f64,
        iterations_per_temp: usize,
    ) -> Self {
        Self::default()
            .with_initial_temp(initial_temp)
            .with_min_temp(min_temp)
            .with_cooling_rate(cooling_rate)
            .with_iterations_per_temp(iterations_per_temp)
    }

    /// Builds the driver from a core SA configuration.
    pub fn from_config(config: &SaConfig) -> Self {
        Self {
            initial_temp: config.initial_temp,
            min_temp: config.min_temp,
            cooling_rate: config.cooling_rate,
            iterations_per_temp: config.iterations_per_temp,
            cooling_schedule: config.cooling_schedule,
            max_iterations: config.max_iterations,
            time_limit: config.time_limit,
            neighborhood: NeighborhoodConfig::default(),
        }
    }

    /// Sets the starting temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp;
        self
    }

    /// Sets the stopping temperature.
    pub fn with_min_temp(mut self, temp: f64) -> Self {
        self.min_temp = temp;
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets trials per temperature level.
    pub fn with_iterations_per_temp(mut self, iterations: usize) -> Self {
        self.iterations_per_temp = iterations;
        self
    }

    /// Sets the cooling schedule.
    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    /// Caps the total number of trials.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets a wall-clock budget.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Sets the neighbor generation settings.
    pub fn with_neighborhood(mut self, config: NeighborhoodConfig) -> Self {
        self.neighborhood = config;
        self
    }

    /// The core SA configuration, with out-of-range values clamped.
    pub fn sa_config(&self) -> SaConfig {
        let mut config = SaConfig::new()
            .with_initial_temp(self.initial_temp)
            .with_min_temp(self.min_temp)
            .with_cooling_rate(self.cooling_rate)
            .with_iterations_per_temp(self.iterations_per_temp)
            .with_cooling_schedule(self.cooling_schedule);
        if let Some(max) = self.max_iterations {
            config = config.with_max_iterations(max);
        }
        if let Some(limit) = self.time_limit {
            config = config.with_time_limit(limit);
        }
        config
    }

    /// Anneals from `initial` and returns the full run record.
    pub fn run<R: Rng>(&self, initial: &Solution, rng: &mut R) -> SaResult<Solution> {
        let problem = SaPackingProblem::new(Neighborhood::new(self.neighborhood.clone()));
        let runner = SaRunner::new(self.sa_config(), problem);
        let result = runner.run(initial, rng);

        log::info!(
            "SA finished: {} trials over {} levels in {:?}, fitness {:.2} -> {:.2}",
            result.iterations,
            result.levels,
            result.elapsed,
            initial.fitness(),
            result.best.fitness()
        );
        result
    }

    /// Anneals from `initial` and returns the best solution found.
    pub fn solve<R: Rng>(&self, initial: &Solution, rng: &mut R) -> Solution {
        self.run(initial, rng).best
    }
}
