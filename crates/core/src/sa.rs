//! Simulated Annealing framework for minimization problems.
//!
//! The runner owns no randomness: every call takes an explicit `Rng`, so a
//! seeded generator reproduces a run exactly.

use crate::error::{Error, Result};
use rand::Rng;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule types for Simulated Annealing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// Geometric cooling: T_new = T * alpha (alpha typically 0.95-0.99).
    #[default]
    Geometric,
    /// Linear cooling: T_new = T - delta, with delta spread over `max_iterations`.
    Linear,
    /// Lundy-Mees: T_new = T / (1 + beta * T).
    LundyMees,
}

/// Configuration for Simulated Annealing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaConfig {
    /// Initial temperature.
    pub initial_temp: f64,
    /// Minimum temperature; the outer loop runs while `T > min_temp`.
    pub min_temp: f64,
    /// Cooling rate (alpha for Geometric, beta for LundyMees).
    pub cooling_rate: f64,
    /// Number of trials at each temperature level.
    pub iterations_per_temp: usize,
    /// Maximum total trials (None = temperature-based stopping only).
    pub max_iterations: Option<u64>,
    /// Cooling schedule type.
    pub cooling_schedule: CoolingSchedule,
    /// Maximum wall-clock time (None = unlimited).
    pub time_limit: Option<Duration>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            min_temp: 0.1,
            cooling_rate: 0.95,
            iterations_per_temp: 100,
            max_iterations: None,
            cooling_schedule: CoolingSchedule::Geometric,
            time_limit: None,
        }
    }
}

impl SaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial temperature.
    pub fn with_initial_temp(mut self, temp: f64) -> Self {
        self.initial_temp = temp.max(0.0);
        self
    }

    /// Sets the minimum temperature.
    pub fn with_min_temp(mut self, temp: f64) -> Self {
        self.min_temp = temp.max(0.0);
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate.clamp(0.001, 0.9999);
        self
    }

    /// Sets the trials per temperature level.
    pub fn with_iterations_per_temp(mut self, iterations: usize) -> Self {
        self.iterations_per_temp = iterations.max(1);
        self
    }

    /// Sets the maximum number of trials.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the cooling schedule.
    pub fn with_cooling_schedule(mut self, schedule: CoolingSchedule) -> Self {
        self.cooling_schedule = schedule;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Checks a configuration whose fields may have been set directly.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temp.is_finite() && self.initial_temp > 0.0) {
            return Err(Error::ConfigError(format!(
                "initial_temp must be positive, got {}",
                self.initial_temp
            )));
        }
        if !(self.min_temp.is_finite() && self.min_temp >= 0.0) {
            return Err(Error::ConfigError(format!(
                "min_temp must be non-negative, got {}",
                self.min_temp
            )));
        }
        if self.min_temp >= self.initial_temp {
            return Err(Error::ConfigError(format!(
                "min_temp {} must be below initial_temp {}",
                self.min_temp, self.initial_temp
            )));
        }
        let rate_ok = match self.cooling_schedule {
            CoolingSchedule::Geometric => self.cooling_rate > 0.0 && self.cooling_rate < 1.0,
            CoolingSchedule::LundyMees => self.cooling_rate.is_finite() && self.cooling_rate > 0.0,
            CoolingSchedule::Linear => true,
        };
        if !rate_ok {
            return Err(Error::ConfigError(format!(
                "cooling_rate {} is invalid for {:?} cooling",
                self.cooling_rate, self.cooling_schedule
            )));
        }
        if self.iterations_per_temp == 0 {
            return Err(Error::ConfigError(
                "iterations_per_temp must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for solutions in Simulated Annealing.
pub trait SaSolution: Clone {
    /// Returns the objective value of this solution. Lower is better.
    fn objective(&self) -> f64;
}

/// Trait for problem-specific SA operations.
pub trait SaProblem {
    /// The solution type for this problem.
    type Solution: SaSolution;

    /// Draws one random neighbor of `current`, or `None` when no move applies.
    fn neighbor<R: Rng>(&self, current: &Self::Solution, rng: &mut R)
        -> Option<Self::Solution>;

    /// Called after each temperature level.
    fn on_temperature_change(
        &self,
        _temperature: f64,
        _level: usize,
        _best: &Self::Solution,
        _current: &Self::Solution,
    ) {
    }
}

/// Result of a SA run.
#[derive(Debug, Clone)]
pub struct SaResult<S: SaSolution> {
    /// The best solution found.
    pub best: S,
    /// The state the walk ended on; may be worse than `best`.
    pub last: S,
    /// Final temperature reached.
    pub final_temperature: f64,
    /// Total trials performed.
    pub iterations: u64,
    /// Number of temperature levels visited.
    pub levels: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Current objective at every trial that produced a neighbor.
    pub history: Vec<f64>,
    /// Temperature at each level.
    pub temperature_history: Vec<f64>,
    /// Fraction of accepted neighbors at each level.
    pub acceptance_history: Vec<f64>,
}

/// Metropolis acceptance probability for a minimization problem.
///
/// Improvements (and ties) are always accepted; at `T == 0` a worse
/// neighbor is never accepted.
pub fn acceptance_probability(current: f64, neighbor: f64, temperature: f64) -> f64 {
    if neighbor < current {
        return 1.0;
    }
    if temperature <= 0.0 {
        return 0.0;
    }
    (-(neighbor - current) / temperature).exp()
}

/// Simulated Annealing runner.
pub struct SaRunner<P: SaProblem> {
    config: SaConfig,
    problem: P,
}

impl<P: SaProblem> SaRunner<P> {
    /// Creates a new SA runner.
    pub fn new(config: SaConfig, problem: P) -> Self {
        Self { config, problem }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs Simulated Annealing from `initial` using the given random source.
    pub fn run<R: Rng>(&self, initial: &P::Solution, rng: &mut R) -> SaResult<P::Solution> {
        let start = Instant::now();

        let mut current = initial.clone();
        let mut best = current.clone();
        let mut best_fitness = best.objective();

        let mut history = Vec::new();
        let mut temperature_history = Vec::new();
        let mut acceptance_history = Vec::new();

        let mut temperature = self.config.initial_temp;
        let mut iteration = 0u64;
        let mut level = 0usize;

        let temp_delta = if matches!(self.config.cooling_schedule, CoolingSchedule::Linear) {
            let levels = self.config.max_iterations.unwrap_or(10_000) as f64
                / self.config.iterations_per_temp as f64;
            (self.config.initial_temp - self.config.min_temp) / levels.max(1.0)
        } else {
            0.0
        };

        'outer: while temperature > self.config.min_temp {
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() > limit {
                    break;
                }
            }
            if let Some(max) = self.config.max_iterations {
                if iteration >= max {
                    break;
                }
            }

            level += 1;
            let mut accepted = 0usize;
            let mut rejected = 0usize;

            for _ in 0..self.config.iterations_per_temp {
                if let Some(max) = self.config.max_iterations {
                    if iteration >= max {
                        temperature_history.push(temperature);
                        acceptance_history.push(rate(accepted, rejected));
                        break 'outer;
                    }
                }
                iteration += 1;

                let Some(neighbor) = self.problem.neighbor(&current, rng) else {
                    continue;
                };

                let current_fitness = current.objective();
                let neighbor_fitness = neighbor.objective();
                history.push(current_fitness);

                let probability =
                    acceptance_probability(current_fitness, neighbor_fitness, temperature);
                if rng.gen::<f64>() < probability {
                    accepted += 1;
                    current = neighbor;
                    if neighbor_fitness < best_fitness {
                        best = current.clone();
                        best_fitness = neighbor_fitness;
                    }
                } else {
                    rejected += 1;
                }
            }

            temperature_history.push(temperature);
            acceptance_history.push(rate(accepted, rejected));

            self.problem
                .on_temperature_change(temperature, level, &best, &current);

            temperature = self.cool_down(temperature, temp_delta);
        }

        log::debug!(
            "annealing stopped at T={:.4} after {} iterations, best {:.4}",
            temperature,
            iteration,
            best_fitness
        );

        SaResult {
            best,
            last: current,
            final_temperature: temperature,
            iterations: iteration,
            levels: level,
            elapsed: start.elapsed(),
            history,
            temperature_history,
            acceptance_history,
        }
    }

    /// Apply cooling schedule.
    fn cool_down(&self, current_temp: f64, delta: f64) -> f64 {
        match self.config.cooling_schedule {
            CoolingSchedule::Geometric => current_temp * self.config.cooling_rate,
            CoolingSchedule::Linear => (current_temp - delta).max(0.0),
            CoolingSchedule::LundyMees => {
                current_temp / (1.0 + self.config.cooling_rate * current_temp)
            }
        }
    }
}

fn rate(accepted: usize, rejected: usize) -> f64 {
    let total = accepted + rejected;
    if total == 0 {
        0.0
    } else {
        accepted as f64 / total as f64
    }
}
