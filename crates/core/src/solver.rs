//! Solver traits and configuration.

use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// First Fit Decreasing construction only (fast, lower quality).
    #[default]
    FirstFitDecreasing,
    /// FFD followed by steepest-descent local search.
    LocalSearch,
    /// FFD followed by simulated annealing.
    SimulatedAnnealing,
}

impl Strategy {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::FirstFitDecreasing => "FFD",
            Strategy::LocalSearch => "LocalSearch",
            Strategy::SimulatedAnnealing => "SimulatedAnnealing",
        }
    }
}

/// Common configuration for solvers.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Optimization strategy.
    pub strategy: Strategy,

    /// Seed for the search's random source (None = seeded from entropy).
    pub seed: Option<u64>,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Iteration cap for local search.
    pub max_iterations: usize,

    /// Include the utilization standard deviation term in fitness.
    pub balance_penalty: bool,

    /// Evaluate exhaustive neighborhoods on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: None,
            time_limit_ms: 0,
            max_iterations: 1000,
            balance_penalty: false,
            parallel: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the optimization strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the local search iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    /// Enables the per-bin utilization balance penalty.
    pub fn with_balance_penalty(mut self, enabled: bool) -> Self {
        self.balance_penalty = enabled;
        self
    }

    /// Enables or disables parallel neighborhood evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Trait for packing solvers.
pub trait Solver {
    /// The item description this solver accepts.
    type Item;
    /// The bin description this solver accepts.
    type Boundary;
    /// The packing produced.
    type Output;

    /// Solves the packing problem.
    fn solve(&self, items: &[Self::Item], boundary: &Self::Boundary) -> Result<Self::Output>;
}
