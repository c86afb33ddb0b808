//! Local Search over packing solutions.
//!
//! Each iteration enumerates every swap, move and rebalance neighbor of the
//! current solution and moves to the best one (or, with first improvement,
//! the first one that improves). The search stops at a local optimum, when
//! the neighborhood is empty, or when a budget runs out.

use crate::operators::{Neighborhood, NeighborhoodConfig};
use crate::solution::Solution;
use std::time::Duration;
use u_packing_core::{LsConfig, LsProblem, LsResult, LsRunner, PivotRule};

/// LS problem definition for 3D bin packing.
pub struct LsPackingProblem {
    neighborhood: Neighborhood,
    verbose: bool,
}

impl LsPackingProblem {
    /// Creates a new LS packing problem.
    pub fn new(neighborhood: Neighborhood, verbose: bool) -> Self {
        Self {
            neighborhood,
            verbose,
        }
    }
}

impl LsProblem for LsPackingProblem {
    type Solution = Solution;

    fn objective(&self, solution: &Solution) -> f64 {
        solution.fitness()
    }

    fn neighbors(&self, solution: &Solution) -> Vec<Solution> {
        self.neighborhood.local_search_neighbors(solution)
    }

    fn on_improvement(&self, iteration: usize, previous: f64, current: &Solution) {
        let level = if self.verbose {
            log::Level::Info
        } else {
            log::Level::Debug
        };
        log::log!(
            level,
            "LS iteration {}: fitness {:.2} -> {:.2}, bins={}",
            iteration,
            previous,
            current.fitness(),
            current.used_bins_count()
        );
    }
}

/// Local Search driver.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Log progress at `info` instead of `debug`.
    pub verbose: bool,
    /// Move to the first improving neighbor instead of the best.
    pub first_improvement: bool,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Neighbor generation settings.
    pub neighborhood: NeighborhoodConfig,
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            verbose: false,
            first_improvement: false,
            time_limit: None,
            neighborhood: NeighborhoodConfig::default(),
        }
    }
}

impl LocalSearch {
    /// Creates a steepest-descent driver.
    pub fn new(max_iterations: usize, verbose: bool) -> Self {
        Self {
            max_iterations,
            verbose,
            ..Self::default()
        }
    }

    /// Switches to first-improvement pivoting.
    pub fn with_first_improvement(mut self) -> Self {
        self.first_improvement = true;
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

    fn ls_config(&self) -> LsConfig {
        let pivot = if self.first_improvement {
            PivotRule::FirstImprovement
        } else {
            PivotRule::Steepest
        };
        let config = LsConfig::new()
            .with_max_iterations(self.max_iterations)
            .with_pivot(pivot);
        match self.time_limit {
            Some(limit) => config.with_time_limit(limit),
            None => config,
        }
    }

    /// Descends from `initial` and returns the full run record.
    pub fn run(&self, initial: &Solution) -> LsResult<Solution> {
        let problem = LsPackingProblem::new(
            Neighborhood::new(self.neighborhood.clone()),
            self.verbose,
        );
        let result = LsRunner::new(self.ls_config(), problem).run(initial);

        log::info!(
            "LS finished ({:?}) after {} iterations, {} improvements in {:?}: fitness {:.2} -> {:.2}",
            result.termination,
            result.iterations,
            result.improvements,
            result.elapsed,
            initial.fitness(),
            result.best.fitness()
        );
        result
    }

    /// Descends from `initial` and returns the best solution found.
    pub fn solve(&self, initial: &Solution) -> Solution {
        self.run(initial).best
    }
}
