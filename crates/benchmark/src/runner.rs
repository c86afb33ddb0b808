//! Benchmark runner.

use crate::dataset::Dataset;
use crate::result::{BenchmarkResult, RunResult};
use std::time::Instant;
use u_packing_core::solver::{Config, Solver, Strategy};
use u_packing_d3::Packer3D;

/// Benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Strategies to run, in order.
    pub strategies: Vec<Strategy>,
    /// Base seed; run `k` uses `seed + k`.
    pub seed: Option<u64>,
    /// Time limit per run in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,
    /// Local search iteration cap.
    pub max_iterations: usize,
    /// Number of runs per strategy.
    pub runs_per_config: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                Strategy::FirstFitDecreasing,
                Strategy::LocalSearch,
                Strategy::SimulatedAnnealing,
            ],
            seed: Some(42),
            time_limit_ms: 0,
            max_iterations: 100,
            runs_per_config: 1,
        }
    }
}

impl BenchmarkConfig {
    /// Creates a configuration running all three strategies once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strategies to run. An empty list keeps the current ones.
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        if !strategies.is_empty() {
            self.strategies = strategies;
        }
        self
    }

    /// Sets the base seed (None = entropy).
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the time limit per run in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the local search iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations.max(1);
        self
    }

    /// Sets the number of runs per strategy.
    pub fn with_runs_per_config(mut self, runs: usize) -> Self {
        self.runs_per_config = runs.max(1);
        self
    }
}

/// Runs packing strategies over instances and records the results.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Creates a runner with the given configuration.
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Runs every configured strategy on `dataset`.
    ///
    /// Runs that fail input validation are logged and left out of the result.
    pub fn run_dataset(&self, dataset: &Dataset) -> BenchmarkResult {
        let mut results = BenchmarkResult::new();
        let theoretical_min = dataset.theoretical_min_bins();

        for &strategy in &self.config.strategies {
            for k in 0..self.config.runs_per_config {
                let seed = self.config.seed.map(|s| s.wrapping_add(k as u64));
                log::info!(
                    "Running {} on {} (run {}/{})",
                    strategy.name(),
                    dataset.name,
                    k + 1,
                    self.config.runs_per_config
                );

                match self.run_once(dataset, strategy, seed, theoretical_min) {
                    Ok(run) => results.add_run(run),
                    Err(e) => log::error!("{} failed on {}: {}", strategy.name(), dataset.name, e),
                }
            }
        }

        results
    }

    fn run_once(
        &self,
        dataset: &Dataset,
        strategy: Strategy,
        seed: Option<u64>,
        theoretical_min: usize,
    ) -> u_packing_core::Result<RunResult> {
        let mut config = Config::new()
            .with_strategy(strategy)
            .with_time_limit(self.config.time_limit_ms)
            .with_max_iterations(self.config.max_iterations);
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }

        let start = Instant::now();
        let solution = Packer3D::new(config).solve(&dataset.items, &dataset.bin)?;
        let time_ms = start.elapsed().as_millis() as u64;

        Ok(RunResult::from_solution(
            &dataset.name,
            strategy.name(),
            seed,
            theoretical_min,
            &solution,
            time_ms,
        ))
    }
}
