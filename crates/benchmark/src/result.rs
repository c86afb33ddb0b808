//! Benchmark result recording.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use u_packing_d3::Solution;

/// Outcome of one strategy run on one instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name.
    pub instance: String,
    /// Strategy name.
    pub strategy: String,
    /// Seed used for the run, if any.
    pub seed: Option<u64>,
    /// Bins holding at least one item.
    pub bins_used: usize,
    /// Volume lower bound on the number of bins.
    pub theoretical_min: usize,
    /// Mean utilization of used bins, in percent.
    pub avg_utilization: f64,
    /// Items left unpacked.
    pub unpacked_items: usize,
    /// Final fitness (lower is better).
    pub fitness: f64,
    /// Whether every item was packed into a feasible bin.
    pub is_valid: bool,
    /// Packed items in a non-identity orientation.
    #[serde(default)]
    pub rotated_items: usize,
    /// Wall-clock time in milliseconds.
    pub time_ms: u64,
}

impl RunResult {
    /// Builds a run record from a finished solution.
    pub fn from_solution(
        instance: &str,
        strategy: &str,
        seed: Option<u64>,
        theoretical_min: usize,
        solution: &Solution,
        time_ms: u64,
    ) -> Self {
        let stats = solution.get_statistics();
        Self {
            instance: instance.to_string(),
            strategy: strategy.to_string(),
            seed,
            bins_used: stats.used_bins,
            theoretical_min,
            avg_utilization: stats.avg_utilization,
            unpacked_items: stats.unpacked_items,
            fitness: stats.fitness,
            is_valid: stats.is_valid,
            rotated_items: solution.placement_stats().rotated_count,
            time_ms,
        }
    }

    /// Bins used above the lower bound.
    pub fn gap(&self) -> usize {
        self.bins_used.saturating_sub(self.theoretical_min)
    }
}

/// Per-strategy aggregate over several runs.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    /// Strategy name.
    pub strategy: String,
    /// Number of runs aggregated.
    pub run_count: usize,
    /// Mean bins used.
    pub avg_bins: f64,
    /// Mean utilization in percent.
    pub avg_utilization: f64,
    /// Mean wall-clock time in milliseconds.
    pub avg_time_ms: u64,
    /// Runs that produced a valid packing.
    pub valid_runs: usize,
}

/// Collection of benchmark runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Recorded runs, in execution order.
    pub runs: Vec<RunResult>,
}

impl BenchmarkResult {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a run.
    pub fn add_run(&mut self, run: RunResult) {
        self.runs.push(run);
    }

    /// Run with the fewest bins, ties broken by fitness.
    pub fn best_run(&self) -> Option<&RunResult> {
        self.runs.iter().min_by(|a, b| {
            a.bins_used
                .cmp(&b.bins_used)
                .then(a.fitness.total_cmp(&b.fitness))
        })
    }

    /// Aggregates runs by strategy, in first-seen order.
    pub fn summary_by_strategy(&self) -> Vec<StrategySummary> {
        let mut order: Vec<&str> = Vec::new();
        for run in &self.runs {
            if !order.contains(&run.strategy.as_str()) {
                order.push(&run.strategy);
            }
        }

        order
            .into_iter()
            .map(|strategy| {
                let runs: Vec<&RunResult> =
                    self.runs.iter().filter(|r| r.strategy == strategy).collect();
                let n = runs.len() as f64;
                StrategySummary {
                    strategy: strategy.to_string(),
                    run_count: runs.len(),
                    avg_bins: runs.iter().map(|r| r.bins_used as f64).sum::<f64>() / n,
                    avg_utilization: runs.iter().map(|r| r.avg_utilization).sum::<f64>() / n,
                    avg_time_ms: runs.iter().map(|r| r.time_ms).sum::<u64>() / runs.len() as u64,
                    valid_runs: runs.iter().filter(|r| r.is_valid).count(),
                }
            })
            .collect()
    }

    /// Prints a results table to stdout.
    pub fn print_summary(&self) {
        println!();
        println!(
            "{:<28} {:<20} {:>5} {:>5} {:>8} {:>12} {:>6} {:>8} {:>9}",
            "Instance", "Strategy", "Bins", "Min", "Util%", "Fitness", "Valid", "Rotated", "Time(ms)"
        );
        println!("{:-<109}", "");
        for run in &self.runs {
            println!(
                "{:<28} {:<20} {:>5} {:>5} {:>8.2} {:>12.2} {:>6} {:>8} {:>9}",
                run.instance,
                run.strategy,
                run.bins_used,
                run.theoretical_min,
                run.avg_utilization,
                run.fitness,
                if run.is_valid { "yes" } else { "no" },
                run.rotated_items,
                run.time_ms
            );
        }
        if let Some(best) = self.best_run() {
            println!(
                "\nBest: {} with {} bins (gap {})",
                best.strategy,
                best.bins_used,
                best.gap()
            );
        }
    }

    /// Writes the results as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}
