//! Neighborhood descent framework for minimization problems.
//!
//! Two pivoting rules are supported: steepest descent evaluates the whole
//! neighborhood and moves to its best member, first improvement moves to the
//! first neighbor (in enumeration order) that beats the current state.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the next state is chosen from an improving neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PivotRule {
    /// Move to the best neighbor.
    #[default]
    Steepest,
    /// Move to the first improving neighbor.
    FirstImprovement,
}

/// Why a descent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The neighborhood of the current state was empty.
    Exhausted,
    /// No neighbor strictly improves on the current state.
    LocalOptimum,
    /// `max_iterations` reached.
    IterationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Configuration for local search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LsConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Pivoting rule.
    pub pivot: PivotRule,
    /// Maximum wall-clock time (None = unlimited).
    pub time_limit: Option<Duration>,
}

impl Default for LsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            pivot: PivotRule::Steepest,
            time_limit: None,
        }
    }
}

impl LsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the pivoting rule.
    pub fn with_pivot(mut self, pivot: PivotRule) -> Self {
        self.pivot = pivot;
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }
}

/// Problem-specific neighborhood for local search.
pub trait LsProblem {
    /// The solution type.
    type Solution: Clone;

    /// Objective value. Lower is better.
    fn objective(&self, solution: &Self::Solution) -> f64;

    /// Enumerates every neighbor of `solution`.
    fn neighbors(&self, solution: &Self::Solution) -> Vec<Self::Solution>;

    /// Called after every accepted move.
    fn on_improvement(&self, _iteration: usize, _previous: f64, _current: &Self::Solution) {}
}

/// Result of a local search run.
#[derive(Debug, Clone)]
pub struct LsResult<S> {
    /// The best solution found.
    pub best: S,
    /// Iterations performed.
    pub iterations: usize,
    /// Number of accepted moves.
    pub improvements: usize,
    /// Objective of the current state at the start of each iteration.
    pub history: Vec<f64>,
    /// Why the search stopped.
    pub termination: Termination,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Local search runner.
pub struct LsRunner<P: LsProblem> {
    config: LsConfig,
    problem: P,
}

impl<P: LsProblem> LsRunner<P> {
    /// Creates a new local search runner.
    pub fn new(config: LsConfig, problem: P) -> Self {
        Self { config, problem }
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Descends from `initial` until no neighbor improves.
    pub fn run(&self, initial: &P::Solution) -> LsResult<P::Solution> {
        let start = Instant::now();

        let mut current = initial.clone();
        let mut current_fitness = self.problem.objective(&current);
        let mut best = current.clone();
        let mut best_fitness = current_fitness;

        let mut history = Vec::new();
        let mut iterations = 0usize;
        let mut improvements = 0usize;

        let termination = loop {
            if iterations >= self.config.max_iterations {
                break Termination::IterationLimit;
            }
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() > limit {
                    break Termination::TimeLimit;
                }
            }
            iterations += 1;
            history.push(current_fitness);

            let neighbors = self.problem.neighbors(&current);
            if neighbors.is_empty() {
                break Termination::Exhausted;
            }

            let chosen = match self.config.pivot {
                PivotRule::Steepest => neighbors
                    .into_iter()
                    .map(|n| (self.problem.objective(&n), n))
                    .min_by(|a, b| a.0.total_cmp(&b.0)),
                PivotRule::FirstImprovement => neighbors
                    .into_iter()
                    .map(|n| (self.problem.objective(&n), n))
                    .find(|(f, _)| *f < current_fitness),
            };

            match chosen {
                Some((fitness, neighbor)) if fitness < current_fitness => {
                    let previous = current_fitness;
                    current = neighbor;
                    current_fitness = fitness;
                    improvements += 1;

                    if current_fitness < best_fitness {
                        best = current.clone();
                        best_fitness = current_fitness;
                    }
                    self.problem.on_improvement(iterations, previous, &current);
                }
                _ => break Termination::LocalOptimum,
            }
        };

        log::debug!(
            "local search stopped ({:?}) after {} iterations, best {:.4}",
            termination,
            iterations,
            best_fitness
        );

        LsResult {
            best,
            iterations,
            improvements,
            history,
            termination,
            elapsed: start.elapsed(),
        }
    }
}
