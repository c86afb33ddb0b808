//! 3D bin packing solver.

use crate::boundary::BinSpec;
use crate::constructive::pack_unassigned;
use crate::geometry::{Item, ItemSpec};
use crate::local_search::LocalSearch;
use crate::operators::NeighborhoodConfig;
use crate::sa_packing::SimulatedAnnealing;
use crate::solution::{FitnessWeights, Solution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use u_packing_core::sa::SaConfig;
use u_packing_core::solver::{Config, Solver, Strategy};
use u_packing_core::Result;

/// 3D bin packing solver.
///
/// Every strategy starts from a First Fit Decreasing packing; the search
/// strategies then improve on it.
#[derive(Debug, Clone)]
pub struct Packer3D {
    config: Config,
    sa_config: SaConfig,
    neighborhood: NeighborhoodConfig,
}

impl Packer3D {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        let neighborhood = NeighborhoodConfig::default().with_parallel(config.parallel);
        Self {
            config,
            sa_config: SaConfig::default(),
            neighborhood,
        }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Overrides the annealing schedule.
    pub fn with_sa_config(mut self, sa_config: SaConfig) -> Self {
        self.sa_config = sa_config;
        self
    }

    /// Overrides neighbor generation settings.
    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodConfig) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn time_limit(&self) -> Option<Duration> {
        (self.config.time_limit_ms > 0).then(|| Duration::from_millis(self.config.time_limit_ms))
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Builds and validates the initial (empty) solution.
    fn build(&self, items: &[ItemSpec], bin: &BinSpec) -> Result<Solution> {
        self.sa_config.validate()?;
        self.neighborhood.validate()?;
        bin.validate()?;
        let items: Vec<Item> = items.iter().map(Item::from).collect();
        let weights = FitnessWeights::default().with_balance_penalty(self.config.balance_penalty);
        Ok(Solution::try_new((bin.length, bin.width, bin.height), items)?.with_weights(weights))
    }

    fn local_search(&self, initial: &Solution) -> Solution {
        let mut ls = LocalSearch::new(self.config.max_iterations, false)
            .with_neighborhood(self.neighborhood.clone());
        if let Some(limit) = self.time_limit() {
            ls = ls.with_time_limit(limit);
        }
        ls.solve(initial)
    }

    fn simulated_annealing(&self, initial: &Solution) -> Solution {
        let mut sa =
            SimulatedAnnealing::from_config(&self.sa_config).with_neighborhood(self.neighborhood.clone());
        if let Some(limit) = self.time_limit() {
            sa = sa.with_time_limit(limit);
        }
        sa.solve(initial, &mut self.rng())
    }
}

impl Solver for Packer3D {
    type Item = ItemSpec;
    type Boundary = BinSpec;
    type Output = Solution;

    fn solve(&self, items: &[ItemSpec], bin: &BinSpec) -> Result<Solution> {
        let start = Instant::now();
        let mut solution = self.build(items, bin)?;

        let unplaced = pack_unassigned(&mut solution);
        if unplaced > 0 {
            log::warn!("{} items could not be packed by FFD", unplaced);
        }

        let solution = match self.config.strategy {
            Strategy::FirstFitDecreasing => solution,
            Strategy::LocalSearch => self.local_search(&solution),
            Strategy::SimulatedAnnealing => self.simulated_annealing(&solution),
        };

        log::info!(
            "{}: {} items in {} bins (min {}), fitness {:.2}, {:?}",
            self.config.strategy.name(),
            solution.all_items().len() - solution.unassigned_count(),
            solution.used_bins_count(),
            solution.theoretical_min_bins(),
            solution.fitness(),
            start.elapsed()
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_packing_core::Error;

    fn specs(dims: &[(f64, f64, f64)]) -> Vec<ItemSpec> {
        dims.iter()
            .enumerate()
            .map(|(i, &(l, w, h))| ItemSpec::new(i, l, w, h))
            .collect()
    }

    fn small() -> Vec<ItemSpec> {
        specs(&[
            (8.0, 6.0, 4.0),
            (7.0, 5.0, 4.0),
            (6.0, 5.0, 3.0),
            (5.0, 4.0, 3.0),
            (4.0, 4.0, 3.0),
            (5.0, 3.0, 2.0),
            (4.0, 3.0, 2.0),
            (3.0, 3.0, 2.0),
        ])
    }

    #[test]
    fn test_ffd_strategy() {
        let packer = Packer3D::default_config();
        let solution = packer.solve(&small(), &BinSpec::new(10.0, 8.0, 6.0)).unwrap();
        assert!(solution.is_valid());
        assert!(solution.used_bins_count() >= 2);
    }

    #[test]
    fn test_local_search_strategy() {
        let bin = BinSpec::new(10.0, 8.0, 6.0);
        let ffd = Packer3D::default_config().solve(&small(), &bin).unwrap();
        let config = Config::new()
            .with_strategy(Strategy::LocalSearch)
            .with_max_iterations(10);
        let solution = Packer3D::new(config).solve(&small(), &bin).unwrap();
        assert!(solution.fitness() <= ffd.fitness());
        assert!(solution.is_consistent());
    }

    #[test]
    fn test_sa_strategy_seeded() {
        let bin = BinSpec::new(10.0, 8.0, 6.0);
        let config = Config::new()
            .with_strategy(Strategy::SimulatedAnnealing)
            .with_seed(9);
        let sa = SaConfig::default()
            .with_initial_temp(50.0)
            .with_min_temp(1.0)
            .with_iterations_per_temp(10);
        let packer = Packer3D::new(config).with_sa_config(sa);

        let a = packer.solve(&small(), &bin).unwrap();
        let b = packer.solve(&small(), &bin).unwrap();
        assert_eq!(a.fitness(), b.fitness());
        assert_eq!(a.infeasible_bins_count(), 0);
    }

    #[test]
    fn test_invalid_inputs() {
        let packer = Packer3D::default_config();
        assert!(matches!(
            packer.solve(&small(), &BinSpec::new(0.0, 8.0, 6.0)),
            Err(Error::InvalidBoundary(_))
        ));
        assert!(matches!(
            packer.solve(&specs(&[(1.0, -1.0, 1.0)]), &BinSpec::new(10.0, 8.0, 6.0)),
            Err(Error::InvalidGeometry(_))
        ));

        let dup = vec![ItemSpec::new(1, 1.0, 1.0, 1.0), ItemSpec::new(1, 2.0, 2.0, 2.0)];
        assert!(matches!(
            packer.solve(&dup, &BinSpec::new(10.0, 8.0, 6.0)),
            Err(Error::DuplicateItem(1))
        ));
    }

    #[test]
    fn test_invalid_search_config() {
        let bin = BinSpec::new(10.0, 8.0, 6.0);

        let mut sa = SaConfig::default();
        sa.cooling_rate = 0.0;
        let packer = Packer3D::default_config().with_sa_config(sa);
        assert!(matches!(
            packer.solve(&small(), &bin),
            Err(Error::ConfigError(_))
        ));

        let mut hood = NeighborhoodConfig::default();
        hood.merge_acceptance_ratio = 1.5;
        let packer = Packer3D::default_config().with_neighborhood(hood);
        assert!(matches!(
            packer.solve(&small(), &bin),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_oversize_item_reported() {
        let items = specs(&[(12.0, 12.0, 12.0), (2.0, 2.0, 2.0)]);
        let solution = Packer3D::default_config()
            .solve(&items, &BinSpec::new(10.0, 8.0, 6.0))
            .unwrap();
        let stats = solution.get_statistics();
        assert_eq!(stats.unpacked_items, 1);
        assert_eq!(stats.used_bins, 1);
        assert!(!stats.is_valid);
    }

    #[test]
    fn test_balance_penalty_flag() {
        let config = Config::new().with_balance_penalty(true);
        let solution = Packer3D::new(config)
            .solve(&small(), &BinSpec::new(10.0, 8.0, 6.0))
            .unwrap();
        assert!(solution.weights().balance_enabled);
    }
}
