//! Neighborhood operators for packing solutions.
//!
//! Every operator works on a deep copy of its input and returns
//! `Some(neighbor)` or `None` when the move does not apply. Operators never
//! reject a neighbor merely because some items ended up unpacked; the
//! fitness penalty takes care of that.
//!
//! # Operators
//!
//! - **swap**: exchange two items between bins, repack both bins
//! - **move**: move one item to another bin, repack both bins
//! - **rebalance**: pool two bins with a large utilization gap and repack
//! - **merge**: pool two bins and repack into the first one only
//! - **consolidate**: empty the least-utilized bin into the others

use crate::boundary::Bin;
use crate::geometry::Item;
use crate::solution::Solution;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use u_packing_core::{BinId, Error, ItemId, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Pool two bins into one.
    Merge,
    /// Empty the least-utilized bin.
    Consolidate,
    /// Exchange two items.
    Swap,
    /// Relocate one item.
    Move,
    /// Even out two bins.
    Rebalance,
}

impl Operator {
    /// All families, in the order used for weighted sampling.
    pub const ALL: [Operator; 5] = [
        Operator::Merge,
        Operator::Consolidate,
        Operator::Swap,
        Operator::Move,
        Operator::Rebalance,
    ];

    /// Returns the operator name.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Merge => "merge",
            Operator::Consolidate => "consolidate",
            Operator::Swap => "swap",
            Operator::Move => "move",
            Operator::Rebalance => "rebalance",
        }
    }
}

/// Relative sampling weights of the operator families.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorWeights {
    /// Weight of merge.
    pub merge: f64,
    /// Weight of consolidate.
    pub consolidate: f64,
    /// Weight of swap.
    pub swap: f64,
    /// Weight of move.
    pub move_item: f64,
    /// Weight of rebalance.
    pub rebalance: f64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            merge: 0.25,
            consolidate: 0.15,
            swap: 0.20,
            move_item: 0.20,
            rebalance: 0.20,
        }
    }
}

impl OperatorWeights {
    /// Weights in [`Operator::ALL`] order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.merge,
            self.consolidate,
            self.swap,
            self.move_item,
            self.rebalance,
        ]
    }
}

/// Configuration for neighbor generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborhoodConfig {
    /// Operator family weights for random sampling.
    pub weights: OperatorWeights,

    /// Attempts before a random generator gives up.
    pub max_attempts: usize,

    /// Minimum utilization gap (percentage points) for rebalance.
    pub rebalance_gap: f64,

    /// Merge is skipped when the pooled volume exceeds this many bins.
    pub merge_volume_factor: f64,

    /// Fraction of pooled items a merge must place to be accepted.
    pub merge_acceptance_ratio: f64,

    /// Consolidate only bins at or below this utilization (percent).
    pub consolidate_max_utilization: f64,

    /// Generate exhaustive neighborhoods in parallel.
    pub parallel: bool,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            weights: OperatorWeights::default(),
            max_attempts: 50,
            rebalance_gap: 20.0,
            merge_volume_factor: 1.5,
            merge_acceptance_ratio: 0.8,
            consolidate_max_utilization: 60.0,
            parallel: true,
        }
    }
}

impl NeighborhoodConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operator weights. Negative weights are clamped to zero; an
    /// all-zero set falls back to the defaults.
    pub fn with_weights(mut self, weights: OperatorWeights) -> Self {
        let clamped = OperatorWeights {
            merge: weights.merge.max(0.0),
            consolidate: weights.consolidate.max(0.0),
            swap: weights.swap.max(0.0),
            move_item: weights.move_item.max(0.0),
            rebalance: weights.rebalance.max(0.0),
        };
        self.weights = if clamped.as_array().iter().sum::<f64>() > 0.0 {
            clamped
        } else {
            OperatorWeights::default()
        };
        self
    }

    /// Sets the attempt budget of random generators.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the rebalance utilization gap.
    pub fn with_rebalance_gap(mut self, gap: f64) -> Self {
        self.rebalance_gap = gap.clamp(0.0, 100.0);
        self
    }

    /// Sets the merge volume factor.
    pub fn with_merge_volume_factor(mut self, factor: f64) -> Self {
        self.merge_volume_factor = factor.max(0.0);
        self
    }

    /// Sets the merge acceptance ratio.
    pub fn with_merge_acceptance_ratio(mut self, ratio: f64) -> Self {
        self.merge_acceptance_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the consolidate utilization ceiling.
    pub fn with_consolidate_max_utilization(mut self, utilization: f64) -> Self {
        self.consolidate_max_utilization = utilization.clamp(0.0, 100.0);
        self
    }

    /// Enables or disables parallel neighborhood generation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks a configuration whose fields may have been set directly.
    pub fn validate(&self) -> Result<()> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::ConfigError(format!(
                "operator weights must be finite and non-negative, got {:?}",
                weights
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(Error::ConfigError(
                "at least one operator weight must be positive".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(Error::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.merge_acceptance_ratio) {
            return Err(Error::ConfigError(format!(
                "merge_acceptance_ratio must be in [0, 1], got {}",
                self.merge_acceptance_ratio
            )));
        }
        if !(self.merge_volume_factor.is_finite() && self.merge_volume_factor >= 0.0) {
            return Err(Error::ConfigError(format!(
                "merge_volume_factor must be non-negative, got {}",
                self.merge_volume_factor
            )));
        }
        for (name, value) in [
            ("rebalance_gap", self.rebalance_gap),
            ("consolidate_max_utilization", self.consolidate_max_utilization),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::ConfigError(format!(
                    "{} must be a percentage, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Neighbor generator over packing solutions.
#[derive(Debug, Clone, Default)]
pub struct Neighborhood {
    config: NeighborhoodConfig,
}

impl Neighborhood {
    /// Creates a generator with the given configuration.
    pub fn new(config: NeighborhoodConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NeighborhoodConfig {
        &self.config
    }

    /// Exchanges two items held by different bins and repacks both bins.
    ///
    /// Rejected if the items share a bin, either is unassigned, or both end
    /// up unpacked.
    pub fn swap(&self, solution: &Solution, item_a: ItemId, item_b: ItemId) -> Option<Solution> {
        let a = solution.item_index(item_a)?;
        let b = solution.item_index(item_b)?;
        swap_at(solution, a, b)
    }

    /// Moves an item into `target` and repacks source and target.
    ///
    /// Rejected if the item is unassigned, already in `target`, or fails to
    /// repack into `target`.
    pub fn move_item(&self, solution: &Solution, item: ItemId, target: BinId) -> Option<Solution> {
        let index = solution.item_index(item)?;
        let target = solution.bin_index(target)?;
        move_at(solution, index, target)
    }

    /// Pools two bins whose utilizations differ by at least the configured
    /// gap, packs into `bin_a` and overflows into `bin_b`.
    pub fn rebalance(&self, solution: &Solution, bin_a: BinId, bin_b: BinId) -> Option<Solution> {
        let a = solution.bin_index(bin_a)?;
        let b = solution.bin_index(bin_b)?;
        self.rebalance_at(solution, a, b)
    }

    /// Pools two bins and packs everything into `bin_a`.
    ///
    /// Skipped when the pooled volume exceeds the configured multiple of
    /// the bin volume; rejected unless enough of the pooled items fit.
    pub fn merge(&self, solution: &Solution, bin_a: BinId, bin_b: BinId) -> Option<Solution> {
        let a = solution.bin_index(bin_a)?;
        let b = solution.bin_index(bin_b)?;
        self.merge_at(solution, a, b)
    }

    /// Tries to move every item of the least-utilized bin into the other
    /// used bins.
    ///
    /// Accepted if the source bin empties or loses more than half its
    /// items.
    pub fn consolidate(&self, solution: &Solution) -> Option<Solution> {
        let (source, bin) = solution
            .bins()
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .min_by(|(_, x), (_, y)| x.utilization().total_cmp(&y.utilization()))?;
        if bin.utilization() > self.config.consolidate_max_utilization {
            return None;
        }

        let targets: Vec<usize> = used_positions(solution)
            .into_iter()
            .filter(|&t| t != source)
            .collect();
        if targets.is_empty() {
            return None;
        }

        let mut next = solution.copy();
        let mut candidates = bin.item_indices().to_vec();
        candidates.sort_by(|&x, &y| {
            next.item_at(y)
                .volume()
                .total_cmp(&next.item_at(x).volume())
        });
        let original = candidates.len();

        for index in candidates {
            for &target in &targets {
                if try_relocate(&mut next, index, target) {
                    break;
                }
            }
        }

        let remaining = next.bins()[source].len();
        let moved = original - remaining;
        if remaining == 0 || moved * 2 > original {
            Some(next)
        } else {
            None
        }
    }

    fn rebalance_at(&self, solution: &Solution, a: usize, b: usize) -> Option<Solution> {
        if a == b {
            return None;
        }
        let gap = (solution.bins()[a].utilization() - solution.bins()[b].utilization()).abs();
        if gap < self.config.rebalance_gap {
            return None;
        }

        let mut next = solution.copy();
        let mut pool = next.clear_bin_at(a);
        pool.extend(next.clear_bin_at(b));
        let first = next.pack_into(a, &pool, true);
        next.pack_into(b, &first.unpacked, true);
        Some(next)
    }

    fn merge_at(&self, solution: &Solution, a: usize, b: usize) -> Option<Solution> {
        if a == b || solution.bins()[b].is_empty() {
            return None;
        }
        let combined = solution.bins()[a].used_volume() + solution.bins()[b].used_volume();
        if combined > self.config.merge_volume_factor * solution.bin_volume() {
            return None;
        }

        let mut next = solution.copy();
        let mut pool = next.clear_bin_at(a);
        pool.extend(next.clear_bin_at(b));
        let total = pool.len();
        let outcome = next.pack_into(a, &pool, true);

        let ratio = outcome.packed.len() as f64 / total as f64;
        if outcome.all_packed() || ratio >= self.config.merge_acceptance_ratio {
            Some(next)
        } else {
            None
        }
    }

    fn retry<R, F>(&self, rng: &mut R, mut attempt: F) -> Option<Solution>
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Option<Solution>,
    {
        (0..self.config.max_attempts).find_map(|_| attempt(rng))
    }

    /// Random swap between two items in different bins.
    pub fn random_swap<R: Rng + ?Sized>(&self, solution: &Solution, rng: &mut R) -> Option<Solution> {
        self.retry(rng, |rng| sample_swap(solution, rng))
    }

    /// Random move of an item to another bin.
    pub fn random_move<R: Rng + ?Sized>(&self, solution: &Solution, rng: &mut R) -> Option<Solution> {
        self.retry(rng, |rng| sample_move(solution, rng))
    }

    /// Random rebalance of two bins.
    pub fn random_rebalance<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Solution> {
        self.retry(rng, |rng| self.sample_rebalance(solution, rng))
    }

    /// Random merge of two used bins.
    pub fn random_merge<R: Rng + ?Sized>(&self, solution: &Solution, rng: &mut R) -> Option<Solution> {
        self.retry(rng, |rng| self.sample_merge(solution, rng))
    }

    /// One neighbor from a randomly chosen operator family, sampled by
    /// weight. Each attempt draws a fresh family.
    pub fn random_neighbor<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Solution> {
        let families = WeightedIndex::new(self.config.weights.as_array()).ok()?;
        self.retry(rng, |rng| {
            let operator = Operator::ALL[families.sample(rng)];
            self.sample(operator, solution, rng)
        })
    }

    /// One attempt of the given operator family.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        operator: Operator,
        solution: &Solution,
        rng: &mut R,
    ) -> Option<Solution> {
        match operator {
            Operator::Merge => self.sample_merge(solution, rng),
            Operator::Consolidate => self.consolidate(solution),
            Operator::Swap => sample_swap(solution, rng),
            Operator::Move => sample_move(solution, rng),
            Operator::Rebalance => self.sample_rebalance(solution, rng),
        }
    }

    fn sample_rebalance<R: Rng + ?Sized>(&self, solution: &Solution, rng: &mut R) -> Option<Solution> {
        let positions: Vec<usize> = (0..solution.bins().len()).collect();
        let (a, b) = pick_two(&positions, rng)?;
        self.rebalance_at(solution, a, b)
    }

    fn sample_merge<R: Rng + ?Sized>(&self, solution: &Solution, rng: &mut R) -> Option<Solution> {
        let (a, b) = pick_two(&used_positions(solution), rng)?;
        self.merge_at(solution, a, b)
    }

    /// Every successful swap between items in different bins.
    pub fn all_swaps(&self, solution: &Solution) -> Vec<Solution> {
        let assigned = assigned_indices(solution);
        let pairs: Vec<(usize, usize)> = assigned
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| assigned[i + 1..].iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| {
                solution.item_at(a).assigned_bin() != solution.item_at(b).assigned_bin()
            })
            .collect();
        self.expand(&pairs, |&(a, b)| swap_at(solution, a, b))
    }

    /// Every successful move of an assigned item to another bin.
    pub fn all_moves(&self, solution: &Solution) -> Vec<Solution> {
        let bins = solution.bins().len();
        let moves: Vec<(usize, usize)> = assigned_indices(solution)
            .into_iter()
            .flat_map(|i| (0..bins).map(move |t| (i, t)))
            .filter(|&(i, t)| solution.item_at(i).assigned_bin() != Some(solution.bins()[t].id()))
            .collect();
        self.expand(&moves, |&(i, t)| move_at(solution, i, t))
    }

    /// Every applicable rebalance over unordered bin pairs.
    pub fn all_rebalances(&self, solution: &Solution) -> Vec<Solution> {
        let bins = solution.bins().len();
        let pairs: Vec<(usize, usize)> = (0..bins)
            .flat_map(|a| (a + 1..bins).map(move |b| (a, b)))
            .collect();
        self.expand(&pairs, |&(a, b)| self.rebalance_at(solution, a, b))
    }

    /// Every accepted merge over ordered pairs of used bins.
    pub fn all_merges(&self, solution: &Solution) -> Vec<Solution> {
        let used = used_positions(solution);
        let pairs: Vec<(usize, usize)> = used
            .iter()
            .flat_map(|&a| used.iter().map(move |&b| (a, b)))
            .filter(|(a, b)| a != b)
            .collect();
        self.expand(&pairs, |&(a, b)| self.merge_at(solution, a, b))
    }

    /// Swap, move and rebalance neighbors, in that order.
    pub fn local_search_neighbors(&self, solution: &Solution) -> Vec<Solution> {
        let mut neighbors = self.all_swaps(solution);
        neighbors.extend(self.all_moves(solution));
        neighbors.extend(self.all_rebalances(solution));
        neighbors
    }

    /// Applies `apply` to every move, keeping enumeration order. Fitness is
    /// computed while the neighbor is still on its worker thread.
    fn expand<T, F>(&self, moves: &[T], apply: F) -> Vec<Solution>
    where
        T: Sync,
        F: Fn(&T) -> Option<Solution> + Sync,
    {
        let scored = |m: &T| {
            apply(m).map(|s| {
                s.fitness();
                s
            })
        };
        if self.config.parallel {
            moves.par_iter().filter_map(scored).collect()
        } else {
            moves.iter().filter_map(scored).collect()
        }
    }
}

fn assigned_indices(solution: &Solution) -> Vec<usize> {
    (0..solution.all_items().len())
        .filter(|&i| solution.item_at(i).is_assigned())
        .collect()
}

fn used_positions(solution: &Solution) -> Vec<usize> {
    solution
        .bins()
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.is_empty())
        .map(|(i, _)| i)
        .collect()
}

fn pick_two<R: Rng + ?Sized>(values: &[usize], rng: &mut R) -> Option<(usize, usize)> {
    if values.len() < 2 {
        return None;
    }
    let mut picked = values.choose_multiple(rng, 2);
    Some((*picked.next()?, *picked.next()?))
}

fn sample_swap<R: Rng + ?Sized>(solution: &Solution, rng: &mut R) -> Option<Solution> {
    let (a, b) = pick_two(&assigned_indices(solution), rng)?;
    swap_at(solution, a, b)
}

fn sample_move<R: Rng + ?Sized>(solution: &Solution, rng: &mut R) -> Option<Solution> {
    let bins = solution.bins().len();
    if bins < 2 {
        return None;
    }
    let index = *assigned_indices(solution).choose(rng)?;
    move_at(solution, index, rng.gen_range(0..bins))
}

fn bin_position_of(solution: &Solution, index: usize) -> Option<usize> {
    solution.bin_index(solution.item_at(index).assigned_bin()?)
}

fn swap_at(solution: &Solution, a: usize, b: usize) -> Option<Solution> {
    let bin_a = bin_position_of(solution, a)?;
    let bin_b = bin_position_of(solution, b)?;
    if bin_a == bin_b {
        return None;
    }

    let mut next = solution.copy();
    let mut pool_a = next.clear_bin_at(bin_a);
    let mut pool_b = next.clear_bin_at(bin_b);
    pool_a.retain(|&i| i != a);
    pool_a.push(b);
    pool_b.retain(|&i| i != b);
    pool_b.push(a);

    let out_a = next.pack_into(bin_a, &pool_a, true);
    let out_b = next.pack_into(bin_b, &pool_b, true);
    if out_a.unpacked.contains(&b) && out_b.unpacked.contains(&a) {
        return None;
    }
    Some(next)
}

fn move_at(solution: &Solution, index: usize, target: usize) -> Option<Solution> {
    let source = bin_position_of(solution, index)?;
    if source == target || target >= solution.bins().len() {
        return None;
    }

    let mut next = solution.copy();
    let mut pool_source = next.clear_bin_at(source);
    let mut pool_target = next.clear_bin_at(target);
    pool_source.retain(|&i| i != index);
    pool_target.push(index);

    let outcome = next.pack_into(target, &pool_target, true);
    if outcome.unpacked.contains(&index) {
        return None;
    }
    next.pack_into(source, &pool_source, true);
    Some(next)
}

/// Moves the item at `index` into the bin at `target` by repacking that bin
/// with the item added. On failure the solution is restored exactly.
fn try_relocate(solution: &mut Solution, index: usize, target: usize) -> bool {
    let saved_item = solution.item_at(index).clone();
    let saved_bin: Bin = solution.bins()[target].clone();
    let saved_members: Vec<(usize, Item)> = saved_bin
        .item_indices()
        .iter()
        .map(|&i| (i, solution.item_at(i).clone()))
        .collect();

    solution.detach(index);
    let mut pool = solution.clear_bin_at(target);
    pool.push(index);
    if solution.pack_into(target, &pool, true).all_packed() {
        return true;
    }

    solution.restore(target, saved_bin, saved_members);
    solution.reattach(index, saved_item);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::first_fit_decreasing;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn items(dims: &[(f64, f64, f64)]) -> Vec<Item> {
        dims.iter()
            .enumerate()
            .map(|(i, &(l, w, h))| Item::new(i, l, w, h))
            .collect()
    }

    /// One item per bin, placed at the origin.
    fn one_per_bin(dims: &[(f64, f64, f64)]) -> Solution {
        let mut s = Solution::new((10.0, 8.0, 6.0), items(dims));
        for id in 0..dims.len() {
            let bin = s.add_bin();
            s.assign(id, bin, Vector3::zeros(), 0).unwrap();
        }
        s
    }

    fn assert_sound(s: &Solution) {
        assert!(s.is_consistent());
        assert_eq!(s.infeasible_bins_count(), 0);
    }

    /// Places item `i` in bin `layout[i].0` at `layout[i].1`, identity rotation.
    fn laid_out(dims: &[(f64, f64, f64)], layout: &[(usize, [f64; 3])]) -> Solution {
        let mut s = Solution::new((10.0, 8.0, 6.0), items(dims));
        let bins = layout.iter().map(|(b, _)| b + 1).max().unwrap_or(0);
        for _ in 0..bins {
            s.add_bin();
        }
        for (id, &(bin, [x, y, z])) in layout.iter().enumerate() {
            s.assign(id, bin, Vector3::new(x, y, z), 0).unwrap();
        }
        assert_sound(&s);
        s
    }

    fn sequential() -> Neighborhood {
        Neighborhood::new(NeighborhoodConfig::default().with_parallel(false))
    }

    #[test]
    fn test_swap_between_bins() {
        let s = one_per_bin(&[(5.0, 5.0, 5.0), (3.0, 3.0, 3.0)]);
        let n = sequential().swap(&s, 0, 1).unwrap();
        assert_sound(&n);
        assert_eq!(n.get_item_by_id(0).unwrap().assigned_bin(), Some(1));
        assert_eq!(n.get_item_by_id(1).unwrap().assigned_bin(), Some(0));
        // Input untouched.
        assert_eq!(s.get_item_by_id(0).unwrap().assigned_bin(), Some(0));
    }

    #[test]
    fn test_swap_rejects_same_bin_and_unknown() {
        let mut s = Solution::new((10.0, 8.0, 6.0), items(&[(2.0, 2.0, 2.0), (2.0, 2.0, 2.0)]));
        let bin = s.add_bin();
        s.assign(0, bin, Vector3::zeros(), 0).unwrap();
        s.assign(1, bin, Vector3::new(2.0, 0.0, 0.0), 0).unwrap();
        let hood = sequential();
        assert!(hood.swap(&s, 0, 1).is_none());
        assert!(hood.swap(&s, 0, 99).is_none());
    }

    #[test]
    fn test_move_item() {
        let s = one_per_bin(&[(5.0, 8.0, 6.0), (5.0, 8.0, 6.0)]);
        let hood = sequential();
        let n = hood.move_item(&s, 1, 0).unwrap();
        assert_sound(&n);
        assert_eq!(n.used_bins_count(), 1);
        assert!(n.fitness() < s.fitness());

        assert!(hood.move_item(&s, 1, 1).is_none());
        assert!(hood.move_item(&s, 1, 7).is_none());
    }

    #[test]
    fn test_move_rejected_when_target_full() {
        let s = one_per_bin(&[(10.0, 8.0, 6.0), (1.0, 1.0, 1.0)]);
        assert!(sequential().move_item(&s, 1, 0).is_none());
    }

    #[test]
    fn test_rebalance_requires_gap() {
        let hood = sequential();
        // 50% vs 50%.
        let even = one_per_bin(&[(10.0, 8.0, 3.0), (10.0, 8.0, 3.0)]);
        assert!(hood.rebalance(&even, 0, 1).is_none());

        // 100% vs 10%.
        let uneven = one_per_bin(&[(10.0, 8.0, 6.0), (6.0, 8.0, 1.0)]);
        let n = hood.rebalance(&uneven, 0, 1).unwrap();
        assert_sound(&n);
        assert_eq!(n.unassigned_count(), 0);
        assert!(hood.rebalance(&uneven, 0, 0).is_none());
    }

    #[test]
    fn test_merge_two_half_bins() {
        let s = one_per_bin(&[(5.0, 8.0, 6.0), (5.0, 8.0, 6.0)]);
        let n = sequential().merge(&s, 0, 1).unwrap();
        assert_sound(&n);
        assert_eq!(n.used_bins_count(), 1);
        assert_eq!(n.get_bin_by_id(0).unwrap().len(), 2);
        assert!(n.get_bin_by_id(1).unwrap().is_empty());
    }

    #[test]
    fn test_merge_skipped_when_too_full() {
        let s = one_per_bin(&[(10.0, 8.0, 6.0), (10.0, 8.0, 6.0)]);
        assert!(sequential().merge(&s, 0, 1).is_none());
    }

    #[test]
    fn test_merge_rejected_below_ratio() {
        // 2 of the 3 pooled items cannot fit: 1/3 < 0.8.
        let mut s = Solution::new(
            (10.0, 8.0, 6.0),
            items(&[(10.0, 8.0, 5.0), (10.0, 8.0, 2.0), (10.0, 8.0, 2.0)]),
        );
        let a = s.add_bin();
        let b = s.add_bin();
        s.assign(0, a, Vector3::zeros(), 0).unwrap();
        s.assign(1, b, Vector3::zeros(), 0).unwrap();
        s.assign(2, b, Vector3::new(0.0, 0.0, 2.0), 0).unwrap();
        assert!(sequential().merge(&s, 0, 1).is_none());
    }

    #[test]
    fn test_consolidate_empties_small_bin() {
        let s = one_per_bin(&[(10.0, 8.0, 3.0), (2.0, 2.0, 2.0)]);
        let n = sequential().consolidate(&s).unwrap();
        assert_sound(&n);
        assert_eq!(n.used_bins_count(), 1);
        assert_eq!(n.unassigned_count(), 0);
    }

    #[test]
    fn test_consolidate_skips_full_bins() {
        let s = one_per_bin(&[(10.0, 8.0, 6.0), (10.0, 8.0, 5.0)]);
        assert!(sequential().consolidate(&s).is_none());
    }

    #[test]
    fn test_consolidate_failure_leaves_input_alone() {
        // The small bin's item cannot go anywhere else.
        let s = one_per_bin(&[(10.0, 8.0, 6.0), (2.0, 2.0, 2.0)]);
        assert!(sequential().consolidate(&s).is_none());
        assert_sound(&s);
    }

    #[test]
    fn test_try_relocate_restores_on_failure() {
        let mut s = one_per_bin(&[(10.0, 8.0, 6.0), (2.0, 2.0, 2.0)]);
        let before: Vec<Item> = s.all_items().to_vec();
        assert!(!try_relocate(&mut s, 1, 0));
        assert_sound(&s);
        assert_eq!(s.all_items(), before.as_slice());
        assert_eq!(s.get_bin_by_id(1).unwrap().len(), 1);
    }

    #[test]
    fn test_exhaustive_generators_are_sound() {
        let s = first_fit_decreasing(
            (10.0, 8.0, 6.0),
            items(&[
                (8.0, 6.0, 4.0),
                (7.0, 5.0, 4.0),
                (6.0, 5.0, 3.0),
                (5.0, 4.0, 3.0),
                (4.0, 4.0, 3.0),
                (5.0, 3.0, 2.0),
            ]),
        );
        let hood = sequential();
        for n in hood
            .all_swaps(&s)
            .iter()
            .chain(&hood.all_moves(&s))
            .chain(&hood.all_rebalances(&s))
            .chain(&hood.all_merges(&s))
        {
            assert_sound(n);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let s = one_per_bin(&[(5.0, 5.0, 5.0), (4.0, 4.0, 4.0), (3.0, 3.0, 3.0)]);
        let parallel = Neighborhood::new(NeighborhoodConfig::default().with_parallel(true));
        let a: Vec<f64> = parallel.all_moves(&s).iter().map(Solution::fitness).collect();
        let b: Vec<f64> = sequential().all_moves(&s).iter().map(Solution::fitness).collect();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_random_neighbor_is_sound() {
        let s = one_per_bin(&[(5.0, 5.0, 5.0), (4.0, 4.0, 4.0), (3.0, 3.0, 3.0)]);
        let hood = sequential();
        let mut rng = StdRng::seed_from_u64(7);
        let mut produced = 0;
        for _ in 0..30 {
            if let Some(n) = hood.random_neighbor(&s, &mut rng) {
                assert_sound(&n);
                produced += 1;
            }
        }
        assert!(produced > 0);
    }

    #[test]
    fn test_random_generators_need_two_bins() {
        let s = one_per_bin(&[(5.0, 5.0, 5.0)]);
        let hood = sequential();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(hood.random_swap(&s, &mut rng).is_none());
        assert!(hood.random_move(&s, &mut rng).is_none());
        assert!(hood.random_rebalance(&s, &mut rng).is_none());
        assert!(hood.random_merge(&s, &mut rng).is_none());
    }

    #[test]
    fn test_weights_fallback() {
        let zero = OperatorWeights {
            merge: 0.0,
            consolidate: 0.0,
            swap: -1.0,
            move_item: 0.0,
            rebalance: 0.0,
        };
        let config = NeighborhoodConfig::new().with_weights(zero);
        assert_eq!(config.weights, OperatorWeights::default());
        assert_eq!(Operator::Move.name(), "move");
    }

    #[test]
    fn test_swap_accepted_with_swapped_item_unpacked() {
        // Bin 0: two 10x8x3 slabs. Bin 1: 10x8x2 under 10x8x4.
        let s = laid_out(
            &[(10.0, 8.0, 3.0), (10.0, 8.0, 3.0), (10.0, 8.0, 2.0), (10.0, 8.0, 4.0)],
            &[
                (0, [0.0, 0.0, 0.0]),
                (0, [0.0, 0.0, 3.0]),
                (1, [0.0, 0.0, 0.0]),
                (1, [0.0, 0.0, 2.0]),
            ],
        );
        // Item 2 fits on top of item 1; item 0 no longer fits beside item 3.
        let n = sequential().swap(&s, 0, 2).unwrap();
        assert_sound(&n);
        assert_eq!(n.unassigned_count(), 1);
        assert!(!n.get_item_by_id(0).unwrap().is_assigned());
        assert_eq!(n.get_item_by_id(2).unwrap().assigned_bin(), Some(0));
        assert!(n.fitness() > s.fitness());
    }

    #[test]
    fn test_merge_accepted_above_ratio() {
        // 10x8x2 block in bin 0, five 10x8x1 plates stacked in bin 1.
        let mut dims = vec![(10.0, 8.0, 2.0)];
        let mut layout = vec![(0, [0.0, 0.0, 0.0])];
        for z in 0..5 {
            dims.push((10.0, 8.0, 1.0));
            layout.push((1, [0.0, 0.0, z as f64]));
        }
        let s = laid_out(&dims, &layout);

        // Only four plates fit above the block: 5 of 6 packed.
        let n = sequential().merge(&s, 0, 1).unwrap();
        assert_sound(&n);
        assert_eq!(n.unassigned_count(), 1);
        assert_eq!(n.get_bin_by_id(0).unwrap().len(), 5);
        assert!(n.get_bin_by_id(1).unwrap().is_empty());

        let strict = NeighborhoodConfig::default()
            .with_parallel(false)
            .with_merge_acceptance_ratio(0.9);
        assert!(Neighborhood::new(strict).merge(&s, 0, 1).is_none());
    }

    #[test]
    fn test_consolidate_accepted_when_most_items_move() {
        // Bin 0 is two thirds full; bin 1 holds two plates and a cube that
        // is too tall for the space left in bin 0.
        let s = laid_out(
            &[(10.0, 8.0, 4.0), (10.0, 8.0, 1.0), (10.0, 8.0, 1.0), (3.0, 3.0, 3.0)],
            &[
                (0, [0.0, 0.0, 0.0]),
                (1, [0.0, 0.0, 0.0]),
                (1, [0.0, 0.0, 1.0]),
                (1, [0.0, 0.0, 2.0]),
            ],
        );
        let n = sequential().consolidate(&s).unwrap();
        assert_sound(&n);
        assert_eq!(n.unassigned_count(), 0);
        assert_eq!(n.get_bin_by_id(0).unwrap().len(), 3);
        let source = n.get_bin_by_id(1).unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(n.items_in(source).next().map(Item::id), Some(3));
    }

    #[test]
    fn test_config_validation() {
        assert!(NeighborhoodConfig::default().validate().is_ok());

        let mut config = NeighborhoodConfig::default();
        config.weights.swap = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = NeighborhoodConfig::default();
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = NeighborhoodConfig::default();
        config.rebalance_gap = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_failed_relocations_keep_used_volume_exact() {
        let mut s = laid_out(
            &[(10.0, 8.0, 6.0), (0.7, 1.3, 0.9), (1.1, 0.3, 2.9), (2.2, 2.2, 2.1)],
            &[
                (0, [0.0, 0.0, 0.0]),
                (1, [0.0, 0.0, 0.0]),
                (1, [3.0, 0.0, 0.0]),
                (1, [6.0, 0.0, 0.0]),
            ],
        );
        for round in 0..60 {
            assert!(!try_relocate(&mut s, 1 + round % 3, 0));
        }
        assert_sound(&s);

        let source = s.get_bin_by_id(1).unwrap();
        let summed: f64 = s.items_in(source).map(Item::volume).sum();
        assert_eq!(source.used_volume(), summed);
        assert_eq!(s.get_bin_by_id(0).unwrap().used_volume(), 480.0);
    }
}
