//! Packing solutions and the fitness function.
//!
//! A [`Solution`] owns every item of the instance in an arena and a list of
//! bins that refer to those items by arena index. Fitness is cached and
//! invalidated by every mutation.

use crate::boundary::Bin;
use crate::geometry::{Item, Rotation};
use crate::placement::{self, PackOutcome};
use nalgebra::Vector3;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use u_packing_core::{
    BinId, ConstraintViolations, Error, ItemId, Placement, PlacementStats, Result, SaSolution,
    Statistics,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights of the fitness terms.
///
/// ```text
/// fitness = used_bins * bin_weight
///         + (100 - avg_utilization) * utilization_weight
///         + stddev(utilization) * balance_weight      (when enabled)
///         + unpacked_items * unpacked_weight
///         + infeasible_bins * infeasible_weight
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessWeights {
    /// Cost per used bin.
    pub bin_weight: f64,
    /// Cost per percentage point of unused capacity in used bins.
    pub utilization_weight: f64,
    /// Cost per point of utilization standard deviation.
    pub balance_weight: f64,
    /// Whether the balance term is included.
    pub balance_enabled: bool,
    /// Cost per unassigned item.
    pub unpacked_weight: f64,
    /// Cost per bin with overlapping or out-of-bounds items.
    pub infeasible_weight: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            bin_weight: 1000.0,
            utilization_weight: 10.0,
            balance_weight: 50.0,
            balance_enabled: false,
            unpacked_weight: 10000.0,
            infeasible_weight: 5000.0,
        }
    }
}

impl FitnessWeights {
    /// Creates the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the utilization balance term.
    pub fn with_balance_penalty(mut self, enabled: bool) -> Self {
        self.balance_enabled = enabled;
        self
    }

    /// Sets the per-bin cost.
    pub fn with_bin_weight(mut self, weight: f64) -> Self {
        self.bin_weight = weight.max(0.0);
        self
    }

    /// Sets the utilization weight.
    pub fn with_utilization_weight(mut self, weight: f64) -> Self {
        self.utilization_weight = weight.max(0.0);
        self
    }

    /// Sets the balance weight.
    pub fn with_balance_weight(mut self, weight: f64) -> Self {
        self.balance_weight = weight.max(0.0);
        self
    }

    /// Sets the per-item penalty for unpacked items.
    pub fn with_unpacked_weight(mut self, weight: f64) -> Self {
        self.unpacked_weight = weight.max(0.0);
        self
    }

    /// Sets the per-bin penalty for infeasible bins.
    pub fn with_infeasible_weight(mut self, weight: f64) -> Self {
        self.infeasible_weight = weight.max(0.0);
        self
    }
}

/// A (possibly partial) packing of an item catalogue into bins.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Dimensions shared by every bin.
    bin_dimensions: Vector3<f64>,

    /// Bins in creation order.
    bins: Vec<Bin>,

    /// Item arena; bins refer to items by index into this vector.
    items: Vec<Item>,

    /// Fitness weights.
    weights: FitnessWeights,

    /// Cached fitness.
    fitness: OnceLock<f64>,
}

impl Solution {
    /// Creates an empty solution: no bins, every item unassigned.
    pub fn new(bin_dimensions: (f64, f64, f64), items: Vec<Item>) -> Self {
        let (length, width, height) = bin_dimensions;
        let mut items = items;
        for item in &mut items {
            item.reset();
        }
        Self {
            bin_dimensions: Vector3::new(length, width, height),
            bins: Vec::new(),
            items,
            weights: FitnessWeights::default(),
            fitness: OnceLock::new(),
        }
    }

    /// Like [`Solution::new`] but validates the bin, each item and id
    /// uniqueness first.
    pub fn try_new(bin_dimensions: (f64, f64, f64), items: Vec<Item>) -> Result<Self> {
        let (length, width, height) = bin_dimensions;
        Bin::new(0, length, width, height).validate()?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.id()) {
                return Err(Error::DuplicateItem(item.id()));
            }
        }
        Ok(Self::new(bin_dimensions, items))
    }

    /// Sets the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self.invalidate_fitness();
        self
    }

    /// Returns the fitness weights.
    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Returns the bin dimensions.
    pub fn bin_dimensions(&self) -> &Vector3<f64> {
        &self.bin_dimensions
    }

    /// Volume of one bin.
    pub fn bin_volume(&self) -> f64 {
        self.bin_dimensions.x * self.bin_dimensions.y * self.bin_dimensions.z
    }

    /// Bins in creation order, including empty ones.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// The complete item catalogue.
    pub fn all_items(&self) -> &[Item] {
        &self.items
    }

    /// Appends a fresh empty bin and returns its id.
    pub fn add_bin(&mut self) -> BinId {
        let id = self.next_bin_id();
        self.bins.push(Bin::with_dimensions(id, self.bin_dimensions));
        self.invalidate_fitness();
        id
    }

    fn next_bin_id(&self) -> BinId {
        self.bins.last().map_or(0, |b| b.id() + 1)
    }

    /// Looks up an item by id.
    pub fn get_item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    /// Looks up a bin by id.
    pub fn get_bin_by_id(&self, id: BinId) -> Option<&Bin> {
        self.bins.iter().find(|b| b.id() == id)
    }

    /// Arena index of an item id.
    pub fn item_index(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == id)
    }

    /// Position of a bin id in [`Solution::bins`].
    pub fn bin_index(&self, id: BinId) -> Option<usize> {
        self.bins.iter().position(|b| b.id() == id)
    }

    /// Items held by a bin.
    pub fn items_in<'a>(&'a self, bin: &'a Bin) -> impl Iterator<Item = &'a Item> + 'a {
        bin.item_indices().iter().map(move |&i| &self.items[i])
    }

    /// Bins holding at least one item.
    pub fn used_bins(&self) -> impl Iterator<Item = &Bin> {
        self.bins.iter().filter(|b| !b.is_empty())
    }

    /// Number of bins holding at least one item.
    pub fn used_bins_count(&self) -> usize {
        self.used_bins().count()
    }

    /// Number of bins created, including empty ones.
    pub fn total_bins_count(&self) -> usize {
        self.bins.len()
    }

    /// Items not assigned to any bin.
    pub fn unassigned_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.is_assigned())
    }

    /// Number of unassigned items.
    pub fn unassigned_count(&self) -> usize {
        self.unassigned_items().count()
    }

    /// Mean utilization over used bins, in percent. Zero with no used bins.
    pub fn average_utilization(&self) -> f64 {
        let used: Vec<f64> = self.used_bins().map(Bin::utilization).collect();
        if used.is_empty() {
            0.0
        } else {
            used.iter().sum::<f64>() / used.len() as f64
        }
    }

    /// Population standard deviation of utilization over used bins.
    pub fn utilization_std_dev(&self) -> f64 {
        let used: Vec<f64> = self.used_bins().map(Bin::utilization).collect();
        if used.len() < 2 {
            return 0.0;
        }
        let mean = used.iter().sum::<f64>() / used.len() as f64;
        let variance = used.iter().map(|u| (u - mean).powi(2)).sum::<f64>() / used.len() as f64;
        variance.sqrt()
    }

    /// Number of bins with overlapping or out-of-bounds items.
    pub fn infeasible_bins_count(&self) -> usize {
        self.bins
            .iter()
            .filter(|b| !b.is_feasible(&self.items))
            .count()
    }

    /// Lower bound on the number of bins: total item volume over bin volume,
    /// rounded up.
    pub fn theoretical_min_bins(&self) -> usize {
        let total: f64 = self.items.iter().map(Item::volume).sum();
        (total / self.bin_volume()).ceil() as usize
    }

    /// Every item is packed, every bin is feasible and no item is claimed by
    /// two bins. Item ids must be unique across the arena.
    pub fn is_valid(&self) -> bool {
        self.unassigned_count() == 0
            && self.infeasible_bins_count() == 0
            && self.is_consistent()
            && self.has_unique_ids()
    }

    /// Whether no two items in the arena share an id. Always true for
    /// solutions built with [`Solution::try_new`].
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|item| seen.insert(item.id()))
    }

    /// Checks the bookkeeping between bins and items by arena index, not by
    /// id (see [`Solution::has_unique_ids`]): each arena index
    /// appears in at most one bin, every member points back at its bin and
    /// is placed, and every assigned item is a member of the bin it names.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.items.len()];
        for bin in &self.bins {
            for &index in bin.item_indices() {
                if index >= self.items.len() || seen[index] {
                    return false;
                }
                seen[index] = true;
                let item = &self.items[index];
                if item.assigned_bin() != Some(bin.id()) || !item.is_placed() {
                    return false;
                }
            }
        }
        self.items
            .iter()
            .zip(&seen)
            .all(|(item, &member)| item.is_assigned() == member && item.is_placed() == member)
    }

    /// Computes the fitness from scratch. Lower is better.
    pub fn calculate_fitness(&self) -> f64 {
        let w = &self.weights;
        let mut fitness = self.used_bins_count() as f64 * w.bin_weight;
        fitness += (100.0 - self.average_utilization()) * w.utilization_weight;
        if w.balance_enabled {
            fitness += self.utilization_std_dev() * w.balance_weight;
        }
        fitness += self.unassigned_count() as f64 * w.unpacked_weight;
        fitness += self.infeasible_bins_count() as f64 * w.infeasible_weight;
        fitness
    }

    /// Cached fitness.
    pub fn fitness(&self) -> f64 {
        *self.fitness.get_or_init(|| self.calculate_fitness())
    }

    /// Drops the cached fitness.
    pub fn invalidate_fitness(&mut self) {
        self.fitness.take();
    }

    /// Independent deep copy, carrying over the cached fitness.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Summary for reporting.
    pub fn get_statistics(&self) -> Statistics {
        Statistics {
            total_bins: self.total_bins_count(),
            used_bins: self.used_bins_count(),
            avg_utilization: self.average_utilization(),
            unpacked_items: self.unassigned_count(),
            total_items: self.items.len(),
            fitness: self.fitness(),
            is_valid: self.is_valid(),
        }
    }

    /// Constraint violation counts.
    pub fn constraint_violations(&self) -> ConstraintViolations {
        ConstraintViolations {
            unpacked_items: self.unassigned_count(),
            overlapping_bins: self
                .bins
                .iter()
                .filter(|b| b.has_overlaps(&self.items))
                .count(),
            out_of_bounds: self
                .bins
                .iter()
                .map(|b| b.out_of_bounds_count(&self.items))
                .sum(),
        }
    }

    /// Placement records of every placed item, in bin order.
    pub fn placements(&self) -> Vec<Placement> {
        self.bins
            .iter()
            .flat_map(|bin| bin.item_indices().iter().map(move |&i| (bin.id(), i)))
            .filter_map(|(bin_id, index)| {
                let item = &self.items[index];
                let position = item.position()?;
                let extents = item.extents();
                Some(Placement::new(
                    item.id(),
                    bin_id,
                    [position.x, position.y, position.z],
                    [extents.x, extents.y, extents.z],
                    item.rotation().index(),
                ))
            })
            .collect()
    }

    /// Rotation and per-bin counts over [`Solution::placements`].
    pub fn placement_stats(&self) -> PlacementStats {
        PlacementStats::from_placements(&self.placements())
    }

    /// Drops trailing empty bins. Surviving bins keep their ids.
    pub fn compact_bins(&mut self) -> usize {
        let before = self.bins.len();
        while self.bins.last().is_some_and(Bin::is_empty) {
            self.bins.pop();
        }
        let removed = before - self.bins.len();
        if removed > 0 {
            self.invalidate_fitness();
        }
        removed
    }

    /// Places an item at an explicit position and rotation.
    ///
    /// The item is detached from any current bin first. The placement is not
    /// checked for overlap or bounds; an infeasible assignment is penalised
    /// by the fitness function.
    pub fn assign(
        &mut self,
        item_id: ItemId,
        bin_id: BinId,
        position: Vector3<f64>,
        rotation: usize,
    ) -> Result<()> {
        let rotation = Rotation::new(rotation)?;
        let index = self
            .item_index(item_id)
            .ok_or_else(|| Error::InvalidGeometry(format!("unknown item {}", item_id)))?;
        let bin = self
            .bin_index(bin_id)
            .ok_or_else(|| Error::InvalidBoundary(format!("unknown bin {}", bin_id)))?;
        self.detach(index);
        self.items[index].place(bin_id, position, rotation);
        self.bins[bin].push(index, self.items[index].volume());
        self.invalidate_fitness();
        Ok(())
    }

    /// Removes an item from its bin. Returns false if it was unassigned or
    /// unknown.
    pub fn unassign(&mut self, item_id: ItemId) -> bool {
        match self.item_index(item_id) {
            Some(index) if self.items[index].is_assigned() => {
                self.detach(index);
                self.invalidate_fitness();
                true
            }
            _ => false,
        }
    }

    /// Empties a bin, leaving its items unassigned. Returns the number of
    /// items removed, or `None` for an unknown bin.
    pub fn clear_bin(&mut self, bin_id: BinId) -> Option<usize> {
        let bin = self.bin_index(bin_id)?;
        Some(self.clear_bin_at(bin).len())
    }

    /// Clears a bin and packs its own items again, largest-first.
    pub fn repack_bin(&mut self, bin_id: BinId) -> Option<PackOutcome> {
        let bin = self.bin_index(bin_id)?;
        self.invalidate_fitness();
        let Self { bins, items, .. } = self;
        Some(placement::repack_bin(&mut bins[bin], items))
    }

    /// Detaches the arena item at `index` from its bin, if any.
    pub(crate) fn detach(&mut self, index: usize) {
        if let Some(bin_id) = self.items[index].assigned_bin() {
            let volume = self.items[index].volume();
            if let Some(bin) = self.bin_index(bin_id) {
                self.bins[bin].remove(index, volume);
                self.bins[bin].refresh_used_volume(&self.items);
            }
            self.items[index].reset();
            self.invalidate_fitness();
        }
    }

    /// Empties the bin at position `bin`, returning the arena indices it held.
    pub(crate) fn clear_bin_at(&mut self, bin: usize) -> Vec<usize> {
        self.invalidate_fitness();
        let Self { bins, items, .. } = self;
        placement::clear_bin(&mut bins[bin], items)
    }

    /// Packs unassigned arena items into the bin at position `bin`.
    pub(crate) fn pack_into(
        &mut self,
        bin: usize,
        candidates: &[usize],
        sort_by_volume: bool,
    ) -> PackOutcome {
        self.invalidate_fitness();
        let Self { bins, items, .. } = self;
        let outcome =
            placement::pack_items_in_bin(&mut bins[bin], items, candidates, sort_by_volume);
        bins[bin].refresh_used_volume(items);
        outcome
    }

    /// Finds a position for the arena item at `index` in the bin at `bin`
    /// and commits it. The item must be unassigned.
    pub(crate) fn place_in(&mut self, bin: usize, index: usize) -> bool {
        self.pack_into(bin, &[index], false).all_packed()
    }

    /// Restores a previously saved item state and bin membership.
    pub(crate) fn restore(&mut self, bin: usize, saved: Bin, items: Vec<(usize, Item)>) {
        self.bins[bin] = saved;
        for (index, item) in items {
            self.items[index] = item;
        }
        self.invalidate_fitness();
    }

    /// Read access to the arena by index.
    pub(crate) fn item_at(&self, index: usize) -> &Item {
        &self.items[index]
    }

    /// Re-attaches an item state captured before it was detached.
    pub(crate) fn reattach(&mut self, index: usize, item: Item) {
        let bin = item.assigned_bin().and_then(|id| self.bin_index(id));
        let volume = item.volume();
        self.items[index] = item;
        if let Some(bin) = bin {
            self.bins[bin].push(index, volume);
            self.bins[bin].refresh_used_volume(&self.items);
        }
        self.invalidate_fitness();
    }
}

impl SaSolution for Solution {
    fn objective(&self) -> f64 {
        self.fitness()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solution(bins={}, fitness={:.2})",
            self.used_bins_count(),
            self.fitness()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn items(dims: &[(f64, f64, f64)]) -> Vec<Item> {
        dims.iter()
            .enumerate()
            .map(|(i, &(l, w, h))| Item::new(i, l, w, h))
            .collect()
    }

    fn two_bin_solution() -> Solution {
        let mut s = Solution::new(
            (10.0, 8.0, 6.0),
            items(&[(10.0, 8.0, 3.0), (5.0, 8.0, 6.0), (2.0, 2.0, 2.0)]),
        );
        let a = s.add_bin();
        let b = s.add_bin();
        s.assign(0, a, Vector3::zeros(), 0).unwrap();
        s.assign(1, b, Vector3::zeros(), 0).unwrap();
        s
    }

    #[test]
    fn test_new_solution_is_empty() {
        let s = Solution::new((10.0, 8.0, 6.0), items(&[(1.0, 1.0, 1.0)]));
        assert_eq!(s.total_bins_count(), 0);
        assert_eq!(s.unassigned_count(), 1);
        assert!(!s.is_valid());
        assert!(s.is_consistent());
    }

    #[test]
    fn test_try_new_validation() {
        assert!(Solution::try_new((10.0, 8.0, 6.0), items(&[(1.0, 1.0, 1.0)])).is_ok());
        assert!(Solution::try_new((0.0, 8.0, 6.0), vec![]).is_err());
        assert!(Solution::try_new((10.0, 8.0, 6.0), items(&[(-1.0, 1.0, 1.0)])).is_err());

        let dup = vec![Item::new(3, 1.0, 1.0, 1.0), Item::new(3, 2.0, 2.0, 2.0)];
        assert!(matches!(
            Solution::try_new((10.0, 8.0, 6.0), dup),
            Err(Error::DuplicateItem(3))
        ));
    }

    #[test]
    fn test_bin_ids_monotonic() {
        let mut s = Solution::new((10.0, 8.0, 6.0), vec![]);
        assert_eq!(s.add_bin(), 0);
        assert_eq!(s.add_bin(), 1);
        assert_eq!(s.add_bin(), 2);
        assert!(s.get_bin_by_id(2).is_some());
        assert!(s.get_bin_by_id(3).is_none());
        assert!(s.get_item_by_id(0).is_none());
    }

    #[test]
    fn test_fitness_terms() {
        let s = two_bin_solution();
        // Bin 0: 240/480 = 50%, bin 1: 240/480 = 50%; one item unassigned.
        assert_relative_eq!(s.average_utilization(), 50.0);
        let expected = 2.0 * 1000.0 + 50.0 * 10.0 + 10000.0;
        assert_relative_eq!(s.calculate_fitness(), expected);
        assert_relative_eq!(s.fitness(), expected);
    }

    #[test]
    fn test_fitness_cache_invalidated() {
        let mut s = two_bin_solution();
        let before = s.fitness();
        let bin = s.add_bin();
        s.assign(2, bin, Vector3::zeros(), 0).unwrap();
        assert!(s.fitness() < before);
        assert_relative_eq!(s.fitness(), s.calculate_fitness());
    }

    #[test]
    fn test_balance_penalty() {
        let mut s = Solution::new(
            (10.0, 8.0, 6.0),
            items(&[(10.0, 8.0, 6.0), (5.0, 8.0, 6.0)]),
        );
        let a = s.add_bin();
        let b = s.add_bin();
        s.assign(0, a, Vector3::zeros(), 0).unwrap();
        s.assign(1, b, Vector3::zeros(), 0).unwrap();
        let plain = s.fitness();

        let balanced = s.with_weights(FitnessWeights::new().with_balance_penalty(true));
        // Utilizations 100 and 50: population stddev 25.
        assert_relative_eq!(balanced.utilization_std_dev(), 25.0);
        assert_relative_eq!(balanced.fitness(), plain + 25.0 * 50.0);
    }

    #[test]
    fn test_infeasible_bin_penalised() {
        let mut s = Solution::new(
            (10.0, 8.0, 6.0),
            items(&[(5.0, 5.0, 5.0), (5.0, 5.0, 5.0)]),
        );
        let bin = s.add_bin();
        s.assign(0, bin, Vector3::zeros(), 0).unwrap();
        s.assign(1, bin, Vector3::new(1.0, 1.0, 1.0), 0).unwrap();
        assert_eq!(s.infeasible_bins_count(), 1);
        assert!(!s.is_valid());
        assert_eq!(s.constraint_violations().overlapping_bins, 1);
        assert!(s.fitness() >= 5000.0);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = two_bin_solution();
        let fitness = original.fitness();
        let mut copy = original.copy();
        assert_relative_eq!(copy.fitness(), fitness);

        assert!(copy.unassign(0));
        assert_eq!(copy.used_bins_count(), 1);
        assert_eq!(original.used_bins_count(), 2);
        assert!(original.get_item_by_id(0).unwrap().is_assigned());
        assert_relative_eq!(original.fitness(), fitness);
    }

    #[test]
    fn test_assignment_consistency() {
        let mut s = two_bin_solution();
        assert!(s.is_consistent());
        // Reassigning detaches from the previous bin.
        s.assign(0, 1, Vector3::new(5.0, 0.0, 0.0), 0).unwrap();
        assert!(s.is_consistent());
        assert!(s.get_bin_by_id(0).unwrap().is_empty());
        assert_eq!(s.get_bin_by_id(1).unwrap().len(), 2);

        assert_eq!(s.clear_bin(1), Some(2));
        assert!(s.is_consistent());
        assert_eq!(s.unassigned_count(), 3);
        assert_eq!(s.clear_bin(9), None);
        assert!(!s.unassign(0));
    }

    #[test]
    fn test_assign_rejects_bad_input() {
        let mut s = two_bin_solution();
        assert!(matches!(
            s.assign(2, 0, Vector3::zeros(), 6),
            Err(Error::InvalidRotation(6))
        ));
        assert!(s.assign(42, 0, Vector3::zeros(), 0).is_err());
        assert!(s.assign(2, 42, Vector3::zeros(), 0).is_err());
    }

    #[test]
    fn test_compact_bins() {
        let mut s = two_bin_solution();
        s.add_bin();
        s.add_bin();
        assert_eq!(s.total_bins_count(), 4);
        assert_eq!(s.compact_bins(), 2);
        assert_eq!(s.total_bins_count(), 2);
        assert_eq!(s.add_bin(), 2);
    }

    #[test]
    fn test_statistics_and_placements() {
        let s = two_bin_solution();
        let stats = s.get_statistics();
        assert_eq!(stats.total_bins, 2);
        assert_eq!(stats.used_bins, 2);
        assert_eq!(stats.unpacked_items, 1);
        assert_eq!(stats.total_items, 3);
        assert!(!stats.is_valid);

        let placements = s.placements();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[1].bin_id, 1);
        assert_eq!(placements[1].extents, [5.0, 8.0, 6.0]);
    }

    #[test]
    fn test_placement_stats() {
        let mut s = two_bin_solution();
        s.assign(2, 1, Vector3::new(5.0, 0.0, 0.0), 3).unwrap();
        let stats = s.placement_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.rotated_count, 1);
        assert_eq!(stats.rotation_distribution.get(&3), Some(&1));
        assert_eq!(stats.bin_distribution.get(&1), Some(&2));
    }

    #[test]
    fn test_duplicate_ids_never_valid() {
        let mut s = Solution::new(
            (10.0, 8.0, 6.0),
            vec![Item::new(7, 2.0, 2.0, 2.0), Item::new(7, 3.0, 3.0, 3.0)],
        );
        let bin = s.add_bin();
        assert!(s.place_in(0, 0));
        assert!(s.place_in(0, 1));
        assert_eq!(s.bins()[0].id(), bin);
        assert_eq!(s.unassigned_count(), 0);
        assert!(s.is_consistent());
        assert!(!s.has_unique_ids());
        assert!(!s.is_valid());
    }

    #[test]
    fn test_theoretical_min_bins() {
        let s = Solution::new(
            (10.0, 8.0, 6.0),
            items(&[(8.0, 6.0, 4.0), (7.0, 5.0, 4.0), (6.0, 5.0, 3.0), (5.0, 4.0, 3.0)]),
        );
        // 192 + 140 + 90 + 60 = 482 > 480
        assert_eq!(s.theoretical_min_bins(), 2);
    }
}
