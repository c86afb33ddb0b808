//! 3D bins (containers).

use crate::geometry::Item;
use nalgebra::Vector3;
use u_packing_core::{BinId, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Input description of the bin type shared by every bin of a solution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinSpec {
    /// Extent along x.
    pub length: f64,
    /// Extent along y.
    pub width: f64,
    /// Extent along z.
    pub height: f64,
}

impl BinSpec {
    /// Creates a new bin description.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Dimensions as a vector.
    pub fn dimensions(&self) -> Vector3<f64> {
        Vector3::new(self.length, self.width, self.height)
    }

    /// Validates the dimensions.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(&self.dimensions())
    }
}

fn validate_dimensions(dimensions: &Vector3<f64>) -> Result<()> {
    if dimensions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
        return Err(Error::InvalidBoundary(
            "All dimensions must be positive".into(),
        ));
    }
    Ok(())
}

/// A container holding placed items.
///
/// A bin stores indices into the item arena owned by its solution. The
/// items themselves carry position and rotation; the bin tracks membership
/// and the running used volume.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bin {
    /// Bin ID, unique within a solution.
    id: BinId,

    /// Dimensions (length, width, height).
    dimensions: Vector3<f64>,

    /// Arena indices of contained items, in insertion order.
    items: Vec<usize>,

    /// Sum of contained item volumes.
    used_volume: f64,
}

impl Bin {
    /// Creates a new empty bin.
    pub fn new(id: BinId, length: f64, width: f64, height: f64) -> Self {
        Self::with_dimensions(id, Vector3::new(length, width, height))
    }

    pub(crate) fn with_dimensions(id: BinId, dimensions: Vector3<f64>) -> Self {
        Self {
            id,
            dimensions,
            items: Vec::new(),
            used_volume: 0.0,
        }
    }

    /// Returns the bin ID.
    pub fn id(&self) -> BinId {
        self.id
    }

    /// Returns the dimensions (length, width, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the length.
    pub fn length(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the bin volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Arena indices of the contained items.
    pub fn item_indices(&self) -> &[usize] {
        &self.items
    }

    /// Number of contained items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the bin holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if the bin holds the item at `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.items.contains(&index)
    }

    /// Sum of contained item volumes.
    pub fn used_volume(&self) -> f64 {
        self.used_volume
    }

    /// Volume not occupied by items.
    pub fn remaining_volume(&self) -> f64 {
        self.volume() - self.used_volume
    }

    /// Volume utilization in percent (0-100).
    pub fn utilization(&self) -> f64 {
        self.used_volume / self.volume() * 100.0
    }

    /// Returns true if any two contained items overlap.
    pub fn has_overlaps(&self, arena: &[Item]) -> bool {
        self.items.iter().enumerate().any(|(i, &a)| {
            self.items[i + 1..]
                .iter()
                .any(|&b| arena[a].overlaps(&arena[b]))
        })
    }

    /// Number of contained items extending beyond the bin.
    pub fn out_of_bounds_count(&self, arena: &[Item]) -> usize {
        self.items
            .iter()
            .filter(|&&i| !arena[i].within(&self.dimensions))
            .count()
    }

    /// No overlapping pair and every item inside the bin.
    pub fn is_feasible(&self, arena: &[Item]) -> bool {
        self.out_of_bounds_count(arena) == 0 && !self.has_overlaps(arena)
    }

    /// Returns true if `item` fits the empty bin in some rotation and its
    /// volume does not exceed the remaining volume.
    pub fn can_fit_item(&self, item: &Item) -> bool {
        item.fits_in(&self.dimensions) && item.volume() <= self.remaining_volume()
    }

    /// Validates the bin dimensions.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(&self.dimensions)
    }

    /// Records an item as contained. The caller has already placed it.
    pub(crate) fn push(&mut self, index: usize, volume: f64) {
        self.items.push(index);
        self.used_volume += volume;
    }

    /// Forgets a contained item. Returns false if it was not here.
    pub(crate) fn remove(&mut self, index: usize, volume: f64) -> bool {
        match self.items.iter().position(|&i| i == index) {
            Some(pos) => {
                self.items.remove(pos);
                self.used_volume = if self.items.is_empty() {
                    0.0
                } else {
                    (self.used_volume - volume).max(0.0)
                };
                true
            }
            None => false,
        }
    }

    /// Recomputes the used volume from the member items, dropping any
    /// rounding error accumulated by `push`/`remove`.
    pub(crate) fn refresh_used_volume(&mut self, arena: &[Item]) {
        self.used_volume = self.items.iter().map(|&i| arena[i].volume()).sum();
    }

    /// Empties the bin, returning the indices it held.
    pub(crate) fn take_items(&mut self) -> Vec<usize> {
        self.used_volume = 0.0;
        std::mem::take(&mut self.items)
    }
}
