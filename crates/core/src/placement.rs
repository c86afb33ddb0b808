//! Placement records for positioned items.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of an item.
pub type ItemId = usize;

/// Identifier of a bin.
pub type BinId = usize;

/// Where one item sits: bin, minimum corner and rotation index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed item.
    pub item_id: ItemId,

    /// The bin the item is assigned to.
    pub bin_id: BinId,

    /// Minimum corner (x, y, z).
    pub position: [f64; 3],

    /// Effective extents after rotation (x, y, z).
    pub extents: [f64; 3],

    /// The rotation index used (0-5).
    pub rotation_index: usize,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        item_id: ItemId,
        bin_id: BinId,
        position: [f64; 3],
        extents: [f64; 3],
        rotation_index: usize,
    ) -> Self {
        Self {
            item_id,
            bin_id,
            position,
            extents,
            rotation_index,
        }
    }

    /// Returns the x coordinate.
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    /// Returns the y coordinate.
    pub fn y(&self) -> f64 {
        self.position[1]
    }

    /// Returns the z coordinate.
    pub fn z(&self) -> f64 {
        self.position[2]
    }

    /// Returns true if the item is in a non-identity orientation.
    pub fn is_rotated(&self) -> bool {
        self.rotation_index != 0
    }
}

/// Placement statistics for a set of placements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStats {
    /// Total number of placements.
    pub count: usize,
    /// Number of placements in a non-identity orientation.
    pub rotated_count: usize,
    /// Distribution of rotation indices used.
    pub rotation_distribution: HashMap<usize, usize>,
    /// Distribution of placements per bin.
    pub bin_distribution: HashMap<BinId, usize>,
}

impl PlacementStats {
    /// Computes statistics from a set of placements.
    pub fn from_placements(placements: &[Placement]) -> Self {
        let mut stats = Self {
            count: placements.len(),
            ..Default::default()
        };

        for p in placements {
            if p.is_rotated() {
                stats.rotated_count += 1;
            }
            *stats
                .rotation_distribution
                .entry(p.rotation_index)
                .or_insert(0) += 1;
            *stats.bin_distribution.entry(p.bin_id).or_insert(0) += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_accessors() {
        let p = Placement::new(3, 1, [1.0, 2.0, 3.0], [4.0, 5.0, 6.0], 2);
        assert_eq!(p.x(), 1.0);
        assert_eq!(p.y(), 2.0);
        assert_eq!(p.z(), 3.0);
        assert!(p.is_rotated());
    }

    #[test]
    fn test_placement_stats() {
        let placements = vec![
            Placement::new(1, 0, [0.0; 3], [1.0; 3], 0),
            Placement::new(2, 0, [1.0, 0.0, 0.0], [1.0; 3], 3),
            Placement::new(3, 1, [0.0; 3], [1.0; 3], 3),
        ];

        let stats = PlacementStats::from_placements(&placements);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.rotated_count, 2);
        assert_eq!(stats.rotation_distribution.get(&3), Some(&2));
        assert_eq!(stats.bin_distribution.get(&0), Some(&2));
        assert_eq!(stats.bin_distribution.get(&1), Some(&1));
    }
}
