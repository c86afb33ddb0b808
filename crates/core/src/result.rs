//! Solution statistics consumed by reporting code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary of a packing, the data surface handed to presentation code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistics {
    /// Bins created, including empty ones.
    pub total_bins: usize,
    /// Bins holding at least one item.
    pub used_bins: usize,
    /// Mean volume utilization over used bins, in percent (0-100).
    pub avg_utilization: f64,
    /// Items not assigned to any bin.
    pub unpacked_items: usize,
    /// Items in the catalogue.
    pub total_items: usize,
    /// Fitness value (lower is better).
    pub fitness: f64,
    /// Whether every item is packed and every bin is feasible.
    pub is_valid: bool,
}

impl Statistics {
    /// Returns true if every item was packed.
    pub fn all_packed(&self) -> bool {
        self.unpacked_items == 0
    }

    /// Number of packed items.
    pub fn packed_items(&self) -> usize {
        self.total_items - self.unpacked_items
    }

    /// Returns utilization as a percentage string.
    pub fn utilization_percent(&self) -> String {
        format!("{:.1}%", self.avg_utilization)
    }
}

/// Constraint violation counts for a packing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintViolations {
    /// Items not assigned to any bin.
    pub unpacked_items: usize,
    /// Bins containing at least one overlapping pair.
    pub overlapping_bins: usize,
    /// Items extending beyond their bin.
    pub out_of_bounds: usize,
}

impl ConstraintViolations {
    /// Sum of all violation counts.
    pub fn total(&self) -> usize {
        self.unpacked_items + self.overlapping_bins + self.out_of_bounds
    }

    /// Returns true if nothing is violated.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_helpers() {
        let stats = Statistics {
            total_bins: 3,
            used_bins: 2,
            avg_utilization: 62.71,
            unpacked_items: 1,
            total_items: 8,
            fitness: 12373.0,
            is_valid: false,
        };
        assert!(!stats.all_packed());
        assert_eq!(stats.packed_items(), 7);
        assert_eq!(stats.utilization_percent(), "62.7%");
    }

    #[test]
    fn test_violation_totals() {
        let v = ConstraintViolations {
            unpacked_items: 2,
            overlapping_bins: 1,
            out_of_bounds: 0,
        };
        assert_eq!(v.total(), 3);
        assert!(!v.is_empty());
        assert!(ConstraintViolations::default().is_empty());
    }
}
