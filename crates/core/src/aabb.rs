//! Axis-aligned bounding boxes.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB3D {
    /// Minimum corner.
    pub min: Vector3<f64>,
    /// Maximum corner.
    pub max: Vector3<f64>,
}

impl AABB3D {
    /// Creates a new AABB from min/max corners.
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from a minimum corner and extents.
    pub fn from_origin(origin: Vector3<f64>, extents: Vector3<f64>) -> Self {
        Self {
            min: origin,
            max: origin + extents,
        }
    }

    /// Returns the width (x dimension) of the AABB.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the depth (y dimension) of the AABB.
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the height (z dimension) of the AABB.
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Returns the volume of the AABB.
    pub fn volume(&self) -> f64 {
        self.width() * self.depth() * self.height()
    }

    /// Strict intersection test: the boxes share interior volume.
    ///
    /// Boxes that only touch on a face, edge or corner do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns true if this box lies inside `[0, extents]` on every axis.
    pub fn within(&self, extents: &Vector3<f64>) -> bool {
        self.min.x >= 0.0
            && self.min.y >= 0.0
            && self.min.z >= 0.0
            && self.max.x <= extents.x
            && self.max.y <= extents.y
            && self.max.z <= extents.z
    }

    /// The eight corners, minimum corner first.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn aabb(min: [f64; 3], max: [f64; 3]) -> AABB3D {
        AABB3D::new(Vector3::from(min), Vector3::from(max))
    }

    #[test]
    fn test_aabb3d_volume() {
        let b = aabb([0.0, 0.0, 0.0], [10.0, 20.0, 30.0]);
        assert_relative_eq!(b.volume(), 6000.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = aabb([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        let b = aabb([5.0, 5.0, 5.0], [15.0, 15.0, 15.0]);
        let touching = aabb([10.0, 0.0, 0.0], [20.0, 10.0, 10.0]);
        let edge = aabb([10.0, 10.0, 0.0], [20.0, 20.0, 10.0]);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
        assert!(!a.overlaps(&edge));
    }

    #[test]
    fn test_overlap_requires_all_axes() {
        let a = aabb([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        // Overlaps on x and y, separated on z.
        let above = aabb([2.0, 2.0, 11.0], [8.0, 8.0, 15.0]);
        assert!(!a.overlaps(&above));
    }

    #[test]
    fn test_within() {
        let extents = Vector3::new(10.0, 8.0, 6.0);
        assert!(aabb([0.0, 0.0, 0.0], [10.0, 8.0, 6.0]).within(&extents));
        assert!(!aabb([1.0, 0.0, 0.0], [11.0, 8.0, 6.0]).within(&extents));
        assert!(!aabb([-1.0, 0.0, 0.0], [4.0, 4.0, 4.0]).within(&extents));
    }

    #[test]
    fn test_corners() {
        let b = aabb([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        let corners = b.corners();
        assert_eq!(corners[0], Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(corners[7], Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(corners.len(), 8);
    }
}
