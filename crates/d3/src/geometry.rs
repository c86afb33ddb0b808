//! 3D item geometry: rotations, bounds and overlap.

use nalgebra::Vector3;
use u_packing_core::{BinId, Error, ItemId, Result, AABB3D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis permutations for the six orientations of a box.
/// Each entry is (x_axis, y_axis, z_axis) indices into (length, width, height).
const ORIENTATIONS: [(usize, usize, usize); 6] = [
    (0, 1, 2), // Original
    (0, 2, 1), // Rotated 90° around X
    (1, 0, 2), // Rotated 90° around Z
    (1, 2, 0), // Rotated 90° around X then Z
    (2, 0, 1), // Rotated 90° around Y
    (2, 1, 0), // Rotated 90° around Y then X
];

/// One of the six axis-aligned orientations of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rotation(usize);

impl Rotation {
    /// All orientations in index order.
    pub const ALL: [Rotation; 6] = [
        Rotation(0),
        Rotation(1),
        Rotation(2),
        Rotation(3),
        Rotation(4),
        Rotation(5),
    ];

    /// The identity orientation.
    pub const IDENTITY: Rotation = Rotation(0);

    /// Creates a rotation from its index, failing outside `0..=5`.
    pub fn new(index: usize) -> Result<Self> {
        if index < ORIENTATIONS.len() {
            Ok(Self(index))
        } else {
            Err(Error::InvalidRotation(index))
        }
    }

    /// Returns the rotation index.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Applies this permutation to `(length, width, height)`.
    pub fn apply(&self, dimensions: &Vector3<f64>) -> Vector3<f64> {
        let (x, y, z) = ORIENTATIONS[self.0];
        Vector3::new(dimensions[x], dimensions[y], dimensions[z])
    }
}

impl TryFrom<usize> for Rotation {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Rotation::new(index)
    }
}

/// Input description of an item, as supplied by callers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemSpec {
    /// Unique identifier.
    pub id: ItemId,
    /// Extent along x in the identity orientation.
    pub length: f64,
    /// Extent along y in the identity orientation.
    pub width: f64,
    /// Extent along z in the identity orientation.
    pub height: f64,
}

impl ItemSpec {
    /// Creates a new item description.
    pub fn new(id: ItemId, length: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            length,
            width,
            height,
        }
    }
}

impl From<&ItemSpec> for Item {
    fn from(spec: &ItemSpec) -> Self {
        Item::new(spec.id, spec.length, spec.width, spec.height)
    }
}

/// A rotatable box to be packed.
///
/// `position` and `assigned_bin` are set and cleared together: an item is
/// either placed in a bin at a position, or neither.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Unique identifier.
    id: ItemId,

    /// Intrinsic dimensions (length, width, height).
    dimensions: Vector3<f64>,

    /// Current orientation.
    rotation: Rotation,

    /// Minimum corner when placed.
    position: Option<Vector3<f64>>,

    /// Bin holding this item.
    assigned_bin: Option<BinId>,
}

impl Item {
    /// Creates a new unplaced item with the given ID and dimensions.
    pub fn new(id: ItemId, length: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            dimensions: Vector3::new(length, width, height),
            rotation: Rotation::IDENTITY,
            position: None,
            assigned_bin: None,
        }
    }

    /// Returns the item ID.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the intrinsic dimensions (length, width, height).
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

    /// Volume; independent of rotation.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the current rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Sets the rotation by index.
    ///
    /// Only unplaced items may be re-oriented; for a placed item this would
    /// silently change its footprint inside the bin.
    pub fn set_rotation(&mut self, index: usize) -> Result<()> {
        let rotation = Rotation::new(index)?;
        if self.is_placed() && rotation != self.rotation {
            return Err(Error::InvalidGeometry(format!(
                "cannot rotate item {} while it is placed",
                self.id
            )));
        }
        self.rotation = rotation;
        Ok(())
    }

    /// Effective extents for a rotation index.
    pub fn effective_extents(&self, index: usize) -> Result<Vector3<f64>> {
        Ok(Rotation::new(index)?.apply(&self.dimensions))
    }

    /// Effective extents for a rotation.
    pub fn extents_for(&self, rotation: Rotation) -> Vector3<f64> {
        rotation.apply(&self.dimensions)
    }

    /// Effective extents in the current rotation.
    pub fn extents(&self) -> Vector3<f64> {
        self.extents_for(self.rotation)
    }

    /// Returns the position (minimum corner), if placed.
    pub fn position(&self) -> Option<&Vector3<f64>> {
        self.position.as_ref()
    }

    /// Returns the bin holding this item, if any.
    pub fn assigned_bin(&self) -> Option<BinId> {
        self.assigned_bin
    }

    /// Returns true if the item has a position in some bin.
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Returns true if the item belongs to a bin.
    pub fn is_assigned(&self) -> bool {
        self.assigned_bin.is_some()
    }

    /// Bounding box of the placed item.
    pub fn bounds(&self) -> Option<AABB3D> {
        self.position
            .map(|p| AABB3D::from_origin(p, self.extents()))
    }

    /// Strict overlap with another placed item. Unplaced items overlap nothing.
    pub fn overlaps(&self, other: &Item) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }

    /// Returns true if the placed item lies inside `[0, bin_extents]`.
    pub fn within(&self, bin_extents: &Vector3<f64>) -> bool {
        self.bounds()
            .map(|b| b.within(bin_extents))
            .unwrap_or(false)
    }

    /// Returns true if some rotation fits inside the given extents.
    pub fn fits_in(&self, bin_extents: &Vector3<f64>) -> bool {
        Rotation::ALL.iter().any(|r| {
            let e = self.extents_for(*r);
            e.x <= bin_extents.x && e.y <= bin_extents.y && e.z <= bin_extents.z
        })
    }

    /// Validates the item dimensions.
    pub fn validate(&self) -> Result<()> {
        if self
            .dimensions
            .iter()
            .any(|d| !d.is_finite() || *d <= 0.0)
        {
            return Err(Error::InvalidGeometry(format!(
                "All dimensions for item {} must be positive",
                self.id
            )));
        }
        Ok(())
    }

    /// Places the item in `bin` at `position` with `rotation`.
    pub(crate) fn place(&mut self, bin: BinId, position: Vector3<f64>, rotation: Rotation) {
        self.rotation = rotation;
        self.position = Some(position);
        self.assigned_bin = Some(bin);
    }

    /// Detaches the item from its bin and clears position and rotation.
    pub(crate) fn reset(&mut self) {
        self.position = None;
        self.assigned_bin = None;
        self.rotation = Rotation::IDENTITY;
    }
}
