//! Corner-point placement for 3D bin packing.
//!
//! Candidate positions are the bin origin plus the corners of every item
//! already placed in the bin. A candidate is tried in bottom-left-back order
//! (lowest z, then x, then y) and accepted if the rotated item stays inside
//! the bin and overlaps nothing already placed.
//!
//! The candidate set is a necessary-condition approximation: some feasible
//! positions (for example a gap between two items that no single corner
//! touches) are never generated, so an item that would geometrically fit can
//! still be reported as unplaceable.

use crate::boundary::Bin;
use crate::geometry::{Item, Rotation};
use nalgebra::Vector3;
use std::cmp::Ordering;
use u_packing_core::AABB3D;

/// A position and rotation at which an item can be placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCandidate {
    /// Minimum corner.
    pub position: Vector3<f64>,
    /// Rotation producing the extents that fit there.
    pub rotation: Rotation,
}

/// Result of packing a batch of items into one bin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackOutcome {
    /// Arena indices placed, in packing order.
    pub packed: Vec<usize>,
    /// Arena indices that found no position; they are left unassigned.
    pub unpacked: Vec<usize>,
}

impl PackOutcome {
    /// Returns true if every item was placed.
    pub fn all_packed(&self) -> bool {
        self.unpacked.is_empty()
    }
}

/// Bottom-left-back ordering: z first, then x, then y.
fn blb_order(a: &Vector3<f64>, b: &Vector3<f64>) -> Ordering {
    a.z.total_cmp(&b.z)
        .then(a.x.total_cmp(&b.x))
        .then(a.y.total_cmp(&b.y))
}

/// Raw corner points of the placed boxes: the origin plus seven corners per
/// box, sorted and deduplicated.
fn raw_corner_points(placed: &[AABB3D]) -> Vec<Vector3<f64>> {
    let mut points = Vec::with_capacity(1 + placed.len() * 7);
    points.push(Vector3::zeros());
    for bounds in placed {
        // Skip the minimum corner; it is occupied by the box itself.
        points.extend_from_slice(&bounds.corners()[1..]);
    }
    points.sort_by(blb_order);
    points.dedup();
    points
}

/// Corner points of `bin` where a box with `extents` would stay inside the
/// bin, in bottom-left-back order.
pub fn corner_points(bin: &Bin, arena: &[Item], extents: &Vector3<f64>) -> Vec<Vector3<f64>> {
    let placed = placed_bounds(bin, arena);
    fitting_points(&raw_corner_points(&placed), bin.dimensions(), extents).collect()
}

fn placed_bounds(bin: &Bin, arena: &[Item]) -> Vec<AABB3D> {
    bin.item_indices()
        .iter()
        .filter_map(|&i| arena[i].bounds())
        .collect()
}

fn fitting_points<'a>(
    points: &'a [Vector3<f64>],
    bin: &'a Vector3<f64>,
    extents: &'a Vector3<f64>,
) -> impl Iterator<Item = Vector3<f64>> + 'a {
    points.iter().copied().filter(move |p| {
        p.x + extents.x <= bin.x && p.y + extents.y <= bin.y && p.z + extents.z <= bin.z
    })
}

/// First valid corner point for `extents`, or `None`.
fn first_valid(
    points: &[Vector3<f64>],
    placed: &[AABB3D],
    bin: &Vector3<f64>,
    extents: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    fitting_points(points, bin, extents).find(|p| {
        let candidate = AABB3D::from_origin(*p, *extents);
        candidate.within(bin) && !placed.iter().any(|other| candidate.overlaps(other))
    })
}

/// Finds a position for `item` in one rotation.
pub fn find_position_with_rotation(
    bin: &Bin,
    arena: &[Item],
    item: &Item,
    rotation: Rotation,
) -> Option<Vector3<f64>> {
    let placed = placed_bounds(bin, arena);
    let points = raw_corner_points(&placed);
    first_valid(&points, &placed, bin.dimensions(), &item.extents_for(rotation))
}

/// Finds the lowest placement for `item` over all six rotations.
///
/// Within a rotation the first valid corner point in bottom-left-back order
/// wins. Across rotations a strictly lower z replaces the incumbent, so on
/// equal z the earlier rotation is kept.
pub fn find_position(bin: &Bin, arena: &[Item], item: &Item) -> Option<PlacementCandidate> {
    let placed = placed_bounds(bin, arena);
    let points = raw_corner_points(&placed);

    let mut best: Option<PlacementCandidate> = None;
    for rotation in Rotation::ALL {
        let extents = item.extents_for(rotation);
        if let Some(position) = first_valid(&points, &placed, bin.dimensions(), &extents) {
            let better = best.map_or(true, |b| position.z < b.position.z);
            if better {
                best = Some(PlacementCandidate { position, rotation });
            }
        }
    }
    best
}

/// Packs the arena items at `candidates` into `bin`.
///
/// Candidates must be unassigned. With `sort_by_volume` they are tried
/// largest-first (stable, so equal volumes keep their given order). Each
/// success is committed before the next item is tried; failures are left
/// unassigned and reported in `unpacked`.
pub fn pack_items_in_bin(
    bin: &mut Bin,
    arena: &mut [Item],
    candidates: &[usize],
    sort_by_volume: bool,
) -> PackOutcome {
    let mut order = candidates.to_vec();
    if sort_by_volume {
        order.sort_by(|&a, &b| arena[b].volume().total_cmp(&arena[a].volume()));
    }

    let mut outcome = PackOutcome::default();
    for index in order {
        debug_assert!(
            !arena[index].is_assigned(),
            "item {} is still assigned",
            arena[index].id()
        );
        match find_position(bin, arena, &arena[index]) {
            Some(candidate) => {
                arena[index].place(bin.id(), candidate.position, candidate.rotation);
                bin.push(index, arena[index].volume());
                outcome.packed.push(index);
            }
            None => {
                arena[index].reset();
                outcome.unpacked.push(index);
            }
        }
    }
    outcome
}

/// Empties `bin` and returns its items to the unassigned state.
pub fn clear_bin(bin: &mut Bin, arena: &mut [Item]) -> Vec<usize> {
    let indices = bin.take_items();
    for &i in &indices {
        arena[i].reset();
    }
    indices
}

/// Clears `bin` and packs its own items again, largest-first.
pub fn repack_bin(bin: &mut Bin, arena: &mut [Item]) -> PackOutcome {
    let indices = clear_bin(bin, arena);
    pack_items_in_bin(bin, arena, &indices, true)
}
