//! First Fit Decreasing construction.

use crate::geometry::Item;
use crate::solution::Solution;

/// Packs `items` into as many bins as needed, largest volume first.
///
/// Each item goes into the first existing bin (in creation order) with a
/// valid corner-point position; otherwise a new bin is opened for it. An item
/// that does not fit even the new empty bin is left unassigned and the bin
/// stays open for later items.
pub fn first_fit_decreasing(bin_dimensions: (f64, f64, f64), items: Vec<Item>) -> Solution {
    let mut solution = Solution::new(bin_dimensions, items);
    pack_unassigned(&mut solution);
    solution
}

/// Runs First Fit Decreasing over the unassigned items of `solution`.
///
/// Returns the number of items that stayed unassigned.
pub fn pack_unassigned(solution: &mut Solution) -> usize {
    let mut order: Vec<usize> = (0..solution.all_items().len())
        .filter(|&i| !solution.item_at(i).is_assigned())
        .collect();
    order.sort_by(|&a, &b| {
        solution
            .item_at(b)
            .volume()
            .total_cmp(&solution.item_at(a).volume())
    });

    let mut failed = 0;
    for index in order {
        let placed = (0..solution.bins().len()).any(|bin| solution.place_in(bin, index));
        if placed {
            continue;
        }

        let bin_id = solution.add_bin();
        let bin = solution.bins().len() - 1;
        if !solution.place_in(bin, index) {
            let item = solution.item_at(index);
            log::warn!(
                "Item {} ({}x{}x{}) does not fit in new bin {}",
                item.id(),
                item.length(),
                item.width(),
                item.height(),
                bin_id
            );
            failed += 1;
        }
    }

    log::debug!(
        "FFD: {} items in {} bins, {} unassigned",
        solution.all_items().len() - solution.unassigned_count(),
        solution.used_bins_count(),
        failed
    );
    failed
}
