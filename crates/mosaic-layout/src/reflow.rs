#![forbid(unsafe_code)]

//! Incremental reflow after a single item changes height.
//!
//! Instead of re-running the whole layout, items below the changed one are
//! shifted vertically by the height delta, but only where the change can
//! actually reach them: the shift propagates through a running horizontal
//! region that starts at the changed item and widens as shifted items are
//! absorbed. Items in unrelated columns keep their positions.

use mosaic_core::{ItemKey, MeasurementStore, Position, PositionStore, intervals_overlap};

/// A horizontal band carrying a vertical shift.
#[derive(Debug, Clone, Copy)]
struct DeltaRegion {
    left: f64,
    right: f64,
    delta: f64,
}

/// Shift items below `changed` to absorb its new height.
///
/// Returns `false` without touching anything when the change is a no-op:
/// the item has no cached position, the new height is zero (still
/// unmeasured), or the height only changed by a sub-pixel amount.
///
/// On success the measurement and position caches are updated in place and
/// the caller should re-render from the position cache.
pub(crate) fn reflow_after_height_change<K: ItemKey>(
    items: &[K],
    changed: &K,
    new_height: f64,
    positions: &mut PositionStore<K>,
    measurements: &mut MeasurementStore<K>,
    gutter: f64,
) -> bool {
    let Some(original) = positions.get(changed) else {
        return false;
    };
    if new_height == 0.0 || original.height.floor() == new_height.floor() {
        return false;
    }

    // Pre-shift tops, so "was above the candidate" still means what it did
    // before anything moved.
    let mut snapshot: PositionStore<K> = PositionStore::new();
    for item in items {
        if let Some(position) = positions.get(item) {
            snapshot.set(item.clone(), position);
        }
    }

    // Anything wider than a single column needs cascade handling below. The
    // narrowest of the first few items stands in for the column width.
    let min_column_width = items
        .iter()
        .take(10)
        .filter_map(|item| positions.get(item).map(|p| p.width))
        .fold(f64::INFINITY, f64::min);

    let mut regions = vec![DeltaRegion {
        left: original.left,
        right: original.right(),
        delta: new_height - original.height,
    }];

    let mut below: Vec<(K, Position)> = items
        .iter()
        .filter_map(|item| {
            let position = positions.get(item)?;
            (position.top >= original.bottom()).then(|| (item.clone(), position))
        })
        .collect();
    below.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));

    measurements.set(changed.clone(), new_height);
    positions.set(
        changed.clone(),
        Position::new(original.top, original.left, original.width, new_height),
    );

    let mut running_left = original.left;
    let mut running_right = original.right();
    let mut shifted = 0usize;
    for (item, candidate) in below {
        if !intervals_overlap(running_left, running_right, candidate.left, candidate.right()) {
            continue;
        }

        if candidate.width > min_column_width {
            // A spanning item sits on a shelf. Its new top is dictated by
            // the lowest bottom edge among the items that were above it,
            // at their already-shifted positions.
            let mut lowest_bottom: Option<f64> = None;
            for other in items {
                let Some(was) = snapshot.get(other) else {
                    continue;
                };
                let Some(now) = positions.get(other) else {
                    continue;
                };
                if was.top < candidate.top && now.h_overlaps(&candidate) {
                    let bottom = now.bottom();
                    if lowest_bottom.is_none_or(|lowest| bottom > lowest) {
                        lowest_bottom = Some(bottom);
                    }
                }
            }
            if let Some(bottom) = lowest_bottom {
                regions.push(DeltaRegion {
                    left: candidate.left,
                    right: candidate.right(),
                    delta: bottom - candidate.top + gutter,
                });
            }
        }

        // Newest matching region wins; spanning items refine the delta for
        // everything beneath them.
        let delta = regions
            .iter()
            .rev()
            .find(|region| {
                intervals_overlap(region.left, region.right, candidate.left, candidate.right())
            })
            .map_or(0.0, |region| region.delta);
        positions.set(
            item,
            Position::new(
                candidate.top + delta,
                candidate.left,
                candidate.width,
                candidate.height,
            ),
        );
        shifted += 1;

        running_left = running_left.min(candidate.left);
        running_right = running_right.max(candidate.right());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        delta = new_height - original.height,
        shifted,
        "reflowed items below height change"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = shifted;

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column_stack() -> (Vec<u32>, PositionStore<u32>, MeasurementStore<u32>) {
        // Column 0: A(0..100), B(110..160), C(170..200). Column 1: D(0..80).
        let items = vec![0u32, 1, 2, 3];
        let mut positions = PositionStore::new();
        positions.set(0u32, Position::new(0.0, 0.0, 200.0, 100.0));
        positions.set(1u32, Position::new(110.0, 0.0, 200.0, 50.0));
        positions.set(2u32, Position::new(170.0, 0.0, 200.0, 30.0));
        positions.set(3u32, Position::new(0.0, 210.0, 200.0, 80.0));
        let mut measurements = MeasurementStore::new();
        measurements.set(0u32, 100.0);
        measurements.set(1u32, 50.0);
        measurements.set(2u32, 30.0);
        measurements.set(3u32, 80.0);
        (items, positions, measurements)
    }

    #[test]
    fn shifts_only_the_affected_column() {
        let (items, mut positions, mut measurements) = single_column_stack();
        let changed = reflow_after_height_change(
            &items,
            &0u32,
            150.0,
            &mut positions,
            &mut measurements,
            10.0,
        );

        assert!(changed);
        assert_eq!(measurements.get(&0), Some(150.0));
        assert_eq!(positions.get(&0).map(|p| p.height), Some(150.0));
        // Items in the same column move by the 50px delta.
        assert_eq!(positions.get(&1).map(|p| p.top), Some(160.0));
        assert_eq!(positions.get(&2).map(|p| p.top), Some(220.0));
        // The other column is untouched.
        assert_eq!(positions.get(&3).map(|p| p.top), Some(0.0));
    }

    #[test]
    fn shrinking_pulls_items_up() {
        let (items, mut positions, mut measurements) = single_column_stack();
        let changed = reflow_after_height_change(
            &items,
            &0u32,
            40.0,
            &mut positions,
            &mut measurements,
            10.0,
        );

        assert!(changed);
        assert_eq!(positions.get(&1).map(|p| p.top), Some(50.0));
        assert_eq!(positions.get(&2).map(|p| p.top), Some(110.0));
    }

    #[test]
    fn no_ops_leave_everything_alone() {
        let (items, mut positions, mut measurements) = single_column_stack();

        // Unknown item.
        assert!(!reflow_after_height_change(
            &items,
            &99u32,
            50.0,
            &mut positions,
            &mut measurements,
            10.0,
        ));
        // Zero height means still unmeasured.
        assert!(!reflow_after_height_change(
            &items,
            &0u32,
            0.0,
            &mut positions,
            &mut measurements,
            10.0,
        ));
        // Sub-pixel change.
        assert!(!reflow_after_height_change(
            &items,
            &0u32,
            100.4,
            &mut positions,
            &mut measurements,
            10.0,
        ));
        assert_eq!(positions.get(&1).map(|p| p.top), Some(110.0));
        assert_eq!(measurements.get(&0), Some(100.0));
    }

    #[test]
    fn spanning_item_resnaps_to_the_lowest_shelf_edge() {
        // A and B side by side, M spanning both beneath them, C under M.
        let items = vec![0u32, 1, 2, 3];
        let mut positions = PositionStore::new();
        positions.set(0u32, Position::new(0.0, 0.0, 200.0, 100.0));
        positions.set(1u32, Position::new(0.0, 210.0, 200.0, 40.0));
        positions.set(2u32, Position::new(110.0, 0.0, 410.0, 50.0));
        positions.set(3u32, Position::new(170.0, 0.0, 200.0, 30.0));
        let mut measurements = MeasurementStore::new();
        measurements.set(0u32, 100.0);
        measurements.set(1u32, 40.0);
        measurements.set(2u32, 50.0);
        measurements.set(3u32, 30.0);

        let changed = reflow_after_height_change(
            &items,
            &0u32,
            160.0,
            &mut positions,
            &mut measurements,
            10.0,
        );

        assert!(changed);
        // M snaps to A's new bottom (160) plus the gutter.
        assert_eq!(positions.get(&2).map(|p| p.top), Some(170.0));
        // C follows M's refined delta, not the raw 60px one.
        assert_eq!(positions.get(&3).map(|p| p.top), Some(230.0));
    }

    #[test]
    fn shift_cascades_through_a_spanning_item_into_other_columns() {
        // M spans both columns; E sits below M in the *other* column, so it
        // moves even though it never overlaps the changed item directly.
        let items = vec![0u32, 1, 2, 3];
        let mut positions = PositionStore::new();
        positions.set(0u32, Position::new(0.0, 0.0, 200.0, 100.0));
        positions.set(1u32, Position::new(0.0, 210.0, 200.0, 100.0));
        positions.set(2u32, Position::new(110.0, 0.0, 410.0, 50.0));
        positions.set(3u32, Position::new(170.0, 210.0, 200.0, 30.0));
        let mut measurements = MeasurementStore::new();
        measurements.set(0u32, 100.0);
        measurements.set(1u32, 100.0);
        measurements.set(2u32, 50.0);
        measurements.set(3u32, 30.0);

        assert!(reflow_after_height_change(
            &items,
            &0u32,
            150.0,
            &mut positions,
            &mut measurements,
            10.0,
        ));

        // Shelf edge is A's new bottom (150), so M lands at 160.
        assert_eq!(positions.get(&2).map(|p| p.top), Some(160.0));
        // The region widened to M's full extent carries E with it.
        assert_eq!(positions.get(&3).map(|p| p.top), Some(220.0));
    }
}
