#![forbid(unsafe_code)]

//! Greedy single-column placement.
//!
//! The classic waterfall: each item lands at the top of the currently
//! shortest column. Cached positions from a previous pass are reused verbatim
//! so a warm relayout is a no-op for already-placed items.

use mosaic_core::{ItemKey, MeasurementStore, Position, PositionStore};

use crate::columns::{self, ColumnHeights, GridParams};

/// Place one measured item on the shortest column, mutating `heights`.
///
/// Zero-height items occupy a slot without raising the column, which is how
/// invisible spacer items stack at the same coordinate.
pub(crate) fn place_one(height: f64, heights: &mut ColumnHeights, grid: &GridParams) -> Position {
    let column = columns::shortest_column(heights);
    let top = heights[column];
    if height > 0.0 {
        heights[column] = top + height + grid.gutter;
    }
    Position::new(top, grid.left_for(column), grid.column_width, height)
}

/// Re-apply cached positions for the given single-column items.
///
/// Column heights were already seeded from the cache, so cached items are
/// emitted as-is without raising anything. Items with neither a cached
/// position nor a measurement are skipped entirely; freshly measured items
/// are placed greedily and written back to the cache.
pub(crate) fn place_single_column_items<K: ItemKey>(
    indices: &[usize],
    items: &[K],
    heights: &mut ColumnHeights,
    grid: &GridParams,
    measurements: &MeasurementStore<K>,
    positions: &mut PositionStore<K>,
) -> Vec<(usize, Position)> {
    let mut placed = Vec::with_capacity(indices.len());
    for &index in indices {
        let item = &items[index];
        if let Some(cached) = positions.get(item) {
            if !cached.is_offscreen() {
                placed.push((index, cached));
                continue;
            }
        }
        let Some(height) = measurements.get(item) else {
            continue;
        };
        let position = place_one(height, heights, grid);
        positions.set(item.clone(), position);
        placed.push((index, position));
    }
    placed
}

/// Full single-column layout pass.
///
/// Returns one position per input item, in input order. Unmeasured items get
/// an off-screen placeholder at column width so the host can measure them.
pub(crate) fn basic_layout<K: ItemKey>(
    items: &[K],
    column_count: usize,
    grid: &GridParams,
    measurements: &MeasurementStore<K>,
    positions: &mut PositionStore<K>,
) -> Vec<Position> {
    let mut heights = columns::seed_heights(items, None, column_count, grid, positions);
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(cached) = positions.get(item) {
            if !cached.is_offscreen() {
                out.push(cached);
                continue;
            }
        }
        match measurements.get(item) {
            Some(height) => {
                let position = place_one(height, &mut heights, grid);
                positions.set(item.clone(), position);
                out.push(position);
            }
            None => out.push(Position::offscreen(grid.column_width)),
        }
    }
    out
}
