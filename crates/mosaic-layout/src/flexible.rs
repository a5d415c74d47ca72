#![forbid(unsafe_code)]

//! Flexible-width waterfall layout.
//!
//! The configured column width is treated as an ideal: the actual column
//! count is derived from it, then columns stretch so the grid exactly fills
//! the container. Placement is the same greedy shortest-column rule as the
//! basic mode, but positions are recomputed from scratch every pass and the
//! position cache is never touched.

use mosaic_core::{ItemKey, MeasurementStore, Position};

use crate::columns::{self, GridParams};

pub(crate) fn flexible_layout<K: ItemKey>(
    items: &[K],
    ideal_column_width: f64,
    gutter: f64,
    min_columns: usize,
    width: f64,
    measurements: &MeasurementStore<K>,
) -> Vec<Position> {
    let column_count = columns::column_count(width, ideal_column_width, gutter, min_columns);
    let column_width = width / column_count as f64 - gutter;
    let grid = GridParams {
        column_width,
        gutter,
        center_offset: gutter / 2.0,
    };

    let mut heights = columns::zeroed(column_count);
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match measurements.get(item) {
            Some(height) => {
                let column = columns::shortest_column(&heights);
                let top = heights[column];
                if height > 0.0 {
                    heights[column] = top + height + gutter;
                }
                out.push(Position::new(top, grid.left_for(column), column_width, height));
            }
            None => out.push(Position::offscreen(column_width)),
        }
    }
    out
}
