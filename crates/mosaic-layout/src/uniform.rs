#![forbid(unsafe_code)]

//! Uniform row layout.
//!
//! Items are laid out strictly row by row, left to right. Each row is as tall
//! as its tallest member, so rows stay ragged-free even when item heights
//! vary. Positions are recomputed from scratch every pass; this mode never
//! reads or writes the position cache.

use mosaic_core::{ItemKey, MeasurementStore, Position};

/// Sizing behavior for the uniform row grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UniformSizing {
    /// Columns keep the configured width; leftover space goes unused.
    FixedWidth,
    /// Columns stretch so the row exactly fills the container.
    Flexible,
}

pub(crate) fn uniform_row_layout<K: ItemKey>(
    items: &[K],
    column_count: usize,
    column_width: f64,
    gutter: f64,
    width: f64,
    sizing: UniformSizing,
    measurements: &MeasurementStore<K>,
) -> Vec<Position> {
    let column_count = column_count.max(1);
    let column_width = match sizing {
        UniformSizing::FixedWidth => column_width,
        UniformSizing::Flexible => (width / column_count as f64).floor() - gutter,
    };
    let stride = column_width + gutter;

    let mut row_heights: Vec<f64> = Vec::new();
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(height) = measurements.get(item) else {
            out.push(Position::offscreen(column_width));
            continue;
        };
        let row = i / column_count;
        let column = i % column_count;
        if row_heights.len() <= row {
            // Unmeasured row leaders leave gaps; fill with zero-height rows.
            row_heights.resize(row + 1, 0.0);
        }
        if column == 0 {
            row_heights[row] = height;
        } else if height > row_heights[row] {
            row_heights[row] = height;
        }
        let top: f64 = row_heights[..row].iter().map(|h| h + gutter).sum();
        out.push(Position::new(top, column as f64 * stride, column_width, height));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(heights: &[f64]) -> MeasurementStore<usize> {
        let mut m = MeasurementStore::new();
        for (i, &h) in heights.iter().enumerate() {
            m.set(i, h);
        }
        m
    }

    #[test]
    fn rows_advance_by_tallest_member() {
        let m = measured(&[50.0, 80.0, 30.0, 40.0]);
        let out = uniform_row_layout(
            &[0usize, 1, 2, 3],
            3,
            200.0,
            10.0,
            800.0,
            UniformSizing::FixedWidth,
            &m,
        );
        assert_eq!(out[0], Position::new(0.0, 0.0, 200.0, 50.0));
        assert_eq!(out[1], Position::new(0.0, 210.0, 200.0, 80.0));
        assert_eq!(out[2], Position::new(0.0, 420.0, 200.0, 30.0));
        // Second row starts below the 80px tallest item plus gutter.
        assert_eq!(out[3], Position::new(90.0, 0.0, 200.0, 40.0));
    }

    #[test]
    fn later_taller_item_raises_its_row_for_followers() {
        // Item 1 is taller than item 0; item 2 (row 1) must clear it.
        let m = measured(&[30.0, 90.0, 20.0]);
        let out = uniform_row_layout(
            &[0usize, 1, 2],
            2,
            200.0,
            10.0,
            500.0,
            UniformSizing::FixedWidth,
            &m,
        );
        assert_eq!(out[2].top, 100.0);
    }

    #[test]
    fn flexible_sizing_stretches_columns() {
        let m = measured(&[50.0, 50.0]);
        let out = uniform_row_layout(
            &[0usize, 1],
            2,
            236.0,
            10.0,
            600.0,
            UniformSizing::Flexible,
            &m,
        );
        // floor(600 / 2) - 10 = 290.
        assert_eq!(out[0].width, 290.0);
        assert_eq!(out[1].left, 300.0);
    }

    #[test]
    fn unmeasured_items_are_parked_offscreen() {
        let mut m = MeasurementStore::new();
        m.set(0usize, 50.0);
        let out = uniform_row_layout(
            &[0usize, 1],
            2,
            200.0,
            10.0,
            500.0,
            UniformSizing::FixedWidth,
            &m,
        );
        assert!(!out[0].is_offscreen());
        assert!(out[1].is_offscreen());
    }
}
