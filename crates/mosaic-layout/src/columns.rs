#![forbid(unsafe_code)]

//! Column-state bookkeeping.
//!
//! A layout pass owns exactly one piece of mutable state: an array of column
//! bottom edges. Everything here operates on that array, from picking the
//! shortest column through scoring candidate shelves for spanning items and
//! reconstructing the array from cached positions on a warm pass.

use mosaic_core::{ItemKey, PositionStore};
use smallvec::{SmallVec, smallvec};

use crate::{Alignment, LayoutMode};

/// Per-column bottom edges: `heights[i]` is the lowest free y in column `i`.
///
/// Inline capacity covers typical grids; wider grids spill to the heap.
pub type ColumnHeights = SmallVec<[f64; 12]>;

/// Fixed per-pass grid parameters shared by the placers.
#[derive(Debug, Clone, Copy)]
pub struct GridParams {
    /// Width of a single column in pixels.
    pub column_width: f64,
    /// Spacing between items, both axes.
    pub gutter: f64,
    /// Horizontal offset applied to every column (alignment/centering).
    pub center_offset: f64,
}

impl GridParams {
    /// Horizontal stride from one column to the next.
    #[inline]
    pub fn column_width_and_gutter(&self) -> f64 {
        self.column_width + self.gutter
    }

    /// Left edge of the given column.
    #[inline]
    pub fn left_for(&self, column: usize) -> f64 {
        column as f64 * self.column_width_and_gutter() + self.center_offset
    }

    /// Rendered width of an item spanning `span` columns.
    #[inline]
    pub fn span_width(&self, span: usize) -> f64 {
        self.column_width * span as f64 + self.gutter * span.saturating_sub(1) as f64
    }
}

/// A fresh column array, all edges at the top of the grid.
pub fn zeroed(column_count: usize) -> ColumnHeights {
    smallvec![0.0; column_count]
}

/// Index of the shortest column, ties broken by lowest index.
pub fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    let mut best_height = f64::INFINITY;
    for (i, &h) in heights.iter().enumerate() {
        if h < best_height {
            best = i;
            best_height = h;
        }
    }
    best
}

/// Columns still at the top of the grid (height exactly 0).
pub fn empty_column_count(heights: &[f64]) -> usize {
    heights.iter().filter(|&&h| h == 0.0).count()
}

/// Whitespace cost of every candidate shelf of `span` adjacent columns.
///
/// For each contiguous window the cost is the fill needed to flatten it:
/// `sum(max(window) - h)` over the window's columns.
pub fn shelf_whitespace(heights: &[f64], span: usize) -> SmallVec<[f64; 12]> {
    let mut costs = SmallVec::new();
    if span == 0 || heights.len() < span {
        return costs;
    }
    for window in heights.windows(span) {
        let tallest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        costs.push(window.iter().map(|&h| tallest - h).sum());
    }
    costs
}

/// Cost of the flattest shelf, however placed. Infinite when no shelf of the
/// requested span fits.
pub fn min_shelf_whitespace(heights: &[f64], span: usize) -> f64 {
    shelf_whitespace(heights, span)
        .into_iter()
        .fold(f64::INFINITY, f64::min)
}

/// Columns that fit the container: `max(floor(width / stride), min_columns)`.
pub fn column_count(width: f64, column_width: f64, gutter: f64, min_columns: usize) -> usize {
    let stride = column_width + gutter;
    let fit = if stride > 0.0 {
        let f = (width / stride).floor();
        if f.is_finite() && f > 0.0 { f as usize } else { 0 }
    } else {
        0
    };
    fit.max(min_columns.max(1))
}

/// Horizontal offset of column 0 for the given alignment.
///
/// `BasicCentered` centers the *occupied* columns (at most `raw_item_count`)
/// rather than the full grid.
pub fn center_offset(
    mode: LayoutMode,
    alignment: Alignment,
    column_count: usize,
    column_width_and_gutter: f64,
    gutter: f64,
    raw_item_count: usize,
    width: f64,
) -> f64 {
    if mode == LayoutMode::BasicCentered {
        let occupied = raw_item_count.min(column_count) as f64;
        return ((width - (occupied * column_width_and_gutter + gutter)) / 2.0)
            .floor()
            .max(0.0);
    }
    match alignment {
        Alignment::Center => ((width - column_width_and_gutter * column_count as f64 + gutter)
            / 2.0)
            .floor()
            .max(0.0),
        Alignment::End => width - (column_width_and_gutter * column_count as f64 - gutter),
        Alignment::Start => 0.0,
    }
}

/// Rebuild column edges from positions cached by a previous pass.
///
/// The column index is recovered from the cached `left`; spanning items (when
/// a span table is supplied) raise every column they cover.
pub(crate) fn seed_heights<K: ItemKey>(
    items: &[K],
    spans_per_item: Option<&[usize]>,
    column_count: usize,
    grid: &GridParams,
    positions: &PositionStore<K>,
) -> ColumnHeights {
    let mut heights = zeroed(column_count);
    if column_count == 0 {
        return heights;
    }
    let stride = grid.column_width_and_gutter();
    for (i, item) in items.iter().enumerate() {
        let Some(position) = positions.get(item) else {
            continue;
        };
        if position.is_offscreen() || stride <= 0.0 {
            continue;
        }
        let column = (((position.left - grid.center_offset) / stride).round() as isize)
            .clamp(0, column_count as isize - 1) as usize;
        let span = spans_per_item
            .map(|spans| spans[i])
            .unwrap_or(1)
            .clamp(1, column_count - column);
        let bottom = position.top + position.height + grid.gutter;
        for height in &mut heights[column..column + span] {
            if bottom > *height {
                *height = bottom;
            }
        }
    }
    heights
}
