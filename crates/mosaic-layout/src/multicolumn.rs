#![forbid(unsafe_code)]

//! Placement for grids containing multi-column (spanning) items.
//!
//! Single-column items still follow the greedy shortest-column rule, but each
//! spanning item triggers a bounded search: a small batch of its single-column
//! neighbors is tentatively reordered to find the arrangement that leaves the
//! flattest shelf for the spanning item to land on. The search is a DFS over
//! placement orders, scored by the whitespace the best shelf would trap, and
//! capped by an iteration budget so worst cases stay bounded.

use mosaic_core::{ItemKey, MeasurementStore, Position, PositionStore};

use crate::basic;
use crate::columns::{self, ColumnHeights, GridParams};
use crate::span::{PositioningConfig, SpanSource, resolve_span};

/// Diagnostics emitted once per spanning item placed.
#[derive(Debug, Clone, PartialEq)]
pub struct WhitespaceEvent {
    /// Whitespace trapped under the item, per covered column.
    pub additional_whitespace: Vec<f64>,
    /// Search nodes expanded before committing to a layout.
    pub iterations: usize,
    /// Columns the item spans.
    pub column_span: usize,
}

/// Per-pass inputs shared by every group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MultiColumnParams {
    pub column_count: usize,
    pub grid: GridParams,
    pub sectioned_search: bool,
}

/// Layout pass for item sequences that may contain spanning items.
///
/// Returns one position per input item, in input order. If any item is still
/// unmeasured the whole pass degrades to span-scaled off-screen placeholders;
/// spanning placement needs the complete picture before it can commit.
pub(crate) fn multi_column_layout<K: ItemKey, S: SpanSource<K>>(
    items: &[K],
    params: &MultiColumnParams,
    spans: &S,
    measurements: &MeasurementStore<K>,
    positions: &mut PositionStore<K>,
    mut observer: Option<&mut dyn FnMut(&WhitespaceEvent)>,
) -> Vec<Position> {
    let column_count = params.column_count.max(1);
    let grid = &params.grid;

    let second_override = items.get(1).and_then(|second| spans.second_item_span(second));
    let spans_per_item: Vec<usize> = (0..items.len())
        .map(|index| {
            let flexible = match (index, second_override) {
                (1, Some(config)) => Some((&items[0], config)),
                _ => None,
            };
            resolve_span(spans, &items[index], column_count, flexible)
        })
        .collect();

    if !items.iter().all(|item| measurements.contains(item)) {
        return spans_per_item
            .iter()
            .map(|&span| Position::offscreen(grid.span_width(span)))
            .collect();
    }

    let mut heights =
        columns::seed_heights(items, Some(&spans_per_item), column_count, grid, positions);

    let uncached: Vec<usize> = (0..items.len())
        .filter(|&i| !positions.contains(&items[i]))
        .collect();
    let spanning: Vec<usize> = uncached
        .iter()
        .copied()
        .filter(|&i| spans_per_item[i] > 1)
        .collect();

    if spanning.is_empty() {
        let all: Vec<usize> = (0..items.len()).collect();
        basic::place_single_column_items(&all, items, &mut heights, grid, measurements, positions);
        return collect_positions(items, positions, grid);
    }

    // One group per spanning item: the spanning item plus the single-column
    // items between it and the next spanning item. The first group also
    // absorbs any leading single-column items.
    let index_in_uncached =
        |item: usize| uncached.iter().position(|&u| u == item).unwrap_or(0);
    for (g, &spanning_index) in spanning.iter().enumerate() {
        let start = if g == 0 { 0 } else { index_in_uncached(spanning_index) };
        let end = match spanning.get(g + 1) {
            Some(&next) => index_in_uncached(next),
            None => uncached.len(),
        };
        let group = &uncached[start..end];

        let span = spans_per_item[spanning_index];
        let group_position = group
            .iter()
            .position(|&i| i == spanning_index)
            .unwrap_or(0);
        let singles: Vec<usize> = group
            .iter()
            .copied()
            .filter(|&i| spans_per_item[i] == 1)
            .collect();
        let empty_columns = columns::empty_column_count(&heights);

        // A spanning item "fits the first row" when enough columns are still
        // untouched for both it and everything queued ahead of it.
        let fits_first_row = empty_columns >= span + group_position;
        let replace_with_singles = !fits_first_row && group_position < empty_columns;

        let config = spans.positioning_config(column_count, span);
        let batch_size = config.items_batch_size.max(1);
        let batch_start = batch_start_index(
            singles.len(),
            group_position,
            empty_columns,
            fits_first_row,
            replace_with_singles,
            batch_size,
        )
        .min(singles.len());

        let before = &singles[..batch_start];
        let batch: &[usize] = if fits_first_row {
            &[]
        } else {
            &singles[batch_start..(batch_start + batch_size).min(singles.len())]
        };

        basic::place_single_column_items(before, items, &mut heights, grid, measurements, positions);

        let outcome = search_batch(
            batch,
            items,
            &heights,
            span,
            &config,
            params.sectioned_search,
            grid,
            measurements,
        );
        for &(batch_rel, position) in &outcome.placements {
            positions.set(items[batch[batch_rel]].clone(), position);
        }

        let mut shelf_heights = match outcome.section {
            Some(section) => {
                let mut spliced: ColumnHeights = heights[..section].iter().copied().collect();
                spliced.extend(outcome.heights.iter().copied());
                spliced.extend(heights[(section + span).min(heights.len())..].iter().copied());
                spliced
            }
            None => outcome.heights,
        };

        let Some(item_height) = measurements.get(&items[spanning_index]) else {
            continue;
        };
        let (position, additional_whitespace) =
            place_spanning_item(item_height, span, fits_first_row, &mut shelf_heights, grid);
        positions.set(items[spanning_index].clone(), position);
        heights = shelf_heights;

        let remainder: Vec<usize> = group
            .iter()
            .copied()
            .filter(|&i| !positions.contains(&items[i]))
            .collect();
        basic::place_single_column_items(
            &remainder,
            items,
            &mut heights,
            grid,
            measurements,
            positions,
        );

        let event = WhitespaceEvent {
            additional_whitespace,
            iterations: outcome.iterations,
            column_span: span,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            column_span = event.column_span,
            iterations = event.iterations,
            whitespace = ?event.additional_whitespace,
            "placed spanning item"
        );
        if let Some(callback) = observer.as_mut() {
            callback(&event);
        }
    }

    collect_positions(items, positions, grid)
}

fn collect_positions<K: ItemKey>(
    items: &[K],
    positions: &PositionStore<K>,
    grid: &GridParams,
) -> Vec<Position> {
    items
        .iter()
        .map(|item| {
            positions
                .get(item)
                .unwrap_or_else(|| Position::offscreen(grid.column_width))
        })
        .collect()
}

/// Where the reorderable batch starts within the group's single-column items.
fn batch_start_index(
    singles_len: usize,
    group_position: usize,
    empty_columns: usize,
    fits_first_row: bool,
    replace_with_singles: bool,
    batch_size: usize,
) -> usize {
    if fits_first_row {
        return group_position;
    }
    if replace_with_singles {
        return empty_columns;
    }
    if group_position + batch_size > singles_len {
        singles_len.saturating_sub(batch_size).max(empty_columns)
    } else {
        group_position
    }
}

/// Drop a spanning item onto its best shelf, mutating `heights`.
///
/// All covered columns are raised to the same bottom edge, so whatever
/// unevenness the shelf had becomes trapped whitespace, which is reported
/// per column for diagnostics.
fn place_spanning_item(
    height: f64,
    span: usize,
    fits_first_row: bool,
    heights: &mut ColumnHeights,
    grid: &GridParams,
) -> (Position, Vec<f64>) {
    let span = span.clamp(1, heights.len().max(1));
    let best_column = if fits_first_row {
        heights.iter().position(|&h| h == 0.0).unwrap_or(0)
    } else {
        let costs = columns::shelf_whitespace(heights, span);
        let mut best = 0;
        let mut best_cost = f64::INFINITY;
        for (i, &cost) in costs.iter().enumerate() {
            if cost < best_cost {
                best = i;
                best_cost = cost;
            }
        }
        best
    }
    .min(heights.len().saturating_sub(span));

    let window = &heights[best_column..best_column + span];
    let top = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let additional_whitespace: Vec<f64> = window.iter().map(|&h| top - h).collect();
    let raised = top + if height > 0.0 { height + grid.gutter } else { 0.0 };
    for edge in &mut heights[best_column..best_column + span] {
        *edge = raised;
    }

    let position = Position::new(top, grid.left_for(best_column), grid.span_width(span), height);
    (position, additional_whitespace)
}

struct SearchNode {
    parent: usize,
    placed: Option<(usize, Position)>,
    heights: ColumnHeights,
    score: f64,
    section: Option<usize>,
}

struct SearchOutcome {
    /// Winning placements as (batch-relative index, position), in order.
    placements: Vec<(usize, Position)>,
    /// Winner's column edges (section-local when `section` is set).
    heights: ColumnHeights,
    section: Option<usize>,
    iterations: usize,
}

/// Pending expansion: one batch item placed after its parent ordering.
struct Frame {
    rel: usize,
    index_in_remaining: usize,
    remaining: Vec<usize>,
    parent: usize,
    parent_heights: ColumnHeights,
    section: Option<usize>,
}

struct Search<'a, K: ItemKey> {
    batch: &'a [usize],
    items: &'a [K],
    measurements: &'a MeasurementStore<K>,
    span: usize,
    threshold: Option<f64>,
    arena: Vec<SearchNode>,
    best: Option<usize>,
    iterations: usize,
}

impl<K: ItemKey> Search<'_, K> {
    /// Depth-first walk over placement orderings, driven by an explicit
    /// frame stack so the iteration budget bounds everything, including
    /// stack depth on adversarial batch sizes. Children are pushed in
    /// reverse so pop order matches first-to-last expansion.
    fn run(
        &mut self,
        order: &[usize],
        base_heights: &ColumnHeights,
        grid: &GridParams,
        section: Option<usize>,
        budget: usize,
    ) {
        let mut stack: Vec<Frame> = Vec::new();
        for i in (0..order.len()).rev() {
            stack.push(Frame {
                rel: order[i],
                index_in_remaining: i,
                remaining: order.to_vec(),
                parent: 0,
                parent_heights: base_heights.clone(),
                section,
            });
        }

        while let Some(frame) = stack.pop() {
            if self.best.is_some() || self.iterations >= budget {
                return;
            }
            let Some(height) = self.measurements.get(&self.items[self.batch[frame.rel]])
            else {
                continue;
            };

            let mut heights = frame.parent_heights;
            let column = columns::shortest_column(&heights);
            let top = heights[column];
            if height > 0.0 {
                heights[column] = top + height + grid.gutter;
            }
            let position = Position::new(top, grid.left_for(column), grid.column_width, height);
            let score = columns::min_shelf_whitespace(&heights, self.span);

            self.arena.push(SearchNode {
                parent: frame.parent,
                placed: Some((frame.rel, position)),
                heights: heights.clone(),
                score,
                section: frame.section,
            });
            let node = self.arena.len() - 1;
            self.iterations += 1;

            if let Some(threshold) = self.threshold {
                if score < threshold {
                    self.best = Some(node);
                    return;
                }
            }

            if frame.remaining.len() > 1 {
                let mut next = frame.remaining;
                next.remove(frame.index_in_remaining);
                for i in (0..next.len()).rev() {
                    stack.push(Frame {
                        rel: next[i],
                        index_in_remaining: i,
                        remaining: next.clone(),
                        parent: node,
                        parent_heights: heights.clone(),
                        section: frame.section,
                    });
                }
            }
        }
    }
}

/// Search placement orders for the batch, scored by the whitespace of the
/// flattest shelf left for the spanning item.
///
/// The winner is the lowest-scoring node, first created on ties; the empty
/// ordering (root) wins unless some reordering strictly improves on the
/// shelf the current heights already offer. Sectioned search confines each
/// probe to one span-wide window of columns and splits the iteration budget
/// evenly across windows.
#[allow(clippy::too_many_arguments)]
fn search_batch<K: ItemKey>(
    batch: &[usize],
    items: &[K],
    base_heights: &ColumnHeights,
    span: usize,
    config: &PositioningConfig,
    sectioned: bool,
    grid: &GridParams,
    measurements: &MeasurementStore<K>,
) -> SearchOutcome {
    let baseline = columns::min_shelf_whitespace(base_heights, span);
    let mut search = Search {
        batch,
        items,
        measurements,
        span,
        threshold: config.whitespace_threshold,
        arena: vec![SearchNode {
            parent: 0,
            placed: None,
            heights: base_heights.clone(),
            score: f64::INFINITY,
            section: None,
        }],
        best: None,
        iterations: 0,
    };

    if !batch.is_empty() {
        let order: Vec<usize> = (0..batch.len()).collect();
        if sectioned && base_heights.len() >= span {
            // Each window gets its own independent probe and an even slice
            // of the iteration budget.
            let section_count = base_heights.len() - span + 1;
            let budget = config.iterations_limit / section_count;
            for section in 0..section_count {
                search.iterations = 0;
                let section_heights: ColumnHeights =
                    base_heights[section..section + span].iter().copied().collect();
                let section_grid = GridParams {
                    center_offset: grid.column_width_and_gutter() * section as f64
                        + grid.center_offset,
                    ..*grid
                };
                search.run(&order, &section_heights, &section_grid, Some(section), budget);
            }
        } else {
            search.run(&order, base_heights, grid, None, config.iterations_limit);
        }
    }

    let candidate = search.best.or_else(|| {
        let mut lowest: Option<usize> = None;
        for i in 1..search.arena.len() {
            let better = match lowest {
                Some(l) => search.arena[i].score < search.arena[l].score,
                None => true,
            };
            if better {
                lowest = Some(i);
            }
        }
        lowest
    });
    let winner = match candidate {
        Some(node) if search.arena[node].score < baseline => node,
        _ => 0,
    };

    let mut placements = Vec::new();
    let mut cursor = winner;
    while cursor != 0 {
        let node = &search.arena[cursor];
        if let Some(placed) = node.placed {
            placements.push(placed);
        }
        cursor = node.parent;
    }
    placements.reverse();

    SearchOutcome {
        placements,
        heights: search.arena[winner].heights.clone(),
        section: search.arena[winner].section,
        iterations: search.iterations,
    }
}
