#![forbid(unsafe_code)]

//! Masonry grid placement.
//!
//! Items of varying height are packed into equal-width columns. The engine
//! never measures anything itself: callers feed item heights into a
//! measurement store, and items without a height get off-screen placeholder
//! rectangles so the host can measure them invisibly and come back.
//!
//! | Mode                    | Behavior                                          |
//! |-------------------------|---------------------------------------------------|
//! | `Basic`                 | Greedy shortest-column waterfall                  |
//! | `BasicCentered`         | Waterfall centered on the occupied columns        |
//! | `UniformRow`            | Strict rows, each as tall as its tallest item     |
//! | `UniformRowFlexible`    | Rows with columns stretched to fill the container |
//! | `Flexible`              | Waterfall with container-filling column widths    |
//! | `ServerRenderedFlexible`| `Flexible` geometry for pre-rendered content      |
//!
//! Items may span multiple columns via a [`SpanSource`]; spanning placement
//! runs a bounded whitespace-minimizing search (see [`WhitespaceEvent`]).
//!
//! ```
//! use mosaic_layout::{MasonryEngine, MasonryOptions};
//!
//! let mut engine: MasonryEngine<u32> = MasonryEngine::new(MasonryOptions::default());
//! engine.set_container_width(Some(800.0));
//! engine.set_measurement(1, 120.0);
//! engine.set_measurement(2, 80.0);
//!
//! let positions = engine.layout(&[1, 2]);
//! assert_eq!(positions.len(), 2);
//! assert_eq!(positions[0].top, 0.0);
//! ```

mod basic;
mod columns;
mod flexible;
mod multicolumn;
mod reflow;
pub mod span;
mod uniform;

pub use mosaic_core::{ItemKey, MeasurementStore, OFFSCREEN, Position, PositionStore};
pub use multicolumn::WhitespaceEvent;
pub use span::{
    DefaultSpans, PositioningConfig, SecondItemSpan, SpanBreakpoint, SpanConfig, SpanSource,
};

use columns::GridParams;
use multicolumn::MultiColumnParams;
use span::resolve_span;
use uniform::UniformSizing;

/// How items flow into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Greedy shortest-column waterfall at a fixed column width.
    #[default]
    Basic,
    /// Waterfall centered on the columns actually occupied.
    BasicCentered,
    /// Row-by-row placement, each row as tall as its tallest item.
    UniformRow,
    /// Rows with column widths stretched to fill the container.
    UniformRowFlexible,
    /// Waterfall with column widths stretched to fill the container.
    Flexible,
    /// Same geometry as [`LayoutMode::Flexible`], for content that arrives
    /// pre-rendered with known heights.
    ServerRenderedFlexible,
}

/// Horizontal placement of the grid inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush left.
    Start,
    /// Centered, offset floored to whole pixels.
    #[default]
    Center,
    /// Flush right.
    End,
}

/// Grid configuration. All setters are chainable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasonryOptions {
    pub mode: LayoutMode,
    pub alignment: Alignment,
    /// Column width in pixels (the ideal width for flexible modes).
    pub column_width: f64,
    /// Spacing between items. `None` picks the mode default: 14, or 0 for
    /// the flexible modes.
    pub gutter: Option<f64>,
    /// Lower bound on the column count, regardless of container width.
    pub min_columns: usize,
    /// Confine the spanning-item search to one shelf window at a time.
    pub sectioned_search: bool,
}

impl MasonryOptions {
    pub const DEFAULT_COLUMN_WIDTH: f64 = 236.0;
    pub const DEFAULT_GUTTER: f64 = 14.0;
    pub const DEFAULT_MIN_COLUMNS: usize = 3;

    #[must_use]
    pub fn mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn column_width(mut self, column_width: f64) -> Self {
        self.column_width = column_width;
        self
    }

    #[must_use]
    pub fn gutter(mut self, gutter: f64) -> Self {
        self.gutter = Some(gutter);
        self
    }

    #[must_use]
    pub fn min_columns(mut self, min_columns: usize) -> Self {
        self.min_columns = min_columns;
        self
    }

    #[must_use]
    pub fn sectioned_search(mut self, sectioned: bool) -> Self {
        self.sectioned_search = sectioned;
        self
    }

    /// Gutter with the mode default applied.
    #[must_use]
    pub fn resolved_gutter(&self) -> f64 {
        match self.gutter {
            Some(gutter) => gutter,
            None => match self.mode {
                LayoutMode::Flexible | LayoutMode::ServerRenderedFlexible => 0.0,
                _ => Self::DEFAULT_GUTTER,
            },
        }
    }
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Basic,
            alignment: Alignment::Center,
            column_width: Self::DEFAULT_COLUMN_WIDTH,
            gutter: None,
            min_columns: Self::DEFAULT_MIN_COLUMNS,
            sectioned_search: false,
        }
    }
}

/// The layout engine: options, caches, and the last-seen container width.
///
/// The engine is a state machine over its two stores. A layout pass reads
/// measurements, writes positions, and returns one rectangle per item in
/// input order. Passes are deterministic and idempotent while the caches are
/// warm; changing the container width invalidates everything.
pub struct MasonryEngine<K: ItemKey, S: SpanSource<K> = DefaultSpans> {
    options: MasonryOptions,
    spans: Option<S>,
    measurements: MeasurementStore<K>,
    positions: PositionStore<K>,
    width: Option<f64>,
}

impl<K: ItemKey> MasonryEngine<K, DefaultSpans> {
    /// Engine where every item spans a single column.
    pub fn new(options: MasonryOptions) -> Self {
        Self {
            options,
            spans: None,
            measurements: MeasurementStore::new(),
            positions: PositionStore::new(),
            width: None,
        }
    }
}

impl<K: ItemKey, S: SpanSource<K>> MasonryEngine<K, S> {
    /// Engine with caller-controlled column spans. `Basic` and
    /// `BasicCentered` passes route through the spanning-item placer.
    pub fn with_span_source(options: MasonryOptions, spans: S) -> Self {
        Self {
            options,
            spans: Some(spans),
            measurements: MeasurementStore::new(),
            positions: PositionStore::new(),
            width: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> &MasonryOptions {
        &self.options
    }

    #[must_use]
    pub fn container_width(&self) -> Option<f64> {
        self.width
    }

    /// Update the container width. A change between two known widths
    /// invalidates both caches; every item must be re-measured at the new
    /// column width.
    pub fn set_container_width(&mut self, width: Option<f64>) {
        if let (Some(old), Some(new)) = (self.width, width) {
            if old != new {
                self.measurements.reset();
                self.positions.reset();
            }
        }
        self.width = width;
    }

    /// Record a measured item height.
    pub fn set_measurement(&mut self, item: K, height: f64) {
        self.measurements.set(item, height);
    }

    #[must_use]
    pub fn measurements(&self) -> &MeasurementStore<K> {
        &self.measurements
    }

    /// Mutable access for pre-seeding (server-rendered hydration).
    pub fn measurements_mut(&mut self) -> &mut MeasurementStore<K> {
        &mut self.measurements
    }

    #[must_use]
    pub fn positions(&self) -> &PositionStore<K> {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut PositionStore<K> {
        &mut self.positions
    }

    /// Drop everything cached; the next pass lays out from scratch.
    pub fn invalidate(&mut self) {
        self.measurements.reset();
        self.positions.reset();
    }

    /// Forget a single item, forcing re-measurement and re-placement.
    pub fn invalidate_item(&mut self, item: &K) {
        self.measurements.remove(item);
        self.positions.remove(item);
    }

    /// Lay out `items`, returning one position per item in input order.
    pub fn layout(&mut self, items: &[K]) -> Vec<Position> {
        self.layout_with_observer(items, None)
    }

    /// [`layout`](Self::layout) with a diagnostics callback invoked once per
    /// spanning item placed.
    pub fn layout_with_observer(
        &mut self,
        items: &[K],
        observer: Option<&mut dyn FnMut(&WhitespaceEvent)>,
    ) -> Vec<Position> {
        let Some(width) = self.width else {
            return self.placeholder_positions(items);
        };
        let gutter = self.options.resolved_gutter();
        let column_width = self.options.column_width;
        let min_columns = self.options.min_columns;

        match self.options.mode {
            LayoutMode::UniformRow => uniform::uniform_row_layout(
                items,
                columns::column_count(width, column_width, gutter, min_columns),
                column_width,
                gutter,
                width,
                UniformSizing::FixedWidth,
                &self.measurements,
            ),
            LayoutMode::UniformRowFlexible => uniform::uniform_row_layout(
                items,
                columns::column_count(width, column_width, gutter, min_columns),
                column_width,
                gutter,
                width,
                UniformSizing::Flexible,
                &self.measurements,
            ),
            LayoutMode::Flexible | LayoutMode::ServerRenderedFlexible => {
                flexible::flexible_layout(
                    items,
                    column_width,
                    gutter,
                    min_columns,
                    width,
                    &self.measurements,
                )
            }
            LayoutMode::Basic | LayoutMode::BasicCentered => {
                let column_count =
                    columns::column_count(width, column_width, gutter, min_columns);
                let center_offset = columns::center_offset(
                    self.options.mode,
                    self.options.alignment,
                    column_count,
                    column_width + gutter,
                    gutter,
                    items.len(),
                    width,
                );
                let grid = GridParams {
                    column_width,
                    gutter,
                    center_offset,
                };
                match &self.spans {
                    Some(spans) => multicolumn::multi_column_layout(
                        items,
                        &MultiColumnParams {
                            column_count,
                            grid,
                            sectioned_search: self.options.sectioned_search,
                        },
                        spans,
                        &self.measurements,
                        &mut self.positions,
                        observer,
                    ),
                    None => basic::basic_layout(
                        items,
                        column_count,
                        &grid,
                        &self.measurements,
                        &mut self.positions,
                    ),
                }
            }
        }
    }

    /// Absorb a single item's height change without a full relayout.
    ///
    /// Returns `true` when positions moved. Items below the changed one
    /// shift only where the change can reach them; unrelated columns keep
    /// their positions.
    pub fn reflow_item(&mut self, items: &[K], changed: &K, new_height: f64) -> bool {
        reflow::reflow_after_height_change(
            items,
            changed,
            new_height,
            &mut self.positions,
            &mut self.measurements,
            self.options.resolved_gutter(),
        )
    }

    /// Placeholders for a pass that runs before the container width is known.
    /// Spans still scale the placeholder widths so measurement happens at the
    /// final rendered width.
    fn placeholder_positions(&self, items: &[K]) -> Vec<Position> {
        let gutter = self.options.resolved_gutter();
        let column_width = self.options.column_width;
        let column_count = self.options.min_columns.max(1);
        match &self.spans {
            Some(spans) => {
                let second_override =
                    items.get(1).and_then(|second| spans.second_item_span(second));
                (0..items.len())
                    .map(|index| {
                        let flexible = match (index, second_override) {
                            (1, Some(config)) => Some((&items[0], config)),
                            _ => None,
                        };
                        let span = resolve_span(spans, &items[index], column_count, flexible);
                        Position::offscreen(
                            column_width * span as f64 + gutter * span.saturating_sub(1) as f64,
                        )
                    })
                    .collect()
            }
            None => items
                .iter()
                .map(|_| Position::offscreen(column_width))
                .collect(),
        }
    }
}
