#![forbid(unsafe_code)]

//! Column-span resolution.
//!
//! Items normally occupy one column, but a span configuration can widen an
//! item to several adjacent columns, with the width chosen per breakpoint.
//! Breakpoints here are keyed off the current *column count* rather than raw
//! pixels: a grid that fits two columns is "small" no matter how wide the
//! columns themselves are.

use mosaic_core::ItemKey;

/// Breakpoint tiers derived from the column count.
///
/// | Tier  | Column count |
/// |-------|--------------|
/// | `Sm`  | <= 2         |
/// | `Md`  | <= 4         |
/// | `Lg1` | <= 6         |
/// | `Lg`  | <= 8         |
/// | `Xl`  | > 8          |
///
/// `Lg1` is a reserved mid-large tier between `Md` and `Lg` for layouts that
/// need finer control; span tables that leave it unset inherit the `Lg` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpanBreakpoint {
    /// Up to 2 columns.
    Sm,
    /// Up to 4 columns.
    Md,
    /// Up to 6 columns (reserved mid-large tier).
    Lg1,
    /// Up to 8 columns.
    Lg,
    /// More than 8 columns.
    Xl,
}

impl SpanBreakpoint {
    /// Classify a column count into a breakpoint tier.
    #[inline]
    pub const fn from_column_count(column_count: usize) -> Self {
        if column_count <= 2 {
            SpanBreakpoint::Sm
        } else if column_count <= 4 {
            SpanBreakpoint::Md
        } else if column_count <= 6 {
            SpanBreakpoint::Lg1
        } else if column_count <= 8 {
            SpanBreakpoint::Lg
        } else {
            SpanBreakpoint::Xl
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SpanBreakpoint::Sm => "sm",
            SpanBreakpoint::Md => "md",
            SpanBreakpoint::Lg1 => "lg1",
            SpanBreakpoint::Lg => "lg",
            SpanBreakpoint::Xl => "xl",
        }
    }
}

impl std::fmt::Display for SpanBreakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How many columns an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanConfig {
    /// Width-independent span.
    Fixed(usize),
    /// Per-breakpoint spans. Missing entries default to a single column,
    /// except `lg1`, which inherits from `lg` first.
    Responsive {
        sm: Option<usize>,
        md: Option<usize>,
        lg1: Option<usize>,
        lg: Option<usize>,
        xl: Option<usize>,
    },
}

impl SpanConfig {
    /// A plain single-column item.
    pub const SINGLE: Self = SpanConfig::Fixed(1);

    /// Span at the given breakpoint, before clamping.
    #[must_use]
    pub fn resolve(&self, breakpoint: SpanBreakpoint) -> usize {
        match *self {
            SpanConfig::Fixed(span) => span,
            SpanConfig::Responsive {
                sm,
                md,
                lg1,
                lg,
                xl,
            } => match breakpoint {
                SpanBreakpoint::Sm => sm.unwrap_or(1),
                SpanBreakpoint::Md => md.unwrap_or(1),
                SpanBreakpoint::Lg1 => lg1.or(lg).unwrap_or(1),
                SpanBreakpoint::Lg => lg.unwrap_or(1),
                SpanBreakpoint::Xl => xl.unwrap_or(1),
            },
        }
    }
}

/// Dynamic span override for the second item in the sequence.
///
/// Used for "hero + flexible sidekick" layouts: the second item widens to
/// fill the columns the first item leaves free, within the given bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondItemSpan {
    /// Literal span, ignoring the first item.
    Fixed(usize),
    /// Span is `clamp(min, max, column_count - first_item_span)`.
    Bounded { min: usize, max: usize },
}

/// Tuning knobs for the multi-column whitespace search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositioningConfig {
    /// How many single-column neighbors of a spanning item may be reordered.
    pub items_batch_size: usize,
    /// Stop searching as soon as a layout's whitespace drops below this.
    pub whitespace_threshold: Option<f64>,
    /// Hard cap on search nodes expanded per spanning item.
    pub iterations_limit: usize,
}

impl PositioningConfig {
    /// Default reorder batch size.
    pub const DEFAULT_BATCH_SIZE: usize = 5;
    /// Default search node budget.
    pub const DEFAULT_ITERATIONS_LIMIT: usize = 5000;
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            items_batch_size: Self::DEFAULT_BATCH_SIZE,
            whitespace_threshold: None,
            iterations_limit: Self::DEFAULT_ITERATIONS_LIMIT,
        }
    }
}

/// Caller-supplied span accessors.
///
/// The engine never inspects item contents; everything it needs to know
/// about an item's width comes through this trait. All methods have
/// single-column defaults, so implementors only override what they use.
pub trait SpanSource<K: ItemKey> {
    /// Span configuration for an item.
    fn span_config(&self, _item: &K) -> SpanConfig {
        SpanConfig::SINGLE
    }

    /// Dynamic span for the second item in the sequence, or `None` to
    /// disable the override.
    fn second_item_span(&self, _item: &K) -> Option<SecondItemSpan> {
        None
    }

    /// Search tuning for a spanning item at the given column count.
    fn positioning_config(&self, _column_count: usize, _span: usize) -> PositioningConfig {
        PositioningConfig::default()
    }
}

/// Span source that treats every item as single-column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpans;

impl<K: ItemKey> SpanSource<K> for DefaultSpans {}

/// Resolve an item's span at the current column count.
///
/// `flexible_second` carries the first item and the second-item override when
/// (and only when) `item` is the flexible second item. The result is always
/// clamped to `[1, column_count]`; a malformed configuration is narrowed
/// rather than rejected.
pub fn resolve_span<K: ItemKey, S: SpanSource<K>>(
    spans: &S,
    item: &K,
    column_count: usize,
    flexible_second: Option<(&K, SecondItemSpan)>,
) -> usize {
    let breakpoint = SpanBreakpoint::from_column_count(column_count);
    let span = match flexible_second {
        Some((first_item, override_cfg)) => {
            let first_span = spans.span_config(first_item).resolve(breakpoint);
            match override_cfg {
                SecondItemSpan::Fixed(span) => span,
                SecondItemSpan::Bounded { min, max } => {
                    min.max(max.min(column_count.saturating_sub(first_span)))
                }
            }
        }
        None => spans.span_config(item).resolve(breakpoint),
    };
    span.clamp(1, column_count.max(1))
}
