#![forbid(unsafe_code)]

//! Pixel-space geometry.

/// Sentinel coordinate for items parked off-screen while awaiting measurement.
pub const OFFSCREEN: f64 = -9999.0;

/// A placed item's rectangle in pixel coordinates (origin at top-left).
///
/// All fields are finite once an item has been placed. Unmeasured items carry
/// the [`Position::offscreen`] placeholder instead: a huge negative offset and
/// an infinite height, so they can be rendered invisibly for measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Distance from the top of the grid.
    pub top: f64,
    /// Distance from the left edge of the grid.
    pub left: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Placeholder for an item whose height is not yet known.
    ///
    /// The item renders at the given width, far above the viewport, so the
    /// host can measure it without it being visible.
    #[inline]
    pub const fn offscreen(width: f64) -> Self {
        Self {
            top: OFFSCREEN,
            left: OFFSCREEN,
            width,
            height: f64::INFINITY,
        }
    }

    /// Whether this is a measurement placeholder rather than a real placement.
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.top <= OFFSCREEN || self.left <= OFFSCREEN
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether the horizontal extents of two positions overlap.
    ///
    /// Exactly-touching edges do not count as overlap, so items that only
    /// share a boundary pixel never cascade shifts into each other.
    #[inline]
    pub fn h_overlaps(&self, other: &Position) -> bool {
        intervals_overlap(self.left, self.right(), other.left, other.right())
    }
}

/// Overlap test for two half-open horizontal intervals.
///
/// Zero-width intervals overlap nothing, including themselves.
#[inline]
pub fn intervals_overlap(a_left: f64, a_right: f64, b_left: f64, b_right: f64) -> bool {
    a_left < b_right && a_right > b_left
}
