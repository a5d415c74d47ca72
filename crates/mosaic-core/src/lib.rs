#![forbid(unsafe_code)]

//! Core primitives for the Mosaic masonry engine.
//!
//! This crate holds the pieces shared by every layout strategy:
//!
//! - [`Position`] - a placed item's rectangle in pixel space
//! - [`MeasurementStore`] - item-keyed height cache
//! - [`PositionStore`] - item-keyed position cache
//! - [`ItemKey`] - the key bound items must satisfy
//!
//! Both stores represent "missing" data as `None` rather than an error:
//! the engine runs repeatedly as measurements arrive, so an absent height
//! simply means the item has not been measured yet.

pub mod geometry;
pub mod store;

pub use geometry::{OFFSCREEN, Position, intervals_overlap};
pub use store::{ItemKey, MeasurementStore, PositionStore};
