//! Grid layout.
//!
//! - **Geometry**: pure rectangle/size math (unit testable)
//! - **Masonry**: the column-dealing layout engine and its frame cache

mod geometry;
pub mod masonry;

pub use geometry::{Rect, Size};
pub use masonry::{HeightProvider, LayoutAttributes, LayoutError, MasonryConfig, MasonryLayout};
