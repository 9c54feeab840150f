//! Multi-column masonry layout with a size-keyed frame cache.
//!
//! # Placement
//!
//! Items are dealt into columns strictly in sequence: item `i` lands in
//! column `i % columns`, regardless of how tall each column has grown. Each
//! column stacks its items top to bottom. A cell's outer frame is
//! `height_for(i) + 2 * padding` tall and one column wide; the visible frame
//! is that outer frame inset by `padding` on every side.
//!
//! ```text
//!  column 0     column 1     column 2
//! ┌────────┐   ┌────────┐   ┌────────┐
//! │   0    │   │   1    │   │   2    │
//! │        │   └────────┘   │        │
//! └────────┘   ┌────────┐   └────────┘
//! ┌────────┐   │   4    │   ┌────────┐
//! │   3    │   │        │   │   5    │
//! ```
//!
//! # Caching
//!
//! [`MasonryLayout::prepare`] computes every frame once and stores it. Later
//! passes return the cached frames untouched until the cache is invalidated,
//! which happens when the container size changes ([`MasonryLayout::set_bounds`])
//! or when the owner reloads its data ([`MasonryLayout::invalidate`]).

use super::geometry::{Rect, Size};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("item index {index} out of bounds for {len} laid-out items")]
    OutOfBounds { index: usize, len: usize },
}

/// Supplies the content height of each item, excluding cell padding.
///
/// Passed explicitly to [`MasonryLayout::prepare`] so the layout never holds
/// a reference back to its owner.
pub trait HeightProvider {
    fn height_for(&self, index: usize) -> f64;
}

impl<F> HeightProvider for F
where
    F: Fn(usize) -> f64,
{
    fn height_for(&self, index: usize) -> f64 {
        self(index)
    }
}

/// Fixed layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasonryConfig {
    pub columns: usize,
    /// Inset applied on all four sides of each cell.
    pub cell_padding: f64,
    /// Item height used when no [`HeightProvider`] is supplied.
    pub fallback_height: f64,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            cell_padding: 6.0,
            fallback_height: 180.0,
        }
    }
}

/// Computed placement of a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutAttributes {
    pub index: usize,
    pub column: usize,
    /// Visible frame, already inset by the cell padding.
    pub frame: Rect,
}

#[derive(Debug, Clone)]
pub struct MasonryLayout {
    config: MasonryConfig,
    bounds: Size,
    cache: Vec<LayoutAttributes>,
    content_height: f64,
}

impl MasonryLayout {
    pub fn new(config: MasonryConfig) -> Self {
        Self {
            config: MasonryConfig {
                columns: config.columns.max(1),
                ..config
            },
            bounds: Size::ZERO,
            cache: Vec::new(),
            content_height: 0.0,
        }
    }

    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Width available to the columns.
    pub fn content_width(&self) -> f64 {
        self.bounds.width
    }

    pub fn column_width(&self) -> f64 {
        self.content_width() / self.config.columns as f64
    }

    /// Total scrollable size: container width by the tallest column's bottom edge.
    pub fn content_size(&self) -> Size {
        Size::new(self.content_width(), self.content_height)
    }

    /// True if a container resize to `new_size` requires recomputing frames.
    pub fn should_invalidate(&self, new_size: Size) -> bool {
        new_size != self.bounds
    }

    /// Record the container size, dropping cached frames if it changed.
    ///
    /// Returns whether the cache was invalidated.
    pub fn set_bounds(&mut self, size: Size) -> bool {
        if !self.should_invalidate(size) {
            return false;
        }
        self.bounds = size;
        self.invalidate();
        true
    }

    /// Drop all cached frames so the next [`prepare`](Self::prepare) recomputes.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.content_height = 0.0;
    }

    pub fn is_prepared(&self) -> bool {
        !self.cache.is_empty()
    }

    /// Compute frames for items `0..item_count` unless they are already cached.
    ///
    /// Heights come from `heights`, or from
    /// [`fallback_height`](MasonryConfig::fallback_height) when `None`.
    pub fn prepare(&mut self, item_count: usize, heights: Option<&dyn HeightProvider>) {
        if !self.cache.is_empty() {
            return;
        }

        let columns = self.config.columns;
        let padding = self.config.cell_padding;
        let column_width = self.column_width();
        let x_offsets: Vec<f64> = (0..columns).map(|c| c as f64 * column_width).collect();
        let mut y_offsets = vec![0.0_f64; columns];

        self.cache.reserve(item_count);
        self.content_height = 0.0;

        for index in 0..item_count {
            let column = index % columns;
            let item_height = heights
                .map(|h| h.height_for(index))
                .unwrap_or(self.config.fallback_height)
                .max(0.0);
            let height = padding * 2.0 + item_height;
            let outer = Rect::new(x_offsets[column], y_offsets[column], column_width, height);

            self.cache.push(LayoutAttributes {
                index,
                column,
                frame: outer.inset_by(padding, padding),
            });

            self.content_height = self.content_height.max(outer.max_y());
            y_offsets[column] += height;
        }
    }

    /// All cached attributes, in item order.
    pub fn attributes(&self) -> &[LayoutAttributes] {
        &self.cache
    }

    /// Attributes whose frames intersect `rect`, in item order.
    pub fn attributes_in(&self, rect: &Rect) -> Vec<&LayoutAttributes> {
        self.cache
            .iter()
            .filter(|attrs| attrs.frame.intersects(rect))
            .collect()
    }

    /// Attributes for a single item. Fails before `prepare` or past the item count.
    pub fn attributes_at(&self, index: usize) -> Result<&LayoutAttributes, LayoutError> {
        self.cache.get(index).ok_or(LayoutError::OutOfBounds {
            index,
            len: self.cache.len(),
        })
    }
}

impl Default for MasonryLayout {
    fn default() -> Self {
        Self::new(MasonryConfig::default())
    }
}
