pub mod cache;
pub mod compose;
pub mod normalize;
pub mod order;
pub mod squarify;

use serde::{Deserialize, Serialize};

pub use cache::{CacheKey, CacheSnapshot, LayoutCache};
pub use compose::{compose, ItemPlacement, SectorLayout, TreemapLayout};
pub use normalize::normalize_areas;
pub use order::{sort_descending, Weighted};
pub use squarify::squarify;

/// An axis-aligned rectangle, either in pixels or as fractions of a region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Zero-area rectangle anchored at `(x, y)`.
    pub const fn empty_at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Longest side over shortest side (1.0 = square). Infinite for degenerate rects.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_degenerate() {
            return f64::INFINITY;
        }
        self.w.max(self.h) / self.w.min(self.h)
    }

    /// Shift by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Express this rect as fractions of a `width` x `height` region whose
    /// origin is `(0, 0)`. A zero-sized region yields [`Rect::ZERO`].
    pub fn to_fraction(&self, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::ZERO;
        }
        Self::new(
            self.x / width,
            self.y / height,
            self.w / width,
            self.h / height,
        )
    }

    /// Inverse of [`Rect::to_fraction`]: scale fractional coordinates onto a
    /// `width` x `height` region.
    pub fn scale(&self, width: f64, height: f64) -> Self {
        Self::new(
            self.x * width,
            self.y * height,
            self.w * width,
            self.h * height,
        )
    }

    /// Area of the intersection with `other` (0 when disjoint or touching).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// A rectangle paired with the entry it was laid out for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed<T> {
    pub rect: Rect,
    pub data: T,
}

/// Configuration for treemap layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Width of the canonical canvas used to prime an empty cache
    pub canonical_width: f64,
    /// Height of the canonical canvas used to prime an empty cache
    pub canonical_height: f64,
    /// Weight substituted for zero-weight items so they stay visible as slivers
    pub zero_weight_epsilon: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canonical_width: 1200.0,
            canonical_height: 800.0,
            zero_weight_epsilon: normalize::ZERO_WEIGHT_EPSILON,
        }
    }
}
