use serde::Serialize;

use crate::layout::Rect;

/// Integer pixel geometry handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }

    pub fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// How a floating rectangle is turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapOptions {
    /// Grow every rect by 1px right and down so neighbours overlap
    pub overlap: bool,
    /// Smallest width/height ever produced
    pub min_size: i32,
    /// Far edges this close to the bounds' far edge are pulled onto it
    pub edge_tolerance: i32,
}

impl SnapOptions {
    /// Item cells: at least 2px so no cell disappears.
    pub const CELL: SnapOptions = SnapOptions {
        overlap: false,
        min_size: 2,
        edge_tolerance: 1,
    };

    /// Sector frames: edge snapping only.
    pub const FRAME: SnapOptions = SnapOptions {
        overlap: false,
        min_size: 0,
        edge_tolerance: 1,
    };

    pub fn with_overlap(mut self, overlap: bool) -> Self {
        self.overlap = overlap;
        self
    }
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self::CELL
    }
}

/// Snap `rect` to whole pixels inside `bounds`.
///
/// Width and height come from rounding both edges (`round(x + w) - round(x)`)
/// so adjacent rects share their rounded edge and a row never opens a gap.
pub fn snap(rect: Rect, bounds: PixelRect, options: SnapOptions) -> PixelRect {
    let x = round_px(rect.x);
    let y = round_px(rect.y);
    let mut w = round_px(rect.right()).saturating_sub(x);
    let mut h = round_px(rect.bottom()).saturating_sub(y);

    if options.overlap {
        w = w.saturating_add(1);
        h = h.saturating_add(1);
    }

    if x.saturating_add(w) >= bounds.right().saturating_sub(options.edge_tolerance) {
        w = w.max(bounds.right().saturating_sub(x));
    }
    if y.saturating_add(h) >= bounds.bottom().saturating_sub(options.edge_tolerance) {
        h = h.max(bounds.bottom().saturating_sub(y));
    }

    let min = options.min_size.max(0);
    PixelRect::new(x, y, w.max(min), h.max(min))
}

fn round_px(v: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    v.round() as i32
}
