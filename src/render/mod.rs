pub mod snap;

use std::collections::HashMap;

use crate::layout::{compose, LayoutCache, Rect, TreemapLayout};
use crate::model::{Item, ItemSet, Sector};

pub use snap::{snap, PixelRect, SnapOptions};

/// Whether a presentation writes the shared layout or only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Computes the authoritative layout at its own size and caches it
    Canonical,
    /// Rescales whatever the canonical presentation cached
    Replica,
}

/// Per-sector chrome that eats into the space available for item cells.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationStyle {
    /// Border inset (px) on the left, right and bottom of each sector
    pub margin: i32,
    /// Header band (px) at the top of each sector
    pub header: i32,
    /// The header is only shown on sectors taller than this (px)
    pub header_min_height: i32,
    /// Overlap item cells by 1px so borderless rendering shows no seams
    pub overlap: bool,
}

impl PresentationStyle {
    /// Large detail view: 1px bezel and a 16px sector header.
    pub fn expanded() -> Self {
        Self {
            margin: 1,
            header: 16,
            header_min_height: 45,
            overlap: false,
        }
    }

    /// Small overview: no chrome, overlapping cells.
    pub fn mini() -> Self {
        Self {
            margin: 0,
            header: 0,
            header_min_height: 0,
            overlap: true,
        }
    }

    /// Area left for item cells inside a snapped sector frame.
    pub fn inner(&self, frame: PixelRect) -> PixelRect {
        let top = if self.header > 0 && frame.h > self.header_min_height {
            self.header
        } else {
            0
        };
        PixelRect::new(
            frame.x + self.margin,
            frame.y + top,
            frame.w - 2 * self.margin,
            frame.h - self.margin - top,
        )
    }
}

impl Default for PresentationStyle {
    fn default() -> Self {
        Self::expanded()
    }
}

/// Where a frame's geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// Computed at this size and written to the cache
    Computed,
    /// Rescaled from a cached snapshot
    Cached { generation: u64 },
    /// Nothing usable was cached; computed at this size without caching
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a> {
    pub rect: PixelRect,
    pub item: &'a Item,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorFrame<'a> {
    pub name: &'a str,
    /// Sector bezel in canvas pixels
    pub rect: PixelRect,
    /// Region the cells were laid into
    pub inner: PixelRect,
    /// Weight-averaged change for the header
    pub change: Option<f64>,
    pub cells: Vec<Cell<'a>>,
}

/// Pixel geometry for one presentation at one size.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub width: u32,
    pub height: u32,
    pub source: FrameSource,
    pub sectors: Vec<SectorFrame<'a>>,
}

impl<'a> Frame<'a> {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell<'a>> + '_ {
        self.sectors.iter().flat_map(|s| s.cells.iter())
    }

    pub fn cell(&self, ticker: &str) -> Option<&Cell<'a>> {
        self.cells().find(|c| c.item.ticker == ticker)
    }

    pub fn sector(&self, name: &str) -> Option<&SectorFrame<'a>> {
        self.sectors.iter().find(|s| s.name == name)
    }
}

/// A sector in floating canvas coordinates with its items as fractions of
/// the sector region.
struct SectorPlan<'a> {
    sector: Sector<'a>,
    rect: Rect,
    items: Vec<(&'a Item, Rect)>,
}

/// One sized view of an item set.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub role: Role,
    pub style: PresentationStyle,
}

impl Presentation {
    pub fn new(role: Role, style: PresentationStyle) -> Self {
        Self { role, style }
    }

    /// The canonical detail view.
    pub fn expanded() -> Self {
        Self::new(Role::Canonical, PresentationStyle::expanded())
    }

    /// The read-only overview.
    pub fn mini() -> Self {
        Self::new(Role::Replica, PresentationStyle::mini())
    }

    /// Lay `set` out at `width` x `height` pixels.
    ///
    /// A canonical presentation recomputes and publishes the layout; a replica
    /// rescales the cached one and computes locally only when the cache has
    /// nothing current for `set`.
    pub fn frame<'a>(&self, set: &'a ItemSet, cache: &LayoutCache, width: u32, height: u32) -> Frame<'a> {
        let mut frame = Frame {
            width,
            height,
            source: FrameSource::Fallback,
            sectors: Vec::new(),
        };
        if width == 0 || height == 0 {
            return frame;
        }

        let (w, h) = (width as f64, height as f64);
        let plans = match self.role {
            Role::Canonical => {
                cache.sync_structure(set.structure_version());
                frame.source = FrameSource::Computed;
                plans_from_layout(cache.compute_and_cache(set, w, h))
            }
            Role::Replica => {
                let snapshot = cache.snapshot();
                if snapshot.is_current_for(set) {
                    frame.source = FrameSource::Cached {
                        generation: snapshot.generation(),
                    };
                    plans_from_snapshot(set, &snapshot, w, h)
                } else {
                    tracing::debug!(
                        "No current cached layout, computing {}x{} directly",
                        width,
                        height
                    );
                    plans_from_layout(compose(set, w, h, cache.config()))
                }
            }
        };

        let canvas = PixelRect::new(
            0,
            0,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        frame.sectors = plans
            .into_iter()
            .map(|plan| self.snap_sector(plan, canvas))
            .collect();
        frame
    }

    fn snap_sector<'a>(&self, plan: SectorPlan<'a>, canvas: PixelRect) -> SectorFrame<'a> {
        let rect = snap(plan.rect, canvas, SnapOptions::FRAME);
        let inner = self.style.inner(rect);
        let change = plan.sector.weighted_change();

        let cells = if inner.w <= 0 || inner.h <= 0 {
            tracing::debug!(
                "Sector '{}' too small for cells ({}x{})",
                plan.sector.name,
                rect.w,
                rect.h
            );
            Vec::new()
        } else {
            let local = PixelRect::new(0, 0, inner.w, inner.h);
            let options = SnapOptions::CELL.with_overlap(self.style.overlap);
            plan.items
                .into_iter()
                .map(|(item, fraction)| Cell {
                    rect: snap(fraction.scale(inner.w as f64, inner.h as f64), local, options)
                        .translate(inner.x, inner.y),
                    item,
                })
                .collect()
        };

        SectorFrame {
            name: plan.sector.name,
            rect,
            inner,
            change,
            cells,
        }
    }
}

fn plans_from_layout(layout: TreemapLayout<'_>) -> Vec<SectorPlan<'_>> {
    layout
        .sectors
        .into_iter()
        .map(|s| {
            let items = s
                .items
                .iter()
                .map(|p| (p.data, p.rect.to_fraction(s.rect.w, s.rect.h)))
                .collect();
            SectorPlan {
                sector: s.sector,
                rect: s.rect,
                items,
            }
        })
        .collect()
}

/// Join cached fractions with the live item set. Entries whose sector or
/// ticker the set no longer has (or files elsewhere) are skipped.
fn plans_from_snapshot<'a>(
    set: &'a ItemSet,
    snapshot: &crate::layout::CacheSnapshot,
    width: f64,
    height: f64,
) -> Vec<SectorPlan<'a>> {
    let mut live: HashMap<&'a str, Sector<'a>> =
        set.sectors().into_iter().map(|s| (s.name, s)).collect();

    let mut plans = Vec::with_capacity(snapshot.sectors().len());
    for cached in snapshot.sectors() {
        let Some(sector) = live.remove(cached.name.as_str()) else {
            tracing::debug!("Skipping cached sector '{}' not in item set", cached.name);
            continue;
        };

        let items = cached
            .items
            .iter()
            .filter_map(|c| match set.get(&c.ticker) {
                Some(item) if item.sector == cached.name => Some((item, c.fraction)),
                _ => {
                    tracing::debug!(
                        "Skipping cached item '{}' not in sector '{}'",
                        c.ticker,
                        cached.name
                    );
                    None
                }
            })
            .collect();

        plans.push(SectorPlan {
            sector,
            rect: cached.fraction.scale(width, height),
            items,
        });
    }
    plans
}
