use crate::model::{group_by_sector, Item, Sector};

use super::normalize::normalize_areas;
use super::order::{layout_order, Weighted};
use super::squarify::squarify;
use super::{LayoutConfig, Placed, Rect};

pub type ItemPlacement<'a> = Placed<&'a Item>;

/// One sector's region on the canvas and its items' regions inside it.
#[derive(Debug, Clone)]
pub struct SectorLayout<'a> {
    pub sector: Sector<'a>,
    /// Sector region in canvas coordinates
    pub rect: Rect,
    /// Item regions relative to the sector's own origin
    pub items: Vec<ItemPlacement<'a>>,
}

/// The full two-level layout for one canvas size.
#[derive(Debug, Clone)]
pub struct TreemapLayout<'a> {
    pub width: f64,
    pub height: f64,
    /// Sectors in layout order
    pub sectors: Vec<SectorLayout<'a>>,
}

impl<'a> TreemapLayout<'a> {
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sectors.iter().map(|s| s.items.len()).sum()
    }

    pub fn sector(&self, name: &str) -> Option<&SectorLayout<'a>> {
        self.sectors.iter().find(|s| s.sector.name == name)
    }

    /// Every item placement translated into canvas coordinates.
    pub fn items_absolute(&self) -> impl Iterator<Item = ItemPlacement<'a>> + '_ {
        self.sectors.iter().flat_map(|s| {
            s.items.iter().map(move |p| Placed {
                rect: p.rect.translate(s.rect.x, s.rect.y),
                data: p.data,
            })
        })
    }
}

/// Pack `entries` into the region `(x, y, w, h)`.
///
/// Returns `(index into entries, rect)` pairs in layout order. Empty when the
/// entries carry no weight at all.
pub fn pack<T: Weighted>(
    entries: &[T],
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    epsilon: f64,
) -> Vec<(usize, Rect)> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| layout_order(&entries[a], &entries[b]));

    let weights: Vec<f64> = order.iter().map(|&i| entries[i].weight()).collect();
    let areas = normalize_areas(&weights, w, h, epsilon);
    if areas.is_empty() {
        return Vec::new();
    }

    order.into_iter().zip(squarify(&areas, x, y, w, h)).collect()
}

/// Lay out `entries` within `(x, y, w, h)`, borrowing each entry as the
/// placement's payload.
pub fn layout_weighted<T: Weighted>(
    entries: &[T],
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    epsilon: f64,
) -> Vec<Placed<&T>> {
    pack(entries, x, y, w, h, epsilon)
        .into_iter()
        .map(|(i, rect)| Placed {
            rect,
            data: &entries[i],
        })
        .collect()
}

/// Two-pass layout: sectors across the `width` x `height` canvas, then each
/// sector's items inside that sector's own frame (origin at the sector corner).
pub fn compose<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> TreemapLayout<'a> {
    let sectors = group_by_sector(items);
    let placed = pack(&sectors, 0.0, 0.0, width, height, config.zero_weight_epsilon);

    if placed.is_empty() && !sectors.is_empty() {
        tracing::debug!(
            "No weight across {} sectors, leaving {:.0}x{:.0} canvas blank",
            sectors.len(),
            width,
            height
        );
    }

    let mut slots: Vec<Option<Sector<'a>>> = sectors.into_iter().map(Some).collect();
    let mut layout = TreemapLayout {
        width,
        height,
        sectors: Vec::with_capacity(placed.len()),
    };

    for (index, rect) in placed {
        let Some(sector) = slots[index].take() else {
            continue;
        };

        let items: Vec<ItemPlacement<'a>> = pack(
            &sector.items,
            0.0,
            0.0,
            rect.w,
            rect.h,
            config.zero_weight_epsilon,
        )
        .into_iter()
        .map(|(i, item_rect)| Placed {
            rect: item_rect,
            data: sector.items[i],
        })
        .collect();

        if items.is_empty() {
            tracing::debug!(
                "Skipping {} items of sector '{}' with zero total weight",
                sector.items.len(),
                sector.name
            );
        }

        layout.sectors.push(SectorLayout {
            sector,
            rect,
            items,
        });
    }

    layout
}
