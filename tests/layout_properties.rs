//! Property tests for the two-level treemap layout.
//!
//! Checks that hold for every input: the canvas is covered exactly, nothing
//! overlaps, the result does not depend on input order, cached fractions
//! rescale onto a fresh computation, and pixel snapping never opens seams.

use proptest::prelude::*;

use sectormap::layout::{compose, squarify, CacheKey, LayoutCache, LayoutConfig, Rect};
use sectormap::model::{Item, ItemSet};
use sectormap::render::{snap, FrameSource, PixelRect, Presentation, SnapOptions};

const SECTORS: [&str; 5] = ["Technology", "Energy", "Healthcare", "Financials", "Utilities"];

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((0usize..SECTORS.len(), 0.1f64..100.0), 1..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (sector, weight))| Item::new(&format!("T{i:03}"), SECTORS[sector], weight))
            .collect()
    })
}

fn canvas_strategy() -> impl Strategy<Value = (f64, f64)> {
    (10.0f64..2000.0, 10.0f64..2000.0)
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn rect_close(a: &Rect, b: &Rect, tol: f64) -> bool {
    close(a.x, b.x, tol) && close(a.y, b.y, tol) && close(a.w, b.w, tol) && close(a.h, b.h, tol)
}

fn absolute_by_ticker(items: &[Item], w: f64, h: f64) -> Vec<(String, Rect)> {
    let layout = compose(items, w, h, &LayoutConfig::default());
    let mut placed: Vec<(String, Rect)> = layout
        .items_absolute()
        .map(|p| (p.data.ticker.to_string(), p.rect))
        .collect();
    placed.sort_by(|a, b| a.0.cmp(&b.0));
    placed
}

proptest! {
    #[test]
    fn squarify_conserves_area(
        areas in prop::collection::vec(0.01f64..50.0, 1..30),
        (w, h) in canvas_strategy(),
    ) {
        let total: f64 = areas.iter().sum();
        let scale = w * h / total;
        let scaled: Vec<f64> = areas.iter().map(|a| a * scale).collect();

        let rects = squarify(&scaled, 0.0, 0.0, w, h);
        prop_assert_eq!(rects.len(), scaled.len());
        for (rect, area) in rects.iter().zip(&scaled) {
            prop_assert!(close(rect.area(), *area, 1e-6 * w * h));
        }
    }

    #[test]
    fn layout_covers_canvas_exactly(items in items_strategy(), (w, h) in canvas_strategy()) {
        let layout = compose(&items, w, h, &LayoutConfig::default());
        let canvas = w * h;

        let sector_area: f64 = layout.sectors.iter().map(|s| s.rect.area()).sum();
        prop_assert!(close(sector_area, canvas, 1e-6 * canvas));

        for sector in &layout.sectors {
            let inside: f64 = sector.items.iter().map(|p| p.rect.area()).sum();
            prop_assert!(close(inside, sector.rect.area(), 1e-6 * canvas));
        }

        let item_area: f64 = layout.items_absolute().map(|p| p.rect.area()).sum();
        prop_assert!(close(item_area, canvas, 1e-6 * canvas));
    }

    #[test]
    fn every_item_is_placed_once(items in items_strategy(), (w, h) in canvas_strategy()) {
        let placed = absolute_by_ticker(&items, w, h);
        let mut expected: Vec<String> = items.iter().map(|i| i.ticker.to_string()).collect();
        expected.sort();
        let got: Vec<String> = placed.into_iter().map(|(t, _)| t).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn items_do_not_overlap_and_stay_on_canvas(
        items in items_strategy(),
        (w, h) in canvas_strategy(),
    ) {
        let placed = absolute_by_ticker(&items, w, h);
        let edge = 1e-9 * w.max(h);
        let overlap = 1e-9 * w * h;

        for (i, (_, a)) in placed.iter().enumerate() {
            prop_assert!(a.x >= -edge && a.y >= -edge);
            prop_assert!(a.right() <= w + edge && a.bottom() <= h + edge);
            for (_, b) in &placed[i + 1..] {
                prop_assert!(a.intersection_area(b) <= overlap);
            }
        }
    }

    #[test]
    fn input_order_does_not_change_layout(items in items_strategy(), (w, h) in canvas_strategy()) {
        let forward = absolute_by_ticker(&items, w, h);

        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(&forward, &absolute_by_ticker(&reversed, w, h));

        let mut rotated = items;
        let mid = rotated.len() / 2;
        rotated.rotate_left(mid);
        prop_assert_eq!(&forward, &absolute_by_ticker(&rotated, w, h));
    }

    #[test]
    fn cached_fractions_rescale_onto_direct_layout(
        items in items_strategy(),
        (w, h) in canvas_strategy(),
    ) {
        let set = ItemSet::from_items(items);
        let cache = LayoutCache::default();
        cache.compute_and_cache(&set, w, h);

        let (w2, h2) = (2.0 * w, 2.0 * h);
        let direct = compose(&set, w2, h2, &LayoutConfig::default());
        let tol = 1e-6 * w2.max(h2);

        for sector in &direct.sectors {
            let rescaled = cache.rescale(&CacheKey::sector(sector.sector.name), w2, h2);
            prop_assert!(rescaled.is_some());
            let rescaled = rescaled.unwrap();
            prop_assert!(rect_close(&rescaled, &sector.rect, tol));

            for p in &sector.items {
                let key = CacheKey::item(sector.sector.name, &p.data.ticker);
                let item = cache.rescale(&key, rescaled.w, rescaled.h);
                prop_assert!(item.is_some());
                prop_assert!(rect_close(&item.unwrap(), &p.rect, tol));
            }
        }
    }

    #[test]
    fn snapped_row_has_no_seams(widths in prop::collection::vec(0.0f64..40.0, 1..30)) {
        let bounds = PixelRect::new(0, 0, 100_000, 10);
        let mut x: f64 = 0.0;
        let mut edge = 0;
        let mut total = 0;
        for &w in &widths {
            let px = snap(Rect::new(x, 0.0, w, 10.0), bounds, SnapOptions::FRAME);
            prop_assert_eq!(px.x, edge);
            edge = px.right();
            total += px.w;
            x += w;
        }
        prop_assert_eq!(total, x.round() as i32);
    }

    #[test]
    fn overview_replays_detail_tiling(
        items in items_strategy(),
        width in 200u32..1600,
        height in 150u32..1200,
        boost in 1.0f64..200.0,
    ) {
        let mut set = ItemSet::from_items(items);
        let cache = LayoutCache::default();
        Presentation::expanded().frame(&set, &cache, width, height);

        // Reweight without touching structure, then let the detail view recompute.
        let ticker = set.items()[0].ticker.clone();
        let weight = set.items()[0].weight;
        set.update_values(&ticker, Some(weight * boost), None);

        let detail = Presentation::expanded().frame(&set, &cache, width, height);
        let overview = Presentation::mini().frame(&set, &cache, width / 8, height / 8);
        prop_assert!(matches!(overview.source, FrameSource::Cached { .. }), "expected overview frame to be served from cache");

        let canvas = PixelRect::new(0, 0, width as i32, height as i32);
        for sector in &detail.sectors {
            prop_assert!(canvas.contains(&sector.rect));
        }

        let detail_order: Vec<&str> = detail.sectors.iter().map(|s| s.name).collect();
        let overview_order: Vec<&str> = overview.sectors.iter().map(|s| s.name).collect();
        prop_assert_eq!(detail_order, overview_order);

        for (small, large) in overview.sectors.iter().zip(&detail.sectors) {
            let (si, li) = (small.inner, large.inner);
            // Rounding in both views stays within 1px only when the overview is
            // the smaller of the two.
            if si.w > li.w || si.h > li.h {
                continue;
            }
            for cell in &small.cells {
                let Some(big) = large.cells.iter().find(|c| c.item.ticker == cell.item.ticker) else {
                    continue;
                };
                let fx = (big.rect.x - li.x) as f64 / li.w as f64;
                let fy = (big.rect.y - li.y) as f64 / li.h as f64;
                let dx = (cell.rect.x - si.x) as f64 - fx * si.w as f64;
                let dy = (cell.rect.y - si.y) as f64 - fy * si.h as f64;
                prop_assert!(dx.abs() <= 1.0 + 1e-9, "{} x off by {}", cell.item.ticker, dx);
                prop_assert!(dy.abs() <= 1.0 + 1e-9, "{} y off by {}", cell.item.ticker, dy);
            }
        }
    }
}
