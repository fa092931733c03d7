use super::Rect;

/// Squarified layout (Bruls, Huizing & van Wijk 2000).
///
/// `areas` must already be in layout order (descending) and normalized so they
/// sum to `w * h`. Returns exactly one rectangle per area, in input order.
/// Once the free region is used up, any areas still unplaced get zero-area
/// rectangles at the region's origin.
pub fn squarify(areas: &[f64], mut x: f64, mut y: f64, mut w: f64, mut h: f64) -> Vec<Rect> {
    let mut result = Vec::with_capacity(areas.len());

    // Current row is areas[row_start..next].
    let mut row_start = 0;
    let mut next = 0;
    // A wide region gets a vertical band along its left edge, a tall one a
    // horizontal band along its top edge. `side` is the band's fixed length.
    let mut vertical = w > h;
    let mut side = if vertical { h } else { w };

    while next < areas.len() {
        if side <= 0.0 {
            tracing::debug!(
                "Squarify: region exhausted with {} areas unplaced",
                areas.len() - next
            );
            break;
        }

        if row_start == next && next == areas.len() - 1 {
            // Last one with nothing pending: hand it the whole free region so
            // floating error never leaves a gap at the far edge.
            result.push(Rect::new(x, y, w.max(0.0), h.max(0.0)));
            next += 1;
            row_start = next;
            continue;
        }

        let row = &areas[row_start..next];
        let extended = &areas[row_start..=next];
        let current = worst_aspect_ratio(row, row.iter().sum(), side);
        let candidate = worst_aspect_ratio(extended, extended.iter().sum(), side);

        // Ties extend the row.
        if current >= candidate {
            next += 1;
            continue;
        }

        let thickness = place_row(row, x, y, side, vertical, &mut result);
        if vertical {
            x += thickness;
            w = (w - thickness).max(0.0);
        } else {
            y += thickness;
            h = (h - thickness).max(0.0);
        }
        row_start = next;
        vertical = w > h;
        side = if vertical { h } else { w };
    }

    if row_start < next {
        place_row(&areas[row_start..next], x, y, side, vertical, &mut result);
    }

    for _ in next..areas.len() {
        result.push(Rect::empty_at(x, y));
    }

    result
}

/// Lay `row` out as one band starting at `(x, y)`. Returns the band's thickness.
fn place_row(row: &[f64], x: f64, y: f64, side: f64, vertical: bool, out: &mut Vec<Rect>) -> f64 {
    let row_area: f64 = row.iter().sum();
    let thickness = if side > 0.0 { row_area / side } else { 0.0 };

    let mut offset = 0.0;
    for &area in row {
        let length = if thickness > 0.0 { area / thickness } else { 0.0 };
        let rect = if vertical {
            Rect::new(x, y + offset, thickness, length)
        } else {
            Rect::new(x + offset, y, length, thickness)
        };
        out.push(rect);
        offset += length;
    }

    thickness
}

/// Worst aspect ratio of `row` laid along a band of length `side`.
/// An empty row (or one that cannot be laid out) scores infinity.
fn worst_aspect_ratio(row: &[f64], sum: f64, side: f64) -> f64 {
    if row.is_empty() || sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    let max_r = row.iter().copied().fold(0.0, f64::max);
    let min_r = row.iter().copied().fold(f64::INFINITY, f64::min);
    let a = (side_sq * max_r) / sum_sq;
    let b = sum_sq / (side_sq * min_r);
    a.max(b)
}

#[cfg(test)]
mod tests {
    use super::{squarify, worst_aspect_ratio};
    use crate::layout::Rect;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn single_item_fills_viewport_without_axis_swap() {
        let rects = squarify(&[1920.0 * 1080.0], 0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]);
    }

    #[test]
    fn layout_preserves_area_for_simple_case() {
        let areas = [400.0, 300.0, 200.0, 100.0];
        let rects = squarify(&areas, 0.0, 0.0, 50.0, 20.0);
        assert_eq!(rects.len(), areas.len());
        let total_in: f64 = areas.iter().sum();
        let total_out: f64 = rects.iter().map(|r| r.area()).sum();
        assert!((total_in - total_out).abs() < 1e-6);
    }

    #[test]
    fn dominant_item_takes_its_own_band() {
        let rects = squarify(&[6000.0, 3000.0, 1000.0], 0.0, 0.0, 100.0, 100.0);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 100.0, 60.0));
        assert_close(rects[1].area(), 3000.0);
        assert_close(rects[2].area(), 1000.0);
        for r in &rects {
            assert!(r.aspect_ratio() <= 3.0, "{:?}", r);
        }
    }

    #[test]
    fn equal_ratios_keep_growing_the_row() {
        // [A] and [A, B] both score 2.0 on a 100px side; the tie keeps B in the row.
        let rects = squarify(&[5000.0, 5000.0], 0.0, 0.0, 100.0, 100.0);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 50.0, 100.0));
        assert_eq!(rects[1], Rect::new(50.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn zero_sized_region_yields_empty_rects() {
        let rects = squarify(&[0.0, 0.0, 0.0], 5.0, 7.0, 0.0, 40.0);
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|r| *r == Rect::empty_at(5.0, 7.0)));
    }

    #[test]
    fn origin_offsets_every_rect() {
        let rects = squarify(&[50.0, 30.0, 20.0], 10.0, 20.0, 10.0, 10.0);
        for r in &rects {
            assert!(r.x >= 10.0 - 1e-9 && r.right() <= 20.0 + 1e-9);
            assert!(r.y >= 20.0 - 1e-9 && r.bottom() <= 30.0 + 1e-9);
        }
    }

    #[test]
    fn empty_row_scores_infinity() {
        assert_eq!(worst_aspect_ratio(&[], 0.0, 10.0), f64::INFINITY);
        assert_eq!(worst_aspect_ratio(&[4.0], 4.0, 0.0), f64::INFINITY);
        assert_close(worst_aspect_ratio(&[100.0], 100.0, 10.0), 1.0);
    }
}
