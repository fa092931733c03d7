use std::cmp::Ordering;

use super::normalize::sanitize_weight;

/// Anything the composer can lay out: a weight plus a stable identifier.
pub trait Weighted {
    fn weight(&self) -> f64;
    fn key(&self) -> &str;
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn key(&self) -> &str {
        (**self).key()
    }
}

/// Total order used before packing: heavier first, equal weights by
/// identifier (ascending).
pub fn layout_order<T: Weighted>(a: &T, b: &T) -> Ordering {
    sanitize_weight(b.weight())
        .total_cmp(&sanitize_weight(a.weight()))
        .then_with(|| a.key().cmp(b.key()))
}

/// Borrow `entries` in layout order. The result does not depend on the order
/// of the input slice.
pub fn sort_descending<T: Weighted>(entries: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = entries.iter().collect();
    sorted.sort_by(|a, b| layout_order(*a, *b));
    sorted
}
