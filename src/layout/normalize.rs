/// Weight substituted for zero-weight entries before scaling.
pub const ZERO_WEIGHT_EPSILON: f64 = 1e-4;

/// Scale `weights` so the resulting areas sum to `width * height`.
///
/// Returns an empty vector when the weights sum to zero: there is nothing to
/// lay out and the caller renders a blank region. Otherwise every zero weight is
/// replaced by `epsilon` first, so those entries survive as thin slivers instead
/// of collapsing the packer, and the substituted total is used for scaling so
/// the areas still add up to the full canvas.
pub fn normalize_areas(weights: &[f64], width: f64, height: f64, epsilon: f64) -> Vec<f64> {
    let sanitized: Vec<f64> = weights
        .iter()
        .map(|&w| {
            let clean = sanitize_weight(w);
            if clean != w {
                tracing::warn!("Treating invalid weight {} as zero", w);
            }
            clean
        })
        .collect();

    let raw_total: f64 = sanitized.iter().sum();
    if raw_total <= 0.0 {
        return Vec::new();
    }

    let substituted: Vec<f64> = sanitized
        .into_iter()
        .map(|w| if w > 0.0 { w } else { epsilon })
        .collect();
    let total: f64 = substituted.iter().sum();
    let canvas_area = width.max(0.0) * height.max(0.0);

    substituted
        .into_iter()
        .map(|w| w * canvas_area / total)
        .collect()
}

/// Negative and non-finite weights count as zero.
pub(crate) fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight >= 0.0 {
        weight
    } else {
        0.0
    }
}
