use std::f64::consts::PI;

/// Univariate normal density. `variance` must be strictly positive.
#[inline]
pub fn gaussian_density(x: f64, mean: f64, variance: f64) -> f64 {
    let diff = x - mean;
    (-(diff * diff) / (2.0 * variance)).exp() / (2.0 * PI * variance).sqrt()
}

/// Natural log of [`gaussian_density`]; stays finite where the density
/// underflows to zero.
#[inline]
pub fn gaussian_log_density(x: f64, mean: f64, variance: f64) -> f64 {
    let diff = x - mean;
    -(diff * diff) / (2.0 * variance) - 0.5 * (2.0 * PI * variance).ln()
}

/// Index of the largest finite value; the lowest index wins ties.
#[inline]
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        if best.is_none() || x > best_value {
            best = Some(i);
            best_value = x;
        }
    }
    best
}
