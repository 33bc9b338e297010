//! Optimal filter sizing.
//!
//! - m = -n·ln(fpr) / ln(2)²
//! - k = (m/n)·ln(2)

use std::f64::consts::LN_2;

/// Filter size and hash count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterParams {
    pub size_bits: usize,
    pub hash_count: usize,
}

/// Smallest filter meeting `target_fpr` for `num_elements`.
pub fn optimal_parameters(num_elements: usize, target_fpr: f64) -> FilterParams {
    if num_elements == 0 {
        return FilterParams {
            size_bits: 8,
            hash_count: 1,
        };
    }

    let n = num_elements as f64;
    let fpr = target_fpr.clamp(f64::MIN_POSITIVE, 0.999);
    let m = (-n * fpr.ln() / (LN_2 * LN_2)).ceil().max(8.0) as usize;
    let k = ((m as f64 / n) * LN_2).round() as usize;

    FilterParams {
        size_bits: m,
        hash_count: k.clamp(1, 32),
    }
}
