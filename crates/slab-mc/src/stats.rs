// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Cycle Statistics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Running statistics over active-cycle estimates.

use ndarray::Array1;

/// Source-shape probabilities below this cutoff are skipped when
/// accumulating Shannon entropy; `p ln p -> 0` as `p -> 0` but the
/// floating-point product does not.
pub const ENTROPY_CUTOFF: f64 = 1e-14;

/// Population mean and standard deviation of a sample:
/// `sigma = sqrt(<x^2> - <x>^2)` with the `1/N` normalization.
/// An empty sample yields `(0, 0)`.
pub fn mean_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mean_sq = values.iter().map(|v| v * v).sum::<f64>() / n;
    // Rounding can push the variance a hair below zero for constant samples.
    let var = (mean_sq - mean * mean).max(0.0);
    (mean, var.sqrt())
}

/// Shannon entropy `-sum p ln p` of a binned source shape.
///
/// Bins enter by absolute weight, normalized by the total absolute
/// weight; an all-zero shape has entropy 0.
pub fn shannon_entropy(shape: &Array1<f64>) -> f64 {
    let total: f64 = shape.iter().map(|w| w.abs()).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let mut h = 0.0;
    for w in shape.iter() {
        let p = w.abs() / total;
        if p > ENTROPY_CUTOFF {
            h += p * p.ln();
        }
    }
    -h
}

/// Euclidean norm of a shape vector.
pub fn l2_norm(shape: &Array1<f64>) -> f64 {
    shape.iter().map(|w| w * w).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_stddev_known_sample() {
        let (mean, stddev) = mean_stddev(&[1.0, 2.0, 3.0, 4.0]);
        assert!((mean - 2.5).abs() < 1e-12);
        // Population variance of {1,2,3,4} is 1.25.
        assert!((stddev - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_stddev_constant_sample() {
        let (mean, stddev) = mean_stddev(&[0.7; 50]);
        assert!((mean - 0.7).abs() < 1e-12);
        assert_eq!(stddev, 0.0);
    }

    #[test]
    fn test_mean_stddev_empty() {
        assert_eq!(mean_stddev(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_entropy_point_shape_is_zero() {
        let shape = array![0.0, 0.0, 3.5, 0.0];
        assert_eq!(shannon_entropy(&shape), 0.0);
    }

    #[test]
    fn test_entropy_uniform_shape_is_log_bins() {
        let shape = Array1::from_elem(16, 0.25);
        assert!((shannon_entropy(&shape) - (16.0f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_sign_insensitive() {
        let pos = array![1.0, 2.0, 3.0];
        let mixed = array![-1.0, 2.0, -3.0];
        assert!((shannon_entropy(&pos) - shannon_entropy(&mixed)).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_zero_shape() {
        let shape = Array1::zeros(8);
        assert_eq!(shannon_entropy(&shape), 0.0);
    }

    #[test]
    fn test_l2_norm() {
        let shape = array![3.0, 4.0];
        assert!((l2_norm(&shape) - 5.0).abs() < 1e-12);
    }
}
