//! Correlation-based measures.
//!
//! One Pearson coefficient implementation backs every correlation measure:
//! the dissimilarity form is `1 - r` (range [0, 2]) and the probability form
//! is `(r + 1) / 2` (range [0, 1], 1 for identical profiles). Spearman's rho
//! is Pearson's r over average ranks.
//!
//! Constant vectors have no defined correlation; they yield NaN.

use ndarray::{Array1, ArrayView1};

use super::check_dims;
use crate::error::Result;

/// Pearson correlation coefficient.
pub fn pearson_r(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    let n = x.len() as f64;
    let mean_x = x.sum() / n;
    let mean_y = y.sum() / n;

    let mut k = 0.0;
    let mut fx = 0.0;
    let mut fy = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        k += dx * dy;
        fx += dx * dx;
        fy += dy * dy;
    }
    Ok(k / (fx.sqrt() * fy.sqrt()))
}

/// Correlation distance, `1 - r`.
///
/// Backs the `Correlation` and `Pcc` registry ids.
pub fn correlation_distance(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    Ok(1.0 - pearson_r(x, y)?)
}

/// Pearson dissimilarity, `1 - r`.
pub fn pearson_dissimilarity(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    correlation_distance(x, y)
}

/// Pearson probability, `(r + 1) / 2`.
pub fn pearson_probability(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    Ok(0.5 * (pearson_r(x, y)? + 1.0))
}

/// Ranks starting at 1; ties share the average of the ranks they span.
fn average_ranks(v: &ArrayView1<'_, f64>) -> Array1<f64> {
    let n = v.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| v[a].total_cmp(&v[b]));

    let mut ranks = Array1::zeros(n);
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && v[order[j + 1]] == v[order[i]] {
            j += 1;
        }
        // positions i..=j hold equal values; 1-based average rank
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Spearman rank correlation coefficient.
pub fn spearman_r(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    let rx = average_ranks(&x);
    let ry = average_ranks(&y);
    pearson_r(rx.view(), ry.view())
}

/// Spearman dissimilarity, `1 - rho`.
pub fn spearman_dissimilarity(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    Ok(1.0 - spearman_r(x, y)?)
}

/// Spearman probability, `(rho + 1) / 2`.
pub fn spearman_probability(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    Ok(0.5 * (spearman_r(x, y)? + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn correlation_distance_matches_reference_values() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![4.0, 5.0, 6.0];
        assert!(correlation_distance(x.view(), y.view()).unwrap().abs() < 1e-12);

        let y = array![6.0, 5.0, 4.0];
        assert!((correlation_distance(x.view(), y.view()).unwrap() - 2.0).abs() < 1e-12);

        let x = array![1.0, 2.0, 3.0, 20.0, 150.0, 3.0];
        let y = array![6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let d = correlation_distance(x.view(), y.view()).unwrap();
        assert!((d - 1.424_548_643_312_325_6).abs() < 1e-12);

        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let d = correlation_distance(x.view(), y.view()).unwrap();
        assert!((d - 0.575_451_356_687_674_4).abs() < 1e-12);
    }

    #[test]
    fn probability_form_is_one_for_identical_profiles() {
        let x = array![0.3, 1.7, 2.2, 0.9];
        assert!((pearson_probability(x.view(), x.view()).unwrap() - 1.0).abs() < 1e-12);
        assert!((spearman_probability(x.view(), x.view()).unwrap() - 1.0).abs() < 1e-12);
        assert!(pearson_dissimilarity(x.view(), x.view()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn spearman_is_rank_based() {
        // monotone but nonlinear: rho = 1, r < 1
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![1.0, 4.0, 9.0, 100.0];
        assert!((spearman_r(x.view(), y.view()).unwrap() - 1.0).abs() < 1e-12);
        assert!(pearson_r(x.view(), y.view()).unwrap() < 0.99);
    }

    #[test]
    fn ties_get_average_ranks() {
        let v = array![10.0, 20.0, 10.0, 30.0];
        let r = average_ranks(&v.view());
        assert_eq!(r.to_vec(), vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn length_mismatch() {
        let x = array![1.0, 2.0];
        let y = array![1.0, 2.0, 3.0];
        assert!(spearman_r(x.view(), y.view()).is_err());
        assert!(pearson_probability(x.view(), y.view()).is_err());
    }
}
