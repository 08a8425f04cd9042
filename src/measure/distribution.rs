//! Measures that compare vectors as (unnormalized) distributions.
//!
//! Kolmogorov-Smirnov and chi-squared first shift each vector so its minimum
//! is zero when it has negative entries. Bray-Curtis is applied to the raw
//! values.

use ndarray::{Array1, ArrayView1};

use super::check_dims;
use crate::error::Result;

fn shift_non_negative(v: &ArrayView1<'_, f64>) -> Array1<f64> {
    let min = v.iter().copied().fold(f64::INFINITY, f64::min);
    if min >= 0.0 {
        v.to_owned()
    } else {
        v.mapv(|a| a - min)
    }
}

/// Kolmogorov-Smirnov style distance.
///
/// Both vectors are shifted to be non-negative and scaled to unit area (each
/// divided by its cumulative sum); the result is the largest absolute
/// difference between the two profiles.
pub fn kolmogorov_smirnov(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    let xs = shift_non_negative(&x);
    let ys = shift_non_negative(&y);
    let x_total = xs.sum();
    let y_total = ys.sum();
    Ok(xs
        .iter()
        .zip(ys.iter())
        .map(|(a, b)| (a / x_total - b / y_total).abs())
        .fold(0.0, f64::max))
}

/// Bray-Curtis dissimilarity, `Σ|x_i - y_i| / Σ|x_i + y_i|`.
pub fn bray_curtis(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    let (num, den) = x
        .iter()
        .zip(y.iter())
        .fold((0.0, 0.0), |(n, d), (a, b)| (n + (a - b).abs(), d + (a + b).abs()));
    Ok(num / den)
}

/// Chi-squared distance, `Σ (x_i - y_i)² / (eps + x_i + y_i)` over shifted vectors.
///
/// `eps` keeps empty bins from dividing by zero; the registry default is 1e-10.
pub fn chi_squared(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, eps: f64) -> Result<f64> {
    check_dims(&x, &y)?;
    let xs = shift_non_negative(&x);
    let ys = shift_non_negative(&y);
    Ok(xs
        .iter()
        .zip(ys.iter())
        .map(|(a, b)| (a - b).powi(2) / (eps + a + b))
        .sum())
}
