//! Minkowski family: Euclidean (p = 2), Manhattan (p = 1) and general Lp.

use ndarray::ArrayView1;

use super::check_dims;
use crate::error::{Error, Result};

/// Euclidean (L2) distance.
pub fn euclidean(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    Ok(x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Manhattan (L1) distance.
pub fn manhattan(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    Ok(x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum())
}

/// Minkowski (Lp) distance, `(Σ |x_i - y_i|^p)^(1/p)`.
///
/// `p` must be positive; the registry default is 5.
pub fn minkowski(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, p: f64) -> Result<f64> {
    if !(p > 0.0) || !p.is_finite() {
        return Err(Error::InvalidParameter {
            name: "p",
            message: "must be a positive finite number",
        });
    }
    check_dims(&x, &y)?;
    let s: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).abs().powf(p))
        .sum();
    Ok(s.powf(1.0 / p))
}
