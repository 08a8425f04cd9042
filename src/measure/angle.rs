//! Angle-based measures.

use ndarray::ArrayView1;

use super::check_dims;
use crate::error::Result;

fn cosine_of(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> f64 {
    let dot = x.dot(y);
    let den = (x.dot(x) * y.dot(y)).sqrt();
    dot / den
}

/// Cosine distance, `1 - cos(x, y)`.
///
/// A zero vector has no direction; the result is NaN in that case.
pub fn cosine(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    Ok(1.0 - cosine_of(&x, &y))
}

/// Spectral Angle Mapper: the angle in radians between `x` and `y`.
///
/// The cosine is clipped to [-1, 1] first so rounding overshoot never
/// leaves the domain of `acos`.
pub fn spectral_angle(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_dims(&x, &y)?;
    Ok(cosine_of(&x, &y).clamp(-1.0, 1.0).acos())
}
