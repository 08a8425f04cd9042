//! Andrew's curves: project a profile onto a truncated Fourier basis.
//!
//! For a vector `x = (x_1, ..., x_n)` and `m` angles `t` evenly spaced over
//! `[-π, π]`, the curve is
//!
//! ```text
//! f_x(t) = x_1/√2 + x_2 sin(t) + x_3 cos(t) + x_4 sin(2t) + x_5 cos(2t) + ...
//! ```
//!
//! Comparing two curves with a base measure gives a composite dissimilarity.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use super::{check_dims, MeasureFn};
use crate::error::{Error, Result};

/// `(m, n)` basis: rows are angles, columns are Fourier terms.
fn basis(resolution: usize, n_features: usize) -> Array2<f64> {
    let step = if resolution > 1 {
        2.0 * PI / (resolution - 1) as f64
    } else {
        0.0
    };
    Array2::from_shape_fn((resolution, n_features), |(r, c)| {
        let t = -PI + step * r as f64;
        if c == 0 {
            FRAC_1_SQRT_2
        } else {
            let freq = c.div_ceil(2) as f64;
            if c % 2 == 1 {
                (freq * t).sin()
            } else {
                (freq * t).cos()
            }
        }
    })
}

/// Andrew's curves of every row of `data`, sampled at `resolution` angles.
///
/// Returns an `(n_samples, resolution)` matrix.
pub fn andrews_curves(data: ArrayView2<'_, f64>, resolution: usize) -> Result<Array2<f64>> {
    if resolution == 0 {
        return Err(Error::InvalidParameter {
            name: "resolution",
            message: "must be at least 1",
        });
    }
    let a = basis(resolution, data.ncols());
    Ok(data.dot(&a.t()))
}

/// Compare the Andrew's curves of `x` and `y` with `base`.
pub fn andrews_dissimilarity(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
    base: &MeasureFn,
    resolution: usize,
) -> Result<f64> {
    check_dims(&x, &y)?;
    let mut pair = Array2::zeros((2, x.len()));
    pair.row_mut(0).assign(&x);
    pair.row_mut(1).assign(&y);
    let curves = andrews_curves(pair.view(), resolution)?;
    base(curves.index_axis(Axis(0), 0), curves.index_axis(Axis(0), 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{euclidean, measure_fn};
    use ndarray::array;

    #[test]
    fn curves_match_reference_values() {
        let data = Array2::from_shape_fn((5, 10), |(i, j)| (i * 10 + j + 1) as f64);
        let curves = andrews_curves(data.view(), 5).unwrap();
        assert_eq!(curves.dim(), (5, 5));
        assert!((curves[[0, 0]] - 4.707_106_78).abs() < 1e-6);
        assert!((curves[[0, 2]] - 24.707_106_78).abs() < 1e-6);
        assert!((curves[[0, 4]] - 4.707_106_78).abs() < 1e-6);
        assert!((curves[[4, 0]] - 32.991_378_03).abs() < 1e-6);
        assert!((curves[[4, 2]] - 212.991_378_03).abs() < 1e-6);
        assert!((curves[[4, 4]] - 32.991_378_03).abs() < 1e-6);
    }

    #[test]
    fn identical_vectors_have_zero_dissimilarity() {
        let base = measure_fn(euclidean);
        let x = array![1.0, 4.0, 2.0, 8.0];
        let d = andrews_dissimilarity(x.view(), x.view(), &base, 100).unwrap();
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn different_vectors_are_distinguished() {
        let base = measure_fn(euclidean);
        let x = array![1.0, 4.0, 2.0, 8.0];
        let y = array![1.0, 4.0, 2.0, 9.0];
        let d = andrews_dissimilarity(x.view(), y.view(), &base, 100).unwrap();
        assert!(d > 0.0);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let data = Array2::<f64>::zeros((2, 3));
        assert!(andrews_curves(data.view(), 0).is_err());
    }
}
