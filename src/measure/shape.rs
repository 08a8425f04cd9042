//! Shape dissimilarity: compare first derivatives rather than raw intensities.
//!
//! Each profile is convolved with the first derivative of a unit-area
//! Gaussian (`sigma` controls smoothing, the kernel is truncated at radius
//! `⌊4σ + 0.5⌋`), with the signal mirrored at both ends. This is the usual
//! `gaussian_filter1d(order=1, mode="reflect")` filter. The smoothed
//! derivatives are then compared with the correlation distance.
//!
//! [`shape_dissimilarity_matrix`] is the many-vs-many form. It filters each
//! row once and reuses [`shape_dissimilarity`]'s comparison, so both forms
//! agree bit for bit.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::check_dims;
use super::correlation::correlation_distance;
use crate::error::{Error, Result};

fn derivative_kernel(sigma: f64) -> (Vec<f64>, isize) {
    let radius = (4.0 * sigma + 0.5) as isize;
    let s2 = sigma * sigma;
    let gauss: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k * k) as f64 / s2).exp())
        .collect();
    let area: f64 = gauss.iter().sum();
    let kernel = (-radius..=radius)
        .zip(&gauss)
        .map(|(k, g)| -(k as f64) * g / (s2 * area))
        .collect();
    (kernel, -radius)
}

/// Mirror index `i` into `[0, n)` (`d c b a | a b c d | d c b a`).
fn reflect(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// First-derivative-of-Gaussian filter of a single profile.
pub fn derivative_filter(x: ArrayView1<'_, f64>, sigma: f64) -> Result<Array1<f64>> {
    if !(sigma > 0.0) || !sigma.is_finite() {
        return Err(Error::InvalidParameter {
            name: "sigma",
            message: "must be a positive finite number",
        });
    }
    let n = x.len();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    let (kernel, lo) = derivative_kernel(sigma);
    let mut out = Array1::zeros(n);
    for (i, o) in out.iter_mut().enumerate() {
        *o = kernel
            .iter()
            .enumerate()
            .map(|(j, w)| {
                let k = lo + j as isize;
                w * x[reflect(i as isize - k, n)]
            })
            .sum();
    }
    Ok(out)
}

/// Shape dissimilarity between two profiles.
pub fn shape_dissimilarity(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, sigma: f64) -> Result<f64> {
    check_dims(&x, &y)?;
    let fx = derivative_filter(x, sigma)?;
    let fy = derivative_filter(y, sigma)?;
    correlation_distance(fx.view(), fy.view())
}

fn filter_rows(m: &ArrayView2<'_, f64>, sigma: f64) -> Result<Vec<Array1<f64>>> {
    m.axis_iter(Axis(0))
        .map(|row| derivative_filter(row, sigma))
        .collect()
}

/// Shape dissimilarity of every row of `data` against every row of `prototypes`.
///
/// Returns an `(n_data, n_prototypes)` matrix.
pub fn shape_dissimilarity_matrix(
    data: ArrayView2<'_, f64>,
    prototypes: ArrayView2<'_, f64>,
    sigma: f64,
) -> Result<Array2<f64>> {
    if data.ncols() != prototypes.ncols() {
        return Err(Error::DimensionMismatch {
            expected: data.ncols(),
            found: prototypes.ncols(),
        });
    }
    let fd = filter_rows(&data, sigma)?;
    let fp = filter_rows(&prototypes, sigma)?;

    let mut out = Array2::zeros((fd.len(), fp.len()));
    for (i, a) in fd.iter().enumerate() {
        for (j, b) in fp.iter().enumerate() {
            out[[i, j]] = correlation_distance(a.view(), b.view())?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn reflect_mirrors_both_ends() {
        let got: Vec<usize> = (-4..8).map(|i| reflect(i, 4)).collect();
        assert_eq!(got, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
        // shorter than the kernel radius still stays in range
        assert!((-20..20).all(|i| reflect(i, 1) == 0));
    }

    #[test]
    fn derivative_of_a_ramp_is_positive_inside() {
        let x: Array1<f64> = (0..30).map(|i| i as f64).collect();
        let d = derivative_filter(x.view(), 2.0).unwrap();
        for v in d.iter().skip(7).take(16) {
            assert!(*v > 0.0);
        }
        // interior values are all equal for a linear ramp
        assert!((d[10] - d[15]).abs() < 1e-9);
        assert!((d[10] - 0.999_653_251_343_059).abs() < 1e-12);
        assert!((d[0] - 0.195_245_363_602).abs() < 1e-11);
        assert!((d[29] - d[0]).abs() < 1e-12);
    }

    #[test]
    fn kernel_radius_is_four_sigma() {
        assert_eq!(derivative_kernel(2.0).0.len(), 17);
        assert_eq!(derivative_kernel(1.5).1, -6);
        assert_eq!(derivative_kernel(0.1).0, vec![0.0]);
    }

    #[test]
    fn offset_and_scale_do_not_change_shape() {
        let x = array![1.0, 3.0, 7.0, 4.0, 2.0, 5.0, 9.0, 6.0, 3.0, 1.0];
        let y = x.mapv(|v| 2.5 * v + 10.0);
        assert!(shape_dissimilarity(x.view(), y.view(), 2.0).unwrap().abs() < 1e-9);
    }

    #[test]
    fn batch_form_agrees_with_pairwise_form() {
        let data = array![
            [1.0, 3.0, 7.0, 4.0, 2.0, 5.0, 9.0, 6.0],
            [2.0, 2.0, 5.0, 8.0, 3.0, 1.0, 4.0, 7.0],
            [9.0, 7.0, 5.0, 3.0, 1.0, 2.0, 4.0, 6.0],
        ];
        let m = shape_dissimilarity_matrix(data.view(), data.view(), 1.5).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let d = shape_dissimilarity(data.row(i), data.row(j), 1.5).unwrap();
                assert_eq!(m[[i, j]], d);
            }
        }
    }

    #[test]
    fn rejects_bad_sigma_and_shapes() {
        let x = array![1.0, 2.0, 3.0];
        assert!(derivative_filter(x.view(), 0.0).is_err());
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((2, 4));
        assert!(matches!(
            shape_dissimilarity_matrix(a.view(), b.view(), 2.0),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
