//! Dissimilarity representation: describe each sample by its comparisons
//! against a set of prototypes.
//!
//! The `(n_samples, n_prototypes)` result can be fed to any vector-space
//! classifier in place of the raw features.
//!
//! ```rust
//! use chemdis::measure::{euclidean, measure_fn};
//! use chemdis::representation::{dissimilarity_representation, Prototypes};
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]];
//! let d = dissimilarity_representation(x.view(), Prototypes::Indices(&[0, 2]), &measure_fn(euclidean)).unwrap();
//! assert_eq!(d.dim(), (3, 2));
//! assert!((d[[1, 0]] - 5.0).abs() < 1e-12);
//! ```

use ndarray::{Array2, ArrayView2, Axis};
use tracing::debug;

use crate::error::{Error, Result};
use crate::measure::MeasureFn;
use crate::pairwise::cross_matrix;

/// Where the prototypes come from.
#[derive(Debug, Clone, Copy)]
pub enum Prototypes<'a> {
    /// Explicit prototype rows, same feature count as the data.
    Rows(ArrayView2<'a, f64>),
    /// Row indices into the data matrix.
    Indices(&'a [usize]),
}

/// Every row of `data` compared against every prototype.
pub fn dissimilarity_representation(
    data: ArrayView2<'_, f64>,
    prototypes: Prototypes<'_>,
    measure: &MeasureFn,
) -> Result<Array2<f64>> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    let protos = match prototypes {
        Prototypes::Rows(rows) => rows.to_owned(),
        Prototypes::Indices(idx) => {
            if let Some(&bad) = idx.iter().find(|&&i| i >= data.nrows()) {
                return Err(Error::shape(
                    format!("prototype index < {}", data.nrows()),
                    bad.to_string(),
                ));
            }
            data.select(Axis(0), idx)
        }
    };
    if protos.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    debug!(
        n_samples = data.nrows(),
        n_prototypes = protos.nrows(),
        "building dissimilarity representation"
    );
    cross_matrix(data, protos.view(), measure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{Measure, Registry};
    use ndarray::array;

    #[test]
    fn indices_and_rows_agree() {
        let x = array![[1.0, 2.0, 3.0], [2.0, 1.0, 0.0], [5.0, 5.0, 5.0], [0.0, 1.0, 0.0]];
        let f = Registry::standard().function(Measure::Manhattan).unwrap();
        let by_index = dissimilarity_representation(x.view(), Prototypes::Indices(&[2, 0]), &f).unwrap();
        let rows = array![[5.0, 5.0, 5.0], [1.0, 2.0, 3.0]];
        let by_rows = dissimilarity_representation(x.view(), Prototypes::Rows(rows.view()), &f).unwrap();
        assert_eq!(by_index, by_rows);
        assert_eq!(by_index[[2, 0]], 0.0);
        assert_eq!(by_index[[0, 1]], 0.0);
        assert!((by_index[[1, 1]] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_prototypes() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let f = Registry::standard().function(Measure::Euclidean).unwrap();
        assert!(matches!(
            dissimilarity_representation(x.view(), Prototypes::Indices(&[0, 2]), &f),
            Err(Error::ShapeMismatch { .. })
        ));
        assert_eq!(
            dissimilarity_representation(x.view(), Prototypes::Indices(&[]), &f).unwrap_err(),
            Error::EmptyInput
        );
        let wide = array![[1.0, 2.0, 3.0]];
        assert!(matches!(
            dissimilarity_representation(x.view(), Prototypes::Rows(wide.view()), &f),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }
}
