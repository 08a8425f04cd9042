//! Internal cluster validity indices.
//!
//! Every index scores a partition from its comparison matrix. Inputs follow
//! the [`MeasureSpec`](crate::pairwise::MeasureSpec) convention, so raw
//! features plus a measure and a precomputed matrix give the same result.
//!
//! | Index | Range | Best | Notes |
//! |-------|-------|------|-------|
//! | [`davies_bouldin`] | [0, ∞] | low | barycenter-based; `+∞` on coincident barycenters |
//! | [`dunn`] | [0, ∞] | high | min separation / max diameter |
//! | [`score_function`] | (0, 1) | high | rows of the comparison matrix as vectors |
//! | [`silhouette`] | [-1, 1] | high | mean of [`silhouette_samples`] |
//!
//! All indices need at least two clusters.
//!
//! # Example
//!
//! ```rust
//! use chemdis::pairwise::MeasureSpec;
//! use chemdis::validity::davies_bouldin;
//! use ndarray::Array2;
//!
//! let x = Array2::from_shape_fn((5, 10), |(i, j)| (i * 10 + j + 1) as f64);
//! let db = davies_bouldin(x.view(), &[1, 0, 0, 0, 0], &MeasureSpec::ById(0)).unwrap();
//! assert!((db - 0.5).abs() < 1e-12);
//! ```

mod davies_bouldin;
mod dunn;
mod score_function;
mod silhouette;

pub use davies_bouldin::davies_bouldin;
pub use dunn::dunn;
pub use score_function::{score_function, score_function_in_feature_space};
pub use silhouette::{silhouette, silhouette_samples};

use crate::error::{Error, Result};

/// Fails unless the partition has at least two clusters.
pub(crate) fn require_clusters(groups: &[Vec<usize>]) -> Result<()> {
    if groups.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "at least two clusters are required",
        });
    }
    Ok(())
}
