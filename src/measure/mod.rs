//! Pairwise dissimilarity and similarity measures between feature vectors.
//!
//! Every measure is a pure function of two equal-length vectors returning a
//! scalar. The set is closed: [`Measure`] enumerates it, each variant carries a
//! stable integer id and a three-letter display name, and a [`Registry`] turns
//! a variant into a callable [`MeasureFn`] using the parameters of its
//! [`MeasureConfig`].
//!
//! # Families
//!
//! | Family | Measures | Notes |
//! |--------|----------|-------|
//! | Minkowski | Euclidean, Manhattan, Minkowski(p) | metrics |
//! | Angle | Cosine, SAM | SAM clips the cosine to [-1, 1] before `acos` |
//! | Correlation | Correlation, Pearson, PCC, Spearman | `1 - r`; probability form `(r + 1) / 2` |
//! | Distribution | Kolmogorov, Bray-Curtis, Chi-squared | inputs shifted to be non-negative |
//! | Shape | SHy, SPy, CSH, CSP | derivative-of-Gaussian filter, then correlation distance |
//! | Composite | Andrew's curves | Fourier projection, then a base measure |
//! | External | dnom, dord | bound at runtime via [`Registry::with_external`] |
//!
//! # Example
//!
//! ```rust
//! use chemdis::measure::{Measure, Registry};
//! use ndarray::array;
//!
//! let registry = Registry::standard();
//! let d = registry.function(Measure::BrayCurtis).unwrap();
//! let x = array![1.0, 2.0, 3.0];
//! let y = array![4.0, 5.0, 6.0];
//! assert!((d(x.view(), y.view()).unwrap() - 0.428_571).abs() < 1e-6);
//! ```

mod andrews;
mod angle;
mod correlation;
mod distribution;
mod minkowski;
mod registry;
mod shape;

use std::sync::Arc;

use ndarray::ArrayView1;

use crate::error::{Error, Result};

pub use andrews::{andrews_curves, andrews_dissimilarity};
pub use angle::{cosine, spectral_angle};
pub use correlation::{
    correlation_distance, pearson_dissimilarity, pearson_probability, pearson_r,
    spearman_dissimilarity, spearman_probability, spearman_r,
};
pub use distribution::{bray_curtis, chi_squared, kolmogorov_smirnov};
pub use minkowski::{euclidean, manhattan, minkowski};
pub use registry::{to_similarity, MeasureConfig, Registry};
pub use shape::{derivative_filter, shape_dissimilarity, shape_dissimilarity_matrix};

/// A comparison function over two feature vectors.
///
/// Shared and thread-safe so one resolved measure can be handed to every
/// row of a parallel pairwise computation.
pub type MeasureFn = Arc<dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<f64> + Send + Sync>;

/// How a measure may be used by downstream components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasureKind {
    /// Symmetric with zero self-distance; usable directly as a pairwise distance.
    Metric,
    /// Non-negative dissimilarity without metric guarantees.
    Dissimilarity,
    /// Correlation dissimilarity that also has a dedicated [0, 1] probability form.
    Probabilistic,
}

/// The closed set of registered measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measure {
    /// L2 distance.
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// Lp distance, `p` from [`MeasureConfig::minkowski_p`].
    Minkowski,
    /// Shape dissimilarity (historical id 3).
    ShapeHy,
    /// Shape dissimilarity (historical id 4).
    ShapePy,
    /// Correlation distance `1 - r`.
    Correlation,
    /// Pearson dissimilarity `1 - r`.
    Pearson,
    /// Spearman rank dissimilarity `1 - rho`.
    Spearman,
    /// Pearson-correlation-coefficient dissimilarity (historical id 8).
    Pcc,
    /// Cosine distance `1 - cos`.
    Cosine,
    /// Spectral angle mapper.
    Sam,
    /// Kolmogorov-Smirnov style maximum deviation of unit-area profiles.
    Kolmogorov,
    /// Bray-Curtis dissimilarity.
    BrayCurtis,
    /// Chi-squared histogram distance.
    ChiSquared,
    /// Andrew's-curves composite measure.
    AndrewsCurves,
    /// Correlation shape dissimilarity (historical id 15).
    CorrShapeHy,
    /// Correlation shape dissimilarity (historical id 16).
    CorrShapePy,
    /// External nominal combination measure.
    Dnom,
    /// External ordinal combination measure.
    Dord,
}

impl Measure {
    /// Every measure, in id order.
    pub const ALL: [Measure; 19] = [
        Measure::Euclidean,
        Measure::Manhattan,
        Measure::Minkowski,
        Measure::ShapeHy,
        Measure::ShapePy,
        Measure::Correlation,
        Measure::Pearson,
        Measure::Spearman,
        Measure::Pcc,
        Measure::Cosine,
        Measure::Sam,
        Measure::Kolmogorov,
        Measure::BrayCurtis,
        Measure::ChiSquared,
        Measure::AndrewsCurves,
        Measure::CorrShapeHy,
        Measure::CorrShapePy,
        Measure::Dnom,
        Measure::Dord,
    ];

    /// Stable integer id.
    pub fn id(self) -> u32 {
        match self {
            Measure::Euclidean => 0,
            Measure::Manhattan => 1,
            Measure::Minkowski => 2,
            Measure::ShapeHy => 3,
            Measure::ShapePy => 4,
            Measure::Correlation => 5,
            Measure::Pearson => 6,
            Measure::Spearman => 7,
            Measure::Pcc => 8,
            Measure::Cosine => 9,
            Measure::Sam => 10,
            Measure::Kolmogorov => 11,
            Measure::BrayCurtis => 12,
            Measure::ChiSquared => 13,
            Measure::AndrewsCurves => 14,
            Measure::CorrShapeHy => 15,
            Measure::CorrShapePy => 16,
            Measure::Dnom => 17,
            Measure::Dord => 18,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Measure::Euclidean => "Euc",
            Measure::Manhattan => "Man",
            Measure::Minkowski => "Min",
            Measure::ShapeHy => "SHy",
            Measure::ShapePy => "SPy",
            Measure::Correlation => "Cor",
            Measure::Pearson => "Pea",
            Measure::Spearman => "Spe",
            Measure::Pcc => "PCC",
            Measure::Cosine => "Cos",
            Measure::Sam => "SAM",
            Measure::Kolmogorov => "Kol",
            Measure::BrayCurtis => "Bra",
            Measure::ChiSquared => "Chi",
            Measure::AndrewsCurves => "And",
            Measure::CorrShapeHy => "CSH",
            Measure::CorrShapePy => "CSP",
            Measure::Dnom => "DNM",
            Measure::Dord => "DOR",
        }
    }

    /// Look a measure up by id; ids outside the closed set are rejected.
    pub fn from_id(id: u32) -> Result<Self> {
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.id() == id)
            .ok_or(Error::UnknownMeasure { id })
    }

    /// Look a measure up by display name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Measure::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Classification used by downstream components.
    pub fn kind(self) -> MeasureKind {
        match self {
            Measure::Euclidean
            | Measure::Manhattan
            | Measure::Minkowski
            | Measure::Cosine
            | Measure::Sam
            | Measure::BrayCurtis => MeasureKind::Metric,
            Measure::Correlation | Measure::Pearson | Measure::Spearman => {
                MeasureKind::Probabilistic
            }
            _ => MeasureKind::Dissimilarity,
        }
    }

    /// Whether the measure is computed by an externally bound routine.
    pub fn is_external(self) -> bool {
        matches!(self, Measure::Dnom | Measure::Dord)
    }

    /// Whether the registry binding is a symmetric dissimilarity with zero
    /// self-distance, so a comparison matrix may be mirrored.
    ///
    /// External routines are opaque and never assumed symmetric.
    pub fn is_symmetric(self) -> bool {
        !self.is_external()
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Measure {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self> {
        Measure::from_id(id)
    }
}

/// Fails with [`Error::DimensionMismatch`] unless both vectors have equal length.
pub(crate) fn check_dims(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            found: y.len(),
        });
    }
    Ok(())
}

/// Wrap a plain closure as a [`MeasureFn`].
pub fn measure_fn<F>(f: F) -> MeasureFn
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<f64> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_round_trip() {
        for (i, m) in Measure::ALL.iter().enumerate() {
            assert_eq!(m.id() as usize, i);
            assert_eq!(Measure::from_id(m.id()).unwrap(), *m);
            assert_eq!(Measure::from_name(m.name()), Some(*m));
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(
            Measure::from_id(19).unwrap_err(),
            Error::UnknownMeasure { id: 19 }
        );
        assert!(Measure::try_from(1000).is_err());
        assert_eq!(Measure::from_name("euclid"), None);
    }

    #[test]
    fn kinds() {
        assert_eq!(Measure::Euclidean.kind(), MeasureKind::Metric);
        assert_eq!(Measure::Pearson.kind(), MeasureKind::Probabilistic);
        assert_eq!(Measure::ChiSquared.kind(), MeasureKind::Dissimilarity);
        assert!(Measure::Dord.is_external());
        assert!(!Measure::Sam.is_external());
    }
}
