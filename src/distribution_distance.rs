//! Statistics over intra-class and inter-class comparison distributions.
//!
//! A good measure keeps same-class comparisons small and different-class
//! comparisons large. These validators quantify how far apart the two
//! distributions produced by [`crate::pairwise`] are.
//!
//! | Validator | Range | Best |
//! |-----------|-------|------|
//! | [`decidability_index`] | [0, ∞] | high |
//! | [`kl_divergence`] | [0, ∞) | high |
//! | [`distribution_overlap_area`] | [0, 1] | low |
//! | [`intra_inter_separation`] | (0, 1) | high |
//! | [`rayleigh_coefficient`] | [0, ∞) | high (feature space) |
//! | [`rayleigh_coefficient_in_space`] | [0, ∞) | high (MDS embedding) |
//!
//! ## Public invariants
//!
//! - **No silent emptiness**: an empty distribution is an
//!   [`Error::EmptyDistribution`], never a NaN.
//! - **Explicit discretization**: KL and overlap bin values by rounding to
//!   [`DiscretizationConfig::precision`] decimals; the smoothing constant is
//!   [`DiscretizationConfig::epsilon`], not a hidden literal.

use std::collections::BTreeMap;

use faer::{Mat, Side};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::pairwise::{
    check_label_count, comparison_matrix, group_by_label, intra_inter, MeasureSpec,
};

/// Binning and smoothing for the histogram-based validators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscretizationConfig {
    /// Decimal places kept when binning a value.
    pub precision: u32,
    /// Count added to every bin of the joint support before computing KL.
    pub epsilon: f64,
}

impl Default for DiscretizationConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            epsilon: 1e-6,
        }
    }
}

impl DiscretizationConfig {
    /// Set the binning precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Set the KL smoothing constant.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

fn non_empty(values: &[f64], which: &'static str) -> Result<()> {
    if values.is_empty() {
        return Err(Error::EmptyDistribution { which });
    }
    Ok(())
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

/// Decidability index, `|μ1 - μ2| / sqrt((σ1² + σ2²) / 2)`.
///
/// Uses population variances. Zero pooled variance gives `+∞`, or 0 when
/// the means coincide.
pub fn decidability_index(d1: &[f64], d2: &[f64]) -> Result<f64> {
    non_empty(d1, "first")?;
    non_empty(d2, "second")?;
    let (m1, v1) = mean_and_variance(d1);
    let (m2, v2) = mean_and_variance(d2);
    let gap = (m1 - m2).abs();
    let pooled = ((v1 + v2) / 2.0).sqrt();
    if pooled == 0.0 {
        warn!("zero pooled variance in decidability index");
        return Ok(if gap == 0.0 { 0.0 } else { f64::INFINITY });
    }
    Ok(gap / pooled)
}

/// Histogram of `values` rounded to `precision` decimals.
///
/// Keys are the rounded values scaled by `10^precision` (ties round to even).
pub fn discretize(values: &[f64], precision: u32) -> BTreeMap<i64, usize> {
    let scale = 10f64.powi(precision as i32);
    let mut hist = BTreeMap::new();
    for v in values {
        *hist.entry((v * scale).round_ties_even() as i64).or_insert(0) += 1;
    }
    hist
}

/// Counts of both histograms over their joint support, missing bins as 0.
fn joint_support(d1: &[f64], d2: &[f64], precision: u32) -> (Vec<f64>, Vec<f64>) {
    let h1 = discretize(d1, precision);
    let h2 = discretize(d2, precision);
    let mut keys: Vec<i64> = h1.keys().chain(h2.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();
    keys.iter()
        .map(|k| {
            (
                h1.get(k).copied().unwrap_or(0) as f64,
                h2.get(k).copied().unwrap_or(0) as f64,
            )
        })
        .unzip()
}

/// Kullback-Leibler divergence `KL(d1 || d2)` of the discretized distributions.
///
/// Each histogram gets `epsilon` added to every bin of the joint support and
/// is normalized to sum to one; the natural logarithm is used.
pub fn kl_divergence(d1: &[f64], d2: &[f64], cfg: &DiscretizationConfig) -> Result<f64> {
    non_empty(d1, "first")?;
    non_empty(d2, "second")?;
    if !(cfg.epsilon > 0.0) {
        return Err(Error::InvalidParameter {
            name: "epsilon",
            message: "must be > 0",
        });
    }
    let (f1, f2) = joint_support(d1, d2, cfg.precision);
    let p: Vec<f64> = f1.iter().map(|c| c + cfg.epsilon).collect();
    let q: Vec<f64> = f2.iter().map(|c| c + cfg.epsilon).collect();
    let sp: f64 = p.iter().sum();
    let sq: f64 = q.iter().sum();
    Ok(p
        .iter()
        .zip(&q)
        .map(|(a, b)| {
            let (a, b) = (a / sp, b / sq);
            a * (a / b).ln()
        })
        .sum())
}

/// Overlap of the discretized distributions, `Σ min / (Σ f1 + Σ f2 - Σ min)`.
///
/// 1 for identical histograms, 0 for disjoint ones.
pub fn distribution_overlap_area(d1: &[f64], d2: &[f64], cfg: &DiscretizationConfig) -> Result<f64> {
    non_empty(d1, "first")?;
    non_empty(d2, "second")?;
    let (f1, f2) = joint_support(d1, d2, cfg.precision);
    let overlap: f64 = f1.iter().zip(&f2).map(|(a, b)| a.min(*b)).sum();
    let total: f64 = f1.iter().sum::<f64>() + f2.iter().sum::<f64>();
    Ok(overlap / (total - overlap))
}

/// Separation of intra and inter distributions.
///
/// Both are rescaled to [0, 1] with their joint minimum and maximum; the
/// result is `1 - 1 / exp(exp(mean(inter) - mean(intra)))`. A zero joint
/// range counts as equal means, `1 - 1/e`.
pub fn intra_inter_separation(intra: &[f64], inter: &[f64]) -> Result<f64> {
    non_empty(intra, "intra")?;
    non_empty(inter, "inter")?;
    let (lo, hi) = intra
        .iter()
        .chain(inter)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;
    let gap = if range == 0.0 {
        warn!("intra and inter distributions are constant and equal");
        0.0
    } else {
        let scaled_mean = |d: &[f64]| d.iter().map(|v| (v - lo) / range).sum::<f64>() / d.len() as f64;
        scaled_mean(inter) - scaled_mean(intra)
    };
    Ok(1.0 - 1.0 / gap.exp().exp())
}

/// Rayleigh coefficient (between-class over within-class scatter) in feature space.
///
/// ```text
/// S_b = Σ_k ‖μ_k - μ‖²      S_w = Σ_k mean_{v ∈ k} ‖v - μ_k‖²
/// ```
pub fn rayleigh_coefficient<L: Ord>(data: ArrayView2<'_, f64>, labels: &[L]) -> Result<f64> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    check_label_count(data.nrows(), labels.len())?;
    let global: Array1<f64> = data.sum_axis(Axis(0)) / data.nrows() as f64;

    let mut sb = 0.0;
    let mut sw = 0.0;
    for g in group_by_label(labels) {
        let members = data.select(Axis(0), &g);
        let centroid: Array1<f64> = members.sum_axis(Axis(0)) / g.len() as f64;
        let shift = &centroid - &global;
        sb += shift.dot(&shift);
        let scatter: f64 = members
            .outer_iter()
            .map(|v| {
                let r = &v - &centroid;
                r.dot(&r)
            })
            .sum();
        sw += scatter / g.len() as f64;
    }
    Ok(sb / sw)
}

/// Classical (Torgerson) multidimensional scaling of a dissimilarity matrix.
///
/// The matrix is symmetrized, squared and double-centred into
/// `B = -J D² J / 2`; the embedding is `U √Λ` over the positive eigenvalues
/// of `B`, largest first, keeping at most `dims` of them (all when `None`).
/// Eigenvalues below `1e-10` of the largest are treated as zero. For a
/// Euclidean `D` the embedding reproduces `D` exactly; otherwise the negative
/// part of the spectrum is discarded.
pub fn classical_mds(d: ArrayView2<'_, f64>, dims: Option<usize>) -> Result<Array2<f64>> {
    let (n, cols) = d.dim();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    if n != cols {
        return Err(Error::shape(format!("{n}x{n}"), format!("{n}x{cols}")));
    }
    if dims == Some(0) {
        return Err(Error::InvalidParameter {
            name: "dims",
            message: "must be at least 1",
        });
    }

    let sq = Mat::<f64>::from_fn(n, n, |i, j| {
        let v = 0.5 * (d[[i, j]] + d[[j, i]]);
        v * v
    });
    let row_mean: Vec<f64> = (0..n)
        .map(|i| (0..n).map(|j| sq[(i, j)]).sum::<f64>() / n as f64)
        .collect();
    let grand = row_mean.iter().sum::<f64>() / n as f64;
    let b = Mat::<f64>::from_fn(n, n, |i, j| {
        -0.5 * (sq[(i, j)] - row_mean[i] - row_mean[j] + grand)
    });

    let evd = b
        .self_adjoint_eigen(Side::Lower)
        .map_err(|_| Error::NoConvergence {
            routine: "self-adjoint eigendecomposition",
        })?;
    let s = evd.S().column_vector();
    let u = evd.U();

    // eigenvalues come in ascending order
    let top = (0..n).map(|k| s[k]).fold(0.0, f64::max);
    let keep: Vec<usize> = (0..n)
        .rev()
        .filter(|&k| s[k] > 1e-10 * top)
        .take(dims.unwrap_or(n))
        .collect();
    let negative: f64 = (0..n).map(|k| s[k].min(0.0)).sum();
    debug!(n, kept = keep.len(), negative, "classical MDS spectrum");

    let mut out = Array2::zeros((n, keep.len().max(1)));
    for (c, &k) in keep.iter().enumerate() {
        let scale = s[k].sqrt();
        for i in 0..n {
            out[[i, c]] = u[(i, k)] * scale;
        }
    }
    Ok(out)
}

/// [`rayleigh_coefficient`] of the classical MDS embedding of the comparison
/// matrix of `data`.
///
/// `dims` bounds the embedding dimension as in [`classical_mds`]. Under the
/// Euclidean distance with `dims = None` this equals the feature-space
/// coefficient.
pub fn rayleigh_coefficient_in_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
    dims: Option<usize>,
) -> Result<f64> {
    let d = comparison_matrix(data, labels.len(), spec)?;
    let embedded = classical_mds(d.view(), dims)?;
    rayleigh_coefficient(embedded.view(), labels)
}

/// [`decidability_index`] of the intra/inter distributions of `data`.
pub fn decidability_index_in_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<f64> {
    let ii = intra_inter(data, labels, spec)?;
    decidability_index(&ii.intra, &ii.inter)
}

/// [`kl_divergence`] of the intra/inter distributions of `data`.
pub fn kl_divergence_in_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
    cfg: &DiscretizationConfig,
) -> Result<f64> {
    let ii = intra_inter(data, labels, spec)?;
    kl_divergence(&ii.intra, &ii.inter, cfg)
}

/// [`distribution_overlap_area`] of the intra/inter distributions of `data`.
pub fn overlap_area_in_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
    cfg: &DiscretizationConfig,
) -> Result<f64> {
    let ii = intra_inter(data, labels, spec)?;
    distribution_overlap_area(&ii.intra, &ii.inter, cfg)
}

/// [`intra_inter_separation`] of the intra/inter distributions of `data`.
pub fn separation_in_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<f64> {
    let ii = intra_inter(data, labels, spec)?;
    intra_inter_separation(&ii.intra, &ii.inter)
}

/// All distribution validators from a single intra/inter split.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributionReport {
    /// Number of intra-class comparisons.
    pub n_intra: usize,
    /// Number of inter-class comparisons.
    pub n_inter: usize,
    /// [`decidability_index`].
    pub decidability: f64,
    /// [`kl_divergence`] of intra against inter.
    pub kl_divergence: f64,
    /// [`distribution_overlap_area`].
    pub overlap_area: f64,
    /// [`intra_inter_separation`].
    pub separation: f64,
    /// [`rayleigh_coefficient_in_space`] over the full embedding.
    pub rayleigh: f64,
}

impl DistributionReport {
    /// Build the comparison matrix once and evaluate every validator.
    pub fn compute<L: Ord>(
        data: ArrayView2<'_, f64>,
        labels: &[L],
        spec: &MeasureSpec,
        cfg: &DiscretizationConfig,
    ) -> Result<Self> {
        let d = comparison_matrix(data, labels.len(), spec)?;
        let ii = intra_inter(d.view(), labels, &MeasureSpec::Precomputed)?;
        let embedded = classical_mds(d.view(), None)?;
        Ok(Self {
            rayleigh: rayleigh_coefficient(embedded.view(), labels)?,
            n_intra: ii.intra.len(),
            n_inter: ii.inter.len(),
            decidability: decidability_index(&ii.intra, &ii.inter)?,
            kl_divergence: kl_divergence(&ii.intra, &ii.inter, cfg)?,
            overlap_area: distribution_overlap_area(&ii.intra, &ii.inter, cfg)?,
            separation: intra_inter_separation(&ii.intra, &ii.inter)?,
        })
    }
}
