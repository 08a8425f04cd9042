//! Pairwise comparison engine.
//!
//! Builds comparison matrices from a data matrix and a measure, and splits
//! them into intra-class and inter-class distributions.
//!
//! # Calling conventions
//!
//! Every component that consumes comparisons takes a [`MeasureSpec`]:
//!
//! | Variant | `data` argument | Comparison matrix |
//! |---------|-----------------|-------------------|
//! | `ById(id)` | `(n_samples, n_features)` | built with the standard registry |
//! | `Builtin(m)` | `(n_samples, n_features)` | built with the standard registry |
//! | `Callable(f)` | `(n_samples, n_features)` | built with `f` |
//! | `Precomputed` | `(n, n)` comparison matrix | used as is |
//!
//! [`comparison_matrix`] is the single dispatch point; precomputed input
//! must satisfy `rows == cols == labels.len()`. A comparison matrix is not
//! assumed symmetric: only registry measures known to be symmetric take the
//! mirrored path.
//!
//! # Ordering
//!
//! Labels are grouped in sorted order. For each label `k`, intra values
//! come first in `(i, j)`, `i < j` order, followed by the inter values
//! against every later label `l > k`, row-major over `(k-member, l-member)`.
//! The same traversal defines the order of [`IntraInter`] for every input
//! convention.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView2, CowArray, Ix2};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::measure::{Measure, MeasureFn, Registry};

/// How a component obtains its comparisons.
#[derive(Clone)]
pub enum MeasureSpec {
    /// Registry id, resolved through [`Registry::standard`].
    ById(u32),
    /// Registry measure, resolved through [`Registry::standard`].
    Builtin(Measure),
    /// Arbitrary comparison function.
    Callable(MeasureFn),
    /// The `data` argument already is the square comparison matrix.
    Precomputed,
}

impl std::fmt::Debug for MeasureSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureSpec::ById(id) => f.debug_tuple("ById").field(id).finish(),
            MeasureSpec::Builtin(m) => f.debug_tuple("Builtin").field(m).finish(),
            MeasureSpec::Callable(_) => f.write_str("Callable(..)"),
            MeasureSpec::Precomputed => f.write_str("Precomputed"),
        }
    }
}

impl From<Measure> for MeasureSpec {
    fn from(m: Measure) -> Self {
        MeasureSpec::Builtin(m)
    }
}

impl From<MeasureFn> for MeasureSpec {
    fn from(f: MeasureFn) -> Self {
        MeasureSpec::Callable(f)
    }
}

impl MeasureSpec {
    /// Comparison function, or `None` for precomputed input.
    pub fn function(&self) -> Result<Option<MeasureFn>> {
        match self {
            MeasureSpec::ById(id) => Registry::standard().resolve(*id).map(Some),
            MeasureSpec::Builtin(m) => Registry::standard().function(*m).map(Some),
            MeasureSpec::Callable(f) => Ok(Some(f.clone())),
            MeasureSpec::Precomputed => Ok(None),
        }
    }

    /// Whether `data` is interpreted as a comparison matrix.
    pub fn is_precomputed(&self) -> bool {
        matches!(self, MeasureSpec::Precomputed)
    }
}

impl Registry {
    /// [`MeasureSpec`] that compares with this registry's binding of `measure`.
    ///
    /// Use this to hand a configured registry (custom parameters, external
    /// routines) to any component taking a [`MeasureSpec`].
    pub fn spec(&self, measure: Measure) -> Result<MeasureSpec> {
        Ok(MeasureSpec::Callable(self.function(measure)?))
    }
}

fn rows_from(
    data: &ArrayView2<'_, f64>,
    i: usize,
    first: usize,
    measure: &MeasureFn,
) -> Result<Vec<f64>> {
    let x = data.row(i);
    (first..data.nrows())
        .map(|j| measure(x, data.row(j)))
        .collect()
}

/// Evaluate `measure` on row `i` against rows `first(i)..n`, for every `i`.
fn evaluate_rows<F>(data: &ArrayView2<'_, f64>, measure: &MeasureFn, first: F) -> Result<Vec<Vec<f64>>>
where
    F: Fn(usize) -> usize + Sync,
{
    let n = data.nrows();

    #[cfg(feature = "parallel")]
    let rows = (0..n)
        .into_par_iter()
        .map(|i| rows_from(data, i, first(i), measure))
        .collect::<Result<Vec<_>>>();

    #[cfg(not(feature = "parallel"))]
    let rows = (0..n)
        .map(|i| rows_from(data, i, first(i), measure))
        .collect::<Result<Vec<_>>>();

    rows
}

/// Full pairwise comparison matrix of the rows of `data`.
///
/// Every cell, diagonal included, is `measure(row_i, row_j)`, so asymmetric
/// measures and similarities (diagonal near 1) are kept as they are.
pub fn pairwise_matrix(data: ArrayView2<'_, f64>, measure: &MeasureFn) -> Result<Array2<f64>> {
    let n = data.nrows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    debug!(n_samples = n, n_features = data.ncols(), "building full comparison matrix");

    let rows = evaluate_rows(&data, measure, |_| 0)?;
    let mut out = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, d) in row.into_iter().enumerate() {
            out[[i, j]] = d;
        }
    }
    Ok(out)
}

/// Pairwise matrix for a symmetric dissimilarity with zero self-distance.
///
/// Only `i < j` is evaluated; the result is mirrored and the diagonal is 0.
pub fn symmetric_pairwise_matrix(
    data: ArrayView2<'_, f64>,
    measure: &MeasureFn,
) -> Result<Array2<f64>> {
    let n = data.nrows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    debug!(n_samples = n, n_features = data.ncols(), "building symmetric comparison matrix");

    let rows = evaluate_rows(&data, measure, |i| i + 1)?;
    let mut out = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (offset, d) in row.into_iter().enumerate() {
            let j = i + 1 + offset;
            out[[i, j]] = d;
            out[[j, i]] = d;
        }
    }
    Ok(out)
}

/// Every row of `a` against every row of `b`, as an `(a.nrows(), b.nrows())` matrix.
pub fn cross_matrix(
    a: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
    measure: &MeasureFn,
) -> Result<Array2<f64>> {
    if a.ncols() != b.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.ncols(),
            found: b.ncols(),
        });
    }
    let mut out = Array2::zeros((a.nrows(), b.nrows()));
    for (i, x) in a.outer_iter().enumerate() {
        for (j, y) in b.outer_iter().enumerate() {
            out[[i, j]] = measure(x, y)?;
        }
    }
    Ok(out)
}

/// Comparison matrix for `data` under `spec`.
///
/// Borrowed for precomputed input, owned otherwise. Symmetric registry
/// measures fill the upper triangle and mirror it with a zero diagonal;
/// callables and external measures are evaluated on every cell.
pub fn comparison_matrix<'a>(
    data: ArrayView2<'a, f64>,
    n_labels: usize,
    spec: &MeasureSpec,
) -> Result<CowArray<'a, f64, Ix2>> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    let (measure, f) = match spec {
        MeasureSpec::Precomputed => {
            let (rows, cols) = data.dim();
            if rows != cols || rows != n_labels {
                return Err(Error::shape(
                    format!("{n_labels}x{n_labels}"),
                    format!("{rows}x{cols}"),
                ));
            }
            return Ok(CowArray::from(data));
        }
        MeasureSpec::ById(id) => {
            let m = Measure::from_id(*id)?;
            (Some(m), Registry::standard().function(m)?)
        }
        MeasureSpec::Builtin(m) => (Some(*m), Registry::standard().function(*m)?),
        MeasureSpec::Callable(f) => (None, f.clone()),
    };
    check_label_count(data.nrows(), n_labels)?;
    let matrix = match measure {
        Some(m) if m.is_symmetric() => symmetric_pairwise_matrix(data, &f)?,
        _ => pairwise_matrix(data, &f)?,
    };
    Ok(CowArray::from(matrix))
}

pub(crate) fn check_label_count(samples: usize, labels: usize) -> Result<()> {
    if samples != labels {
        return Err(Error::LabelCountMismatch { samples, labels });
    }
    Ok(())
}

/// Row indices grouped by label, groups in sorted label order.
///
/// Indices inside a group are ascending.
pub fn group_by_label<L: Ord>(labels: &[L]) -> Vec<Vec<usize>> {
    let mut groups: BTreeMap<&L, Vec<usize>> = BTreeMap::new();
    for (i, l) in labels.iter().enumerate() {
        groups.entry(l).or_default().push(i);
    }
    groups.into_values().collect()
}

/// Intra-class and inter-class comparison values.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntraInter {
    /// Comparisons between distinct samples sharing a label.
    pub intra: Vec<f64>,
    /// Comparisons between samples with different labels.
    pub inter: Vec<f64>,
}

impl IntraInter {
    /// Walk the canonical traversal, reading values from `value(i, j)`.
    fn collect<F>(groups: &[Vec<usize>], mut value: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<f64>,
    {
        let mut out = IntraInter::default();
        for (k, gk) in groups.iter().enumerate() {
            for (a, &i) in gk.iter().enumerate() {
                for &j in &gk[a + 1..] {
                    out.intra.push(value(i, j)?);
                }
            }
            for gl in &groups[k + 1..] {
                for &i in gk {
                    for &j in gl {
                        out.inter.push(value(i, j)?);
                    }
                }
            }
        }
        trace!(intra = out.intra.len(), inter = out.inter.len(), "split comparisons");
        Ok(out)
    }

    /// Split a square comparison matrix by `labels`.
    pub fn from_matrix<L: Ord>(matrix: ArrayView2<'_, f64>, labels: &[L]) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows != labels.len() {
            return Err(Error::shape(
                format!("{0}x{0}", labels.len()),
                format!("{rows}x{cols}"),
            ));
        }
        Self::collect(&group_by_label(labels), |i, j| Ok(matrix[[i, j]]))
    }

    /// Total number of comparisons.
    pub fn len(&self) -> usize {
        self.intra.len() + self.inter.len()
    }

    /// True when there are no comparisons at all.
    pub fn is_empty(&self) -> bool {
        self.intra.is_empty() && self.inter.is_empty()
    }
}

/// Intra/inter-class comparisons of the rows of `data` under `measure`.
pub fn intra_inter_comparisons<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    measure: &MeasureFn,
) -> Result<IntraInter> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    check_label_count(data.nrows(), labels.len())?;
    IntraInter::collect(&group_by_label(labels), |i, j| {
        measure(data.row(i), data.row(j))
    })
}

/// [`intra_inter_comparisons`] with the measure given by registry id.
pub fn intra_inter_class_dissimilarities<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    measure_id: u32,
) -> Result<IntraInter> {
    let f = Registry::standard().resolve(measure_id)?;
    intra_inter_comparisons(data, labels, &f)
}

/// Intra/inter-class comparisons under any calling convention.
pub fn intra_inter<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<IntraInter> {
    match spec.function()? {
        Some(f) => intra_inter_comparisons(data, labels, &f),
        None => {
            if data.nrows() == 0 {
                return Err(Error::EmptyInput);
            }
            IntraInter::from_matrix(data, labels)
        }
    }
}
