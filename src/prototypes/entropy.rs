//! Entropy-based pivot ranking over a similarity matrix.
//!
//! The normalized similarity matrix is read as a probability distribution
//! over pairs. Its entropy is
//!
//! ```text
//! H = -Σ p log2(p) / log2(n)        (over cells with p > 0)
//! ```
//!
//! Each step removes the row and column whose removal lowers `H` the least,
//! i.e. the most redundant remaining item, and records that drop. The
//! resulting [`PivotSequence`] ranks items in extraction order.
//!
//! `n` is the count of positive cells. With [`EntropyBase::Fixed`] it is
//! taken once from the starting matrix so every step shares the same log
//! base; [`EntropyBase::PerMatrix`] recounts it for every matrix evaluated.
//! Either way `n <= 1` means entropy 0.

use ndarray::{Array1, Array2, ArrayView2};
use tracing::debug;

use crate::error::{Error, Result};

/// How the log-base count `n` is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntropyBase {
    /// Positive-cell count of the starting normalized matrix, for every step.
    #[default]
    Fixed,
    /// Positive-cell count of each matrix being evaluated.
    PerMatrix,
}

/// Configuration for [`sort_by_entropy`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntropyConfig {
    /// Normalize the strict upper triangle to sum to one before ranking.
    pub normalize: bool,
    /// Choice of log-base count.
    pub entropy_base: EntropyBase,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            entropy_base: EntropyBase::Fixed,
        }
    }
}

impl EntropyConfig {
    /// Enable or disable normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the log-base policy.
    pub fn with_entropy_base(mut self, base: EntropyBase) -> Self {
        self.entropy_base = base;
        self
    }
}

/// One extracted item.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pivot {
    /// Row of the similarity matrix.
    pub index: usize,
    /// Entropy lost by removing it.
    pub entropy_drop: f64,
}

/// Pivots in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PivotSequence {
    pivots: Vec<Pivot>,
}

impl PivotSequence {
    /// Wrap pivots that are already in extraction order.
    pub fn new(pivots: Vec<Pivot>) -> Self {
        Self { pivots }
    }

    /// Pivots in extraction order.
    pub fn pivots(&self) -> &[Pivot] {
        &self.pivots
    }

    /// Matrix rows in extraction order.
    pub fn indices(&self) -> Vec<usize> {
        self.pivots.iter().map(|p| p.index).collect()
    }

    /// Entropy drops in extraction order.
    pub fn values(&self) -> Vec<f64> {
        self.pivots.iter().map(|p| p.entropy_drop).collect()
    }

    /// First differences of the entropy drops, with 0 for the first pivot.
    pub fn fitness_deltas(&self) -> Vec<f64> {
        let mut prev = match self.pivots.first() {
            Some(p) => p.entropy_drop,
            None => return Vec::new(),
        };
        self.pivots
            .iter()
            .map(|p| {
                let d = p.entropy_drop - prev;
                prev = p.entropy_drop;
                d
            })
            .collect()
    }

    /// Number of pivots.
    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }
}

fn check_square(m: &ArrayView2<'_, f64>) -> Result<()> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::shape(
            format!("{rows}x{rows}"),
            format!("{rows}x{cols}"),
        ));
    }
    if rows == 0 {
        return Err(Error::EmptyInput);
    }
    Ok(())
}

/// Strict upper triangle of `sim` divided by its sum.
///
/// The sum must be positive.
pub fn normalize_similarity(sim: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    check_square(&sim)?;
    let n = sim.nrows();
    let mut out = Array2::zeros((n, n));
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            out[[i, j]] = sim[[i, j]];
            total += sim[[i, j]];
        }
    }
    if !(total > 0.0) || !total.is_finite() {
        return Err(Error::InvalidParameter {
            name: "similarity",
            message: "strict upper triangle must have a positive finite sum",
        });
    }
    out.mapv_inplace(|v| v / total);
    Ok(out)
}

fn surprisal(p: f64) -> f64 {
    if p > 0.0 {
        -p * p.log2()
    } else {
        0.0
    }
}

fn scaled(sum: f64, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        sum / (n as f64).log2()
    }
}

/// Entropy of `m` with `n` recounted from `m` itself.
pub fn matrix_entropy(m: ArrayView2<'_, f64>) -> f64 {
    let n = m.iter().filter(|&&p| p > 0.0).count();
    scaled(m.iter().map(|&p| surprisal(p)).sum(), n)
}

/// Next pivot of the working matrix, or `None` when every row sum is 0.
///
/// `fixed_n` is the frozen log-base count; `None` recounts per matrix.
fn find_pivot(m: &Array2<f64>, fixed_n: Option<usize>) -> Option<Pivot> {
    let n = m.nrows();
    let h = m.mapv(surprisal);
    let total: f64 = h.sum();
    let positive = m.iter().filter(|&&p| p > 0.0).count();
    let row_sums: Array1<f64> = m.sum_axis(ndarray::Axis(1));

    let mut best: Option<Pivot> = None;
    for i in (0..n).filter(|&i| row_sums[i] > 0.0) {
        let mut s_i = 0.0;
        let mut c_i = 0usize;
        for j in 0..n {
            if m[[i, j]] > 0.0 {
                s_i += h[[i, j]];
                c_i += 1;
            }
            if j != i && m[[j, i]] > 0.0 {
                s_i += h[[j, i]];
                c_i += 1;
            }
        }
        let drop = match fixed_n {
            Some(n0) => scaled(total, n0) - scaled(total - s_i, n0),
            None => scaled(total, positive) - scaled(total - s_i, positive - c_i),
        };
        if best.map_or(true, |b| drop < b.entropy_drop) {
            best = Some(Pivot {
                index: i,
                entropy_drop: drop,
            });
        }
    }
    best
}

/// Rank the rows of a similarity matrix by iterative entropy extraction.
///
/// The matrix must be square, finite and non-negative. With
/// `cfg.normalize` it is first passed through [`normalize_similarity`].
/// Extraction stops once no row has a positive sum, so at most `n` pivots
/// are returned and no row appears twice.
pub fn sort_by_entropy(sim: ArrayView2<'_, f64>, cfg: &EntropyConfig) -> Result<PivotSequence> {
    check_square(&sim)?;
    if sim.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(Error::InvalidParameter {
            name: "similarity",
            message: "entries must be finite and non-negative",
        });
    }
    let mut work = if cfg.normalize {
        normalize_similarity(sim)?
    } else {
        sim.to_owned()
    };
    let fixed_n = match cfg.entropy_base {
        EntropyBase::Fixed => Some(work.iter().filter(|&&p| p > 0.0).count()),
        EntropyBase::PerMatrix => None,
    };

    let mut pivots = Vec::new();
    while let Some(p) = find_pivot(&work, fixed_n) {
        debug!(step = pivots.len(), pivot = p.index, entropy_drop = p.entropy_drop, "extracted pivot");
        work.row_mut(p.index).fill(0.0);
        work.column_mut(p.index).fill(0.0);
        pivots.push(p);
    }
    Ok(PivotSequence::new(pivots))
}
