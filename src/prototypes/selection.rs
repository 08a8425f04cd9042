//! Strategies that pick positions out of a [`PivotSequence`].
//!
//! Every strategy returns positions in the sequence (0 = first pivot), not
//! matrix rows; map them through [`PivotSequence::pivots`] to get rows.
//!
//! | Strategy | Input | Keeps |
//! |----------|-------|-------|
//! | [`best_percent`] | fitness deltas | top `ceil(p% · len)`, at least 1 |
//! | [`local_maximum`] | fitness deltas | peaks where growth turns into decline |
//! | [`one_shot`] | fitness deltas | every delta above a threshold |
//! | [`left_of_vertex`] | entropy drops | positions left of a fitted parabola's vertex |

use faer::prelude::*;
use faer::Mat;
use tracing::debug;

use super::entropy::PivotSequence;
use crate::error::{Error, Result};

/// Top `ceil(percent / 100 · len)` positions by descending fitness delta.
///
/// At least one position is kept for a non-empty sequence. Equal deltas
/// keep sequence order.
pub fn best_percent(seq: &PivotSequence, percent: f64) -> Result<Vec<usize>> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(Error::InvalidParameter {
            name: "percent",
            message: "must be within [0, 100]",
        });
    }
    if seq.is_empty() {
        return Ok(Vec::new());
    }
    let deltas = seq.fitness_deltas();
    let keep = ((percent / 100.0 * seq.len() as f64).ceil() as usize).clamp(1, seq.len());

    let mut order: Vec<usize> = (0..deltas.len()).collect();
    order.sort_by(|&a, &b| deltas[b].total_cmp(&deltas[a]));
    order.truncate(keep);
    Ok(order)
}

/// Positions where the fitness deltas stop growing right after growing.
///
/// The curve counts as growing before the first delta, so a decline at the
/// start keeps position 0.
pub fn local_maximum(seq: &PivotSequence) -> Vec<usize> {
    let deltas = seq.fitness_deltas();
    let mut out = Vec::new();
    let mut growing = true;
    for i in 1..deltas.len() {
        if deltas[i] < deltas[i - 1] {
            if growing {
                out.push(i - 1);
            }
            growing = false;
        } else {
            growing = true;
        }
    }
    out
}

/// Positions whose fitness delta exceeds `threshold`.
pub fn one_shot(seq: &PivotSequence, threshold: f64) -> Vec<usize> {
    seq.fitness_deltas()
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Least-squares `(a, b, c)` of `y = a x² + b x + c` through `(i + 1, values[i])`.
fn fit_parabola(values: &[f64]) -> (f64, f64, f64) {
    let m = values.len();
    let mut v = Mat::<f64>::zeros(m, 3);
    let mut y = Mat::<f64>::zeros(m, 1);
    for (i, &value) in values.iter().enumerate() {
        let x = (i + 1) as f64;
        v[(i, 0)] = x * x;
        v[(i, 1)] = x;
        v[(i, 2)] = 1.0;
        y[(i, 0)] = value;
    }
    let v_ref = v.as_ref();
    let vt = v_ref.transpose();
    let vtv = &vt * v_ref;
    let vty = &vt * &y;
    let coef = vtv.full_piv_lu().solve(&vty);
    (coef[(0, 0)], coef[(1, 0)], coef[(2, 0)])
}

/// Positions left of the vertex of a parabola fitted to the entropy drops.
///
/// Position `i` is kept when `i + 1 <= -b / (2a)`. With fewer than three
/// pivots the parabola is undetermined and every position is kept. A flat
/// fit (`a == 0`) puts the vertex at infinity, keeping everything when the
/// fit descends and nothing otherwise.
pub fn left_of_vertex(seq: &PivotSequence) -> Vec<usize> {
    if seq.len() < 3 {
        return (0..seq.len()).collect();
    }
    let (a, b, _) = fit_parabola(&seq.values());
    let vertex = -b / (2.0 * a);
    debug!(a, b, vertex, "fitted entropy parabola");
    (0..seq.len())
        .filter(|&i| (i + 1) as f64 <= vertex)
        .collect()
}

/// A selection strategy together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionStrategy {
    /// [`left_of_vertex`].
    LeftOfVertex,
    /// [`local_maximum`].
    LocalMaximum,
    /// [`one_shot`] with the given threshold.
    OneShot {
        /// Deltas must be strictly greater than this.
        threshold: f64,
    },
    /// [`best_percent`] with the given percentage.
    BestPercent {
        /// Share of the sequence to keep, in [0, 100].
        percent: f64,
    },
}

impl SelectionStrategy {
    /// `LFT_VTX`.
    pub const LEFT_VERTEX: Self = SelectionStrategy::LeftOfVertex;
    /// `LOC_MAX`.
    pub const LOCAL_MAXIMUM: Self = SelectionStrategy::LocalMaximum;
    /// `OSH_POS`: any positive delta.
    pub const ONE_SHOT_POSITIVES: Self = SelectionStrategy::OneShot { threshold: 0.0 };
    /// `OSH_THR`: deltas above 0.1.
    pub const ONE_SHOT_THRESHOLD: Self = SelectionStrategy::OneShot { threshold: 0.1 };
    /// `BST_25P`.
    pub const BEST_25: Self = SelectionStrategy::BestPercent { percent: 25.0 };
    /// `BST_50P`.
    pub const BEST_50: Self = SelectionStrategy::BestPercent { percent: 50.0 };
    /// `BST_75P`.
    pub const BEST_75: Self = SelectionStrategy::BestPercent { percent: 75.0 };

    /// The preset strategies, in their historical id order.
    pub const PRESETS: [Self; 7] = [
        Self::LEFT_VERTEX,
        Self::LOCAL_MAXIMUM,
        Self::ONE_SHOT_POSITIVES,
        Self::ONE_SHOT_THRESHOLD,
        Self::BEST_25,
        Self::BEST_50,
        Self::BEST_75,
    ];

    /// Short display name of a preset; `None` for custom parameters.
    pub fn preset_name(&self) -> Option<&'static str> {
        const NAMES: [&str; 7] = [
            "LFT_VTX", "LOC_MAX", "OSH_POS", "OSH_THR", "BST_25P", "BST_50P", "BST_75P",
        ];
        Self::PRESETS
            .iter()
            .position(|p| p == self)
            .map(|i| NAMES[i])
    }

    /// Positions selected from `seq`.
    pub fn select(&self, seq: &PivotSequence) -> Result<Vec<usize>> {
        match *self {
            SelectionStrategy::LeftOfVertex => Ok(left_of_vertex(seq)),
            SelectionStrategy::LocalMaximum => Ok(local_maximum(seq)),
            SelectionStrategy::OneShot { threshold } => Ok(one_shot(seq, threshold)),
            SelectionStrategy::BestPercent { percent } => best_percent(seq, percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototypes::entropy::Pivot;

    fn sequence(values: &[f64]) -> PivotSequence {
        PivotSequence::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Pivot {
                    index: i,
                    entropy_drop: v,
                })
                .collect(),
        )
    }

    // drops of the 5x10 consecutive-integer gallery (per-matrix entropy base)
    fn reference() -> PivotSequence {
        sequence(&[
            0.159_152_717_706_357_64,
            0.085_513_267_684_525_94,
            0.707_731_263_122_849_5,
            0.0,
        ])
    }

    #[test]
    fn best_percent_rounds_up() {
        let seq = reference();
        assert_eq!(best_percent(&seq, 50.0).unwrap(), vec![2, 0]);
        assert_eq!(best_percent(&seq, 25.0).unwrap(), vec![2]);
        assert_eq!(best_percent(&seq, 30.0).unwrap(), vec![2, 0]);
        assert_eq!(best_percent(&seq, 0.0).unwrap(), vec![2]);
        assert_eq!(best_percent(&seq, 100.0).unwrap(), vec![2, 0, 1, 3]);
        assert!(best_percent(&seq, 101.0).is_err());
        assert!(best_percent(&PivotSequence::default(), 50.0).unwrap().is_empty());
    }

    #[test]
    fn local_maximum_on_deltas() {
        assert_eq!(local_maximum(&reference()), vec![0, 2]);
        // deltas 0, 1, 2, 1, 2, 1
        let seq = sequence(&[0.0, 1.0, 3.0, 4.0, 6.0, 7.0]);
        assert_eq!(local_maximum(&seq), vec![2, 4]);
    }

    #[test]
    fn one_shot_thresholds() {
        let seq = reference();
        assert_eq!(one_shot(&seq, 0.0), vec![2]);
        assert_eq!(one_shot(&seq, 0.7), Vec::<usize>::new());
        assert_eq!(one_shot(&seq, -0.1), vec![0, 1, 2]);
    }

    #[test]
    fn left_of_vertex_reference() {
        assert_eq!(left_of_vertex(&reference()), vec![0, 1]);
        // exact parabola 0.5x² - 3.5x + 8, vertex at 3.5
        let seq = sequence(&[5.0, 3.0, 2.0, 2.0, 3.0, 5.0, 8.0]);
        assert_eq!(left_of_vertex(&seq), vec![0, 1, 2]);
        assert_eq!(left_of_vertex(&sequence(&[0.3, 0.1])), vec![0, 1]);
    }

    #[test]
    fn presets_and_dispatch() {
        assert_eq!(SelectionStrategy::PRESETS.len(), 7);
        assert_eq!(SelectionStrategy::BEST_50.preset_name(), Some("BST_50P"));
        assert_eq!(SelectionStrategy::ONE_SHOT_THRESHOLD.preset_name(), Some("OSH_THR"));
        assert_eq!(SelectionStrategy::OneShot { threshold: 0.3 }.preset_name(), None);

        let seq = reference();
        assert_eq!(SelectionStrategy::BEST_50.select(&seq).unwrap(), vec![2, 0]);
        assert_eq!(SelectionStrategy::LOCAL_MAXIMUM.select(&seq).unwrap(), vec![0, 2]);
        assert_eq!(SelectionStrategy::ONE_SHOT_POSITIVES.select(&seq).unwrap(), vec![2]);
        assert_eq!(SelectionStrategy::LEFT_VERTEX.select(&seq).unwrap(), vec![0, 1]);
    }
}
