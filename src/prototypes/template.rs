//! Template (prototype) selection per class or cluster.

use ndarray::{ArrayView2, Axis};
use tracing::debug;

use super::entropy::{sort_by_entropy, EntropyConfig, Pivot, PivotSequence};
use super::selection::SelectionStrategy;
use crate::error::{Error, Result};
use crate::measure::MeasureFn;
use crate::pairwise::{check_label_count, group_by_label, symmetric_pairwise_matrix};

/// Rank the rows of `samples` by entropy of their pairwise similarities.
///
/// `similarity` should grow with likeness, e.g. one obtained from
/// [`Registry::similarity`](crate::measure::Registry::similarity). A single
/// sample yields the one-element sequence `[(0, 0.0)]`. Self-similarities
/// are not part of the ranking: the matrix diagonal is 0.
pub fn order_templates(
    samples: ArrayView2<'_, f64>,
    similarity: &MeasureFn,
    cfg: &EntropyConfig,
) -> Result<PivotSequence> {
    match samples.nrows() {
        0 => Err(Error::EmptyInput),
        1 => Ok(PivotSequence::new(vec![Pivot {
            index: 0,
            entropy_drop: 0.0,
        }])),
        _ => {
            let sim = symmetric_pairwise_matrix(samples, similarity)?;
            sort_by_entropy(sim.view(), cfg)
        }
    }
}

/// Templates chosen from one group, as ascending row indices into `samples`.
///
/// Positions picked by `strategy` are mapped to rows through the pivot
/// sequence. Groups of two or more always yield at least two templates:
/// an empty pick becomes rows `[0, 1]` and a single row `s` is joined by
/// `(s + 1) % len`. A group of one yields `[0]`.
pub fn cluster_template_selection(
    samples: ArrayView2<'_, f64>,
    similarity: &MeasureFn,
    strategy: &SelectionStrategy,
    cfg: &EntropyConfig,
) -> Result<Vec<usize>> {
    let len = samples.nrows();
    if len == 0 {
        return Err(Error::EmptyInput);
    }
    if len == 1 {
        return Ok(vec![0]);
    }

    let seq = order_templates(samples, similarity, cfg)?;
    let pivots = seq.pivots();
    let mut rows: Vec<usize> = strategy
        .select(&seq)?
        .into_iter()
        .map(|pos| pivots[pos].index)
        .collect();

    match rows.as_slice() {
        [] => rows = vec![0, 1],
        [s] => rows.push((s + 1) % len),
        _ => {}
    }
    rows.sort_unstable();
    rows.dedup();
    debug!(group_size = len, selected = rows.len(), "selected templates");
    Ok(rows)
}

/// A selected template: its row in the full data matrix and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template<L> {
    /// Row index into the data matrix.
    pub index: usize,
    /// Group the template represents.
    pub label: L,
}

/// Run [`cluster_template_selection`] on every label group of `data`.
///
/// Groups are visited in sorted label order; rows within a group ascend.
pub fn perform_template_selection<L: Ord + Clone>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    similarity: &MeasureFn,
    strategy: &SelectionStrategy,
    cfg: &EntropyConfig,
) -> Result<Vec<Template<L>>> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    check_label_count(data.nrows(), labels.len())?;

    let mut out = Vec::new();
    for group in group_by_label(labels) {
        let samples = data.select(Axis(0), &group);
        let label = &labels[group[0]];
        for local in cluster_template_selection(samples.view(), similarity, strategy, cfg)? {
            out.push(Template {
                index: group[local],
                label: label.clone(),
            });
        }
    }
    Ok(out)
}
