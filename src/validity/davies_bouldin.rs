use ndarray::ArrayView2;
use tracing::warn;

use super::require_clusters;
use crate::error::Result;
use crate::pairwise::{comparison_matrix, group_by_label, MeasureSpec};

/// Davies-Bouldin index.
///
/// Each cluster is represented by its barycenter, the member with the
/// smallest summed distance to the rest of the cluster (first index wins
/// ties). Its spread is that sum divided by the cluster size. The index is
///
/// ```text
/// DB = mean_k max_{l≠k} (spread_k + spread_l) / d(bary_k, bary_l)
/// ```
///
/// Lower is better. Coincident barycenters give a ratio of `+∞` (or 0 when
/// both spreads are 0), so the index may be infinite.
pub fn davies_bouldin<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<f64> {
    let d = comparison_matrix(data, labels.len(), spec)?;
    let groups = group_by_label(labels);
    require_clusters(&groups)?;

    let mut barycenters = Vec::with_capacity(groups.len());
    let mut spreads = Vec::with_capacity(groups.len());
    for g in &groups {
        let (mut best, mut best_sum) = (g[0], f64::INFINITY);
        for &i in g {
            let s: f64 = g.iter().filter(|&&j| j != i).map(|&j| d[[i, j]]).sum();
            if s < best_sum {
                best = i;
                best_sum = s;
            }
        }
        barycenters.push(best);
        spreads.push(best_sum / g.len() as f64);
    }

    let k = groups.len();
    let mut total = 0.0;
    for a in 0..k {
        let mut worst = f64::NEG_INFINITY;
        for b in (0..k).filter(|&b| b != a) {
            let num = spreads[a] + spreads[b];
            let den = d[[barycenters[a], barycenters[b]]];
            let ratio = if den == 0.0 {
                warn!(
                    cluster_a = a,
                    cluster_b = b,
                    "coincident barycenters in Davies-Bouldin"
                );
                if num == 0.0 {
                    0.0
                } else {
                    f64::INFINITY
                }
            } else {
                num / den
            };
            worst = worst.max(ratio);
        }
        total += worst;
    }
    Ok(total / k as f64)
}
