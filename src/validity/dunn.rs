use ndarray::ArrayView2;
use tracing::warn;

use super::require_clusters;
use crate::error::Result;
use crate::pairwise::{comparison_matrix, group_by_label, MeasureSpec};

/// Dunn index: smallest between-cluster distance over largest cluster diameter.
///
/// Zero distances between two clusters are skipped when looking for the
/// smallest separation; if every distance between a pair of clusters is
/// zero, that pair contributes a separation of 0. When every diameter is 0
/// the index is `+∞` for positive separation and 0 otherwise.
///
/// Higher is better.
pub fn dunn<L: Ord>(data: ArrayView2<'_, f64>, labels: &[L], spec: &MeasureSpec) -> Result<f64> {
    let d = comparison_matrix(data, labels.len(), spec)?;
    let groups = group_by_label(labels);
    require_clusters(&groups)?;

    let mut min_separation = f64::INFINITY;
    let mut max_diameter: f64 = 0.0;
    for (k, gk) in groups.iter().enumerate() {
        for (l, gl) in groups.iter().enumerate() {
            if k == l {
                continue;
            }
            let sep = gk
                .iter()
                .flat_map(|&i| gl.iter().map(move |&j| (i, j)))
                .map(|(i, j)| d[[i, j]])
                .filter(|&v| v != 0.0)
                .fold(f64::INFINITY, f64::min);
            min_separation = min_separation.min(if sep.is_finite() { sep } else { 0.0 });
        }
        for &i in gk {
            for &j in gk.iter().filter(|&&j| j != i) {
                max_diameter = max_diameter.max(d[[i, j]]);
            }
        }
    }

    if max_diameter == 0.0 {
        warn!("every cluster has zero diameter in Dunn index");
        return Ok(if min_separation > 0.0 {
            f64::INFINITY
        } else {
            0.0
        });
    }
    Ok(min_separation / max_diameter)
}
