use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use super::require_clusters;
use crate::error::{Error, Result};
use crate::pairwise::{check_label_count, comparison_matrix, group_by_label, MeasureSpec};

fn norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Score Function over the rows of `space`.
fn score(space: ArrayView2<'_, f64>, groups: &[Vec<usize>]) -> f64 {
    let n = space.nrows() as f64;
    let k = groups.len() as f64;
    let global: Array1<f64> = space.sum_axis(Axis(0)) / n;

    let mut bcd = 0.0;
    let mut wcd = 0.0;
    for g in groups {
        let members = space.select(Axis(0), g);
        let size = g.len() as f64;
        let centroid: Array1<f64> = members.sum_axis(Axis(0)) / size;

        bcd += norm((&centroid - &global).view()) * size;
        let spread: f64 = members
            .outer_iter()
            .map(|v| norm((&v - &centroid).view()))
            .sum();
        wcd += spread / size;
    }
    bcd /= n * k;

    let x = (bcd - wcd) / (bcd + wcd);
    1.0 - 1.0 / x.exp().exp()
}

/// Score Function in a dissimilarity space.
///
/// Rows of the comparison matrix are the sample vectors. With `bcd` the
/// size-weighted distance of cluster centroids to the global centroid,
/// divided by `n * k`, and `wcd` the sum over clusters of the mean member
/// distance to the centroid:
///
/// ```text
/// SF = 1 - 1 / exp(exp((bcd - wcd) / (bcd + wcd)))
/// ```
///
/// Bounded in (0, 1); higher is better.
pub fn score_function<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<f64> {
    let d = comparison_matrix(data, labels.len(), spec)?;
    let groups = group_by_label(labels);
    require_clusters(&groups)?;
    Ok(score(d.view(), &groups))
}

/// Score Function over the raw feature vectors.
pub fn score_function_in_feature_space<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
) -> Result<f64> {
    if data.nrows() == 0 {
        return Err(Error::EmptyInput);
    }
    check_label_count(data.nrows(), labels.len())?;
    let groups = group_by_label(labels);
    require_clusters(&groups)?;
    Ok(score(data, &groups))
}
