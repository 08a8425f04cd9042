use ndarray::{Array1, ArrayView2};

use crate::error::{Error, Result};
use crate::pairwise::{comparison_matrix, group_by_label, MeasureSpec};

/// Per-sample silhouette values.
///
/// For sample `i`, `a` is the mean distance to the other members of its
/// cluster and `b` the smallest mean distance to another cluster; the value
/// is `(b - a) / max(a, b)`. Members of singleton clusters score 0, as does
/// a sample with `a == b == 0`.
///
/// Requires `2 <= n_clusters <= n_samples - 1`.
pub fn silhouette_samples<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<Array1<f64>> {
    let d = comparison_matrix(data, labels.len(), spec)?;
    let groups = group_by_label(labels);
    let n = labels.len();
    if groups.len() < 2 || groups.len() >= n {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "number of clusters must be between 2 and n_samples - 1",
        });
    }

    let mut owner = vec![0usize; n];
    for (k, g) in groups.iter().enumerate() {
        for &i in g {
            owner[i] = k;
        }
    }

    let mut out = Array1::zeros(n);
    for i in 0..n {
        let own = &groups[owner[i]];
        if own.len() == 1 {
            continue;
        }
        let a = own
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| d[[i, j]])
            .sum::<f64>()
            / (own.len() - 1) as f64;
        let b = groups
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != owner[i])
            .map(|(_, g)| g.iter().map(|&j| d[[i, j]]).sum::<f64>() / g.len() as f64)
            .fold(f64::INFINITY, f64::min);
        let s = (b - a) / a.max(b);
        out[i] = if s.is_nan() { 0.0 } else { s };
    }
    Ok(out)
}

/// Mean silhouette value over all samples.
pub fn silhouette<L: Ord>(
    data: ArrayView2<'_, f64>,
    labels: &[L],
    spec: &MeasureSpec,
) -> Result<f64> {
    let s = silhouette_samples(data, labels, spec)?;
    Ok(s.sum() / s.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{euclidean, measure_fn, Measure};
    use crate::pairwise::pairwise_matrix;
    use crate::validity::fixtures::consecutive;

    #[test]
    fn reference_values() {
        let x = consecutive();
        let euc = MeasureSpec::ById(0);
        let cases = [
            ([1, 0, 0, 0, 0], 0.177_777_777_777_777_76),
            ([1, 0, 1, 0, 1], -0.3),
            ([0, 0, 1, 1, 1], 0.467_619_047_619_047_55),
        ];
        for (labels, want) in cases {
            let got = silhouette(x.view(), &labels, &euc).unwrap();
            assert!((got - want).abs() < 1e-12, "{labels:?}: {got}");
        }
    }

    #[test]
    fn per_sample_values() {
        let x = consecutive();
        let s = silhouette_samples(x.view(), &[0, 0, 1, 1, 1], &MeasureSpec::ById(0)).unwrap();
        let want = [2.0 / 3.0, 0.5, 0.0, 0.6, 4.0 / 7.0];
        for (g, w) in s.iter().zip(want) {
            assert!((g - w).abs() < 1e-12);
        }
    }

    #[test]
    fn singleton_cluster_scores_zero() {
        let x = consecutive();
        let s = silhouette_samples(x.view(), &[1, 0, 0, 0, 0], &MeasureSpec::ById(0)).unwrap();
        assert_eq!(s[0], 0.0);
    }

    #[test]
    fn precomputed_agrees() {
        let x = consecutive();
        let f = measure_fn(euclidean);
        let d = pairwise_matrix(x.view(), &f).unwrap();
        let labels = ["x", "y", "x", "y", "y"];
        let a = silhouette(x.view(), &labels, &MeasureSpec::Callable(f)).unwrap();
        let b = silhouette(d.view(), &labels, &MeasureSpec::Precomputed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn precomputed_cosine_reference() {
        let x = consecutive();
        let d = comparison_matrix(x.view(), 5, &MeasureSpec::Builtin(Measure::Cosine))
            .unwrap()
            .into_owned();
        let got = silhouette(d.view(), &[1, 0, 0, 0, 0], &MeasureSpec::Precomputed).unwrap();
        assert!((got - 0.761_556_068_941_475_8).abs() < 1e-9, "{got}");
    }

    #[test]
    fn cluster_count_bounds() {
        let x = consecutive();
        assert!(silhouette(x.view(), &[0; 5], &MeasureSpec::ById(0)).is_err());
        assert!(silhouette(x.view(), &[0, 1, 2, 3, 4], &MeasureSpec::ById(0)).is_err());
    }
}
