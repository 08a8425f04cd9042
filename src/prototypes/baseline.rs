//! Baseline prototype selectors to compare entropy ranking against.

use ndarray::ArrayView2;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::measure::MeasureFn;

fn check_k(n: usize, k: usize) -> Result<()> {
    if k > n {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "cannot select more prototypes than samples",
        });
    }
    Ok(())
}

fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s)),
        None => Box::new(rand::rng()),
    }
}

/// `k` distinct indices drawn uniformly from `0..n`, ascending.
pub fn random_selection(n: usize, k: usize, seed: Option<u64>) -> Result<Vec<usize>> {
    check_k(n, k)?;
    let mut rng = make_rng(seed);
    let mut picked = rand::seq::index::sample(&mut rng, n, k).into_vec();
    picked.sort_unstable();
    Ok(picked)
}

/// Farthest-first traversal: `k` rows, each maximizing its distance to the
/// nearest row already chosen.
///
/// The first row is drawn at random. Ties go to the lower index. Rows are
/// returned in selection order.
pub fn farthest_first_selection(
    data: ArrayView2<'_, f64>,
    k: usize,
    measure: &MeasureFn,
    seed: Option<u64>,
) -> Result<Vec<usize>> {
    let n = data.nrows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    check_k(n, k)?;
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut rng = make_rng(seed);
    let first = rng.random_range(0..n);
    let mut chosen = vec![first];

    // distance of each row to its nearest chosen row
    let mut nearest = vec![f64::INFINITY; n];
    let mut last = first;
    while chosen.len() < k {
        for i in 0..n {
            let d = measure(data.row(i), data.row(last))?;
            if d < nearest[i] {
                nearest[i] = d;
            }
        }
        let mut best: Option<(usize, f64)> = None;
        for i in (0..n).filter(|i| !chosen.contains(i)) {
            if best.map_or(true, |(_, d)| nearest[i] > d) {
                best = Some((i, nearest[i]));
            }
        }
        let Some((next, d)) = best else { break };
        debug!(step = chosen.len(), row = next, distance = d, "farthest-first pick");
        chosen.push(next);
        last = next;
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{euclidean, measure_fn};
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn random_selection_is_seeded_and_sorted() {
        let a = random_selection(20, 5, Some(7)).unwrap();
        let b = random_selection(20, 5, Some(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert!(a.iter().all(|&i| i < 20));
        assert_eq!(random_selection(4, 4, None).unwrap(), vec![0, 1, 2, 3]);
        assert!(random_selection(3, 4, Some(1)).is_err());
    }

    #[test]
    fn farthest_first_spreads_out() {
        let x = array![[0.0], [1.0], [2.0], [10.0], [11.0]];
        let f = measure_fn(euclidean);
        let picked = farthest_first_selection(x.view(), 2, &f, Some(3)).unwrap();
        assert_eq!(picked.len(), 2);
        // the second pick is always an extreme point
        let far = if x[[picked[0], 0]] < 5.0 { 4 } else { 0 };
        assert_eq!(picked[1], far);

        let all = farthest_first_selection(x.view(), 5, &f, Some(3)).unwrap();
        let mut sorted = all.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn farthest_first_edge_cases() {
        let x = array![[0.0, 1.0], [2.0, 3.0]];
        let f = measure_fn(euclidean);
        assert!(farthest_first_selection(x.view(), 0, &f, None).unwrap().is_empty());
        assert!(farthest_first_selection(x.view(), 3, &f, None).is_err());
        let empty = ndarray::Array2::<f64>::zeros((0, 2));
        assert_eq!(
            farthest_first_selection(empty.view(), 0, &f, None).unwrap_err(),
            Error::EmptyInput
        );
    }

    proptest! {
        #[test]
        fn farthest_first_picks_distinct_rows(
            n in 1usize..12,
            k_frac in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let x = ndarray::Array2::from_shape_fn((n, 3), |(i, j)| ((i * 7 + j) % 5) as f64);
            let k = ((n as f64) * k_frac) as usize;
            let picked = farthest_first_selection(x.view(), k, &measure_fn(euclidean), Some(seed)).unwrap();
            prop_assert_eq!(picked.len(), k);
            let mut seen = picked.clone();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), k);
        }
    }
}
