//! External validation: compare a labeling against ground truth.
//!
//! # Metrics Overview
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`precision`] | (0, 1] | 1 | BCubed; penalizes mixing classes in a cluster |
//! | [`recall`] | (0, 1] | 1 | BCubed; penalizes splitting a class |
//! | [`f_measure`] | (0, 1] | 1 | harmonic mean of the two |
//! | [`f_measure_beta`] | (0, 1] | 1 | recall weighted `beta` times as much as precision |
//! | [`accuracy`] | [0, 1] | 1 | fraction of equal positions; no label matching |
//!
//! Every item has exactly one predicted and one true label, so BCubed
//! multiplicity precision for a pair in the same cluster is 1 when they also
//! share a class and 0 otherwise. Per-item averages then reduce to counts
//! in the contingency table:
//!
//! ```text
//! P = (1/n) Σ_{c,t} n_ct² / |C_c|        R = (1/n) Σ_{c,t} n_ct² / |T_t|
//! ```
//!
//! # Example
//!
//! ```rust
//! use chemdis::metrics::f_measure;
//!
//! let f = f_measure(&[0, 1, 0], &[1, 1, 0]).unwrap();
//! assert!((f - 2.0 / 3.0).abs() < 1e-12);
//! ```
//!
//! # References
//!
//! - Bagga & Baldwin (1998). "Entity-based cross-document coreferencing using the vector space model"
//! - Amigó et al. (2009). "A comparison of extrinsic clustering evaluation metrics based on formal constraints"

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};

fn check_lengths(labels: usize, truth: usize) -> Result<()> {
    if labels == 0 {
        return Err(Error::EmptyInput);
    }
    if labels != truth {
        return Err(Error::LabelCountMismatch {
            samples: truth,
            labels,
        });
    }
    Ok(())
}

fn build_contingency_table<'a, L, T>(
    labels: &'a [L],
    truth: &'a [T],
) -> (HashMap<(&'a L, &'a T), usize>, HashMap<&'a L, usize>, HashMap<&'a T, usize>)
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    let mut table = HashMap::new();
    let mut clusters = HashMap::new();
    let mut classes = HashMap::new();
    for (l, t) in labels.iter().zip(truth.iter()) {
        *table.entry((l, t)).or_insert(0) += 1;
        *clusters.entry(l).or_insert(0) += 1;
        *classes.entry(t).or_insert(0) += 1;
    }
    (table, clusters, classes)
}

/// BCubed precision and recall in one pass.
fn bcubed<L, T>(labels: &[L], truth: &[T]) -> Result<(f64, f64)>
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    check_lengths(labels.len(), truth.len())?;
    let (table, clusters, classes) = build_contingency_table(labels, truth);

    let mut p = 0.0;
    let mut r = 0.0;
    for (&(l, t), &count) in &table {
        let sq = (count * count) as f64;
        p += sq / clusters[l] as f64;
        r += sq / classes[t] as f64;
    }
    let n = labels.len() as f64;
    Ok((p / n, r / n))
}

/// BCubed precision of `labels` against `truth`.
pub fn precision<L, T>(labels: &[L], truth: &[T]) -> Result<f64>
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    bcubed(labels, truth).map(|(p, _)| p)
}

/// BCubed recall of `labels` against `truth`.
pub fn recall<L, T>(labels: &[L], truth: &[T]) -> Result<f64>
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    bcubed(labels, truth).map(|(_, r)| r)
}

/// BCubed F-measure, `(1 + β²) P R / (β² P + R)`.
pub fn f_measure_beta<L, T>(labels: &[L], truth: &[T], beta: f64) -> Result<f64>
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    if !(beta >= 0.0) || !beta.is_finite() {
        return Err(Error::InvalidParameter {
            name: "beta",
            message: "must be a non-negative finite number",
        });
    }
    let (p, r) = bcubed(labels, truth)?;
    let b2 = beta * beta;
    Ok((1.0 + b2) * p * r / (b2 * p + r))
}

/// BCubed F-measure with `beta = 1`.
pub fn f_measure<L, T>(labels: &[L], truth: &[T]) -> Result<f64>
where
    L: Hash + Eq,
    T: Hash + Eq,
{
    f_measure_beta(labels, truth, 1.0)
}

/// Fraction of positions where `labels` equals `truth`.
pub fn accuracy<L: PartialEq>(labels: &[L], truth: &[L]) -> Result<f64> {
    check_lengths(labels.len(), truth.len())?;
    let hits = labels.iter().zip(truth).filter(|(a, b)| a == b).count();
    Ok(hits as f64 / labels.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_values() {
        let f = f_measure(&[0, 1, 0], &[1, 1, 0]).unwrap();
        assert!((f - 0.666_666_666_666_666_6).abs() < 1e-12);
        let f = f_measure(&[0, 1, 0, 0, 1], &[1, 1, 0, 0, 0]).unwrap();
        assert!((f - 0.533_333_333_333_333_3).abs() < 1e-12);
    }

    #[test]
    fn precision_and_recall_split() {
        // one big cluster: perfect recall, poor precision
        let labels = [0, 0, 0, 0];
        let truth = ["a", "a", "b", "b"];
        assert!((precision(&labels, &truth).unwrap() - 0.5).abs() < 1e-12);
        assert!((recall(&labels, &truth).unwrap() - 1.0).abs() < 1e-12);

        // all singletons: perfect precision, poor recall
        let labels = [0, 1, 2, 3];
        assert!((precision(&labels, &truth).unwrap() - 1.0).abs() < 1e-12);
        assert!((recall(&labels, &truth).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn beta_weights_recall() {
        let labels = [0, 0, 0, 0];
        let truth = [1, 1, 2, 2];
        let f0 = f_measure_beta(&labels, &truth, 0.0).unwrap();
        assert!((f0 - 0.5).abs() < 1e-12);
        let f2 = f_measure_beta(&labels, &truth, 2.0).unwrap();
        // (5 * 0.5 * 1) / (4 * 0.5 + 1)
        assert!((f2 - 2.5 / 3.0).abs() < 1e-12);
        assert!(f_measure_beta(&labels, &truth, -1.0).is_err());
    }

    #[test]
    fn accuracy_counts_equal_positions() {
        assert!((accuracy(&[1, 2, 3, 4], &[1, 2, 0, 4]).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(matches!(
            f_measure(&[0, 1], &[0, 1, 1]),
            Err(Error::LabelCountMismatch { .. })
        ));
        assert!(accuracy(&[0, 1], &[0]).is_err());
        let empty: [u8; 0] = [];
        assert_eq!(precision(&empty, &empty).unwrap_err(), Error::EmptyInput);
    }

    proptest! {
        #[test]
        fn identical_labelings_score_one(labels in prop::collection::vec(0u8..5, 1..40)) {
            prop_assert!((f_measure(&labels, &labels).unwrap() - 1.0).abs() < 1e-12);
            prop_assert!((accuracy(&labels, &labels).unwrap() - 1.0).abs() < 1e-12);
        }

        #[test]
        fn scores_are_bounded(
            pairs in prop::collection::vec((0u8..4, 0u8..4), 1..40)
        ) {
            let (labels, truth): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
            let p = precision(&labels, &truth).unwrap();
            let r = recall(&labels, &truth).unwrap();
            prop_assert!(p > 0.0 && p <= 1.0 + 1e-12);
            prop_assert!(r > 0.0 && r <= 1.0 + 1e-12);
            // swapping the roles swaps precision and recall
            prop_assert!((precision(&truth, &labels).unwrap() - r).abs() < 1e-12);
        }
    }
}
