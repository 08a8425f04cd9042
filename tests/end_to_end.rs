use chemdis::distribution_distance::{
    rayleigh_coefficient, DiscretizationConfig, DistributionReport,
};
use chemdis::measure::{Measure, Registry};
use chemdis::metrics::f_measure;
use chemdis::pairwise::{comparison_matrix, intra_inter, pairwise_matrix, MeasureSpec};
use chemdis::prototypes::{perform_template_selection, EntropyConfig, SelectionStrategy};
use chemdis::representation::{dissimilarity_representation, Prototypes};
use chemdis::validity::{davies_bouldin, dunn, score_function, silhouette};
use chemdis::Error;
use ndarray::Array2;
use proptest::prelude::*;

/// Two families of smooth synthetic "spectra": a low and a high peak.
fn spectra() -> (Array2<f64>, Vec<&'static str>) {
    let n_feat = 40;
    let x = Array2::from_shape_fn((8, n_feat), |(i, j)| {
        let center = if i < 4 { 12.0 } else { 28.0 };
        let width = 3.0 + 0.3 * i as f64;
        let t = j as f64 - center;
        (-(t * t) / (2.0 * width * width)).exp() + 0.01 * i as f64
    });
    let labels = vec!["low", "low", "low", "low", "high", "high", "high", "high"];
    (x, labels)
}

#[test]
fn precomputed_matrix_reproduces_every_index() {
    let (x, labels) = spectra();
    for measure in [Measure::Euclidean, Measure::Cosine, Measure::BrayCurtis, Measure::ShapePy] {
        let spec = MeasureSpec::Builtin(measure);
        let d = comparison_matrix(x.view(), labels.len(), &spec).unwrap().into_owned();
        let pre = MeasureSpec::Precomputed;

        let pairs = [
            (davies_bouldin(x.view(), &labels, &spec), davies_bouldin(d.view(), &labels, &pre)),
            (dunn(x.view(), &labels, &spec), dunn(d.view(), &labels, &pre)),
            (score_function(x.view(), &labels, &spec), score_function(d.view(), &labels, &pre)),
            (silhouette(x.view(), &labels, &spec), silhouette(d.view(), &labels, &pre)),
        ];
        for (raw, precomputed) in pairs {
            assert_eq!(raw.unwrap(), precomputed.unwrap(), "{measure:?}");
        }

        let a = intra_inter(x.view(), &labels, &spec).unwrap();
        let b = intra_inter(d.view(), &labels, &pre).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn separated_classes_score_well() {
    let (x, labels) = spectra();
    let spec = MeasureSpec::Builtin(Measure::Euclidean);
    assert!(silhouette(x.view(), &labels, &spec).unwrap() > 0.5);
    assert!(dunn(x.view(), &labels, &spec).unwrap() > 1.0);

    let report = DistributionReport::compute(x.view(), &labels, &spec, &DiscretizationConfig::default()).unwrap();
    assert_eq!(report.n_intra, 12);
    assert_eq!(report.n_inter, 16);
    assert!(report.decidability > 2.0);
    assert!(report.separation > 0.5);
    let feature_space = rayleigh_coefficient(x.view(), &labels).unwrap();
    assert!((report.rayleigh - feature_space).abs() < 1e-8 * feature_space.max(1.0));
}

#[test]
fn davies_bouldin_precomputed_euclidean_matches_raw() {
    let x = Array2::from_shape_fn((5, 10), |(i, j)| (i * 10 + j + 1) as f64);
    let labels = [0, 1, 0, 1, 0];
    let euc = MeasureSpec::ById(0);
    let d = comparison_matrix(x.view(), labels.len(), &euc).unwrap().into_owned();

    let raw = davies_bouldin(x.view(), &labels, &euc).unwrap();
    let pre = davies_bouldin(d.view(), &labels, &MeasureSpec::Precomputed).unwrap();
    assert_eq!(raw, pre);
    let singleton = davies_bouldin(d.view(), &[1, 0, 0, 0, 0], &MeasureSpec::Precomputed).unwrap();
    assert!((singleton - 0.5).abs() < 1e-12);
}

#[test]
fn templates_feed_a_dissimilarity_representation() {
    let (x, labels) = spectra();
    let registry = Registry::standard();
    let sim = registry.similarity(Measure::Euclidean).unwrap();
    let templates = perform_template_selection(
        x.view(),
        &labels,
        &sim,
        &SelectionStrategy::BEST_25,
        &EntropyConfig::default(),
    )
    .unwrap();
    assert!(templates.iter().filter(|t| t.label == "low").count() >= 2);
    assert!(templates.iter().filter(|t| t.label == "high").count() >= 2);
    assert!(templates.iter().all(|t| labels[t.index] == t.label));

    let idx: Vec<usize> = templates.iter().map(|t| t.index).collect();
    let d = registry.function(Measure::Euclidean).unwrap();
    let repr = dissimilarity_representation(x.view(), Prototypes::Indices(&idx), &d).unwrap();
    assert_eq!(repr.dim(), (8, idx.len()));

    // nearest template's label reproduces the classes
    let predicted: Vec<&str> = repr
        .outer_iter()
        .map(|row| {
            let best = row
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(k, _)| k)
                .unwrap();
            templates[best].label
        })
        .collect();
    assert_eq!(f_measure(&predicted, &labels).unwrap(), 1.0);
}

#[test]
fn configured_registry_and_external_measures() {
    let (x, labels) = spectra();
    let registry = Registry::standard().clone();
    assert!(matches!(registry.function(Measure::Dnom), Err(Error::UnboundMeasure { .. })));

    let registry = registry
        .with_external(Measure::Dnom, |a, b| {
            Ok(a.iter().zip(b.iter()).map(|(p, q)| (p - q).abs()).fold(0.0, f64::max))
        })
        .unwrap();
    let spec = registry.spec(Measure::Dnom).unwrap();
    let db = davies_bouldin(x.view(), &labels, &spec).unwrap();
    assert!(db.is_finite() && db >= 0.0);

    let unknown = MeasureSpec::ById(99);
    assert_eq!(
        dunn(x.view(), &labels, &unknown).unwrap_err(),
        Error::UnknownMeasure { id: 99 }
    );
}

proptest! {
    #[test]
    fn precomputed_equivalence_on_random_data(
        cells in prop::collection::vec(-5.0f64..5.0, 24),
        labels in prop::collection::vec(0u8..3, 6),
    ) {
        prop_assume!(labels.iter().collect::<std::collections::BTreeSet<_>>().len() >= 2);
        let x = Array2::from_shape_vec((6, 4), cells).unwrap();
        let f = Registry::standard().function(Measure::Manhattan).unwrap();
        let d = pairwise_matrix(x.view(), &f).unwrap();
        let spec = MeasureSpec::Callable(f);
        prop_assert_eq!(
            intra_inter(x.view(), &labels, &spec).unwrap(),
            intra_inter(d.view(), &labels, &MeasureSpec::Precomputed).unwrap()
        );
        let a = davies_bouldin(x.view(), &labels, &spec).unwrap();
        let b = davies_bouldin(d.view(), &labels, &MeasureSpec::Precomputed).unwrap();
        prop_assert!(a == b || (a.is_nan() && b.is_nan()));
    }
}
