use chemdis::distribution_distance::{DiscretizationConfig, DistributionReport};
use chemdis::measure::{Measure, MeasureConfig, Registry};
use chemdis::metrics::{f_measure, precision, recall};
use chemdis::pairwise::MeasureSpec;
use chemdis::validity::{davies_bouldin, dunn, score_function, silhouette};
use ndarray::Array2;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=chemdis=debug shows matrix builds and degenerate-case warnings.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Three synthetic spectral families: one peak position per class,
    // with widths and baselines drifting inside each class.
    let (n_per_class, n_feat) = (6, 120);
    let centers = [30.0, 60.0, 90.0];
    let x = Array2::from_shape_fn((3 * n_per_class, n_feat), |(i, j)| {
        let class = i / n_per_class;
        let k = (i % n_per_class) as f64;
        let t = j as f64 - centers[class];
        let width = 6.0 + 0.8 * k;
        (-(t * t) / (2.0 * width * width)).exp() + 0.02 * k
    });
    let labels: Vec<usize> = (0..x.nrows()).map(|i| i / n_per_class).collect();

    let registry = Registry::new(MeasureConfig::default().with_shape_sigma(3.0))?;
    let measures = [
        Measure::Euclidean,
        Measure::Manhattan,
        Measure::Cosine,
        Measure::Sam,
        Measure::Pearson,
        Measure::BrayCurtis,
        Measure::ChiSquared,
        Measure::Kolmogorov,
        Measure::ShapePy,
        Measure::AndrewsCurves,
    ];

    println!("measure      DB      Dunn    SF      Sil     d'      KL      overlap sep     J");
    for measure in measures {
        let spec = registry.spec(measure)?;
        let report = DistributionReport::compute(x.view(), &labels, &spec, &DiscretizationConfig::default())?;
        println!(
            "{:<8} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3}",
            measure.name(),
            davies_bouldin(x.view(), &labels, &spec)?,
            dunn(x.view(), &labels, &spec)?,
            score_function(x.view(), &labels, &spec)?,
            silhouette(x.view(), &labels, &spec)?,
            report.decidability,
            report.kl_divergence,
            report.overlap_area,
            report.separation,
            report.rayleigh,
        );
    }

    // External validation of a deliberately wrong partition: classes 1 and 2 merged.
    let merged: Vec<usize> = labels.iter().map(|&l| l.min(1)).collect();
    println!(
        "\nmerged partition: precision={:.3} recall={:.3} F={:.3}",
        precision(&merged, &labels)?,
        recall(&merged, &labels)?,
        f_measure(&merged, &labels)?,
    );

    // Any index accepts a precomputed matrix in place of raw features.
    let d = chemdis::comparison_matrix(x.view(), labels.len(), &MeasureSpec::ById(0))?;
    let db = davies_bouldin(d.view(), &labels, &MeasureSpec::Precomputed)?;
    println!("DB from precomputed Euclidean matrix: {db:.3}");

    Ok(())
}
