use chemdis::measure::{Measure, Registry};
use chemdis::metrics::accuracy;
use chemdis::prototypes::{
    farthest_first_selection, order_templates, perform_template_selection, random_selection,
    EntropyBase, EntropyConfig, SelectionStrategy,
};
use chemdis::representation::{dissimilarity_representation, Prototypes};
use ndarray::{Array2, ArrayView2, Axis};
use tracing_subscriber::EnvFilter;

/// Label of the nearest prototype for every sample.
fn nearest_prototype(repr: ArrayView2<'_, f64>, proto_labels: &[usize]) -> Vec<usize> {
    repr.axis_iter(Axis(0))
        .map(|row| {
            let (best, _) = row
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |acc, (k, &d)| if d < acc.1 { (k, d) } else { acc });
            proto_labels[best]
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=chemdis=debug prints every extracted pivot.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Two overlapping classes of noisy-looking profiles.
    let (n_per_class, n_feat) = (12, 80);
    let x = Array2::from_shape_fn((2 * n_per_class, n_feat), |(i, j)| {
        let class = (i / n_per_class) as f64;
        let k = (i % n_per_class) as f64;
        let t = j as f64 / n_feat as f64;
        (6.0 * t + class).sin() + 0.15 * ((k + 1.0) * 13.7 * t).cos()
    });
    let labels: Vec<usize> = (0..x.nrows()).map(|i| i / n_per_class).collect();

    let registry = Registry::standard();
    let sim = registry.similarity(Measure::Euclidean)?;
    let dist = registry.function(Measure::Euclidean)?;

    // Entropy ranking of the first class under both log-base policies.
    let first = x.slice(ndarray::s![0..n_per_class, ..]);
    for base in [EntropyBase::Fixed, EntropyBase::PerMatrix] {
        let seq = order_templates(first, &sim, &EntropyConfig::default().with_entropy_base(base))?;
        println!("{base:?}: pivots {:?}", seq.indices());
    }

    println!("\nstrategy  templates  accuracy");
    for strategy in SelectionStrategy::PRESETS {
        let templates =
            perform_template_selection(x.view(), &labels, &sim, &strategy, &EntropyConfig::default())?;
        let idx: Vec<usize> = templates.iter().map(|t| t.index).collect();
        let proto_labels: Vec<usize> = templates.iter().map(|t| t.label).collect();
        let repr = dissimilarity_representation(x.view(), Prototypes::Indices(&idx), &dist)?;
        let acc = accuracy(&nearest_prototype(repr.view(), &proto_labels), &labels)?;
        println!(
            "{:<9} {:>9}  {:.3}",
            strategy.preset_name().unwrap_or("custom"),
            idx.len(),
            acc
        );
    }

    // Label-free baselines with a fixed budget.
    let k = 6;
    for (name, idx) in [
        ("random", random_selection(x.nrows(), k, Some(42))?),
        ("farthest", farthest_first_selection(x.view(), k, &dist, Some(42))?),
    ] {
        let proto_labels: Vec<usize> = idx.iter().map(|&i| labels[i]).collect();
        let repr = dissimilarity_representation(x.view(), Prototypes::Indices(&idx), &dist)?;
        let acc = accuracy(&nearest_prototype(repr.view(), &proto_labels), &labels)?;
        println!("{name:<9} {k:>9}  {acc:.3}");
    }

    Ok(())
}
