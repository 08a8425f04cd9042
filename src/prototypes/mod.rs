//! Prototype (template) selection.
//!
//! Picks a few representative samples per class so that a gallery can be
//! reduced before building a dissimilarity representation.
//!
//! # Pipeline
//!
//! 1. Build the pairwise **similarity** matrix of a group
//!    ([`order_templates`]).
//! 2. Rank its rows by iterative entropy extraction ([`sort_by_entropy`]).
//! 3. Keep the positions a [`SelectionStrategy`] picks from that ranking and
//!    map them back to rows ([`cluster_template_selection`]).
//! 4. Repeat for every label ([`perform_template_selection`]).
//!
//! [`random_selection`] and [`farthest_first_selection`] are label-free
//! baselines.
//!
//! # Example
//!
//! ```rust
//! use chemdis::measure::{Measure, Registry};
//! use chemdis::prototypes::{perform_template_selection, EntropyConfig, SelectionStrategy};
//! use ndarray::Array2;
//!
//! let x = Array2::from_shape_fn((6, 8), |(i, j)| ((i + 1) * (j + 2)) as f64);
//! let labels = [0, 0, 0, 1, 1, 1];
//! let sim = Registry::standard().similarity(Measure::Euclidean).unwrap();
//! let templates = perform_template_selection(
//!     x.view(),
//!     &labels,
//!     &sim,
//!     &SelectionStrategy::BEST_50,
//!     &EntropyConfig::default(),
//! )
//! .unwrap();
//! // at least two templates per class of two or more samples
//! assert!(templates.iter().filter(|t| t.label == 0).count() >= 2);
//! assert!(templates.iter().filter(|t| t.label == 1).count() >= 2);
//! ```

mod baseline;
mod entropy;
mod selection;
mod template;

pub use baseline::{farthest_first_selection, random_selection};
pub use entropy::{
    matrix_entropy, normalize_similarity, sort_by_entropy, EntropyBase, EntropyConfig, Pivot,
    PivotSequence,
};
pub use selection::{best_percent, left_of_vertex, local_maximum, one_shot, SelectionStrategy};
pub use template::{cluster_template_selection, order_templates, perform_template_selection, Template};
