//! # chemdis
//!
//! Dissimilarity measures and the algorithms that consume them: pairwise
//! comparison matrices, internal and external cluster validation,
//! intra/inter-class distribution analysis and entropy-based prototype
//! selection for spectra and other multivariate chemistry data.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`measure`] | closed set of measures, ids, [`measure::Registry`] |
//! | [`pairwise`] | comparison matrices, [`pairwise::MeasureSpec`], intra/inter split |
//! | [`validity`] | Davies-Bouldin, Dunn, score function, silhouette |
//! | [`metrics`] | BCubed precision/recall/F, accuracy |
//! | [`distribution_distance`] | decidability, KL, overlap, separation, Rayleigh |
//! | [`prototypes`] | entropy ranking and template selection |
//! | [`representation`] | samples described by their dissimilarity to prototypes |
//!
//! Diagnostics go through `tracing`; the library never installs a
//! subscriber.
//!
//! **Default build** is sequential. Enable `parallel` for row-parallel
//! comparison matrices and `serde` for serializable configs and results.

/// Error types used across `chemdis`.
pub mod error;
pub mod distribution_distance;
pub mod measure;
pub mod metrics;
pub mod pairwise;
pub mod prototypes;
pub mod representation;
pub mod validity;

pub use error::{Error, Result};
pub use measure::{Measure, MeasureConfig, MeasureFn, Registry};
pub use pairwise::{comparison_matrix, intra_inter, IntraInter, MeasureSpec};
pub use prototypes::{perform_template_selection, EntropyConfig, SelectionStrategy};
