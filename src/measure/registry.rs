//! The measure registry: a frozen mapping from [`Measure`] to [`MeasureFn`].

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use ndarray::ArrayView1;

use super::{
    andrews, angle, correlation, distribution, minkowski, shape, Measure, MeasureFn,
};
use crate::error::{Error, Result};

/// Parameters of the parameterized measures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureConfig {
    /// Order `p` of the Minkowski distance.
    pub minkowski_p: f64,
    /// Denominator stabilizer of the chi-squared distance.
    pub chi_squared_eps: f64,
    /// Gaussian width of the shape measures' derivative filter.
    pub shape_sigma: f64,
    /// Number of angles at which Andrew's curves are sampled.
    pub andrews_resolution: usize,
    /// Measure applied to Andrew's curves.
    pub andrews_base: Measure,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            minkowski_p: 5.0,
            chi_squared_eps: 1e-10,
            shape_sigma: 2.0,
            andrews_resolution: 100,
            andrews_base: Measure::ShapePy,
        }
    }
}

impl MeasureConfig {
    /// Set the Minkowski order.
    pub fn with_minkowski_p(mut self, p: f64) -> Self {
        self.minkowski_p = p;
        self
    }

    /// Set the chi-squared stabilizer.
    pub fn with_chi_squared_eps(mut self, eps: f64) -> Self {
        self.chi_squared_eps = eps;
        self
    }

    /// Set the shape filter width.
    pub fn with_shape_sigma(mut self, sigma: f64) -> Self {
        self.shape_sigma = sigma;
        self
    }

    /// Set the Andrew's curves resolution.
    pub fn with_andrews_resolution(mut self, m: usize) -> Self {
        self.andrews_resolution = m;
        self
    }

    /// Set the measure applied to Andrew's curves.
    pub fn with_andrews_base(mut self, base: Measure) -> Self {
        self.andrews_base = base;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.minkowski_p > 0.0) || !self.minkowski_p.is_finite() {
            return Err(Error::InvalidParameter {
                name: "minkowski_p",
                message: "must be a positive finite number",
            });
        }
        if !(self.chi_squared_eps >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "chi_squared_eps",
                message: "must be non-negative",
            });
        }
        if !(self.shape_sigma > 0.0) || !self.shape_sigma.is_finite() {
            return Err(Error::InvalidParameter {
                name: "shape_sigma",
                message: "must be a positive finite number",
            });
        }
        if self.andrews_resolution == 0 {
            return Err(Error::InvalidParameter {
                name: "andrews_resolution",
                message: "must be at least 1",
            });
        }
        if self.andrews_base == Measure::AndrewsCurves {
            return Err(Error::InvalidParameter {
                name: "andrews_base",
                message: "Andrew's curves cannot be their own base measure",
            });
        }
        Ok(())
    }
}

/// Resolves measures to callables.
///
/// A registry is immutable once built. [`Registry::standard`] is the
/// process-wide instance with default parameters and no external routines;
/// build your own with [`Registry::new`] and [`Registry::with_external`] to
/// change parameters or bind `dnom`/`dord`, then hand it to the components
/// that need it.
#[derive(Clone, Default)]
pub struct Registry {
    config: MeasureConfig,
    external: HashMap<Measure, MeasureFn>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<&'static str> = self.external.keys().map(|m| m.name()).collect();
        bound.sort_unstable();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("external", &bound)
            .finish()
    }
}

impl Registry {
    /// Build a registry from validated parameters.
    pub fn new(config: MeasureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            external: HashMap::new(),
        })
    }

    /// Shared default registry.
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Registry::default)
    }

    /// Bind the routine behind an external measure (`Dnom` or `Dord`).
    pub fn with_external<F>(mut self, measure: Measure, f: F) -> Result<Self>
    where
        F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<f64> + Send + Sync + 'static,
    {
        if !measure.is_external() {
            return Err(Error::InvalidParameter {
                name: "measure",
                message: "only dnom and dord are bound externally",
            });
        }
        let checked: MeasureFn = Arc::new(move |x, y| {
            super::check_dims(&x, &y)?;
            f(x, y)
        });
        self.external.insert(measure, checked);
        Ok(self)
    }

    /// Parameters in use.
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Callable for `measure`.
    pub fn function(&self, measure: Measure) -> Result<MeasureFn> {
        let cfg = &self.config;
        let f: MeasureFn = match measure {
            Measure::Euclidean => Arc::new(minkowski::euclidean),
            Measure::Manhattan => Arc::new(minkowski::manhattan),
            Measure::Minkowski => {
                let p = cfg.minkowski_p;
                Arc::new(move |x, y| minkowski::minkowski(x, y, p))
            }
            Measure::ShapeHy | Measure::ShapePy | Measure::CorrShapeHy | Measure::CorrShapePy => {
                let sigma = cfg.shape_sigma;
                Arc::new(move |x, y| shape::shape_dissimilarity(x, y, sigma))
            }
            Measure::Correlation | Measure::Pcc => Arc::new(correlation::correlation_distance),
            Measure::Pearson => Arc::new(correlation::pearson_dissimilarity),
            Measure::Spearman => Arc::new(correlation::spearman_dissimilarity),
            Measure::Cosine => Arc::new(angle::cosine),
            Measure::Sam => Arc::new(angle::spectral_angle),
            Measure::Kolmogorov => Arc::new(distribution::kolmogorov_smirnov),
            Measure::BrayCurtis => Arc::new(distribution::bray_curtis),
            Measure::ChiSquared => {
                let eps = cfg.chi_squared_eps;
                Arc::new(move |x, y| distribution::chi_squared(x, y, eps))
            }
            Measure::AndrewsCurves => {
                let base = self.function(cfg.andrews_base)?;
                let m = cfg.andrews_resolution;
                Arc::new(move |x, y| andrews::andrews_dissimilarity(x, y, &base, m))
            }
            Measure::Dnom | Measure::Dord => self
                .external
                .get(&measure)
                .cloned()
                .ok_or(Error::UnboundMeasure {
                    name: measure.name(),
                })?,
        };
        Ok(f)
    }

    /// Callable for a raw measure id.
    pub fn resolve(&self, id: u32) -> Result<MeasureFn> {
        self.function(Measure::from_id(id)?)
    }

    /// Similarity built from `measure`.
    ///
    /// Correlation, Pearson and Spearman return their dedicated probability
    /// form; every other measure `d` becomes `1 / (1 + d)`.
    pub fn similarity(&self, measure: Measure) -> Result<MeasureFn> {
        let f: MeasureFn = match measure {
            Measure::Correlation | Measure::Pearson => Arc::new(correlation::pearson_probability),
            Measure::Spearman => Arc::new(correlation::spearman_probability),
            other => to_similarity(self.function(other)?),
        };
        Ok(f)
    }
}

/// Turn any dissimilarity into a similarity via `1 / (1 + d(x, y))`.
pub fn to_similarity(d: MeasureFn) -> MeasureFn {
    Arc::new(move |x, y| Ok(1.0 / (1.0 + d(x, y)?)))
}
