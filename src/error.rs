use core::fmt;

/// Result alias for `chemdis`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by measures, validation indices and prototype selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Two vectors handed to a measure differ in length.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Number of labels differs from the number of samples.
    LabelCountMismatch {
        /// Rows in the data (or comparison) matrix.
        samples: usize,
        /// Entries in the label vector.
        labels: usize,
    },

    /// Measure id outside the closed registry.
    UnknownMeasure {
        /// Offending id.
        id: u32,
    },

    /// Measure id is known but its external routine was never bound.
    UnboundMeasure {
        /// Display name of the measure.
        name: &'static str,
    },

    /// A distribution handed to a statistical validator was empty.
    EmptyDistribution {
        /// Which distribution ("intra", "inter", ...).
        which: &'static str,
    },

    /// A linear-algebra routine did not converge.
    NoConvergence {
        /// Routine that failed.
        routine: &'static str,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl Error {
    /// True for the shape/size/parameter family raised before any computation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::ShapeMismatch { .. }
                | Error::LabelCountMismatch { .. }
                | Error::InvalidParameter { .. }
        )
    }

    pub(crate) fn shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::LabelCountMismatch { samples, labels } => {
                write!(f, "{samples} samples but {labels} labels")
            }
            Error::UnknownMeasure { id } => write!(f, "unknown dissimilarity measure id {id}"),
            Error::UnboundMeasure { name } => {
                write!(f, "measure '{name}' needs an external routine; none was bound")
            }
            Error::EmptyDistribution { which } => write!(f, "{which} distribution is empty"),
            Error::NoConvergence { routine } => write!(f, "{routine} did not converge"),
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
