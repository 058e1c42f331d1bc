//! Error type for argument validation
//!
//! Numeric domain violations (division by zero, log of a non-positive
//! number) are never errors: they surface as infinities or NaN in the
//! output. `ThermoError` only covers calls that cannot be evaluated at all.

use thiserror::Error;

/// Failure to set up or run a thermodynamic derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThermoError {
    /// Method selector is neither `Davies-Jones` nor `Stull`
    #[error("Unsupported wet-bulb method '{0}' (expected 'Davies-Jones' or 'Stull')")]
    UnsupportedMethod(String),

    /// Stage plan has a broken data dependency or malformed inputs
    #[error("Invalid stage plan '{plan}': {reason}")]
    InvalidPlan { plan: String, reason: String },

    /// Number of input arrays differs from the plan's declared inputs
    #[error("Plan '{plan}' expects {expected} inputs, got {got}")]
    InputCount {
        plan: String,
        expected: usize,
        got: usize,
    },

    /// Input shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {left:?} and {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// Output buffer length differs from the broadcast input length
    #[error("Output buffer holds {got} values, expected {expected}")]
    OutputLength { expected: usize, got: usize },

    /// Dimension names inconsistent with the array they label
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// Shared dimension carries different coordinate values in two inputs
    #[error("Coordinates for dimension '{dim}' differ between inputs")]
    CoordinateMismatch { dim: String },
}

/// Result alias used across the crate
pub type ThermoResult<T> = Result<T, ThermoError>;
