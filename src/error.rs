use thiserror::Error;

/// Top-level error type for the Flexura curve kernel.
#[derive(Debug, Error)]
pub enum FlexuraError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Iteration(#[from] IterationError),
}

/// Errors related to curve construction and evaluation.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("a curve needs at least two control points, got {0}")]
    TooFewControlPoints(usize),

    #[error("expected one weight per control point ({control_points}), got {weights}")]
    WeightCountMismatch {
        control_points: usize,
        weights: usize,
    },

    #[error("control point weights must be positive and finite, got {value} at index {index}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("sampling precision must be positive")]
    ZeroPrecision,

    #[error("degenerate curve at t = {t}: {reason}")]
    Degenerate { t: f64, reason: &'static str },

    #[error("not implemented for rational curves: {0}")]
    Unsupported(&'static str),

    #[error("a curve union needs at least one sub-curve")]
    EmptyUnion,

    #[error("curve union sub-curve {index} has zero length")]
    ZeroLengthSubCurve { index: usize },
}

/// Errors related to curve iterator construction.
#[derive(Debug, Error)]
pub enum IterationError {
    #[error("distance must be positive, got {0}")]
    NonPositiveDistance(f64),

    #[error("angle must be positive, got {0}")]
    NonPositiveAngle(f64),
}

/// Convenience type alias for results using [`FlexuraError`].
pub type Result<T> = std::result::Result<T, FlexuraError>;
