pub mod bernstein;
pub mod frenet;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for parameter-space and arc-length comparisons.
///
/// Looser than [`TOLERANCE`]: parameters and accumulated lengths carry the
/// error of `precision × control-point-count` sampled segments.
pub const PARAM_TOLERANCE: f64 = 1e-4;

/// Returns whether two values are equal within [`PARAM_TOLERANCE`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < PARAM_TOLERANCE
}

/// Clamps a parameter to `[0, 1]`, snapping near-terminal values to 1.0.
///
/// Iterators advance by repeated addition; the snap keeps the accumulated
/// rounding error of the last step from leaving the terminal position just
/// short of 1.0.
#[must_use]
pub fn round_clamp01(value: f64) -> f64 {
    let value = value.clamp(0.0, 1.0);
    if value >= 0.999 {
        1.0
    } else {
        value
    }
}
