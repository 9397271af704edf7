mod arc_length;
mod bezier;
mod normalized;
mod point;
mod rational;
mod union;

pub use arc_length::ArcLengthTable;
pub use bezier::{BezierCurve, BezierCurve2D, BezierCurve3D};
pub use normalized::{NormalizedCurve2D, NormalizedCurve3D};
pub use point::{CurvePoint2D, CurvePoint3D};
pub use rational::{RationalBezierCurve, RationalBezierCurve2D, RationalBezierCurve3D};
pub use union::{CurveUnion2D, CurveUnion3D};

use crate::error::{CurveError, Result};
use crate::math::{frenet, Point2, Point3, Vector2, Vector3, TOLERANCE};

/// Default sampling density (samples per control point) for arc-length
/// estimation.
pub const DEFAULT_PRECISION: usize = 20;

/// Trait for parametric curves in the plane.
///
/// The parameter `t` ranges over `[0, 1]`; out-of-range values are clamped,
/// never rejected. All evaluations are pure and the curve is immutable once
/// constructed.
pub trait Curve2D {
    /// Evaluates the curve at parameter `t`, returning the 2D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn evaluate(&self, t: f64) -> Result<Point2>;

    /// Computes the first derivative (velocity) at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn derivative(&self, t: f64) -> Result<Vector2>;

    /// Computes the second derivative (acceleration) at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn second_derivative(&self, t: f64) -> Result<Vector2>;

    /// Computes the third derivative at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn third_derivative(&self, t: f64) -> Result<Vector2>;

    /// Returns the approximate arc length of the whole curve.
    fn length(&self) -> f64;

    /// Returns the sampling density used for arc-length estimation.
    fn precision(&self) -> usize;

    /// Returns the number of control points defining the curve.
    fn control_point_count(&self) -> usize;

    /// Computes the signed curvature at parameter `t`.
    ///
    /// Positive for a clockwise-turning tangent.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Degenerate`] if the velocity vanishes at `t`.
    fn curvature(&self, t: f64) -> Result<f64> {
        let v = self.derivative(t)?;
        if v.norm() < TOLERANCE {
            return Err(CurveError::Degenerate {
                t,
                reason: "zero velocity",
            }
            .into());
        }
        let a = self.second_derivative(t)?;
        Ok(frenet::signed_curvature_2d(&v, &a))
    }

    /// Returns a lazy point handle at the position `distance` along the curve.
    fn point_by_distance(&self, distance: f64) -> CurvePoint2D<'_>
    where
        Self: Sized,
    {
        CurvePoint2D::new(self, (distance / self.length()).clamp(0.0, 1.0))
    }
}

/// Trait for parametric curves in 3D space.
///
/// Mirrors [`Curve2D`] operation for operation, adding [`torsion`]
/// (meaningless in the plane).
///
/// [`torsion`]: Curve3D::torsion
pub trait Curve3D {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the first derivative (velocity) at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn derivative(&self, t: f64) -> Result<Vector3>;

    /// Computes the second derivative (acceleration) at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn second_derivative(&self, t: f64) -> Result<Vector3>;

    /// Computes the third derivative at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation is unsupported for this curve.
    fn third_derivative(&self, t: f64) -> Result<Vector3>;

    /// Returns the approximate arc length of the whole curve.
    fn length(&self) -> f64;

    /// Returns the sampling density used for arc-length estimation.
    fn precision(&self) -> usize;

    /// Returns the number of control points defining the curve.
    fn control_point_count(&self) -> usize;

    /// Computes the signed curvature at parameter `t`.
    ///
    /// The sign agrees with [`Curve2D::curvature`] for planar curves.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Degenerate`] if the velocity vanishes at `t`.
    fn curvature(&self, t: f64) -> Result<f64> {
        let v = self.derivative(t)?;
        if v.norm() < TOLERANCE {
            return Err(CurveError::Degenerate {
                t,
                reason: "zero velocity",
            }
            .into());
        }
        let a = self.second_derivative(t)?;
        Ok(frenet::signed_curvature_3d(&v, &a))
    }

    /// Computes the torsion at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Degenerate`] if velocity and acceleration are
    /// parallel at `t` (the osculating plane is undefined), or an error if
    /// the third derivative is unsupported for this curve.
    fn torsion(&self, t: f64) -> Result<f64> {
        let v = self.derivative(t)?;
        let a = self.second_derivative(t)?;
        if v.cross(&a).norm_squared() < TOLERANCE {
            return Err(CurveError::Degenerate {
                t,
                reason: "velocity and acceleration are parallel",
            }
            .into());
        }
        let j = self.third_derivative(t)?;
        Ok(frenet::torsion_3d(&v, &a, &j))
    }

    /// Returns a lazy point handle at the position `distance` along the curve.
    fn point_by_distance(&self, distance: f64) -> CurvePoint3D<'_>
    where
        Self: Sized,
    {
        CurvePoint3D::new(self, (distance / self.length()).clamp(0.0, 1.0))
    }
}
