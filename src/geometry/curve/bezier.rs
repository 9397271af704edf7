use nalgebra::{Point, SVector};

use crate::error::{CurveError, Result};
use crate::math::bernstein::bernstein;
use crate::math::{Point2, Point3, Vector2, Vector3};

use super::arc_length::polyline_length;
use super::{Curve2D, Curve3D, DEFAULT_PRECISION};

/// A polynomial Bézier curve of arbitrary degree in `D` dimensions.
///
/// Defined by `n + 1` control points for degree `n`. Points and derivatives
/// are evaluated directly from the Bernstein basis, without De Casteljau
/// subdivision. The arc length is estimated at construction by sampling the
/// curve at `precision × control-point-count` uniform parameter steps.
#[derive(Debug, Clone)]
pub struct BezierCurve<const D: usize> {
    control_points: Vec<Point<f64, D>>,
    precision: usize,
    length: f64,
}

/// A polynomial Bézier curve in the plane.
pub type BezierCurve2D = BezierCurve<2>;

/// A polynomial Bézier curve in 3D space.
pub type BezierCurve3D = BezierCurve<3>;

impl<const D: usize> BezierCurve<D> {
    /// Creates a curve with the default sampling density.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control points are given.
    pub fn new(control_points: Vec<Point<f64, D>>) -> Result<Self> {
        Self::with_precision(control_points, DEFAULT_PRECISION)
    }

    /// Creates a curve sampled at `precision` steps per control point.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control points are given or the
    /// precision is zero.
    pub fn with_precision(control_points: Vec<Point<f64, D>>, precision: usize) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(CurveError::TooFewControlPoints(control_points.len()).into());
        }
        if precision == 0 {
            return Err(CurveError::ZeroPrecision.into());
        }

        let mut curve = Self {
            control_points,
            precision,
            length: 0.0,
        };
        let steps = precision * curve.control_points.len();
        let length = polyline_length(|t| curve.point_at(t), steps);
        curve.length = length;
        Ok(curve)
    }

    /// Returns the control points defining the curve.
    #[must_use]
    pub fn control_points(&self) -> &[Point<f64, D>] {
        &self.control_points
    }

    /// Evaluates the curve point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;

        let mut result = SVector::<f64, D>::zeros();
        for (i, p) in self.control_points.iter().enumerate() {
            result += p.coords * bernstein(n, i, t);
        }
        Point::from(result)
    }

    /// Evaluates the first derivative at parameter `t`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derivative_at(&self, t: f64) -> SVector<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;
        let pts = &self.control_points;

        let mut result = SVector::<f64, D>::zeros();
        for i in 0..n {
            result += (pts[i + 1] - pts[i]) * bernstein(n - 1, i, t);
        }
        result * n as f64
    }

    /// Evaluates the second derivative at parameter `t`.
    ///
    /// Identically zero for curves of degree below two.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn second_derivative_at(&self, t: f64) -> SVector<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;
        let pts = &self.control_points;

        let mut result = SVector::<f64, D>::zeros();
        for i in 0..n.saturating_sub(1) {
            let diff = pts[i + 2].coords - pts[i + 1].coords * 2.0 + pts[i].coords;
            result += diff * bernstein(n - 2, i, t);
        }
        result * (n * n.saturating_sub(1)) as f64
    }

    /// Evaluates the third derivative at parameter `t`.
    ///
    /// Identically zero for curves of degree below three.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn third_derivative_at(&self, t: f64) -> SVector<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;
        let pts = &self.control_points;

        let mut result = SVector::<f64, D>::zeros();
        for i in 0..n.saturating_sub(2) {
            let diff = pts[i + 3].coords - pts[i + 2].coords * 3.0 + pts[i + 1].coords * 3.0
                - pts[i].coords;
            result += diff * bernstein(n - 3, i, t);
        }
        result * (n * n.saturating_sub(1) * n.saturating_sub(2)) as f64
    }
}

impl Curve2D for BezierCurve<2> {
    fn evaluate(&self, t: f64) -> Result<Point2> {
        Ok(self.point_at(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.derivative_at(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.second_derivative_at(t))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.third_derivative_at(t))
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn control_point_count(&self) -> usize {
        self.control_points.len()
    }
}

impl Curve3D for BezierCurve<3> {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.derivative_at(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.second_derivative_at(t))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.third_derivative_at(t))
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn control_point_count(&self) -> usize {
        self.control_points.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cubic_2d() -> BezierCurve2D {
        BezierCurve2D::new(vec![
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 400.0),
            Point2::new(400.0, 400.0),
            Point2::new(400.0, 100.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_single_control_point() {
        let result = BezierCurve2D::new(vec![Point2::new(1.0, 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_precision() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(BezierCurve2D::with_precision(points, 0).is_err());
    }

    #[test]
    fn endpoint_interpolation() {
        let curve = cubic_2d();
        let start = curve.evaluate(0.0).unwrap();
        let end = curve.evaluate(1.0).unwrap();
        assert!((start - Point2::new(100.0, 100.0)).norm() < 1e-4);
        assert!((end - Point2::new(400.0, 100.0)).norm() < 1e-4);
    }

    #[test]
    fn out_of_range_parameter_is_clamped() {
        let curve = cubic_2d();
        let below = curve.evaluate(-0.5).unwrap();
        let above = curve.evaluate(1.5).unwrap();
        assert!((below - curve.evaluate(0.0).unwrap()).norm() < 1e-12);
        assert!((above - curve.evaluate(1.0).unwrap()).norm() < 1e-12);
    }

    #[test]
    fn cubic_midpoint() {
        // B(1/2) = (P0 + 3·P1 + 3·P2 + P3) / 8 = (250, 325).
        let curve = cubic_2d();
        let mid = curve.evaluate(0.5).unwrap();
        approx::assert_relative_eq!(mid, Point2::new(250.0, 325.0), epsilon = 1e-9);
    }

    #[test]
    fn derivative_endpoints() {
        // B'(0) = n·(P1 − P0), B'(1) = n·(Pn − Pn−1).
        let curve = cubic_2d();
        let v0 = curve.derivative(0.0).unwrap();
        let v1 = curve.derivative(1.0).unwrap();
        assert!((v0 - Vector2::new(0.0, 900.0)).norm() < 1e-9);
        assert!((v1 - Vector2::new(0.0, -900.0)).norm() < 1e-9);
    }

    #[test]
    fn second_derivative_start() {
        // B''(0) = n·(n−1)·(P2 − 2·P1 + P0).
        let curve = cubic_2d();
        let a0 = curve.second_derivative(0.0).unwrap();
        assert!((a0 - Vector2::new(1800.0, -1800.0)).norm() < 1e-9);
    }

    #[test]
    fn third_derivative_is_constant_for_cubic() {
        let curve = cubic_2d();
        let j0 = curve.third_derivative(0.0).unwrap();
        let j1 = curve.third_derivative(0.7).unwrap();
        assert!((j0 - j1).norm() < 1e-9);
    }

    #[test]
    fn high_order_derivatives_vanish_for_low_degree() {
        let line = BezierCurve2D::new(vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)]).unwrap();
        assert!(line.second_derivative(0.5).unwrap().norm() < 1e-12);
        assert!(line.third_derivative(0.5).unwrap().norm() < 1e-12);
    }

    #[test]
    fn curvature_single_signed_without_inflection() {
        // The arch-shaped cubic turns one way only.
        let curve = cubic_2d();
        let reference = curve.curvature(0.01).unwrap();
        for i in 1..100 {
            let t = f64::from(i) / 100.0;
            let k = curve.curvature(t).unwrap();
            assert!(
                k.signum() == reference.signum(),
                "curvature changed sign at t={t}: {k}"
            );
        }
    }

    #[test]
    fn straight_line_length() {
        let line = BezierCurve2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        ])
        .unwrap();
        assert!((Curve2D::length(&line) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn curved_length_exceeds_chord() {
        let curve = cubic_2d();
        let chord = (Point2::new(400.0, 100.0) - Point2::new(100.0, 100.0)).norm();
        assert!(Curve2D::length(&curve) > chord);
    }

    #[test]
    fn degenerate_velocity_fails_curvature() {
        // Coincident first two control points: velocity vanishes at t = 0.
        let curve = BezierCurve2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
        ])
        .unwrap();
        assert!(curve.curvature(0.0).is_err());
    }

    #[test]
    fn planar_3d_matches_2d_curvature_magnitude() {
        let curve3 = BezierCurve3D::new(vec![
            Point3::new(100.0, 0.0, 100.0),
            Point3::new(100.0, 0.0, 400.0),
            Point3::new(400.0, 0.0, 400.0),
            Point3::new(400.0, 0.0, 100.0),
        ])
        .unwrap();
        let curve2 = cubic_2d();
        let k3 = Curve3D::curvature(&curve3, 0.25).unwrap();
        let k2 = Curve2D::curvature(&curve2, 0.25).unwrap();
        assert!((k3.abs() - k2.abs()).abs() < 1e-9);
    }

    #[test]
    fn planar_3d_torsion_is_zero() {
        let curve = BezierCurve3D::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, -1.0, 0.0),
            Point3::new(3.0, 0.5, 0.0),
        ])
        .unwrap();
        assert!(curve.torsion(0.3).unwrap().abs() < 1e-9);
    }

    #[test]
    fn collinear_3d_torsion_fails() {
        // Velocity and acceleration stay parallel along a straight curve.
        let curve = BezierCurve3D::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
            Point3::new(3.0, 3.0, 3.0),
        ])
        .unwrap();
        assert!(curve.torsion(0.5).is_err());
    }

    #[test]
    fn nonplanar_3d_torsion_is_finite_nonzero() {
        let curve = BezierCurve3D::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(2.0, 2.0, 3.0),
        ])
        .unwrap();
        let tau = curve.torsion(0.5).unwrap();
        assert!(tau.is_finite());
        assert!(tau.abs() > 1e-9);
    }

    #[test]
    fn point_by_distance_midway() {
        let line = BezierCurve2D::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]).unwrap();
        let handle = Curve2D::point_by_distance(&line, 5.0);
        let p = handle.point().unwrap();
        assert!((p - Point2::new(5.0, 0.0)).norm() < 1e-6);
    }
}
