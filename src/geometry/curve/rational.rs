use nalgebra::{Point, SVector};

use crate::error::{CurveError, Result};
use crate::math::bernstein::bernstein;
use crate::math::{Point2, Point3, Vector2, Vector3};

use super::arc_length::polyline_length;
use super::{Curve2D, Curve3D, DEFAULT_PRECISION};

/// A rational Bézier curve of arbitrary degree in `D` dimensions.
///
/// Each control point carries a strictly positive weight scaling its pull on
/// the curve; with all weights equal the curve reduces exactly to the
/// polynomial [`BezierCurve`]. Point and derivative formulas are quotients
/// of weighted Bernstein sums built from partial-range point and weight
/// helpers.
///
/// The third derivative has no closed quotient form here and is reported as
/// unsupported, which in turn makes torsion unsupported for rational 3D
/// curves.
///
/// [`BezierCurve`]: super::BezierCurve
#[derive(Debug, Clone)]
pub struct RationalBezierCurve<const D: usize> {
    control_points: Vec<Point<f64, D>>,
    weights: Vec<f64>,
    precision: usize,
    length: f64,
}

/// A rational Bézier curve in the plane.
pub type RationalBezierCurve2D = RationalBezierCurve<2>;

/// A rational Bézier curve in 3D space.
pub type RationalBezierCurve3D = RationalBezierCurve<3>;

impl<const D: usize> RationalBezierCurve<D> {
    /// Creates a curve with the default sampling density.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control points are given, the
    /// weight count differs from the control point count, or any weight is
    /// non-positive or non-finite.
    pub fn new(control_points: Vec<Point<f64, D>>, weights: Vec<f64>) -> Result<Self> {
        Self::with_precision(control_points, weights, DEFAULT_PRECISION)
    }

    /// Creates a curve sampled at `precision` steps per control point.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`new`], or if the
    /// precision is zero.
    ///
    /// [`new`]: RationalBezierCurve::new
    pub fn with_precision(
        control_points: Vec<Point<f64, D>>,
        weights: Vec<f64>,
        precision: usize,
    ) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(CurveError::TooFewControlPoints(control_points.len()).into());
        }
        if weights.len() != control_points.len() {
            return Err(CurveError::WeightCountMismatch {
                control_points: control_points.len(),
                weights: weights.len(),
            }
            .into());
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(CurveError::InvalidWeight { index, value }.into());
        }
        if precision == 0 {
            return Err(CurveError::ZeroPrecision.into());
        }

        let mut curve = Self {
            control_points,
            weights,
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

    /// Returns the control point weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Evaluates the curve point at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;
        self.point_k(0, n, t)
    }

    /// Evaluates the first derivative at parameter `t`.
    ///
    /// Single application of the quotient rule over the partial weights.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derivative_at(&self, t: f64) -> SVector<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;

        let coefficient = n as f64 * self.weight(0, n - 1, t) * self.weight(1, n - 1, t)
            / self.weight(0, n, t).powi(2);
        (self.point_k(1, n - 1, t) - self.point_k(0, n - 1, t)) * coefficient
    }

    /// Evaluates the second derivative at parameter `t`.
    ///
    /// The quotient rule applied twice. The closed form requires degree ≥ 2;
    /// below that the contribution is reported as zero, which is exactly
    /// what the curvature formulas need (a line does not curve).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn second_derivative_at(&self, t: f64) -> SVector<f64, D> {
        let t = t.clamp(0.0, 1.0);
        let n = self.control_points.len() - 1;
        if n < 2 {
            return SVector::zeros();
        }
        let nf = n as f64;

        let weight_2_n2 = self.weight(2, n - 2, t);
        let weight_0_n = self.weight(0, n, t);
        let weight_0_n2 = self.weight(0, n - 2, t);
        let weight_0_n1 = self.weight(0, n - 1, t);
        let weight_1_n1 = self.weight(1, n - 1, t);

        let part1 = (self.point_k(2, n - 2, t) - self.point_k(1, n - 2, t))
            * (nf * weight_2_n2 / weight_0_n.powi(3)
                * (2.0 * nf * weight_0_n1.powi(2)
                    - (nf - 1.0) * weight_0_n2 * weight_0_n
                    - 2.0 * weight_0_n1 * weight_0_n));
        let part2 = (self.point_k(1, n - 2, t) - self.point_k(0, n - 2, t))
            * (nf * weight_0_n2 / weight_0_n.powi(3)
                * (2.0 * nf * weight_1_n1.powi(2)
                    - (nf - 1.0) * weight_2_n2 * weight_0_n
                    - 2.0 * weight_1_n1 * weight_0_n));

        part1 - part2
    }

    /// Weighted partial point over control points `[i, i + k]` with the
    /// degree-`k` basis.
    fn point_k(&self, i: usize, k: usize, t: f64) -> Point<f64, D> {
        let mut numerator = SVector::<f64, D>::zeros();
        let mut denominator = 0.0;
        for j in 0..=k {
            let basis = bernstein(k, j, t) * self.weights[i + j];
            numerator += self.control_points[i + j].coords * basis;
            denominator += basis;
        }
        Point::from(numerator / denominator)
    }

    /// Partial weight sum over weights `[i, i + k]` with the degree-`k` basis.
    fn weight(&self, i: usize, k: usize, t: f64) -> f64 {
        let mut result = 0.0;
        for j in 0..=k {
            result += bernstein(k, j, t) * self.weights[i + j];
        }
        result
    }
}

impl Curve2D for RationalBezierCurve<2> {
    fn evaluate(&self, t: f64) -> Result<Point2> {
        Ok(self.point_at(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.derivative_at(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        Ok(self.second_derivative_at(t))
    }

    fn third_derivative(&self, _t: f64) -> Result<Vector2> {
        Err(CurveError::Unsupported("third derivative").into())
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

impl Curve3D for RationalBezierCurve<3> {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.derivative_at(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        Ok(self.second_derivative_at(t))
    }

    fn third_derivative(&self, _t: f64) -> Result<Vector3> {
        Err(CurveError::Unsupported("third derivative").into())
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
