use crate::error::Result;
use crate::math::{approx_eq, Point2, Point3, Vector2, Vector3};

use super::arc_length::ArcLengthTable;
use super::{Curve2D, Curve3D};

/// Uniform-speed wrapper around a built 2D curve.
///
/// A raw Bézier parameter moves faster where control points crowd together;
/// this wrapper reinterprets `t` as an arc-length fraction, so equal
/// parameter increments cover equal distances along the curve. Construction
/// samples the wrapped curve into an [`ArcLengthTable`]; every operation
/// maps the incoming fraction through the table and delegates.
#[derive(Debug, Clone)]
pub struct NormalizedCurve2D<C: Curve2D> {
    curve: C,
    table: ArcLengthTable,
}

impl<C: Curve2D> NormalizedCurve2D<C> {
    /// Builds the arc-length table and wraps `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling the wrapped curve fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(curve: C) -> Result<Self> {
        let steps = curve.precision() * curve.control_point_count();
        let step = 1.0 / steps as f64;

        let mut segments = Vec::with_capacity(steps);
        let mut prev = curve.evaluate(0.0)?;
        for i in 1..=steps {
            let t = (step * i as f64).clamp(0.0, 1.0);
            let point = curve.evaluate(t)?;
            segments.push((point - prev).norm());
            prev = point;
        }

        Ok(Self {
            curve,
            table: ArcLengthTable::from_segment_lengths(segments),
        })
    }

    /// Returns the wrapped curve.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.curve
    }

    /// Maps an arc-length fraction to the wrapped curve's raw parameter.
    #[must_use]
    pub fn normalize(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if approx_eq(t, 1.0) {
            return t;
        }
        self.table.normalize(t)
    }
}

impl<C: Curve2D> Curve2D for NormalizedCurve2D<C> {
    fn evaluate(&self, t: f64) -> Result<Point2> {
        self.curve.evaluate(self.normalize(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector2> {
        self.curve.derivative(self.normalize(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        self.curve.second_derivative(self.normalize(t))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        self.curve.third_derivative(self.normalize(t))
    }

    fn length(&self) -> f64 {
        self.table.total()
    }

    fn precision(&self) -> usize {
        self.curve.precision()
    }

    fn control_point_count(&self) -> usize {
        self.curve.control_point_count()
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        self.curve.curvature(self.normalize(t))
    }
}

/// Uniform-speed wrapper around a built 3D curve.
///
/// The 3D counterpart of [`NormalizedCurve2D`].
#[derive(Debug, Clone)]
pub struct NormalizedCurve3D<C: Curve3D> {
    curve: C,
    table: ArcLengthTable,
}

impl<C: Curve3D> NormalizedCurve3D<C> {
    /// Builds the arc-length table and wraps `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling the wrapped curve fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(curve: C) -> Result<Self> {
        let steps = curve.precision() * curve.control_point_count();
        let step = 1.0 / steps as f64;

        let mut segments = Vec::with_capacity(steps);
        let mut prev = curve.evaluate(0.0)?;
        for i in 1..=steps {
            let t = (step * i as f64).clamp(0.0, 1.0);
            let point = curve.evaluate(t)?;
            segments.push((point - prev).norm());
            prev = point;
        }

        Ok(Self {
            curve,
            table: ArcLengthTable::from_segment_lengths(segments),
        })
    }

    /// Returns the wrapped curve.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.curve
    }

    /// Maps an arc-length fraction to the wrapped curve's raw parameter.
    #[must_use]
    pub fn normalize(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if approx_eq(t, 1.0) {
            return t;
        }
        self.table.normalize(t)
    }
}

impl<C: Curve3D> Curve3D for NormalizedCurve3D<C> {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.curve.evaluate(self.normalize(t))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        self.curve.derivative(self.normalize(t))
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        self.curve.second_derivative(self.normalize(t))
    }

    fn third_derivative(&self, t: f64) -> Result<Vector3> {
        self.curve.third_derivative(self.normalize(t))
    }

    fn length(&self) -> f64 {
        self.table.total()
    }

    fn precision(&self) -> usize {
        self.curve.precision()
    }

    fn control_point_count(&self) -> usize {
        self.curve.control_point_count()
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        self.curve.curvature(self.normalize(t))
    }

    fn torsion(&self, t: f64) -> Result<f64> {
        self.curve.torsion(self.normalize(t))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::BezierCurve2D;

    fn arch() -> BezierCurve2D {
        BezierCurve2D::new(vec![
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 400.0),
            Point2::new(400.0, 400.0),
            Point2::new(400.0, 100.0),
        ])
        .unwrap()
    }

    #[test]
    fn endpoints_match_raw_curve() {
        let raw = arch();
        let raw_start = raw.evaluate(0.0).unwrap();
        let raw_end = raw.evaluate(1.0).unwrap();
        let normalized = NormalizedCurve2D::new(raw).unwrap();
        assert!((normalized.evaluate(0.0).unwrap() - raw_start).norm() < 1e-4);
        assert!((normalized.evaluate(1.0).unwrap() - raw_end).norm() < 1e-4);
    }

    #[test]
    fn straight_line_map_is_identity() {
        // Collinear, evenly spaced control points are already uniform speed.
        let line = BezierCurve2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        ])
        .unwrap();
        let normalized = NormalizedCurve2D::new(line).unwrap();
        for &t in &[0.0, 0.1, 0.33, 0.5, 0.71, 0.9, 1.0] {
            assert!(
                (normalized.normalize(t) - t).abs() < 1e-6,
                "map diverged at t={t}"
            );
        }
    }

    #[test]
    fn equal_fractions_cover_equal_distances() {
        let normalized = NormalizedCurve2D::new(arch()).unwrap();
        let samples: Vec<Point2> = (0..=10)
            .map(|i| normalized.evaluate(f64::from(i) / 10.0).unwrap())
            .collect();
        let chords: Vec<f64> = samples.windows(2).map(|w| (w[1] - w[0]).norm()).collect();

        let min = chords.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = chords.iter().fold(0.0_f64, |a, &b| a.max(b));
        assert!(
            max / min < 1.05,
            "chord spread too wide: min={min}, max={max}"
        );
    }

    #[test]
    fn length_matches_raw_length() {
        let raw = arch();
        let raw_length = Curve2D::length(&raw);
        let normalized = NormalizedCurve2D::new(raw).unwrap();
        approx::assert_relative_eq!(normalized.length(), raw_length, epsilon = 1e-9);
    }
}
