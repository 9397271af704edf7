use crate::error::{CurveError, Result};
use crate::math::{Point2, Point3, Vector2, Vector3, TOLERANCE};

use super::arc_length::ArcLengthTable;
use super::{Curve2D, Curve3D};

/// Concatenation of 2D curves addressed by a single global parameter.
///
/// The global `t` is an arc-length fraction over the summed lengths; it is
/// mapped onto exactly one sub-curve and rescaled into that curve's local
/// `[0, 1]` before dispatching. Sub-curves must be fully built (positive
/// length) when the union is assembled.
pub struct CurveUnion2D {
    curves: Vec<Box<dyn Curve2D>>,
    table: ArcLengthTable,
}

impl CurveUnion2D {
    /// Assembles a union from built sub-curves.
    ///
    /// # Errors
    ///
    /// Returns an error if no curves are given or any sub-curve has zero
    /// length.
    pub fn new(curves: Vec<Box<dyn Curve2D>>) -> Result<Self> {
        if curves.is_empty() {
            return Err(CurveError::EmptyUnion.into());
        }
        if let Some(index) = curves.iter().position(|c| c.length() < TOLERANCE) {
            return Err(CurveError::ZeroLengthSubCurve { index }.into());
        }

        let table = ArcLengthTable::from_segment_lengths(curves.iter().map(|c| c.length()));
        Ok(Self { curves, table })
    }

    /// Returns the number of concatenated sub-curves.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Maps a global fraction to `(sub-curve, local parameter)`.
    fn locate(&self, t: f64) -> (&dyn Curve2D, f64) {
        let (index, local) = self.table.locate(t);
        (self.curves[index].as_ref(), local)
    }
}

impl Curve2D for CurveUnion2D {
    fn evaluate(&self, t: f64) -> Result<Point2> {
        let (curve, local) = self.locate(t);
        curve.evaluate(local)
    }

    fn derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, local) = self.locate(t);
        curve.derivative(local)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, local) = self.locate(t);
        curve.second_derivative(local)
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, local) = self.locate(t);
        curve.third_derivative(local)
    }

    fn length(&self) -> f64 {
        self.table.total()
    }

    fn precision(&self) -> usize {
        self.curves.iter().map(|c| c.precision()).sum::<usize>() / self.curves.len()
    }

    fn control_point_count(&self) -> usize {
        self.curves.iter().map(|c| c.control_point_count()).sum()
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        let (curve, local) = self.locate(t);
        curve.curvature(local)
    }
}

/// Concatenation of 3D curves addressed by a single global parameter.
///
/// The 3D counterpart of [`CurveUnion2D`].
pub struct CurveUnion3D {
    curves: Vec<Box<dyn Curve3D>>,
    table: ArcLengthTable,
}

impl CurveUnion3D {
    /// Assembles a union from built sub-curves.
    ///
    /// # Errors
    ///
    /// Returns an error if no curves are given or any sub-curve has zero
    /// length.
    pub fn new(curves: Vec<Box<dyn Curve3D>>) -> Result<Self> {
        if curves.is_empty() {
            return Err(CurveError::EmptyUnion.into());
        }
        if let Some(index) = curves.iter().position(|c| c.length() < TOLERANCE) {
            return Err(CurveError::ZeroLengthSubCurve { index }.into());
        }

        let table = ArcLengthTable::from_segment_lengths(curves.iter().map(|c| c.length()));
        Ok(Self { curves, table })
    }

    /// Returns the number of concatenated sub-curves.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    fn locate(&self, t: f64) -> (&dyn Curve3D, f64) {
        let (index, local) = self.table.locate(t);
        (self.curves[index].as_ref(), local)
    }
}

impl Curve3D for CurveUnion3D {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (curve, local) = self.locate(t);
        curve.evaluate(local)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let (curve, local) = self.locate(t);
        curve.derivative(local)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        let (curve, local) = self.locate(t);
        curve.second_derivative(local)
    }

    fn third_derivative(&self, t: f64) -> Result<Vector3> {
        let (curve, local) = self.locate(t);
        curve.third_derivative(local)
    }

    fn length(&self) -> f64 {
        self.table.total()
    }

    fn precision(&self) -> usize {
        self.curves.iter().map(|c| c.precision()).sum::<usize>() / self.curves.len()
    }

    fn control_point_count(&self) -> usize {
        self.curves.iter().map(|c| c.control_point_count()).sum()
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        let (curve, local) = self.locate(t);
        curve.curvature(local)
    }

    fn torsion(&self, t: f64) -> Result<f64> {
        let (curve, local) = self.locate(t);
        curve.torsion(local)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::BezierCurve2D;

    fn wave(offset: f64) -> BezierCurve2D {
        BezierCurve2D::new(vec![
            Point2::new(offset, 0.0),
            Point2::new(offset + 1.0, 1.0),
            Point2::new(offset + 2.0, -1.0),
            Point2::new(offset + 3.0, 0.0),
        ])
        .unwrap()
    }

    fn two_wave_union() -> CurveUnion2D {
        CurveUnion2D::new(vec![Box::new(wave(0.0)), Box::new(wave(3.0))]).unwrap()
    }

    #[test]
    fn rejects_empty_union() {
        assert!(CurveUnion2D::new(Vec::new()).is_err());
    }

    #[test]
    fn total_length_is_sum_of_sub_lengths() {
        let union = two_wave_union();
        let single = Curve2D::length(&wave(0.0));
        assert!((union.length() - 2.0 * single).abs() < 1e-9);
    }

    #[test]
    fn global_endpoints() {
        let union = two_wave_union();
        let start = union.evaluate(0.0).unwrap();
        let end = union.evaluate(1.0).unwrap();
        assert!((start - Point2::new(0.0, 0.0)).norm() < 1e-4);
        assert!((end - Point2::new(6.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn junction_is_continuous() {
        // The two sub-curves share (3, 0) and have equal lengths, so the
        // junction sits at fraction 1/2.
        let union = two_wave_union();
        let before = union.evaluate(0.5 - 1e-6).unwrap();
        let after = union.evaluate(0.5 + 1e-6).unwrap();
        assert!((before - Point2::new(3.0, 0.0)).norm() < 1e-3);
        assert!((after - Point2::new(3.0, 0.0)).norm() < 1e-3);
    }

    #[test]
    fn fraction_zero_maps_to_first_sub_curve_start() {
        let union = two_wave_union();
        let first_start = wave(0.0).evaluate(0.0).unwrap();
        assert!((union.evaluate(0.0).unwrap() - first_start).norm() < 1e-12);
    }

    #[test]
    fn dispatches_into_owning_sub_curve() {
        // Fraction 3/4 is halfway into the second curve.
        let union = two_wave_union();
        let expected = wave(3.0).evaluate(0.5).unwrap();
        assert!((union.evaluate(0.75).unwrap() - expected).norm() < 1e-9);
    }

    #[test]
    fn aggregates_precision_and_count() {
        let union = two_wave_union();
        assert_eq!(union.precision(), 20);
        assert_eq!(union.control_point_count(), 8);
    }

    #[test]
    fn curvature_dispatch_matches_sub_curve() {
        let union = two_wave_union();
        let expected = wave(0.0).curvature(0.5).unwrap();
        let got = union.curvature(0.25).unwrap();
        assert!((got - expected).abs() < 1e-9);
    }
}
