use crate::error::Result;
use crate::math::{Point2, Point3, Vector2, Vector3};

use super::{Curve2D, Curve3D};

/// A lazy handle to a position on a 2D curve.
///
/// Holds the curve reference and a fixed parameter; position, velocity, and
/// curvature are computed on demand, never cached. Produced by the curve
/// iterators, one handle per step.
#[derive(Clone, Copy)]
pub struct CurvePoint2D<'a> {
    curve: &'a dyn Curve2D,
    t: f64,
}

impl<'a> CurvePoint2D<'a> {
    /// Creates a handle at parameter `t` on `curve`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve2D, t: f64) -> Self {
        Self { curve, t }
    }

    /// Returns the parameter this handle is anchored at.
    #[must_use]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Evaluates the position.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn point(&self) -> Result<Point2> {
        self.curve.evaluate(self.t)
    }

    /// Evaluates the velocity (first derivative).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn velocity(&self) -> Result<Vector2> {
        self.curve.derivative(self.t)
    }

    /// Evaluates the signed curvature.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn curvature(&self) -> Result<f64> {
        self.curve.curvature(self.t)
    }
}

impl std::fmt::Debug for CurvePoint2D<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurvePoint2D").field("t", &self.t).finish()
    }
}

/// A lazy handle to a position on a 3D curve.
///
/// The 3D counterpart of [`CurvePoint2D`].
#[derive(Clone, Copy)]
pub struct CurvePoint3D<'a> {
    curve: &'a dyn Curve3D,
    t: f64,
}

impl<'a> CurvePoint3D<'a> {
    /// Creates a handle at parameter `t` on `curve`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve3D, t: f64) -> Self {
        Self { curve, t }
    }

    /// Returns the parameter this handle is anchored at.
    #[must_use]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Evaluates the position.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn point(&self) -> Result<Point3> {
        self.curve.evaluate(self.t)
    }

    /// Evaluates the velocity (first derivative).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn velocity(&self) -> Result<Vector3> {
        self.curve.derivative(self.t)
    }

    /// Evaluates the signed curvature.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying evaluation fails.
    pub fn curvature(&self) -> Result<f64> {
        self.curve.curvature(self.t)
    }
}

impl std::fmt::Debug for CurvePoint3D<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurvePoint3D").field("t", &self.t).finish()
    }
}
