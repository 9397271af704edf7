use crate::error::{IterationError, Result};
use crate::geometry::curve::{Curve2D, Curve3D, CurvePoint2D, CurvePoint3D};
use crate::math::{approx_eq, round_clamp01};

/// Walks a 2D curve emitting a point every fixed distance.
///
/// Pair with a speed-normalized curve ([`NormalizedCurve2D`]) for the
/// emitted points to be truly equidistant along the arc; on a raw curve the
/// step is a fraction of total length applied in parameter space.
///
/// The cursor starts at the curve beginning and never moves backwards. Once
/// the end is reached the iterator stays exhausted, emitting at most one
/// extra terminal point when `return_last` was requested and the stepping
/// did not land on the end exactly.
///
/// [`NormalizedCurve2D`]: crate::geometry::curve::NormalizedCurve2D
pub struct DistanceIterator2D<'a> {
    curve: &'a dyn Curve2D,
    shift: f64,
    position: f64,
    return_last: bool,
}

impl<'a> DistanceIterator2D<'a> {
    /// Creates an iterator stepping `distance` along `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` is not strictly positive.
    pub fn new(curve: &'a dyn Curve2D, distance: f64, return_last: bool) -> Result<Self> {
        if distance <= 0.0 {
            return Err(IterationError::NonPositiveDistance(distance).into());
        }
        Ok(Self {
            curve,
            shift: distance / curve.length(),
            position: 0.0,
            return_last,
        })
    }

    /// Emits the point at the cursor and advances, or `None` once exhausted.
    pub fn next_point(&mut self) -> Option<CurvePoint2D<'a>> {
        if self.is_last() {
            if self.return_last {
                self.return_last = false;
            } else {
                return None;
            }
        }

        let point = CurvePoint2D::new(self.curve, self.position);
        self.position = round_clamp01(self.position + self.shift);
        Some(point)
    }

    /// Returns whether another call to [`next_point`] will yield a point.
    ///
    /// [`next_point`]: DistanceIterator2D::next_point
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.return_last || !self.is_last()
    }

    fn is_last(&self) -> bool {
        approx_eq(self.position, 1.0)
    }
}

impl<'a> Iterator for DistanceIterator2D<'a> {
    type Item = CurvePoint2D<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point()
    }
}

/// Walks a 3D curve emitting a point every fixed distance.
///
/// The 3D counterpart of [`DistanceIterator2D`].
pub struct DistanceIterator3D<'a> {
    curve: &'a dyn Curve3D,
    shift: f64,
    position: f64,
    return_last: bool,
}

impl<'a> DistanceIterator3D<'a> {
    /// Creates an iterator stepping `distance` along `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `distance` is not strictly positive.
    pub fn new(curve: &'a dyn Curve3D, distance: f64, return_last: bool) -> Result<Self> {
        if distance <= 0.0 {
            return Err(IterationError::NonPositiveDistance(distance).into());
        }
        Ok(Self {
            curve,
            shift: distance / curve.length(),
            position: 0.0,
            return_last,
        })
    }

    /// Emits the point at the cursor and advances, or `None` once exhausted.
    pub fn next_point(&mut self) -> Option<CurvePoint3D<'a>> {
        if self.is_last() {
            if self.return_last {
                self.return_last = false;
            } else {
                return None;
            }
        }

        let point = CurvePoint3D::new(self.curve, self.position);
        self.position = round_clamp01(self.position + self.shift);
        Some(point)
    }

    /// Returns whether another call to [`next_point`] will yield a point.
    ///
    /// [`next_point`]: DistanceIterator3D::next_point
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.return_last || !self.is_last()
    }

    fn is_last(&self) -> bool {
        approx_eq(self.position, 1.0)
    }
}

impl<'a> Iterator for DistanceIterator3D<'a> {
    type Item = CurvePoint3D<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point()
    }
}
