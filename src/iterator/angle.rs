use crate::error::{IterationError, Result};
use crate::geometry::curve::{Curve2D, Curve3D, CurvePoint2D, CurvePoint3D};
use crate::math::{approx_eq, round_clamp01};

/// Upper bound on bisection refinement steps per emitted point.
///
/// The interval halves every step, so 64 iterations exhaust f64 precision;
/// hitting the bound means the threshold is tighter than the derivative
/// field can resolve, and the midpoint is accepted as the best answer.
const MAX_BISECTION_STEPS: usize = 64;

/// One entry of the precomputed turn table: the cumulative turning angle
/// reached at parameter `t`, tagged with its curvature-sign segment.
#[derive(Debug, Clone, Copy)]
struct TurnSample {
    t: f64,
    angle: f64,
    segment: usize,
}

/// Walks a 2D curve emitting a point every fixed turning angle.
///
/// Construction samples the curve into a table of cumulative turning angles
/// (radians, measured between consecutive first derivatives), split into
/// segments wherever the curvature changes sign. Each step then finds the
/// table entry reaching the target angle and refines it by bisection until
/// the turn from the current position matches the target within
/// `angle_threshold`. A curvature-sign reversal between here and the target
/// snaps the step to the segment boundary instead, so every inflection
/// point gets sampled exactly.
pub struct AngleIterator2D<'a> {
    curve: &'a dyn Curve2D,
    angle: f64,
    threshold: f64,
    return_last: bool,
    position: f64,
    turned: f64,
    samples: Vec<TurnSample>,
}

impl<'a> AngleIterator2D<'a> {
    /// Creates an iterator stepping `angle` radians of turn along `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `angle` is not strictly positive, or if the
    /// curve is degenerate at a sampled parameter (curvature undefined).
    pub fn new(
        curve: &'a dyn Curve2D,
        angle: f64,
        angle_threshold: f64,
        return_last: bool,
    ) -> Result<Self> {
        if angle <= 0.0 {
            return Err(IterationError::NonPositiveAngle(angle).into());
        }
        let samples = calculate_turn_samples_2d(curve, angle)?;
        Ok(Self {
            curve,
            angle,
            threshold: angle_threshold,
            return_last,
            position: 0.0,
            turned: 0.0,
            samples,
        })
    }

    /// Emits the point at the cursor and advances, or `None` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if a derivative evaluation fails while refining the
    /// next position.
    pub fn next_point(&mut self) -> Result<Option<CurvePoint2D<'a>>> {
        if self.is_last() {
            if self.return_last {
                self.return_last = false;
            } else {
                return Ok(None);
            }
        }

        let point = CurvePoint2D::new(self.curve, self.position);
        let (position, turned) = self.next_position_angle()?;
        self.position = round_clamp01(position);
        self.turned = turned;
        Ok(Some(point))
    }

    /// Returns whether another call to [`next_point`] will yield a point.
    ///
    /// [`next_point`]: AngleIterator2D::next_point
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.return_last || !self.is_last()
    }

    fn is_last(&self) -> bool {
        approx_eq(self.position, 1.0)
    }

    fn next_position_angle(&self) -> Result<(f64, f64)> {
        let Some(target) = self
            .samples
            .iter()
            .find(|s| s.angle >= self.turned + self.angle)
        else {
            // The remaining curve turns less than one step: jump to the end.
            return Ok((1.0, self.turned));
        };
        let current = self
            .samples
            .iter()
            .find(|s| s.angle > self.turned)
            .unwrap_or(target);

        if current.segment != target.segment {
            // A curvature-sign reversal lies between: snap to the last entry
            // of the current segment instead of overshooting past the
            // inflection.
            let boundary = self
                .samples
                .iter()
                .rfind(|s| s.segment == current.segment)
                .unwrap_or(current);
            return Ok((boundary.t, boundary.angle));
        }

        self.refine(target.t)
    }

    fn refine(&self, end_t: f64) -> Result<(f64, f64)> {
        let from = self.curve.derivative(self.position)?;

        let measured = from.angle(&self.curve.derivative(end_t)?);
        if self.in_range(measured) {
            return Ok((end_t, self.turned + measured));
        }

        let mut start = self.position;
        let mut end = end_t;
        let mut mid = self.position + self.angle / (measured / (end_t - self.position));
        for _ in 0..MAX_BISECTION_STEPS {
            let measured = from.angle(&self.curve.derivative(mid)?);
            if self.in_range(measured) {
                return Ok((mid, self.turned + measured));
            }
            if measured > self.angle + self.threshold {
                end = mid;
                mid = start + (mid - start) / 2.0;
            } else {
                start = mid;
                mid += (end - mid) / 2.0;
            }
        }

        // The threshold is tighter than the interval can resolve; accept the
        // converged midpoint.
        let measured = from.angle(&self.curve.derivative(mid)?);
        Ok((mid, self.turned + measured))
    }

    fn in_range(&self, measured: f64) -> bool {
        measured > self.angle - self.threshold && measured < self.angle + self.threshold
    }
}

impl<'a> Iterator for AngleIterator2D<'a> {
    type Item = Result<CurvePoint2D<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point().transpose()
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn calculate_turn_samples_2d(curve: &dyn Curve2D, angle: f64) -> Result<Vec<TurnSample>> {
    let steps = curve.precision() * curve.control_point_count();
    let step = 1.0 / steps as f64;

    let mut samples = Vec::new();
    let mut total_angle = 0.0;
    let mut last_sign: Option<i8> = None;
    let mut segment = 0_usize;

    for i in 1..=steps {
        let outer = (step * i as f64).clamp(0.0, 1.0);

        let sign: i8 = if curve.curvature(outer)? >= 0.0 { 1 } else { -1 };
        if last_sign != Some(sign) {
            last_sign = Some(sign);
            segment += 1;
        }

        let step_angle = curve
            .derivative(outer - step)?
            .angle(&curve.derivative(outer)?);

        // Subdivide so no table gap turns more than the target angle.
        let inner_steps = ((step_angle / angle) as usize).max(1);
        let inner_step = step / inner_steps as f64;
        for j in 1..=inner_steps {
            let inner = (step * (i - 1) as f64 + inner_step * j as f64).clamp(0.0, 1.0);
            let inner_angle = curve
                .derivative(inner - inner_step)?
                .angle(&curve.derivative(inner)?);

            total_angle += inner_angle;
            samples.push(TurnSample {
                t: inner,
                angle: total_angle,
                segment,
            });
        }
    }

    Ok(samples)
}

/// Walks a 3D curve emitting a point every fixed turning angle.
///
/// The 3D counterpart of [`AngleIterator2D`]; curvature-sign segmentation
/// uses the signed 3D curvature, angles the 3D derivative vectors.
pub struct AngleIterator3D<'a> {
    curve: &'a dyn Curve3D,
    angle: f64,
    threshold: f64,
    return_last: bool,
    position: f64,
    turned: f64,
    samples: Vec<TurnSample>,
}

impl<'a> AngleIterator3D<'a> {
    /// Creates an iterator stepping `angle` radians of turn along `curve`.
    ///
    /// # Errors
    ///
    /// Returns an error if `angle` is not strictly positive, or if the
    /// curve is degenerate at a sampled parameter (curvature undefined).
    pub fn new(
        curve: &'a dyn Curve3D,
        angle: f64,
        angle_threshold: f64,
        return_last: bool,
    ) -> Result<Self> {
        if angle <= 0.0 {
            return Err(IterationError::NonPositiveAngle(angle).into());
        }
        let samples = calculate_turn_samples_3d(curve, angle)?;
        Ok(Self {
            curve,
            angle,
            threshold: angle_threshold,
            return_last,
            position: 0.0,
            turned: 0.0,
            samples,
        })
    }

    /// Emits the point at the cursor and advances, or `None` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if a derivative evaluation fails while refining the
    /// next position.
    pub fn next_point(&mut self) -> Result<Option<CurvePoint3D<'a>>> {
        if self.is_last() {
            if self.return_last {
                self.return_last = false;
            } else {
                return Ok(None);
            }
        }

        let point = CurvePoint3D::new(self.curve, self.position);
        let (position, turned) = self.next_position_angle()?;
        self.position = round_clamp01(position);
        self.turned = turned;
        Ok(Some(point))
    }

    /// Returns whether another call to [`next_point`] will yield a point.
    ///
    /// [`next_point`]: AngleIterator3D::next_point
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.return_last || !self.is_last()
    }

    fn is_last(&self) -> bool {
        approx_eq(self.position, 1.0)
    }

    fn next_position_angle(&self) -> Result<(f64, f64)> {
        let Some(target) = self
            .samples
            .iter()
            .find(|s| s.angle >= self.turned + self.angle)
        else {
            return Ok((1.0, self.turned));
        };
        let current = self
            .samples
            .iter()
            .find(|s| s.angle > self.turned)
            .unwrap_or(target);

        if current.segment != target.segment {
            let boundary = self
                .samples
                .iter()
                .rfind(|s| s.segment == current.segment)
                .unwrap_or(current);
            return Ok((boundary.t, boundary.angle));
        }

        self.refine(target.t)
    }

    fn refine(&self, end_t: f64) -> Result<(f64, f64)> {
        let from = self.curve.derivative(self.position)?;

        let measured = from.angle(&self.curve.derivative(end_t)?);
        if self.in_range(measured) {
            return Ok((end_t, self.turned + measured));
        }

        let mut start = self.position;
        let mut end = end_t;
        let mut mid = self.position + self.angle / (measured / (end_t - self.position));
        for _ in 0..MAX_BISECTION_STEPS {
            let measured = from.angle(&self.curve.derivative(mid)?);
            if self.in_range(measured) {
                return Ok((mid, self.turned + measured));
            }
            if measured > self.angle + self.threshold {
                end = mid;
                mid = start + (mid - start) / 2.0;
            } else {
                start = mid;
                mid += (end - mid) / 2.0;
            }
        }

        let measured = from.angle(&self.curve.derivative(mid)?);
        Ok((mid, self.turned + measured))
    }

    fn in_range(&self, measured: f64) -> bool {
        measured > self.angle - self.threshold && measured < self.angle + self.threshold
    }
}

impl<'a> Iterator for AngleIterator3D<'a> {
    type Item = Result<CurvePoint3D<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_point().transpose()
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn calculate_turn_samples_3d(curve: &dyn Curve3D, angle: f64) -> Result<Vec<TurnSample>> {
    let steps = curve.precision() * curve.control_point_count();
    let step = 1.0 / steps as f64;

    let mut samples = Vec::new();
    let mut total_angle = 0.0;
    let mut last_sign: Option<i8> = None;
    let mut segment = 0_usize;

    for i in 1..=steps {
        let outer = (step * i as f64).clamp(0.0, 1.0);

        let sign: i8 = if curve.curvature(outer)? >= 0.0 { 1 } else { -1 };
        if last_sign != Some(sign) {
            last_sign = Some(sign);
            segment += 1;
        }

        let step_angle = curve
            .derivative(outer - step)?
            .angle(&curve.derivative(outer)?);

        let inner_steps = ((step_angle / angle) as usize).max(1);
        let inner_step = step / inner_steps as f64;
        for j in 1..=inner_steps {
            let inner = (step * (i - 1) as f64 + inner_step * j as f64).clamp(0.0, 1.0);
            let inner_angle = curve
                .derivative(inner - inner_step)?
                .angle(&curve.derivative(inner)?);

            total_angle += inner_angle;
            samples.push(TurnSample {
                t: inner,
                angle: total_angle,
                segment,
            });
        }
    }

    Ok(samples)
}
