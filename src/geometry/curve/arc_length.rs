use nalgebra::Point;

use crate::math::approx_eq;

/// Cumulative arc-length table over uniformly sampled curve segments.
///
/// The table always starts at 0, is non-decreasing, and its final entry is
/// the total sampled length. It is built once and only read afterwards,
/// answering the two inverse questions the kernel needs: which raw parameter
/// corresponds to a length fraction ([`normalize`]), and which segment of a
/// concatenation owns a length fraction ([`locate`]).
///
/// [`normalize`]: ArcLengthTable::normalize
/// [`locate`]: ArcLengthTable::locate
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    arcs: Vec<f64>,
}

impl ArcLengthTable {
    /// Accumulates per-segment lengths into a cumulative table.
    #[must_use]
    pub fn from_segment_lengths(segments: impl IntoIterator<Item = f64>) -> Self {
        let iter = segments.into_iter();
        let mut arcs = Vec::with_capacity(iter.size_hint().0 + 1);
        arcs.push(0.0);
        let mut total = 0.0;
        for segment in iter {
            total += segment;
            arcs.push(total);
        }
        Self { arcs }
    }

    /// Returns the total accumulated length.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.arcs[self.arcs.len() - 1]
    }

    /// Returns the number of table entries (segment count + 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Returns whether the table covers no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.len() <= 1
    }

    /// Maps a length fraction `t ∈ [0, 1]` to the raw curve parameter.
    ///
    /// Locates the last entry not beyond `t · total` and interpolates
    /// linearly inside the bracket. A fraction landing on a table breakpoint
    /// (within tolerance) is returned unchanged; interpolating there would
    /// divide by a vanishing bracket width.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalize(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let target = self.total() * t;

        let index = self
            .arcs
            .iter()
            .rposition(|&length| length <= target)
            .unwrap_or(0);
        let before = self.arcs[index];

        if approx_eq(before, target) {
            return t;
        }

        (index as f64 + (target - before) / (self.arcs[index + 1] - before))
            / (self.arcs.len() - 1) as f64
    }

    /// Maps a length fraction `t ∈ [0, 1]` to `(segment index, local fraction)`.
    ///
    /// A fraction at (or within tolerance of) 0 always maps to the start of
    /// the first segment.
    #[must_use]
    pub fn locate(&self, t: f64) -> (usize, f64) {
        let t = t.clamp(0.0, 1.0);
        if approx_eq(t, 0.0) {
            return (0, 0.0);
        }

        let target = self.total() * t;
        let index = self
            .arcs
            .iter()
            .position(|&length| length >= target)
            .unwrap_or(self.arcs.len() - 1)
            .max(1);
        let before = self.arcs[index - 1];

        (index - 1, (target - before) / (self.arcs[index] - before))
    }
}

/// Sums the chord lengths of a curve sampled at `steps` uniform parameter
/// steps.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn polyline_length<const D: usize>(
    point_at: impl Fn(f64) -> Point<f64, D>,
    steps: usize,
) -> f64 {
    let step = 1.0 / steps as f64;
    let mut total = 0.0;
    let mut prev = point_at(0.0);
    for i in 1..=steps {
        let t = (step * i as f64).clamp(0.0, 1.0);
        let point = point_at(t);
        total += (point - prev).norm();
        prev = point;
    }
    total
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn table_is_non_decreasing_and_totals() {
        let table = ArcLengthTable::from_segment_lengths([1.0, 0.5, 0.0, 2.5]);
        assert_eq!(table.len(), 5);
        for pair in table.arcs.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((table.total() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_is_identity_for_uniform_segments() {
        let table = ArcLengthTable::from_segment_lengths([1.0; 10]);
        for &t in &[0.0, 0.05, 0.3, 0.5, 0.77, 1.0] {
            assert!(
                (table.normalize(t) - t).abs() < 1e-9,
                "normalize({t}) diverged"
            );
        }
    }

    #[test]
    fn normalize_breakpoint_returns_fraction_unchanged() {
        // Breakpoints of an uneven table: hitting one skips interpolation.
        let table = ArcLengthTable::from_segment_lengths([1.0, 3.0]);
        let at_breakpoint = 0.25; // 0.25 · 4 = 1.0, exactly the first entry
        assert!((table.normalize(at_breakpoint) - at_breakpoint).abs() < 1e-12);
    }

    #[test]
    fn normalize_compensates_uneven_sampling() {
        // First half of the parameter range covers 1/4 of the length, so the
        // halfway length fraction must land past the halfway parameter.
        let table = ArcLengthTable::from_segment_lengths([1.0, 3.0]);
        let raw = table.normalize(0.5);
        assert!(raw > 0.5, "expected compensation, got {raw}");
        // Length 2 sits a third of the way into the second bracket:
        // (1 + 1/3) / 2.
        assert!((raw - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_terminal_fractions() {
        let table = ArcLengthTable::from_segment_lengths([0.7, 1.1, 0.4]);
        assert!(table.normalize(0.0).abs() < 1e-12);
        assert!((table.normalize(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn locate_picks_owning_segment() {
        let table = ArcLengthTable::from_segment_lengths([2.0, 2.0]);
        assert_eq!(table.locate(0.0).0, 0);
        let (index, local) = table.locate(0.75);
        assert_eq!(index, 1);
        assert!((local - 0.5).abs() < 1e-9);
    }

    #[test]
    fn locate_zero_fraction_maps_to_first_start() {
        let table = ArcLengthTable::from_segment_lengths([1.0, 1.0, 1.0]);
        let (index, local) = table.locate(0.0);
        assert_eq!(index, 0);
        assert!(local.abs() < 1e-12);
    }

    #[test]
    fn polyline_length_of_straight_segments() {
        let length = polyline_length(|t| Point2::new(3.0 * t, 4.0 * t), 16);
        assert!((length - 5.0).abs() < 1e-9);
    }
}
