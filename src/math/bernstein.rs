//! Bernstein basis polynomials.
//!
//! Every curve formula in this crate blends control points through
//! [`bernstein`]; the basis must match the textbook definition
//! `C(n,i) · t^i · (1−t)^(n−i)` exactly.

/// Computes the binomial coefficient `C(n, i)` as a float.
///
/// Uses the multiplicative form rather than factorials, so degrees above 20
/// do not overflow intermediate products.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn binomial_coefficient(n: usize, i: usize) -> f64 {
    let i = i.min(n - i);
    let mut result = 1.0;
    for j in 0..i {
        result = result * ((n - j) as f64) / ((j + 1) as f64);
    }
    result
}

/// Evaluates the Bernstein basis polynomial of degree `n` and index `i` at `t`.
///
/// Requires `i ≤ n`; `t` is expected in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn bernstein(n: usize, i: usize, t: f64) -> f64 {
    binomial_coefficient(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
}
