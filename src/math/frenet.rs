//! Curvature and torsion formulas.
//!
//! Sign conventions are load-bearing: consumers pick a turn direction from
//! the curvature sign, and the 3D sign must agree with the 2D one when the
//! curve lies in a plane.

use super::{Vector2, Vector3};

/// Signed curvature of a planar curve from velocity `v` and acceleration `a`.
///
/// `(v_y·a_x − v_x·a_y) / |v|³`; positive for a clockwise-turning tangent.
#[must_use]
pub fn signed_curvature_2d(v: &Vector2, a: &Vector2) -> f64 {
    (v.y * a.x - v.x * a.y) / (v.x * v.x + v.y * v.y).powf(3.0 / 2.0)
}

/// Signed curvature of a spatial curve from velocity `v` and acceleration `a`.
///
/// Magnitude is the standard `|v × a| / |v|³`; the sign is taken from the
/// component sum of `v × a`, which reduces to the 2D convention for planar
/// curves.
#[must_use]
pub fn signed_curvature_3d(v: &Vector3, a: &Vector3) -> f64 {
    let cross = v.cross(a);
    let sign = (cross.x + cross.y + cross.z).signum();
    sign * cross.norm() / (v.x * v.x + v.y * v.y + v.z * v.z).powf(3.0 / 2.0)
}

/// Torsion of a spatial curve from velocity `v`, acceleration `a`, and jerk `j`.
///
/// `((v × a) · j) / |v × a|²`; undefined when `v` and `a` are parallel —
/// callers must reject that case before dividing.
#[must_use]
pub fn torsion_3d(v: &Vector3, a: &Vector3, j: &Vector3) -> f64 {
    let cross = v.cross(a);
    cross.dot(j) / cross.norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_curvature_is_inverse_radius() {
        // Unit-speed circle of radius r: v = (0, r·ω), a = (−r·ω², 0) at angle 0.
        // With ω = 1: |k| = 1/r.
        let r = 2.0;
        let v = Vector2::new(0.0, r);
        let a = Vector2::new(-r, 0.0);
        let k = signed_curvature_2d(&v, &a);
        assert!((k.abs() - 1.0 / r).abs() < 1e-12);
    }

    #[test]
    fn planar_3d_curvature_matches_2d_magnitude() {
        let v2 = Vector2::new(0.0, 900.0);
        let a2 = Vector2::new(1800.0, -1800.0);
        let v3 = Vector3::new(0.0, 0.0, 900.0);
        let a3 = Vector3::new(1800.0, 0.0, -1800.0);
        let k2 = signed_curvature_2d(&v2, &a2);
        let k3 = signed_curvature_3d(&v3, &a3);
        assert!((k2.abs() - k3.abs()).abs() < 1e-12);
    }

    #[test]
    fn planar_curve_has_zero_torsion() {
        // Everything in the XY plane: v × a points along Z, j has no Z part.
        let v = Vector3::new(1.0, 2.0, 0.0);
        let a = Vector3::new(-3.0, 0.5, 0.0);
        let j = Vector3::new(0.7, -1.1, 0.0);
        assert!(torsion_3d(&v, &a, &j).abs() < 1e-12);
    }

    #[test]
    fn helix_torsion_sign() {
        // Right-handed helix (cos t, sin t, t) at t = 0:
        // v = (0, 1, 1), a = (−1, 0, 0), j = (0, −1, 0); torsion = 1/2.
        let v = Vector3::new(0.0, 1.0, 1.0);
        let a = Vector3::new(-1.0, 0.0, 0.0);
        let j = Vector3::new(0.0, -1.0, 0.0);
        let tau = torsion_3d(&v, &a, &j);
        assert!((tau - 0.5).abs() < 1e-12);
    }
}
