//! Rotation math matching the original engine's conventions
//!
//! Rotations are stored as per-axis Euler angles and converted with the
//! engine's exact half-angle product form (roll, pitch, yaw = the RotX,
//! RotY, RotZ channels). The conversion is non-commutative and mod content
//! depends on it, so it is written out here rather than delegated to
//! [`glam::Quat::from_euler`].

use glam::{Quat, Vec3};

/// Convert an Euler angle triple (radians, channel order RotX/RotY/RotZ)
/// to a quaternion
pub fn angle_quat(angles: Vec3) -> Quat {
    let (sy, cy) = (angles.z * 0.5).sin_cos();
    let (sp, cp) = (angles.y * 0.5).sin_cos();
    let (sr, cr) = (angles.x * 0.5).sin_cos();

    Quat::from_xyzw(
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
        cr * cp * cy + sr * sp * sy,
    )
}

/// Spherical interpolation between two quaternions.
///
/// Negates `q` when the pair straddles the antipode so interpolation takes
/// the shorter arc, and falls back to plain linear weights when the inputs
/// are nearly identical, where the spherical form divides by a vanishing
/// sine.
pub fn slerp(p: Quat, q: Quat, t: f32) -> Quat {
    // Decide whether one quaternion is on the far side of the hypersphere
    let diff = (p.x - q.x).powi(2)
        + (p.y - q.y).powi(2)
        + (p.z - q.z).powi(2)
        + (p.w - q.w).powi(2);
    let sum = (p.x + q.x).powi(2)
        + (p.y + q.y).powi(2)
        + (p.z + q.z).powi(2)
        + (p.w + q.w).powi(2);
    let q = if diff > sum { -q } else { q };

    let cosom = p.x * q.x + p.y * q.y + p.z * q.z + p.w * q.w;

    if 1.0 + cosom > 0.000_001 {
        let (sclp, sclq) = if 1.0 - cosom > 0.000_001 {
            let omega = cosom.acos();
            let sinom = omega.sin();
            (((1.0 - t) * omega).sin() / sinom, (t * omega).sin() / sinom)
        } else {
            (1.0 - t, t)
        };
        Quat::from_xyzw(
            sclp * p.x + sclq * q.x,
            sclp * p.y + sclq * q.y,
            sclp * p.z + sclq * q.z,
            sclp * p.w + sclq * q.w,
        )
    } else {
        // Exactly opposed: pick an arbitrary orthogonal great circle
        let qt = Quat::from_xyzw(-q.y, q.x, -q.w, q.z);
        let sclp = ((1.0 - t) * 0.5 * std::f32::consts::PI).sin();
        let sclq = (t * 0.5 * std::f32::consts::PI).sin();
        Quat::from_xyzw(
            sclp * p.x + sclq * qt.x,
            sclp * p.y + sclq * qt.y,
            sclp * p.z + sclq * qt.z,
            sclp * p.w + sclq * qt.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const TOLERANCE: f32 = 1e-5;

    fn assert_quat_eq(a: Quat, b: Quat) {
        assert!(
            (a.x - b.x).abs() < TOLERANCE
                && (a.y - b.y).abs() < TOLERANCE
                && (a.z - b.z).abs() < TOLERANCE
                && (a.w - b.w).abs() < TOLERANCE,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_angle_quat_identity() {
        assert_quat_eq(angle_quat(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn test_angle_quat_yaw_90() {
        let q = angle_quat(Vec3::new(0.0, 0.0, FRAC_PI_2));
        assert_quat_eq(
            q,
            Quat::from_xyzw(0.0, 0.0, FRAC_PI_4.sin(), FRAC_PI_4.cos()),
        );
    }

    #[test]
    fn test_angle_quat_roll_90() {
        let q = angle_quat(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        assert_quat_eq(
            q,
            Quat::from_xyzw(FRAC_PI_4.sin(), 0.0, 0.0, FRAC_PI_4.cos()),
        );
    }

    #[test]
    fn test_slerp_identity_interpolation() {
        let q = angle_quat(Vec3::new(0.3, -0.2, 1.1));
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_quat_eq(slerp(q, q, t), q);
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let p = angle_quat(Vec3::new(0.0, 0.0, 0.0));
        let q = angle_quat(Vec3::new(0.0, 0.0, FRAC_PI_2));
        assert_quat_eq(slerp(p, q, 0.0), p);
        assert_quat_eq(slerp(p, q, 1.0), q);
    }

    #[test]
    fn test_slerp_halfway_is_half_angle() {
        let p = Quat::IDENTITY;
        let q = angle_quat(Vec3::new(0.0, 0.0, FRAC_PI_2));
        let half = slerp(p, q, 0.5);
        assert_quat_eq(half, angle_quat(Vec3::new(0.0, 0.0, FRAC_PI_4)));
    }

    #[test]
    fn test_slerp_takes_shorter_arc() {
        let p = angle_quat(Vec3::new(0.0, 0.0, 0.1));
        let q = -angle_quat(Vec3::new(0.0, 0.0, 0.2));
        // q is the antipodal representation; the result must still land
        // between the two rotations, not swing the long way around
        let mid = slerp(p, q, 0.5);
        let expected = angle_quat(Vec3::new(0.0, 0.0, 0.15));
        let dot = (mid.x * expected.x
            + mid.y * expected.y
            + mid.z * expected.z
            + mid.w * expected.w)
            .abs();
        assert!(dot > 1.0 - TOLERANCE);
    }
}
