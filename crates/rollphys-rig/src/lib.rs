//! Chair rig geometry: the fixed local-space points a chair instance is
//! built from, plus the small per-wheel derivations (spin, rolling cue)
//! that only need geometry and a rigid-body velocity.

use rollphys_core::{Scalar, Vec3, Isometry, Velocity, vec3};

/// Chair-local forward axis.
pub const FORWARD: Vec3 = Vec3::Z;
/// Chair-local up axis.
pub const UP: Vec3 = Vec3::Y;

/// Contact-point speed above which the wheels count as rolling (audio cue).
pub const ROLLING_FLOOR: Scalar = 0.1;

/// The fixed local-space reference points of one chair. Configured once at
/// setup and read-only during simulation.
#[derive(Copy, Clone, Debug)]
pub struct ChairPoints {
    pub rear_left_center: Vec3,
    pub rear_left_bottom: Vec3,
    pub rear_right_center: Vec3,
    pub rear_right_bottom: Vec3,
    pub front_left_bottom: Vec3,
    pub front_right_bottom: Vec3,
    /// Centre-of-mass anchor at the chair body centre.
    pub center: Vec3,
    /// Centre-of-mass anchor at the left rear-wheel axle.
    pub left_axle: Vec3,
    /// Centre-of-mass anchor at the right rear-wheel axle.
    pub right_axle: Vec3,
}

impl ChairPoints {
    /// Both rear wheels are assumed to share this radius.
    #[inline]
    pub fn wheel_radius(&self) -> Scalar {
        (self.rear_left_bottom - self.rear_left_center).length()
    }

    /// Lateral distance between the rear wheel centres.
    #[inline]
    pub fn wheel_track(&self) -> Scalar {
        (self.rear_left_center - self.rear_right_center).length()
    }

    /// Forward distance from the rear contacts to the front casters.
    #[inline]
    pub fn wheelbase(&self) -> Scalar {
        (self.front_left_bottom - self.rear_left_bottom).dot(FORWARD)
    }
}

impl Default for ChairPoints {
    /// A standard self-propelled chair: 0.4 m rear wheels, 0.6 m track,
    /// casters 0.45 m ahead of the rear contacts.
    fn default() -> Self {
        Self {
            rear_left_center: vec3(-0.3, 0.4, 0.0),
            rear_left_bottom: vec3(-0.3, 0.0, 0.0),
            rear_right_center: vec3(0.3, 0.4, 0.0),
            rear_right_bottom: vec3(0.3, 0.0, 0.0),
            front_left_bottom: vec3(-0.25, 0.0, 0.45),
            front_right_bottom: vec3(0.25, 0.0, 0.45),
            center: vec3(0.0, 0.3, 0.15),
            left_axle: vec3(-0.3, 0.4, 0.0),
            right_axle: vec3(0.3, 0.4, 0.0),
        }
    }
}

/// Spin delta for one wheel this tick, radians about its lateral axis, signed
/// so the wheel visually rolls with the chair: a negative chair-local forward
/// component spins positive.
pub fn wheel_spin_delta(point_vel_ws: Vec3, pose: &Isometry, wheel_radius: Scalar, dt: Scalar) -> Scalar {
    if wheel_radius <= 1.0e-6 {
        return 0.0;
    }
    let speed = point_vel_ws.length();
    let local = pose.inverse_transform_vector(point_vel_ws);
    let dir = if local.dot(FORWARD) < 0.0 { 1.0 } else { -1.0 };
    (speed * dt / wheel_radius) * dir
}

/// World-space velocity of a chair-local point on the rigid body.
#[inline]
pub fn point_velocity(point_local: Vec3, pose: &Isometry, vel: &Velocity) -> Vec3 {
    vel.point_velocity(pose.transform_point(point_local) - pose.pos)
}

/// Rolling-audio cue: either rear contact moving past the floor.
#[inline]
pub fn rolling(left_speed: Scalar, right_speed: Scalar) -> bool {
    left_speed >= ROLLING_FLOOR || right_speed >= ROLLING_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollphys_core::quat_identity;

    #[test] fn derived_metrics_from_default_rig() {
        let p = ChairPoints::default();
        assert!((p.wheel_radius() - 0.4).abs() < 1e-6);
        assert!((p.wheel_track() - 0.6).abs() < 1e-6);
        assert!((p.wheelbase() - 0.45).abs() < 1e-6);
    }

    #[test] fn spin_follows_speed_and_radius() {
        let pose = Isometry { pos: Vec3::ZERO, rot: quat_identity() };
        // moving backward along local forward: positive spin
        let d = wheel_spin_delta(vec3(0.0, 0.0, -2.0), &pose, 0.4, 0.02);
        assert!((d - 2.0 * 0.02 / 0.4).abs() < 1e-6);
        // forward motion spins the other way
        let d = wheel_spin_delta(vec3(0.0, 0.0, 2.0), &pose, 0.4, 0.02);
        assert!((d + 2.0 * 0.02 / 0.4).abs() < 1e-6);
    }

    #[test] fn rolling_cue_threshold() {
        assert!(!rolling(0.05, 0.0));
        assert!(rolling(0.0, 0.1));
        assert!(rolling(0.5, 0.5));
    }
}
