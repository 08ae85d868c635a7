use glam::{Vec3A, Quat};
use crate::Scalar;

pub type Vec3 = Vec3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }

#[derive(Copy, Clone, Debug)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Isometry {
    #[inline] pub fn transform_point(&self, p: Vec3) -> Vec3 { self.pos + self.rot * p }
    #[inline] pub fn transform_vector(&self, v: Vec3) -> Vec3 { self.rot * v }
    #[inline] pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 { self.rot.conjugate() * v }

    /// Rigid rotation about a world-space pivot. Axis must be non-zero; the
    /// caller guards degenerate axes.
    pub fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, angle: Scalar) {
        let dq = Quat::from_axis_angle(glam::Vec3::from(axis).normalize(), angle);
        self.pos = pivot + dq * (self.pos - pivot);
        self.rot = (dq * self.rot).normalize();
    }
}

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

impl Velocity {
    /// Velocity of a point rigidly attached to the body, `r` = world offset
    /// from the body origin.
    #[inline] pub fn point_velocity(&self, r: Vec3) -> Vec3 { self.lin + self.ang.cross(r) }
}
