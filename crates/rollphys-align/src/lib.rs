//! Four-probe ground alignment.
//!
//! Each tick the chair body is nudged back onto the terrain by four raycast
//! probes, evaluated in a fixed order: rear-left wheel, rear-right wheel,
//! front casters, rear axle line. Every probe measures ground clearance at
//! one contact and converts the error into a small rotation about the
//! opposite contact. Rotations land on the pose immediately, so each later
//! probe casts from the already-corrected transform.

use rollphys_core::{Scalar, Vec3, Isometry};
use rollphys_rig::{ChairPoints, FORWARD, UP};

#[derive(Copy, Clone, Debug)]
pub struct AlignParams {
    /// Probe length below the cast origin.
    pub probe_range: Scalar,
    /// Height above the caster contacts the front probe starts from.
    pub front_clearance: Scalar,
    /// Spans at or below this skip their probe instead of dividing by them.
    pub min_span: Scalar,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self { probe_range: 2.0, front_clearance: 0.1, min_span: 1.0e-4 }
    }
}

/// A world-space probe handed to the external physics query. `dir` is unit
/// length; the host reports the hit distance along it, or `None` past
/// `max_dist`.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub max_dist: Scalar,
}

/// One corrective rotation, world space, as applied.
#[derive(Copy, Clone, Debug)]
pub struct AppliedRotation {
    pub pivot: Vec3,
    pub axis: Vec3,
    pub angle: Scalar,
}

/// What one alignment pass did. `None` means the probe missed or was skipped;
/// the chair holds its prior attitude on that axis until a future hit.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlignReport {
    pub rear_left: Option<AppliedRotation>,
    pub rear_right: Option<AppliedRotation>,
    pub front: Option<AppliedRotation>,
    pub back: Option<AppliedRotation>,
}

impl AlignReport {
    /// Rotations in the order they were applied, for host replay.
    pub fn in_order(&self) -> [Option<AppliedRotation>; 4] {
        [self.rear_left, self.rear_right, self.front, self.back]
    }
}

pub struct SlopeAligner {
    pub params: AlignParams,
}

impl SlopeAligner {
    pub fn new(params: AlignParams) -> Self {
        Self { params }
    }

    /// Run the four probes, mutating `pose` as each rotation lands.
    /// Reordering the probes changes the resulting pose on uneven ground.
    pub fn step<R>(&self, points: &ChairPoints, pose: &mut Isometry, mut raycast: R) -> AlignReport
    where
        R: FnMut(Ray) -> Option<Scalar>,
    {
        let p = self.params;
        let radius = points.wheel_radius();
        let track = points.wheel_track();
        let base = points.wheelbase();
        let mut report = AlignReport::default();

        // Rear wheels: roll about the opposite wheel's contact, around the
        // chair's forward direction.
        if track > p.min_span {
            let origin = pose.transform_point(points.rear_left_center);
            let dir = pose.transform_vector(points.rear_left_bottom - points.rear_left_center);
            if let Some(d) = cast(&mut raycast, origin, dir, p.probe_range) {
                let angle = -((radius - d) / track).atan();
                report.rear_left = apply(
                    pose,
                    pose.transform_point(points.rear_right_bottom),
                    pose.transform_vector(FORWARD),
                    angle,
                    p.min_span,
                );
            }

            let origin = pose.transform_point(points.rear_right_center);
            let dir = pose.transform_vector(points.rear_right_bottom - points.rear_right_center);
            if let Some(d) = cast(&mut raycast, origin, dir, p.probe_range) {
                let angle = ((radius - d) / track).atan();
                report.rear_right = apply(
                    pose,
                    pose.transform_point(points.rear_left_bottom),
                    pose.transform_vector(FORWARD),
                    angle,
                    p.min_span,
                );
            }
        }

        // Front and back: pitch about the rear (resp. front) contact line.
        // Probes cast along chair-local down, not world down.
        if base.abs() > p.min_span {
            let down = -pose.transform_vector(UP);
            let origin = (pose.transform_point(points.front_left_bottom)
                + pose.transform_point(points.front_right_bottom))
                * 0.5
                - down * p.front_clearance;
            if let Some(d) = cast(&mut raycast, origin, down, p.front_clearance + p.probe_range) {
                let angle = -((p.front_clearance - d) / base).atan();
                let rl = pose.transform_point(points.rear_left_bottom);
                let rr = pose.transform_point(points.rear_right_bottom);
                report.front = apply(pose, rl, rr - rl, angle, p.min_span);
            }

            let down = -pose.transform_vector(UP);
            let origin = (pose.transform_point(points.rear_left_center)
                + pose.transform_point(points.rear_right_center))
                * 0.5;
            if let Some(d) = cast(&mut raycast, origin, down, p.probe_range) {
                let angle = ((radius - d) / base).atan();
                let fl = pose.transform_point(points.front_left_bottom);
                let fr = pose.transform_point(points.front_right_bottom);
                report.back = apply(pose, fl, fr - fl, angle, p.min_span);
            }
        }

        report
    }
}

fn cast<R>(raycast: &mut R, origin: Vec3, dir: Vec3, max_dist: Scalar) -> Option<Scalar>
where
    R: FnMut(Ray) -> Option<Scalar>,
{
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    raycast(Ray { origin, dir, max_dist })
}

fn apply(
    pose: &mut Isometry,
    pivot: Vec3,
    axis: Vec3,
    angle: Scalar,
    min_span: Scalar,
) -> Option<AppliedRotation> {
    if axis.length() <= min_span {
        return None;
    }
    pose.rotate_around(pivot, axis, angle);
    Some(AppliedRotation { pivot, axis, angle })
}
