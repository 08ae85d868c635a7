//! One simulated wheelchair, wired against a host engine.
//!
//! This crate is *engine-agnostic*: the host implements [`ChairHost`] to
//! expose input samples and raycasts and to receive the per-tick outputs
//! (velocity-change force and torque, centre-of-mass anchor, drag, wheel
//! spin, rolling cue, alignment rotations). `ChairInstance::step_with_host`
//! runs one full tick in the fixed order grab → locomotion → wheels →
//! alignment.

use rollphys_core::{Scalar, Vec3, Isometry, Velocity, StepCtx};
use rollphys_rig::{ChairPoints, FORWARD, point_velocity, wheel_spin_delta, rolling as rolling_cue};
use rollphys_controllers::{
    GripParams, GripCtrl, LocomotionParams, LocomotionCtrl, LocomotionInput, LocomotionOutput,
    HandSample, ComAnchor,
};
use rollphys_align::{AlignParams, SlopeAligner, AlignReport, Ray};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side { Left, Right }

/// Static chair description plus tuning. Set once, read-only afterwards.
#[derive(Copy, Clone, Debug)]
pub struct ChairParams {
    pub points: ChairPoints,
    pub grip: GripParams,
    pub loco: LocomotionParams,
    pub align: AlignParams,
    pub align_enabled: bool,
}

impl Default for ChairParams {
    fn default() -> Self {
        Self {
            points: ChairPoints::default(),
            grip: GripParams::default(),
            loco: LocomotionParams::default(),
            align: AlignParams::default(),
            align_enabled: true,
        }
    }
}

/// Everything the chair needs from (and tells) the engine, once per tick.
/// Force and torque use velocity-change semantics: the value is added to the
/// body's velocity / yaw rate directly, not scaled by mass or timestep.
pub trait ChairHost {
    /// Hand linear velocity, engine-local frame; the chair reads the
    /// forward-axis component.
    fn hand_velocity(&self, side: Side) -> Vec3;
    /// Grip trigger in [0,1].
    fn trigger_value(&self, side: Side) -> Scalar;
    fn chair_pose(&self) -> Isometry;
    fn chair_velocity(&self) -> Velocity;
    fn raycast(&mut self, ray: Ray) -> Option<Scalar>;

    fn apply_velocity_change(&mut self, delta: Vec3);
    fn apply_yaw_torque(&mut self, torque: Scalar);
    /// Chair-local point; always one of the three rig anchors.
    fn set_center_of_mass(&mut self, local_point: Vec3);
    fn set_linear_drag(&mut self, drag: Scalar);
    /// World-space rotation to apply to the chair body immediately.
    fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, angle: Scalar);
    /// Render feedback: spin deltas (radians) for the rear wheels.
    fn apply_wheel_spin(&mut self, left_rad: Scalar, right_rad: Scalar);
    fn set_rolling_audio(&mut self, playing: bool);
}

/// Per-tick summary, mostly for harnesses and tests.
#[derive(Copy, Clone, Debug)]
pub struct StepReport {
    pub loco: LocomotionOutput,
    pub align: Option<AlignReport>,
    pub rolling: bool,
    pub left_spin: Scalar,
    pub right_spin: Scalar,
    pub left_grabbed: bool,
    pub right_grabbed: bool,
}

pub struct ChairInstance {
    pub p: ChairParams,
    left_grip: GripCtrl,
    right_grip: GripCtrl,
    loco: LocomotionCtrl,
    aligner: SlopeAligner,
}

impl ChairInstance {
    pub fn new(p: ChairParams) -> Self {
        Self {
            left_grip: GripCtrl::new(p.grip),
            right_grip: GripCtrl::new(p.grip),
            loco: LocomotionCtrl::new(p.loco),
            aligner: SlopeAligner::new(p.align),
            p,
        }
    }

    /// Resolve a centre-of-mass anchor to its chair-local point.
    pub fn anchor_point(&self, a: ComAnchor) -> Vec3 {
        match a {
            ComAnchor::Center => self.p.points.center,
            ComAnchor::LeftAxle => self.p.points.left_axle,
            ComAnchor::RightAxle => self.p.points.right_axle,
        }
    }

    /// Advance one simulation tick against the host.
    pub fn step_with_host<H: ChairHost>(&mut self, ctx: StepCtx, host: &mut H) -> StepReport {
        // 1. grab state first; everything below reads it
        let left_grabbed = self.left_grip.update(host.trigger_value(Side::Left));
        let right_grabbed = self.right_grip.update(host.trigger_value(Side::Right));

        let pose = host.chair_pose();
        let vel = host.chair_velocity();

        // 2. locomotion: brakes, drive, turn, centre-of-mass
        let input = LocomotionInput {
            left: HandSample {
                vel: host.hand_velocity(Side::Left).dot(FORWARD),
                grabbed: left_grabbed,
            },
            right: HandSample {
                vel: host.hand_velocity(Side::Right).dot(FORWARD),
                grabbed: right_grabbed,
            },
            current_vel: vel.lin,
            forward_ws: pose.transform_vector(FORWARD),
        };
        let loco = self.loco.step(input);

        host.set_linear_drag(loco.drag);
        if loco.velocity_delta != Vec3::ZERO {
            host.apply_velocity_change(loco.velocity_delta);
        }
        if loco.yaw_torque != 0.0 {
            host.apply_yaw_torque(loco.yaw_torque);
        }
        host.set_center_of_mass(self.anchor_point(loco.com));

        // 3. wheel spin + rolling cue from the rear contact velocities
        let radius = self.p.points.wheel_radius();
        let lv = point_velocity(self.p.points.left_axle, &pose, &vel);
        let rv = point_velocity(self.p.points.right_axle, &pose, &vel);
        let left_spin = wheel_spin_delta(lv, &pose, radius, ctx.dt);
        let right_spin = wheel_spin_delta(rv, &pose, radius, ctx.dt);
        host.apply_wheel_spin(left_spin, right_spin);
        let rolling = rolling_cue(lv.length(), rv.length());
        host.set_rolling_audio(rolling);

        // 4. slope alignment, replayed onto the host in probe order
        let align = if self.p.align_enabled {
            let mut aligned = pose;
            let report = self.aligner.step(&self.p.points, &mut aligned, |ray| host.raycast(ray));
            for rot in report.in_order().into_iter().flatten() {
                host.rotate_around(rot.pivot, rot.axis, rot.angle);
            }
            Some(report)
        } else {
            None
        };

        StepReport { loco, align, rolling, left_spin, right_spin, left_grabbed, right_grabbed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollphys_core::vec3;

    struct FlatHost {
        pose: Isometry,
        vel: Velocity,
        left_hand: Vec3,
        right_hand: Vec3,
        left_trigger: Scalar,
        right_trigger: Scalar,
        deltas: Vec<Vec3>,
        torques: Vec<Scalar>,
        com: Vec3,
        drag: Scalar,
        rotations: Vec<(Vec3, Vec3, Scalar)>,
        spins: Vec<(Scalar, Scalar)>,
        audio: Option<bool>,
        rays: usize,
    }

    impl FlatHost {
        fn at_rest() -> Self {
            Self {
                pose: Isometry::default(),
                vel: Velocity::default(),
                left_hand: Vec3::ZERO,
                right_hand: Vec3::ZERO,
                left_trigger: 0.0,
                right_trigger: 0.0,
                deltas: Vec::new(),
                torques: Vec::new(),
                com: Vec3::ZERO,
                drag: -1.0,
                rotations: Vec::new(),
                spins: Vec::new(),
                audio: None,
                rays: 0,
            }
        }
    }

    impl ChairHost for FlatHost {
        fn hand_velocity(&self, side: Side) -> Vec3 {
            match side { Side::Left => self.left_hand, Side::Right => self.right_hand }
        }
        fn trigger_value(&self, side: Side) -> Scalar {
            match side { Side::Left => self.left_trigger, Side::Right => self.right_trigger }
        }
        fn chair_pose(&self) -> Isometry { self.pose }
        fn chair_velocity(&self) -> Velocity { self.vel }
        fn raycast(&mut self, ray: Ray) -> Option<Scalar> {
            self.rays += 1;
            if ray.dir.y >= -1.0e-6 { return None; }
            let t = -ray.origin.y / ray.dir.y;
            (t >= 0.0 && t <= ray.max_dist).then_some(t)
        }
        fn apply_velocity_change(&mut self, delta: Vec3) { self.deltas.push(delta); }
        fn apply_yaw_torque(&mut self, torque: Scalar) { self.torques.push(torque); }
        fn set_center_of_mass(&mut self, local_point: Vec3) { self.com = local_point; }
        fn set_linear_drag(&mut self, drag: Scalar) { self.drag = drag; }
        fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, angle: Scalar) {
            self.rotations.push((pivot, axis, angle));
        }
        fn apply_wheel_spin(&mut self, l: Scalar, r: Scalar) { self.spins.push((l, r)); }
        fn set_rolling_audio(&mut self, playing: bool) { self.audio = Some(playing); }
    }

    fn tick() -> StepCtx {
        StepCtx { dt: 0.02, tick: 0 }
    }

    #[test] fn idle_tick_on_flat_ground_is_quiet() {
        let mut chair = ChairInstance::new(ChairParams::default());
        let mut host = FlatHost::at_rest();
        let report = chair.step_with_host(tick(), &mut host);

        assert!(host.deltas.is_empty());
        assert!(host.torques.is_empty());
        assert_eq!(host.drag, 0.0);
        assert_eq!(host.com, chair.p.points.center);
        assert_eq!(host.audio, Some(false));
        assert_eq!(host.rays, 4);
        assert_eq!(host.rotations.len(), 4);
        for (_, _, angle) in &host.rotations {
            assert!(angle.abs() < 1e-5);
        }
        assert!(!report.left_grabbed && !report.right_grabbed);
    }

    #[test] fn gripped_push_drives_forward() {
        let mut chair = ChairInstance::new(ChairParams::default());
        let mut host = FlatHost::at_rest();
        host.left_trigger = 1.0;
        host.right_trigger = 1.0;
        host.left_hand = vec3(0.0, 0.0, 0.5);
        host.right_hand = vec3(0.0, 0.0, 0.5);
        let report = chair.step_with_host(tick(), &mut host);

        assert!(report.left_grabbed && report.right_grabbed);
        assert_eq!(host.deltas.len(), 1);
        // target 0.5 * 0.8 = 0.4, clamped to the 0.1 per-axis step
        assert!((host.deltas[0].z - 0.1).abs() < 1e-6);
        assert!(host.torques.is_empty());
    }

    #[test] fn one_idle_rim_pivots_and_brakes() {
        let mut chair = ChairInstance::new(ChairParams::default());
        let mut host = FlatHost::at_rest();
        host.left_trigger = 1.0;
        host.right_trigger = 1.0;
        host.left_hand = vec3(0.0, 0.0, 0.3);
        let report = chair.step_with_host(tick(), &mut host);

        assert_eq!(host.torques.len(), 1);
        assert!((host.torques[0] - 0.3 * 0.4).abs() < 1e-6);
        assert_eq!(host.com, chair.p.points.right_axle);
        assert_eq!(host.drag, 2.0);
        assert_eq!(report.loco.com, ComAnchor::RightAxle);
    }

    #[test] fn rolling_chair_spins_wheels_and_audio() {
        let mut chair = ChairInstance::new(ChairParams::default());
        let mut host = FlatHost::at_rest();
        host.vel.lin = vec3(0.0, 0.0, 1.0);
        let report = chair.step_with_host(tick(), &mut host);

        assert!(report.rolling);
        assert_eq!(host.audio, Some(true));
        let (l, r) = host.spins[0];
        // forward motion spins negative under the rig convention
        assert!((l + 1.0 * 0.02 / 0.4).abs() < 1e-6);
        assert!((r - l).abs() < 1e-6);
    }

    #[test] fn alignment_can_be_switched_off() {
        let mut chair = ChairInstance::new(ChairParams { align_enabled: false, ..Default::default() });
        let mut host = FlatHost::at_rest();
        let report = chair.step_with_host(tick(), &mut host);

        assert_eq!(host.rays, 0);
        assert!(host.rotations.is_empty());
        assert!(report.align.is_none());
    }
}
