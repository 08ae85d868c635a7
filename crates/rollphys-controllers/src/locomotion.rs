use rollphys_core::{Scalar, Vec3};

/// Where the rigid body's centre of mass sits after this tick. The chair only
/// ever uses one of three fixed anchors (never an interpolated point); the rig
/// resolves each anchor to its local-space position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ComAnchor {
    #[default]
    Center,
    LeftAxle,
    RightAxle,
}

/// One hand's input for a tick: forward-axis velocity component + grab state.
#[derive(Copy, Clone, Debug, Default)]
pub struct HandSample {
    pub vel: Scalar,
    pub grabbed: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct LocomotionParams {
    pub speed_scale: Scalar,
    pub turn_scale: Scalar,
    /// Per-axis cap on the velocity change emitted in one tick.
    pub max_velocity_step: Scalar,
    /// Below this magnitude a hand counts as stationary.
    pub noise_floor: Scalar,
    /// Linear drag while a grabbed hand holds its rim still.
    pub brake_drag: Scalar,
    /// Fraction of a lone hand's velocity fed into forward drive.
    pub single_hand_forward: Scalar,
    /// Fraction of a lone hand's velocity fed into yaw.
    pub single_hand_turn: Scalar,
}

impl Default for LocomotionParams {
    fn default() -> Self {
        Self {
            speed_scale: 0.8,
            turn_scale: 0.4,
            max_velocity_step: 0.1,
            noise_floor: 0.1,
            brake_drag: 2.0,
            single_hand_forward: 2.0 / 3.0,
            single_hand_turn: 2.0 / 3.0,
        }
    }
}

impl LocomotionParams {
    /// Split used by the archived controller revision: a lone hand feeds only
    /// a third of its velocity into forward drive (turn share unchanged).
    pub fn legacy() -> Self {
        Self { single_hand_forward: 1.0 / 3.0, ..Self::default() }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LocomotionInput {
    pub left: HandSample,
    pub right: HandSample,
    /// Chair linear velocity, world space.
    pub current_vel: Vec3,
    /// Chair forward axis, world space, unit length.
    pub forward_ws: Vec3,
}

/// What the host applies this tick. All four fields are emitted every tick;
/// zero delta / zero torque are no-ops under velocity-change semantics.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocomotionOutput {
    /// Added directly to the body's linear velocity.
    pub velocity_delta: Vec3,
    /// Added directly to the body's yaw rate, about the chair's local up axis.
    pub yaw_torque: Scalar,
    pub com: ComAnchor,
    pub drag: Scalar,
}

pub struct LocomotionCtrl {
    pub params: LocomotionParams,
}

impl LocomotionCtrl {
    pub fn new(params: LocomotionParams) -> Self {
        Self { params }
    }

    pub fn step(&self, input: LocomotionInput) -> LocomotionOutput {
        let p = self.params;
        let mut out = LocomotionOutput::default();

        // Gripping a near-still rim brakes, independent of the drive branches.
        let braking = (input.right.grabbed && input.right.vel.abs() < p.noise_floor)
            || (input.left.grabbed && input.left.vel.abs() < p.noise_floor);
        out.drag = if braking { p.brake_drag } else { 0.0 };

        let lv = input.left.vel;
        let rv = input.right.vel;
        let floor = p.noise_floor;

        match (input.left.grabbed, input.right.grabbed) {
            (true, true) => {
                if (rv >= floor && lv >= floor) || (rv <= -floor && lv <= -floor) {
                    // Both rims pushed the same way: drive at the mean speed.
                    let target = input.forward_ws * ((rv + lv) * 0.5 * p.speed_scale);
                    out.velocity_delta = chase_velocity(target, input.current_vel, p.max_velocity_step);
                } else if (rv < floor && lv >= floor) || (rv >= floor && lv < floor) {
                    // One side held while the other pushes: the still wheel
                    // becomes the pivot. Thresholds are signed on purpose; a
                    // hand pulling backward past the floor while the other
                    // idles falls through to a coast.
                    out.com = if rv.abs() < floor {
                        ComAnchor::RightAxle
                    } else if lv.abs() < floor {
                        ComAnchor::LeftAxle
                    } else {
                        ComAnchor::Center
                    };
                    out.yaw_torque = (lv - rv) * p.turn_scale;
                }
            }
            (false, true) => {
                let target = input.forward_ws * (rv * p.single_hand_forward * p.speed_scale);
                out.velocity_delta = chase_velocity(target, input.current_vel, p.max_velocity_step);
                out.com = ComAnchor::LeftAxle;
                out.yaw_torque = -(rv * p.single_hand_turn) * p.turn_scale;
            }
            (true, false) => {
                let target = input.forward_ws * (lv * p.single_hand_forward * p.speed_scale);
                out.velocity_delta = chase_velocity(target, input.current_vel, p.max_velocity_step);
                out.com = ComAnchor::RightAxle;
                out.yaw_torque = (lv * p.single_hand_turn) * p.turn_scale;
            }
            (false, false) => {}
        }

        out
    }
}

/// Velocity-change that chases `target` without ever braking: nothing is
/// emitted when the chair already moves faster than the target (slow-down is
/// drag's job), the vertical component is zeroed, and the horizontal
/// components are clamped per axis.
fn chase_velocity(target: Vec3, current: Vec3, max_step: Scalar) -> Vec3 {
    if current.length() > target.length() {
        return Vec3::ZERO;
    }
    let mut delta = target - current;
    delta.y = 0.0;
    delta.x = delta.x.clamp(-max_step, max_step);
    delta.z = delta.z.clamp(-max_step, max_step);
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollphys_core::vec3;

    const FWD: Vec3 = Vec3::Z;

    fn grabbed(vel: Scalar) -> HandSample {
        HandSample { vel, grabbed: true }
    }
    fn idle_hand() -> HandSample {
        HandSample { vel: 0.0, grabbed: false }
    }
    fn ctrl() -> LocomotionCtrl {
        LocomotionCtrl::new(LocomotionParams { speed_scale: 1.0, ..Default::default() })
    }
    fn input(left: HandSample, right: HandSample) -> LocomotionInput {
        LocomotionInput { left, right, current_vel: Vec3::ZERO, forward_ws: FWD }
    }

    #[test] fn equal_hands_drive_straight() {
        let out = ctrl().step(input(grabbed(0.5), grabbed(0.5)));
        assert_eq!(out.yaw_torque, 0.0);
        assert_eq!(out.com, ComAnchor::Center);
        // clamped from an unclamped 0.5, purely along forward
        assert!((out.velocity_delta.z - 0.1).abs() < 1e-6);
        assert!(out.velocity_delta.x.abs() < 1e-6 && out.velocity_delta.y.abs() < 1e-6);
    }

    #[test] fn reverse_drive_clamps_with_sign() {
        let out = ctrl().step(input(grabbed(-0.5), grabbed(-0.5)));
        assert!((out.velocity_delta.z + 0.1).abs() < 1e-6);
        assert_eq!(out.yaw_torque, 0.0);
    }

    #[test] fn ungrabbed_is_fully_neutral() {
        let out = ctrl().step(input(idle_hand(), idle_hand()));
        assert_eq!(out.velocity_delta, Vec3::ZERO);
        assert_eq!(out.yaw_torque, 0.0);
        assert_eq!(out.drag, 0.0);
        assert_eq!(out.com, ComAnchor::Center);
    }

    #[test] fn idle_right_hand_pivots_on_right_wheel() {
        let out = ctrl().step(input(grabbed(0.3), grabbed(0.0)));
        assert_eq!(out.velocity_delta, Vec3::ZERO);
        assert!((out.yaw_torque - 0.3 * 0.4).abs() < 1e-6);
        assert_eq!(out.com, ComAnchor::RightAxle);
        // the still grabbed rim also brakes
        assert_eq!(out.drag, 2.0);
    }

    #[test] fn opposite_pushes_spin_about_center() {
        let out = ctrl().step(input(grabbed(0.4), grabbed(-0.3)));
        assert_eq!(out.com, ComAnchor::Center);
        assert!((out.yaw_torque - 0.7 * 0.4).abs() < 1e-6);
        assert_eq!(out.drag, 0.0);
    }

    #[test] fn backward_pull_plus_idle_hand_coasts() {
        // Signed thresholds: right pulls backward past the floor, left idles.
        // Neither the drive nor the turn branch fires.
        let out = ctrl().step(input(grabbed(0.0), grabbed(-0.5)));
        assert_eq!(out.velocity_delta, Vec3::ZERO);
        assert_eq!(out.yaw_torque, 0.0);
        assert_eq!(out.com, ComAnchor::Center);
        assert_eq!(out.drag, 2.0); // the idle left rim still brakes
    }

    #[test] fn no_input_brake_through_drive() {
        // Already faster than the target: the drive branch must stay quiet and
        // leave slowing down to drag.
        let c = ctrl();
        let mut i = input(grabbed(0.2), grabbed(0.2));
        i.current_vel = vec3(0.0, 0.0, 0.5);
        let out = c.step(i);
        assert_eq!(out.velocity_delta, Vec3::ZERO);
    }

    #[test] fn single_right_hand_splits_drive_and_turn() {
        let out = ctrl().step(input(idle_hand(), grabbed(0.6)));
        // 2/3 of 0.6 = 0.4 forward target, clamped to the 0.1 step
        assert!((out.velocity_delta.z - 0.1).abs() < 1e-6);
        // turns away from the pushing side
        assert!((out.yaw_torque + 0.6 * (2.0 / 3.0) * 0.4).abs() < 1e-6);
        assert_eq!(out.com, ComAnchor::LeftAxle);
    }

    #[test] fn single_left_hand_mirrors() {
        let out = ctrl().step(input(grabbed(0.6), idle_hand()));
        assert!((out.yaw_torque - 0.6 * (2.0 / 3.0) * 0.4).abs() < 1e-6);
        assert_eq!(out.com, ComAnchor::RightAxle);
    }

    #[test] fn legacy_split_drives_one_third() {
        let c = LocomotionCtrl::new(LocomotionParams {
            speed_scale: 1.0,
            max_velocity_step: 10.0, // no clamp; observe the raw split
            ..LocomotionParams::legacy()
        });
        let out = c.step(input(idle_hand(), grabbed(0.6)));
        assert!((out.velocity_delta.z - 0.2).abs() < 1e-6);
        assert!((out.yaw_torque + 0.6 * (2.0 / 3.0) * 0.4).abs() < 1e-6);
    }

    #[test] fn brake_drag_without_drive_input() {
        // Both rims gripped and still: full brake, no motion output.
        let out = ctrl().step(input(grabbed(0.0), grabbed(0.0)));
        assert_eq!(out.drag, 2.0);
        assert_eq!(out.velocity_delta, Vec3::ZERO);
        assert_eq!(out.yaw_torque, 0.0);
    }
}
