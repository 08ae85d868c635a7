//! Scripted push-rim session on a terrain ramp.
//!
//! Drives a full `ChairInstance` against a heightfield host with a cyclic
//! push/recovery hand script, integrates the resulting velocity-change
//! outputs with a simple explicit step, and logs the trajectory.

use anyhow::Result;
use clap::Parser;
use glam::{UVec2, Vec2};
use std::path::PathBuf;
use tracing::{debug, info};

use rollphys_align::Ray;
use rollphys_chair::{ChairHost, ChairInstance, ChairParams, Side};
use rollphys_core::{vec3, Isometry, Quat, Scalar, StepCtx, Vec3, Velocity};
use rollphys_io::read_rig_json;
use rollphys_rig::ChairPoints;
use rollphys_terrain::HeightField;

#[derive(Parser, Debug)]
#[command(name = "chair_sim", version, about = "Run a scripted wheelchair session on a terrain ramp")]
struct Opts {
    /// Chair rig JSON (stock tuning when omitted)
    #[arg(long)]
    rig: Option<PathBuf>,

    /// Simulation ticks
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Fixed timestep (seconds)
    #[arg(long, default_value_t = 0.02)]
    dt: f32,

    /// Ramp grade along +z (rise per metre)
    #[arg(long, default_value_t = 0.05)]
    grade: f32,

    /// Push with the right hand only
    #[arg(long)]
    one_hand: bool,
}

#[derive(Copy, Clone, Default)]
struct HandState {
    vel: Vec3,
    trigger: Scalar,
}

struct SimHost {
    terrain: HeightField,
    pose: Isometry,
    vel: Velocity,
    com_local: Vec3,
    drag: Scalar,
    audio: bool,
    wheel_angles: (Scalar, Scalar),
    left: HandState,
    right: HandState,
}

impl SimHost {
    fn new(terrain: HeightField, start: Vec3) -> Self {
        Self {
            terrain,
            pose: Isometry { pos: start, rot: Quat::IDENTITY },
            vel: Velocity::default(),
            com_local: Vec3::ZERO,
            drag: 0.0,
            audio: false,
            wheel_angles: (0.0, 0.0),
            left: HandState::default(),
            right: HandState::default(),
        }
    }

    /// Advance the host body one step: drag, explicit Euler, yaw, and a
    /// support constraint that seats the rear contacts on the surface.
    /// Attitude stays the aligner's job.
    fn integrate(&mut self, dt: Scalar, points: &ChairPoints) {
        self.vel.lin *= 1.0 / (1.0 + self.drag * dt);
        self.pose.pos += self.vel.lin * dt;
        if self.vel.ang.y != 0.0 {
            let yaw = Quat::from_rotation_y(self.vel.ang.y * dt);
            self.pose.rot = (yaw * self.pose.rot).normalize();
        }
        let mid = (points.rear_left_bottom + points.rear_right_bottom) * 0.5;
        let err = self.terrain.clearance(self.pose.transform_point(mid));
        self.pose.pos.y -= err;
    }

    fn heading_yaw(&self) -> Scalar {
        let f = self.pose.rot * Vec3::Z;
        f.x.atan2(f.z)
    }
}

impl ChairHost for SimHost {
    fn hand_velocity(&self, side: Side) -> Vec3 {
        match side {
            Side::Left => self.left.vel,
            Side::Right => self.right.vel,
        }
    }
    fn trigger_value(&self, side: Side) -> Scalar {
        match side {
            Side::Left => self.left.trigger,
            Side::Right => self.right.trigger,
        }
    }
    fn chair_pose(&self) -> Isometry {
        self.pose
    }
    fn chair_velocity(&self) -> Velocity {
        self.vel
    }
    fn raycast(&mut self, ray: Ray) -> Option<Scalar> {
        self.terrain.raycast(ray.origin, ray.dir, ray.max_dist)
    }
    fn apply_velocity_change(&mut self, delta: Vec3) {
        self.vel.lin += delta;
    }
    fn apply_yaw_torque(&mut self, torque: Scalar) {
        self.vel.ang.y += torque;
    }
    fn set_center_of_mass(&mut self, local_point: Vec3) {
        self.com_local = local_point;
    }
    fn set_linear_drag(&mut self, drag: Scalar) {
        self.drag = drag;
    }
    fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, angle: Scalar) {
        self.pose.rotate_around(pivot, axis, angle);
    }
    fn apply_wheel_spin(&mut self, left_rad: Scalar, right_rad: Scalar) {
        self.wheel_angles.0 += left_rad;
        self.wheel_angles.1 += right_rad;
    }
    fn set_rolling_audio(&mut self, playing: bool) {
        self.audio = playing;
    }
}

/// Cyclic push stroke: grip and push forward for the first part of each
/// cycle, release and swing back for the rest.
fn script_hands(host: &mut SimHost, t: Scalar, one_hand: bool) {
    const PERIOD: Scalar = 1.2;
    const PUSH: Scalar = 0.7;
    let phase = t % PERIOD;
    let pushing = phase < PUSH;
    let hand = if pushing {
        HandState {
            vel: vec3(0.0, 0.0, 0.9 * (std::f32::consts::PI * phase / PUSH).sin()),
            trigger: 0.9,
        }
    } else {
        HandState { vel: vec3(0.0, 0.0, -0.2), trigger: 0.1 }
    };
    host.right = hand;
    host.left = if one_hand { HandState::default() } else { hand };
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
    let opt = Opts::parse();

    let params = match &opt.rig {
        Some(path) => read_rig_json(path)?.build()?,
        None => ChairParams::default(),
    };

    let grade = opt.grade;
    let terrain = HeightField::from_fn(UVec2::new(64, 64), Vec2::new(0.25, 0.25), |_, z| z * grade);
    let start = vec3(4.0, terrain.sample_height(4.0, 2.0), 2.0);

    let mut host = SimHost::new(terrain, start);
    let mut chair = ChairInstance::new(params);

    for tick in 0..opt.ticks {
        script_hands(&mut host, tick as Scalar * opt.dt, opt.one_hand);
        let report = chair.step_with_host(StepCtx { dt: opt.dt, tick }, &mut host);
        host.integrate(opt.dt, &chair.p.points);

        debug!(
            tick,
            drag = host.drag,
            torque = report.loco.yaw_torque,
            com_y = host.com_local.y,
            "step"
        );
        if tick % 50 == 0 {
            info!(
                tick,
                x = host.pose.pos.x,
                y = host.pose.pos.y,
                z = host.pose.pos.z,
                speed = host.vel.lin.length(),
                rolling = host.audio,
                "progress"
            );
        }
    }

    println!(
        "final position ({:.2}, {:.2}, {:.2})  yaw {:.3} rad  wheel angles ({:.1}, {:.1}) rad",
        host.pose.pos.x,
        host.pose.pos.y,
        host.pose.pos.z,
        host.heading_yaw(),
        host.wheel_angles.0,
        host.wheel_angles.1,
    );
    Ok(())
}
