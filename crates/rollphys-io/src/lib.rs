use anyhow::{anyhow, Context, Result};
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::path::Path;

use rollphys_align::AlignParams;
use rollphys_chair::ChairParams;
use rollphys_controllers::{GripParams, LocomotionParams};
use rollphys_core::vec3;
use rollphys_rig::ChairPoints;

pub const RIG_VERSION: u32 = 1;

/* ─────────────────────────  Chair rig schema ───────────────────────── */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsDef {
    pub rear_left_center: [f32; 3],
    pub rear_left_bottom: [f32; 3],
    pub rear_right_center: [f32; 3],
    pub rear_right_bottom: [f32; 3],
    pub front_left_bottom: [f32; 3],
    pub front_right_bottom: [f32; 3],
    pub center: [f32; 3],
    pub left_axle: [f32; 3],
    pub right_axle: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GripDef {
    pub engage: f32,
    pub release: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocomotionDef {
    pub speed_scale: f32,
    pub turn_scale: f32,
    pub max_velocity_step: f32,
    pub noise_floor: f32,
    pub brake_drag: f32,
    pub single_hand_forward: f32,
    pub single_hand_turn: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignDef {
    pub probe_range: f32,
    pub front_clearance: f32,
    pub min_span: f32,
    pub enabled: bool,
}

/// On-disk chair description. `version` bumps if the layout changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairRigDef {
    pub version: u32,
    pub name: String,
    pub points: PointsDef,
    pub grip: GripDef,
    pub locomotion: LocomotionDef,
    pub align: AlignDef,
}

impl ChairRigDef {
    /// Scaffold a rig with the stock tuning.
    pub fn stock(name: &str) -> Self {
        let p = ChairParams::default();
        Self {
            version: RIG_VERSION,
            name: name.to_string(),
            points: PointsDef {
                rear_left_center: p.points.rear_left_center.to_array(),
                rear_left_bottom: p.points.rear_left_bottom.to_array(),
                rear_right_center: p.points.rear_right_center.to_array(),
                rear_right_bottom: p.points.rear_right_bottom.to_array(),
                front_left_bottom: p.points.front_left_bottom.to_array(),
                front_right_bottom: p.points.front_right_bottom.to_array(),
                center: p.points.center.to_array(),
                left_axle: p.points.left_axle.to_array(),
                right_axle: p.points.right_axle.to_array(),
            },
            grip: GripDef { engage: p.grip.engage, release: p.grip.release },
            locomotion: LocomotionDef {
                speed_scale: p.loco.speed_scale,
                turn_scale: p.loco.turn_scale,
                max_velocity_step: p.loco.max_velocity_step,
                noise_floor: p.loco.noise_floor,
                brake_drag: p.loco.brake_drag,
                single_hand_forward: p.loco.single_hand_forward,
                single_hand_turn: p.loco.single_hand_turn,
            },
            align: AlignDef {
                probe_range: p.align.probe_range,
                front_clearance: p.align.front_clearance,
                min_span: p.align.min_span,
                enabled: p.align_enabled,
            },
        }
    }

    /// Validate and build runnable chair parameters.
    pub fn build(&self) -> Result<ChairParams> {
        if self.version != RIG_VERSION {
            return Err(anyhow!("rig version {} unsupported (want {})", self.version, RIG_VERSION));
        }
        if self.grip.engage <= self.grip.release {
            return Err(anyhow!(
                "grip engage ({}) must sit above release ({})",
                self.grip.engage, self.grip.release
            ));
        }

        let v = |a: [f32; 3]| vec3(a[0], a[1], a[2]);
        let points = ChairPoints {
            rear_left_center: v(self.points.rear_left_center),
            rear_left_bottom: v(self.points.rear_left_bottom),
            rear_right_center: v(self.points.rear_right_center),
            rear_right_bottom: v(self.points.rear_right_bottom),
            front_left_bottom: v(self.points.front_left_bottom),
            front_right_bottom: v(self.points.front_right_bottom),
            center: v(self.points.center),
            left_axle: v(self.points.left_axle),
            right_axle: v(self.points.right_axle),
        };

        let min_span = self.align.min_span;
        if points.wheel_radius() <= min_span {
            return Err(anyhow!("degenerate rig: zero wheel radius"));
        }
        if points.wheel_track() <= min_span {
            return Err(anyhow!("degenerate rig: zero wheel track"));
        }
        if points.wheelbase().abs() <= min_span {
            return Err(anyhow!("degenerate rig: zero wheelbase"));
        }

        Ok(ChairParams {
            points,
            grip: GripParams { engage: self.grip.engage, release: self.grip.release },
            loco: LocomotionParams {
                speed_scale: self.locomotion.speed_scale,
                turn_scale: self.locomotion.turn_scale,
                max_velocity_step: self.locomotion.max_velocity_step,
                noise_floor: self.locomotion.noise_floor,
                brake_drag: self.locomotion.brake_drag,
                single_hand_forward: self.locomotion.single_hand_forward,
                single_hand_turn: self.locomotion.single_hand_turn,
            },
            align: AlignParams {
                probe_range: self.align.probe_range,
                front_clearance: self.align.front_clearance,
                min_span: self.align.min_span,
            },
            align_enabled: self.align.enabled,
        })
    }
}

/* ─────────────────────────  JSON + hashing ───────────────────────── */

pub fn read_rig_json(path: &Path) -> Result<ChairRigDef> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rig {}", path.display()))?;
    let rig = serde_json::from_str(&s)
        .with_context(|| format!("failed to parse rig {}", path.display()))?;
    Ok(rig)
}

pub fn write_rig_json(rig: &ChairRigDef, path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(rig)?
    } else {
        serde_json::to_string(rig)?
    };
    std::fs::write(path, json)?;
    Ok(())
}

/// Stable blake3 hash of a rig's numeric content. Field order is fixed; two
/// rigs hash equal iff every point and tuning value matches bit-for-bit.
pub fn rig_hash(rig: &ChairRigDef) -> [u8; 32] {
    let mut h = Hasher::new();
    h.update(b"CHAIRRIGv1\0");
    h.update(&rig.version.to_le_bytes());
    let n = rig.name.as_bytes();
    h.update(&(n.len() as u64).to_le_bytes());
    h.update(n);

    let mut p3 = |a: &[f32; 3]| {
        for f in a {
            h.update(&f.to_le_bytes());
        }
    };
    p3(&rig.points.rear_left_center);
    p3(&rig.points.rear_left_bottom);
    p3(&rig.points.rear_right_center);
    p3(&rig.points.rear_right_bottom);
    p3(&rig.points.front_left_bottom);
    p3(&rig.points.front_right_bottom);
    p3(&rig.points.center);
    p3(&rig.points.left_axle);
    p3(&rig.points.right_axle);

    for f in [
        rig.grip.engage,
        rig.grip.release,
        rig.locomotion.speed_scale,
        rig.locomotion.turn_scale,
        rig.locomotion.max_velocity_step,
        rig.locomotion.noise_floor,
        rig.locomotion.brake_drag,
        rig.locomotion.single_hand_forward,
        rig.locomotion.single_hand_turn,
        rig.align.probe_range,
        rig.align.front_clearance,
        rig.align.min_span,
    ] {
        h.update(&f.to_le_bytes());
    }
    h.update(&[rig.align.enabled as u8]);

    *h.finalize().as_bytes()
}

/// Hex-encode a 32-byte hash.
pub fn hex32(x: [u8; 32]) -> String {
    let mut s = String::with_capacity(64);
    for b in &x {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
    }
    s
}
