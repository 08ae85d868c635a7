pub mod scalar;
pub mod types;
pub mod step_ctx;

pub use scalar::Scalar;
pub use types::{Vec3, Isometry, Velocity, vec3, iso, quat_identity};
pub use step_ctx::StepCtx;
pub use glam::Quat;
