mod grip;
mod locomotion;

pub use grip::{GripParams, GripCtrl, grip_update};
pub use locomotion::{
    ComAnchor, HandSample, LocomotionParams, LocomotionInput, LocomotionOutput, LocomotionCtrl,
};
