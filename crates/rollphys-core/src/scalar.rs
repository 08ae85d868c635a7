/// Simulation scalar. Single precision everywhere; the host engine owns
/// whatever precision its integrator wants.
pub type Scalar = f32;
