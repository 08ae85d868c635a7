/// Per-tick context passed into controller and alignment evaluations.
#[derive(Copy, Clone, Debug)]
pub struct StepCtx {
    pub dt: f32,
    pub tick: u64,
}
