use rollphys_core::Scalar;

#[derive(Copy, Clone, Debug)]
pub struct GripParams {
    pub engage: Scalar,   // trigger level that closes the hand on the rim
    pub release: Scalar,  // trigger level that lets go again
}
impl Default for GripParams {
    fn default() -> Self { Self { engage: 0.55, release: 0.35 } }
}

/// Hysteresis over the continuous hand-trigger signal. The band between
/// `release` and `engage` holds the previous state so a trigger hovering at
/// one threshold can't flicker the grab on and off.
#[inline]
pub fn grip_update(trigger: Scalar, grabbed: bool, p: GripParams) -> bool {
    if !grabbed && trigger >= p.engage {
        true
    } else if grabbed && trigger <= p.release {
        false
    } else {
        grabbed
    }
}

/// Stateful wrapper, one per hand side.
#[derive(Copy, Clone, Debug)]
pub struct GripCtrl {
    pub params: GripParams,
    grabbed: bool,
}

impl GripCtrl {
    pub fn new(params: GripParams) -> Self {
        Self { params, grabbed: false }
    }

    pub fn update(&mut self, trigger: Scalar) -> bool {
        self.grabbed = grip_update(trigger, self.grabbed, self.params);
        self.grabbed
    }

    #[inline] pub fn grabbed(&self) -> bool { self.grabbed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn engage_then_hold_then_release() {
        let p = GripParams::default();
        let mut g = GripCtrl::new(p);
        assert!(!g.update(0.5));        // below engage
        assert!(g.update(0.6));         // engaged
        assert!(g.update(0.45));        // inside the band: held
        assert!(!g.update(0.3));        // released
        assert!(!g.update(0.45));       // band again, stays released
    }

    #[test] fn fixed_input_is_idempotent() {
        let p = GripParams::default();
        for &t in &[0.0, 0.35, 0.4, 0.55, 1.0] {
            for &state in &[false, true] {
                let once = grip_update(t, state, p);
                let twice = grip_update(t, once, p);
                assert_eq!(once, twice, "oscillation at trigger={t}");
            }
        }
    }
}
