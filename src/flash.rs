use std::time::Duration;
use crate::constants::{FLASH_PEAK_OPACITY, FLASH_TINT_ALPHA};
use crate::easing::Easing;
use crate::transition::Transition;

/// Full-viewport white tint shown over the rings during the flash phase.
#[derive(Debug, Clone)]
pub struct FlashOverlay {
    opacity: Transition,
    fade: Duration,
    current: f32,
}

impl FlashOverlay {
    pub fn new(fade: Duration) -> Self {
        Self {
            opacity: Transition::fixed(0.0),
            fade,
            current: 0.0,
        }
    }

    /// Applies blink number `index`: even blinks light the overlay, odd ones darken it.
    pub fn toggle(&mut self, index: u32, now: Duration) {
        let target = if index % 2 == 0 { FLASH_PEAK_OPACITY } else { 0.0 };
        self.opacity.retarget(target, now, self.fade, Easing::EaseOut);
    }

    pub fn fade_out(&mut self, now: Duration) {
        self.opacity.retarget(0.0, now, self.fade, Easing::EaseOut);
    }

    pub fn update(&mut self, now: Duration) {
        self.current = self.opacity.sample(now);
    }

    pub fn opacity(&self) -> f32 {
        self.current
    }

    pub fn target_opacity(&self) -> f32 {
        self.opacity.target()
    }

    /// Alpha the tint is drawn with, capped by the tint's own alpha.
    pub fn alpha(&self) -> f32 {
        FLASH_TINT_ALPHA * self.current
    }
}
