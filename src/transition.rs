use std::time::Duration;
use crate::easing::Easing;

/// One animatable scalar: where it came from, where it is going and when.
///
/// Values are sampled against the animator clock rather than accumulated per
/// frame, so a transition started late by a coarse frame step still lands on
/// the same curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    started: Duration,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    pub fn fixed(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            started: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Starts moving from the value sampled at `now` towards `to`.
    pub fn retarget(&mut self, to: f32, now: Duration, duration: Duration, easing: Easing) {
        self.from = self.sample(now);
        self.to = to;
        self.started = now;
        self.duration = duration;
        self.easing = easing;
    }

    /// Jumps to `value` without interpolating.
    pub fn set(&mut self, value: f32) {
        *self = Self::fixed(value);
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn sample(&self, now: Duration) -> f32 {
        if self.duration.is_zero() || now >= self.started + self.duration {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.started).as_secs_f32();
        let t = elapsed / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}
