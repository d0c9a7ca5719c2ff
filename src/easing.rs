/// Timing curves, equivalent to their CSS `transition-timing-function` namesakes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// `cubic-bezier(0.4, 0, 0.2, 1)`, used by ring transitions.
    Standard,
    /// `ease-out`, i.e. `cubic-bezier(0, 0, 0.58, 1)`, used by the flash overlay.
    EaseOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Standard => CubicBezier::new(0.4, 0.0, 0.2, 1.0).solve(t),
            Easing::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0).solve(t),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    const EPSILON: f32 = 1e-5;

    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn component(t: f32, p1: f32, p2: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn slope_x(&self, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * self.x1 + 6.0 * u * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Finds the curve parameter whose x equals `x`, then returns its y.
    fn solve(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        // Newton first, it converges in a handful of steps for well-behaved curves
        let mut t = x;
        for _ in 0..8 {
            let err = Self::component(t, self.x1, self.x2) - x;
            if err.abs() < Self::EPSILON {
                return Self::component(t, self.y1, self.y2);
            }
            let slope = self.slope_x(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        // Bisection fallback
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        while hi - lo > Self::EPSILON {
            let current = Self::component(t, self.x1, self.x2);
            if (current - x).abs() < Self::EPSILON {
                break;
            }
            if current < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        Self::component(t, self.y1, self.y2)
    }
}
