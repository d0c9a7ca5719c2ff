/// Size of the surface the rings are drawn on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn max_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

// Breakpoints on the smaller viewport side, paired with the scale applied at or below them
const BREAKPOINTS: [(f32, f32); 3] = [(480.0, 0.3), (768.0, 0.5), (1024.0, 0.7)];
const LARGE_SCALE: f32 = 0.9;
const MAX_FILL: f32 = 0.9;

pub fn scale_factor(max_dimension: f32) -> f32 {
    BREAKPOINTS
        .iter()
        .find(|(limit, _)| max_dimension <= *limit)
        .map_or(LARGE_SCALE, |(_, scale)| *scale)
}

/// Rendered size of a ring with `base_size`, never wider than 90% of the smaller viewport side.
pub fn ring_size(base_size: f32, viewport: Viewport) -> f32 {
    let max_dimension = viewport.max_dimension();
    (base_size * scale_factor(max_dimension)).min(max_dimension * MAX_FILL)
}
