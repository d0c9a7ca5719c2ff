use std::time::Duration;
use crate::constants::HIDDEN_ROTATION;
use crate::easing::Easing;
use crate::layout::{Viewport, ring_size};
use crate::transition::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_color(input: &str) -> Result<Rgb, String> {
    let hex = input.trim().trim_start_matches('#');
    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| format!("invalid hex color '{input}'"))
    };
    if !hex.is_ascii() {
        return Err(format!("invalid hex color '{input}'"));
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, i) in rgb.iter_mut().zip(0..3) {
                let value = channel(&hex[i..i + 1])?;
                *slot = value * 16 + value;
            }
            Ok(Rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Ok(Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => Err(format!("expected #rgb or #rrggbb, got '{input}'")),
    }
}

/// Static description of one ring, including its place in the choreography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    pub id: &'static str,
    pub size: f32,
    pub border_width: f32,
    pub border_color: Rgb,
    /// Offset of this ring's transition from the start of the enter and exit phases.
    pub delay: Duration,
    /// Rotation the ring settles at once it has entered.
    pub settled_rotation: f32,
}

pub const RING_COUNT: usize = 7;

pub const RING_SPECS: [RingSpec; RING_COUNT] = [
    RingSpec { id: "square-1", size: 900.0, border_width: 5.0, border_color: Rgb(0x11, 0x11, 0x11), delay: Duration::from_millis(0), settled_rotation: 45.0 },
    RingSpec { id: "square-2", size: 750.0, border_width: 4.0, border_color: Rgb(0x1a, 0x1a, 0x1a), delay: Duration::from_millis(150), settled_rotation: 40.0 },
    RingSpec { id: "square-3", size: 600.0, border_width: 4.0, border_color: Rgb(0x22, 0x22, 0x22), delay: Duration::from_millis(300), settled_rotation: 33.0 },
    RingSpec { id: "square-4", size: 480.0, border_width: 3.0, border_color: Rgb(0x44, 0x44, 0x44), delay: Duration::from_millis(450), settled_rotation: 27.0 },
    RingSpec { id: "square-5", size: 380.0, border_width: 3.0, border_color: Rgb(0x66, 0x66, 0x66), delay: Duration::from_millis(600), settled_rotation: 20.0 },
    RingSpec { id: "square-6", size: 300.0, border_width: 2.0, border_color: Rgb(0x88, 0x88, 0x88), delay: Duration::from_millis(750), settled_rotation: 13.0 },
    RingSpec { id: "square-7", size: 240.0, border_width: 2.0, border_color: Rgb(0xaa, 0xaa, 0xaa), delay: Duration::from_millis(900), settled_rotation: 0.0 },
];

/// Live visual state of one ring.
#[derive(Debug, Clone)]
pub struct RingHandle {
    pub spec: RingSpec,

    size: f32,

    opacity: Transition,
    rotation: Transition,
    scale: Transition,

    // Values sampled at the last update
    current_opacity: f32,
    current_rotation: f32,
    current_scale: f32,
}

impl RingHandle {
    pub fn new(spec: RingSpec, viewport: Viewport) -> Self {
        let mut ring = Self {
            spec,
            size: spec.size,
            opacity: Transition::fixed(0.0),
            rotation: Transition::fixed(HIDDEN_ROTATION),
            scale: Transition::fixed(0.0),
            current_opacity: 0.0,
            current_rotation: HIDDEN_ROTATION,
            current_scale: 0.0,
        };
        ring.fit(viewport);
        ring
    }

    pub fn fit(&mut self, viewport: Viewport) {
        self.size = ring_size(self.spec.size, viewport);
    }

    /// Snaps to the hidden pose: invisible, rotated 45 degrees, collapsed.
    pub fn reset(&mut self) {
        self.opacity.set(0.0);
        self.rotation.set(HIDDEN_ROTATION);
        self.scale.set(0.0);
        self.current_opacity = 0.0;
        self.current_rotation = HIDDEN_ROTATION;
        self.current_scale = 0.0;
    }

    pub fn animate_in(&mut self, now: Duration, duration: Duration) {
        self.opacity.retarget(1.0, now, duration, Easing::Standard);
        self.rotation.retarget(self.spec.settled_rotation, now, duration, Easing::Standard);
        self.scale.retarget(1.0, now, duration, Easing::Standard);
    }

    pub fn animate_out(&mut self, now: Duration, duration: Duration) {
        self.opacity.retarget(0.0, now, duration, Easing::Standard);
        self.rotation.retarget(HIDDEN_ROTATION, now, duration, Easing::Standard);
        self.scale.retarget(0.0, now, duration, Easing::Standard);
    }

    pub fn fade_to(&mut self, opacity: f32, now: Duration, duration: Duration) {
        self.opacity.retarget(opacity, now, duration, Easing::Standard);
    }

    pub fn update(&mut self, now: Duration) {
        self.current_opacity = self.opacity.sample(now);
        self.current_rotation = self.rotation.sample(now);
        self.current_scale = self.scale.sample(now);
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn opacity(&self) -> f32 {
        self.current_opacity
    }

    pub fn rotation(&self) -> f32 {
        self.current_rotation
    }

    pub fn scale(&self) -> f32 {
        self.current_scale
    }

    pub fn target_opacity(&self) -> f32 {
        self.opacity.target()
    }
}
