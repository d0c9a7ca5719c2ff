pub const WINDOW_WIDTH: i32 = 960;              // Initial window width
pub const WINDOW_HEIGHT: i32 = 540;             // Initial window height
pub const FPS: u32 = 60;                        // Frames per second

pub const TRANSITION_MS: u64 = 500;             // Ring transition duration, also the enter/exit budget
pub const FLASH_INTERVAL_MS: u64 = 120;         // Time between flash toggles
pub const FLASH_TOGGLES: u32 = 4;               // Two full on/off blinks
pub const FLASH_FADE_MS: u64 = 150;             // Overlay opacity transition
pub const FLASH_SETTLE_MS: u64 = 300;           // Wait after the last toggle before the overlay is removed
pub const IDLE_MS: u64 = 5000;                  // Pause between cycles

pub const FLASH_TINT_ALPHA: f32 = 0.3;          // Alpha of the overlay at full opacity
pub const FLASH_PEAK_OPACITY: f32 = 0.5;        // Overlay opacity on "on" toggles
pub const SHIMMER_OPACITY: f32 = 0.85;          // Ring opacity on "dim" toggles

pub const HIDDEN_ROTATION: f32 = 45.0;          // Rotation of a ring before enter and after exit (degrees)

pub const DEFAULT_BACKGROUND: &str = "#d9d9d9";
