#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CyclePhase {
    Idle,     // Between cycles, or before the first one
    Entering, // Rings staggering into view
    Flashing, // Overlay blinking, rings shimmering
    Exiting,  // Rings staggering out of view
}
