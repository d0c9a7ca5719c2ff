use raylib::prelude::*;
use crate::animator::Animator;
use crate::ring::{RingHandle, Rgb};

// Below this the square is a sub-pixel speck, skip it
const MIN_VISIBLE_SIDE: f32 = 0.5;

fn color(rgb: Rgb, opacity: f32) -> Color {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::new(rgb.0, rgb.1, rgb.2, alpha)
}

/// Draws the background, every ring (largest first) and the flash tint on top.
pub fn draw_scene<D: RaylibDraw>(d: &mut D, animator: &Animator, background: Rgb) {
    d.clear_background(color(background, 1.0));

    let Some(stage) = animator.stage() else {
        return;
    };
    let (cx, cy) = stage.viewport.center();

    for ring in animator.rings() {
        draw_ring(d, ring, Vector2::new(cx, cy));
    }

    if let Some(overlay) = animator.overlay() {
        d.draw_rectangle(
            0,
            0,
            stage.viewport.width.ceil() as i32,
            stage.viewport.height.ceil() as i32,
            color(Rgb(255, 255, 255), overlay.alpha()),
        );
    }
}

fn draw_ring<D: RaylibDraw>(d: &mut D, ring: &RingHandle, center: Vector2) {
    let side = ring.size() * ring.scale();
    if side < MIN_VISIBLE_SIDE || ring.opacity() <= 0.0 {
        return;
    }

    // A 4-sided polygon with rotation 0 is a diamond, offset by 45 degrees to start axis-aligned
    let radius = side / std::f32::consts::SQRT_2;
    let thickness = (ring.spec.border_width * ring.scale()).max(1.0);
    d.draw_poly_lines_ex(
        center,
        4,
        radius,
        ring.rotation() + 45.0,
        thickness,
        color(ring.spec.border_color, ring.opacity()),
    );
}
