use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, anyhow};
use clap::Parser;
use raylib::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;

mod animator;
mod choreography;
mod constants;
mod easing;
mod ffmpeg;
mod flash;
mod layout;
mod render;
mod ring;
mod state;
mod transition;

use crate::animator::Animator;
use crate::choreography::Timing;
use crate::constants::*;
use crate::ffmpeg::Recorder;
use crate::layout::Viewport;
use crate::ring::{Rgb, parse_hex_color};

/// Concentric squares that rotate into view, flash, and rotate back out, forever.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Initial window width (also the video width when recording)
    #[arg(long, default_value_t = WINDOW_WIDTH, value_parser = clap::value_parser!(i32).range(64..=8192))]
    width: i32,

    /// Initial window height (also the video height when recording)
    #[arg(long, default_value_t = WINDOW_HEIGHT, value_parser = clap::value_parser!(i32).range(64..=8192))]
    height: i32,

    #[arg(long, default_value_t = FPS, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Encode every frame into this video file with ffmpeg
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Stop after this many completed cycles
    #[arg(long, value_name = "N")]
    cycles: Option<u32>,

    /// Duration of one ring transition, also how long enter and exit wait for the last ring
    #[arg(long, default_value_t = TRANSITION_MS)]
    transition_ms: u64,

    /// Pause between the end of one cycle and the start of the next
    #[arg(long, default_value_t = IDLE_MS)]
    idle_ms: u64,

    /// Background color as #rgb or #rrggbb
    #[arg(long, default_value = DEFAULT_BACKGROUND, value_parser = parse_hex_color)]
    background: Rgb,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_framebuffer(rl: &mut RaylibHandle, thread: &RaylibThread, width: i32, height: i32) -> Result<RenderTexture2D> {
    rl.load_render_texture(thread, width as u32, height as u32)
        .map_err(|e| anyhow!("failed to create {width}x{height} render texture: {e}"))
}

fn viewport_of(framebuffer: &RenderTexture2D) -> Viewport {
    Viewport::new(framebuffer.width() as f32, framebuffer.height() as f32)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let timing = Timing {
        transition: Duration::from_millis(args.transition_ms),
        idle: Duration::from_millis(args.idle_ms),
        ..Timing::default()
    };

    let (mut rl, thread) = raylib::init()
        .size(args.width, args.height)
        .title("Squares")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(args.fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut framebuffer = load_framebuffer(&mut rl, &thread, args.width, args.height)?;

    // Start ffmpeg and connect its stdin so rendered frames can be sent
    let mut recorder = match &args.record {
        Some(path) => Some(Recorder::spawn(args.width, args.height, args.fps, path)?),
        None => None,
    };

    let mut animator = Animator::new(timing);
    animator.initialize(viewport_of(&framebuffer));
    info!(
        period_ms = animator.plan().period().as_millis() as u64,
        recording = recorder.is_some(),
        "starting animation"
    );
    animator.run_cycle();

    let frame_time = 1.0 / args.fps as f32;

    // --- Main Loop ---
    while !rl.window_should_close() {
        // The video size is fixed, only follow the window when rendering live
        if recorder.is_none() && rl.is_window_resized() {
            let (width, height) = (rl.get_screen_width(), rl.get_screen_height());
            if width > 0 && height > 0 {
                framebuffer = load_framebuffer(&mut rl, &thread, width, height)?;
                animator.resize(viewport_of(&framebuffer));
            } else {
                warn!(width, height, "ignoring degenerate window size");
            }
        }

        // Fixed steps keep recorded videos frame-exact
        let dt = if recorder.is_some() { frame_time } else { rl.get_frame_time() };
        animator.update(dt);

        {
            let mut d = rl.begin_texture_mode(&thread, &mut framebuffer);
            render::draw_scene(&mut d, &animator, args.background);
        }

        {
            let mut d = rl.begin_drawing(&thread);
            let sw = d.get_screen_width() as f32;
            let sh = d.get_screen_height() as f32;

            // Render textures are stored upside down, flip while presenting
            d.draw_texture_pro(
                &framebuffer,
                Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
                Rectangle::new(0.0, 0.0, sw, sh),
                Vector2::new(0.0, 0.0),
                0.0,
                Color::WHITE,
            );
        }

        if let Some(recorder) = recorder.as_mut() {
            let image = framebuffer
                .load_image()
                .map_err(|e| anyhow!("failed to read back framebuffer: {e}"))?;
            recorder.write_frame(&image)?;
        }

        if args.cycles.is_some_and(|limit| animator.cycles_completed() >= limit) {
            info!(cycles = animator.cycles_completed(), "cycle limit reached");
            break;
        }
    }

    animator.teardown();
    // Close ffmpeg's stdin and wait for the video to be finalized
    drop(recorder);
    Ok(())
}
