use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use anyhow::{Context, Result};
use raylib::prelude::*;
use tracing::{error, info};

/// Pipes raw RGBA frames into an `ffmpeg` child process that encodes them to a video file.
pub struct Recorder {
    process: Child,
    stdin: Option<ChildStdin>,
    path: PathBuf,
    frames: u64,
}

impl Recorder {
    pub fn spawn(width: i32, height: i32, fps: u32, path: &Path) -> Result<Recorder> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "warning"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(path)
            .spawn()
            .context("failed to start ffmpeg, is it on PATH?")?;
        let stdin = process.stdin.take().context("failed to open ffmpeg stdin")?;
        info!(path = %path.display(), width, height, fps, "recording started");
        Ok(Recorder { process, stdin: Some(stdin), path: path.to_path_buf(), frames: 0 })
    }

    pub fn write_frame(&mut self, image: &Image) -> Result<()> {
        let stdin = self.stdin.as_mut().context("ffmpeg stdin already closed")?;
        let width = image.width() as usize;
        let height = image.height() as usize;
        let row_len = width * 4; // RGBA

        // Safety: a framebuffer readback is an uncompressed RGBA8 image of width * height pixels
        let pixels = unsafe { std::slice::from_raw_parts(image.data() as *const u8, row_len * height) };

        // raylib reads render textures back bottom row first, ffmpeg wants top row first
        for row in pixels.chunks_exact(row_len).rev() {
            stdin.write_all(row).context("failed to write frame to ffmpeg")?;
        }
        self.frames += 1;
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        // Closing stdin tells ffmpeg the stream is over
        self.stdin = None;
        match self.process.wait() {
            Ok(status) if status.success() => {
                info!(path = %self.path.display(), frames = self.frames, "recording finished")
            }
            Ok(status) => error!(%status, path = %self.path.display(), "ffmpeg exited with an error"),
            Err(e) => error!(error = %e, "failed to wait for ffmpeg"),
        }
    }
}
