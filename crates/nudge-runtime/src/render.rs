//! Liveness animation: a small window looping a GIF while the monitor
//! runs. Pure decoration — it makes an unattended session visibly
//! alive. A missing or undecodable GIF aborts only this component.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context;
use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;
use minifb::{Window, WindowOptions};

pub const WINDOW_WIDTH: usize = 300;
pub const WINDOW_HEIGHT: usize = 300;
const FRAME_RATE: usize = 60;
const BACKGROUND: u32 = 0x00FF_FFFF;

/// One decoded frame, pre-composited to the window buffer format.
pub struct RenderFrame {
    pub buffer: Vec<u32>,
    pub delay_ms: u64,
}

/// Decoded, looping animation with per-frame timing.
pub struct Animation {
    frames: Vec<RenderFrame>,
    current: usize,
    carried_ms: u64,
}

impl Animation {
    /// Decode all GIF frames up front; per-frame delays are preserved.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("decode {}", path.display()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .context("collect animation frames")?;
        anyhow::ensure!(!frames.is_empty(), "animation has no frames");

        let frames = frames
            .into_iter()
            .map(|frame| {
                let delay_ms = std::time::Duration::from(frame.delay()).as_millis() as u64;
                let rgba = frame.into_buffer();
                RenderFrame {
                    buffer: composite_centered(rgba.as_raw(), rgba.width(), rgba.height()),
                    // Zero-delay frames would spin; clamp to one tick.
                    delay_ms: delay_ms.max(10),
                }
            })
            .collect();

        Ok(Self {
            frames,
            current: 0,
            carried_ms: 0,
        })
    }

    #[cfg(test)]
    fn from_frames(frames: Vec<RenderFrame>) -> Self {
        Self {
            frames,
            current: 0,
            carried_ms: 0,
        }
    }

    pub fn current_buffer(&self) -> &[u32] {
        &self.frames[self.current].buffer
    }

    /// Advance frame timing by `elapsed_ms`, wrapping around the loop.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.carried_ms += elapsed_ms;
        while self.carried_ms >= self.frames[self.current].delay_ms {
            self.carried_ms -= self.frames[self.current].delay_ms;
            self.current = (self.current + 1) % self.frames.len();
        }
    }
}

/// Composite an RGBA frame centered over the white window background,
/// producing minifb's 0RGB buffer layout. Oversized frames are cropped
/// to the window.
pub(crate) fn composite_centered(rgba: &[u8], width: u32, height: u32) -> Vec<u32> {
    let mut buffer = vec![BACKGROUND; WINDOW_WIDTH * WINDOW_HEIGHT];

    let width = width as usize;
    let height = height as usize;
    let off_x = WINDOW_WIDTH.saturating_sub(width) / 2;
    let off_y = WINDOW_HEIGHT.saturating_sub(height) / 2;

    for y in 0..height.min(WINDOW_HEIGHT) {
        for x in 0..width.min(WINDOW_WIDTH) {
            let src = (y * width + x) * 4;
            let (r, g, b, a) = (
                rgba[src] as u32,
                rgba[src + 1] as u32,
                rgba[src + 2] as u32,
                rgba[src + 3] as u32,
            );
            // Alpha over white.
            let blend = |c: u32| (c * a + 0xFF * (255 - a)) / 255;
            let dst = (off_y + y) * WINDOW_WIDTH + off_x + x;
            buffer[dst] = (blend(r) << 16) | (blend(g) << 8) | blend(b);
        }
    }
    buffer
}

/// Fixed-rate redraw loop. Exits when the window closes or the stop
/// flag fires; a close request also sets the stop flag so the monitor
/// winds down with it.
pub fn run_render_loop(mut animation: Animation, stop: Arc<AtomicBool>) -> anyhow::Result<()> {
    let mut window = Window::new(
        "nudge",
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        WindowOptions::default(),
    )
    .context("open animation window")?;
    window.set_target_fps(FRAME_RATE);

    let mut last = Instant::now();
    while window.is_open() && !stop.load(Ordering::SeqCst) {
        let now = Instant::now();
        animation.advance(now.duration_since(last).as_millis() as u64);
        last = now;

        window
            .update_with_buffer(animation.current_buffer(), WINDOW_WIDTH, WINDOW_HEIGHT)
            .context("update animation window")?;
    }

    stop.store(true, Ordering::SeqCst);
    Ok(())
}
