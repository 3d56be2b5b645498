use crate::color::Palette;
use crate::error::{LightningError, Result};
use crate::renderer::{FrameBuffer, PixelColor, Renderer};
use gif::{Encoder, Frame, Repeat};
use image::{Rgb, RgbImage};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Delay between animation frames, in hundredths of a second
const GIF_FRAME_DELAY: u16 = 4;
/// How long the last frame stays up before the loop restarts
const GIF_FINAL_DELAY: u16 = 300;

/// Write the canvas as a PNG
pub fn save_png(canvas: &FrameBuffer, palette: Palette, path: &Path) -> Result<()> {
    let fg = Rgb(palette.foreground_rgb());
    let bg = Rgb(palette.background_rgb());
    let img = RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        match canvas.get_pixel(x, y) {
            PixelColor::Foreground => fg,
            PixelColor::Background => bg,
        }
    });
    img.save(path)?;
    info!(path = %path.display(), "saved PNG snapshot");
    Ok(())
}

/// Streams an animated GIF of the growth, one frame every `every` freezes
pub struct GifRecorder {
    encoder: Encoder<BufWriter<File>>,
    width: u16,
    height: u16,
    every: u64,
    seen: u64,
    frames: u64,
}

impl GifRecorder {
    pub fn create(path: &Path, canvas: &FrameBuffer, palette: Palette, every: u64) -> Result<Self> {
        let width = gif_dimension(canvas.width())?;
        let height = gif_dimension(canvas.height())?;

        let mut global_palette = Vec::with_capacity(6);
        global_palette.extend_from_slice(&palette.background_rgb());
        global_palette.extend_from_slice(&palette.foreground_rgb());

        let file = BufWriter::new(File::create(path)?);
        let mut encoder = Encoder::new(file, width, height, &global_palette)?;
        encoder.set_repeat(Repeat::Infinite)?;

        let mut recorder = Self {
            encoder,
            width,
            height,
            every: every.max(1),
            seen: 0,
            frames: 0,
        };
        recorder.write_frame(canvas, GIF_FRAME_DELAY)?;
        Ok(recorder)
    }

    /// Number of frames written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Count a freeze, capturing a frame when the interval is reached
    pub fn on_freeze(&mut self, canvas: &FrameBuffer) -> Result<()> {
        self.seen += 1;
        if self.seen % self.every == 0 {
            self.write_frame(canvas, GIF_FRAME_DELAY)?;
        }
        Ok(())
    }

    /// Write the final frame and flush the file
    pub fn finish(mut self, canvas: &FrameBuffer) -> Result<u64> {
        self.write_frame(canvas, GIF_FINAL_DELAY)?;
        let frames = self.frames;
        // into_inner writes the trailer
        let mut writer = self.encoder.into_inner()?;
        std::io::Write::flush(&mut writer)?;
        info!(frames, "saved GIF animation");
        Ok(frames)
    }

    fn write_frame(&mut self, canvas: &FrameBuffer, delay: u16) -> Result<()> {
        let indices: Vec<u8> = canvas
            .pixels()
            .iter()
            .map(|pixel| match pixel {
                PixelColor::Background => 0,
                PixelColor::Foreground => 1,
            })
            .collect();

        let frame = Frame {
            width: self.width,
            height: self.height,
            delay,
            buffer: Cow::Owned(indices),
            ..Frame::default()
        };
        self.encoder.write_frame(&frame)?;
        self.frames += 1;
        Ok(())
    }
}

fn gif_dimension(value: u32) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| LightningError::Config(format!("{} pixels is too large for a GIF", value)))
}
