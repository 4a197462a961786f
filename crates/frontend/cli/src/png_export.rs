/// PNG export of resolved frames
use anyhow::{bail, Context, Result};
use palsprite_core::graphics::ColorOps;
use palsprite_core::types::Frame;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Largest accepted upscale factor
pub const MAX_SCALE: u32 = 16;

/// Convert a frame to RGBA8 bytes, repeating each pixel `scale` times in
/// both directions.
pub fn frame_to_rgba(frame: &Frame, scale: u32) -> Vec<u8> {
    let scale = scale.max(1) as usize;
    let width = frame.width as usize;
    let mut data = Vec::with_capacity(frame.pixels.len() * 4 * scale * scale);

    for row in frame.pixels.chunks(width.max(1)) {
        let mut line = Vec::with_capacity(width * 4 * scale);
        for &color in row {
            let rgba = ColorOps::to_rgba(color);
            for _ in 0..scale {
                line.extend_from_slice(&rgba);
            }
        }
        for _ in 0..scale {
            data.extend_from_slice(&line);
        }
    }
    data
}

pub fn write_png<W: Write>(writer: W, frame: &Frame, scale: u32) -> Result<()> {
    if scale == 0 || scale > MAX_SCALE {
        bail!("scale must be between 1 and {}", MAX_SCALE);
    }

    let mut encoder = png::Encoder::new(writer, frame.width * scale, frame.height * scale);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&frame_to_rgba(frame, scale))?;
    png_writer.finish()?;
    Ok(())
}

pub fn save_png<P: AsRef<Path>>(path: P, frame: &Frame, scale: u32) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_png(BufWriter::new(file), frame, scale)
        .with_context(|| format!("writing {}", path.display()))
}
