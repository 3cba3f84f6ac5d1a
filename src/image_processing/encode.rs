use anyhow::{Context, Result};
use gif::{Encoder, Frame, Repeat};
use std::borrow::Cow;

use super::frame::PreparedFrame;

/// Convert a frame duration in milliseconds to a GIF delay in centiseconds.
///
/// Non-zero durations never collapse to a zero delay, which viewers treat
/// as "as fast as possible".
pub fn duration_to_delay(duration_ms: u32) -> u16 {
    if duration_ms == 0 {
        return 0;
    }
    u16::try_from(duration_ms / 10).unwrap_or(u16::MAX).max(1)
}

/// Map the configured loop count onto the NETSCAPE repeat extension (0 = forever)
pub fn loop_to_repeat(loop_count: u16) -> Repeat {
    match loop_count {
        0 => Repeat::Infinite,
        n => Repeat::Finite(n),
    }
}

/// Drop palette entries no pixel refers to and renumber the indices.
///
/// Returns the trimmed RGB palette and the remapped index buffer.
pub fn optimize_palette(frame: &PreparedFrame) -> (Vec<u8>, Vec<u8>) {
    let mut used = [false; 256];
    for &index in &frame.indices {
        used[usize::from(index)] = true;
    }

    let mut remap = [0u8; 256];
    let mut palette = Vec::with_capacity(frame.palette.len());
    let mut next = 0u8;
    for (old, rgb) in frame.palette.chunks_exact(3).enumerate() {
        if used[old] {
            remap[old] = next;
            palette.extend_from_slice(rgb);
            next = next.wrapping_add(1);
        }
    }

    let indices = frame.indices.iter().map(|&i| remap[usize::from(i)]).collect();
    (palette, indices)
}

/// Logical screen size large enough for every frame
pub fn screen_size(frames: &[PreparedFrame]) -> (u32, u32) {
    frames.iter().fold((0, 0), |(w, h), frame| {
        (w.max(frame.width), h.max(frame.height))
    })
}

/// Encode prepared frames into an in-memory animated GIF.
///
/// Every frame carries its own local palette and the same delay.
pub fn encode_gif(
    frames: &[PreparedFrame],
    duration_ms: u32,
    loop_count: u16,
    optimize: bool,
) -> Result<Vec<u8>> {
    if frames.is_empty() {
        anyhow::bail!("Cannot encode a GIF without frames");
    }

    let (screen_width, screen_height) = screen_size(frames);
    let screen_width = gif_dimension(screen_width, "width")?;
    let screen_height = gif_dimension(screen_height, "height")?;
    let delay = duration_to_delay(duration_ms);

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, screen_width, screen_height, &[])
        .context("Failed to write GIF header")?;
    encoder
        .set_repeat(loop_to_repeat(loop_count))
        .context("Failed to write GIF loop extension")?;

    for (index, prepared) in frames.iter().enumerate() {
        let (palette, indices) = if optimize {
            optimize_palette(prepared)
        } else {
            (prepared.palette.clone(), prepared.indices.clone())
        };

        let mut frame = Frame::default();
        frame.width = gif_dimension(prepared.width, "width")?;
        frame.height = gif_dimension(prepared.height, "height")?;
        frame.delay = delay;
        frame.palette = Some(palette);
        frame.buffer = Cow::Owned(indices);

        encoder
            .write_frame(&frame)
            .with_context(|| format!("Failed to encode frame {}", index + 1))?;
    }

    encoder.into_inner().context("Failed to finish GIF")?;
    Ok(buffer)
}

fn gif_dimension(value: u32, what: &str) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| anyhow::anyhow!("Frame {} {} exceeds the GIF limit of 65535", what, value))
}
