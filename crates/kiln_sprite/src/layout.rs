//! # Output Layouts
//!
//! Canvas layout: `frame_count` canvas-sized RGBA frames back to back.
//!
//! Individual layout: frames at their own size back to back, plus a
//! `[w, h]` table and a byte-offset table. Frames with no pixels are stored
//! as a single transparent pixel so every frame has an addressable image.

use crate::error::{DecodeError, DecodeResult};

/// Bytes per decoded pixel.
pub const RGBA_BYTES: usize = 4;

/// RGBA bytes one frame occupies in the individual layout.
#[inline]
#[must_use]
pub fn individual_frame_len(width: u32, height: u32) -> u64 {
    if width == 0 || height == 0 {
        RGBA_BYTES as u64
    } else {
        u64::from(width) * u64::from(height) * RGBA_BYTES as u64
    }
}

/// Rejects totals that cannot be addressed by the `u32` offset table.
pub(crate) fn check_individual_total(total: u64) -> DecodeResult<usize> {
    if total > u64::from(u32::MAX) {
        return Err(DecodeError::OutputTooLarge(total));
    }
    Ok(total as usize)
}

pub(crate) fn ensure_len(what: &'static str, required: usize, actual: usize) -> DecodeResult<()> {
    if actual < required {
        return Err(DecodeError::OutputTooSmall {
            what,
            required,
            actual,
        });
    }
    Ok(())
}

/// Hands out consecutive frame slices of an individual-layout buffer and
/// records their sizes and offsets.
pub(crate) struct IndividualWriter<'a> {
    pixels: &'a mut [u8],
    sizes: &'a mut [u32],
    offsets: &'a mut [u32],
    cursor: usize,
    frame: usize,
}

impl<'a> IndividualWriter<'a> {
    /// Validates all three buffers against the header totals.
    pub fn new(
        pixels: &'a mut [u8],
        sizes: &'a mut [u32],
        offsets: &'a mut [u32],
        pixel_bytes: usize,
        frame_count: usize,
    ) -> DecodeResult<Self> {
        ensure_len("pixel", pixel_bytes, pixels.len())?;
        ensure_len("frame size", frame_count * 2, sizes.len())?;
        ensure_len("frame offset", frame_count, offsets.len())?;
        Ok(Self {
            pixels,
            sizes,
            offsets,
            cursor: 0,
            frame: 0,
        })
    }

    /// Reserves the next frame, cleared to transparent. Returns `None` for
    /// placeholder frames, whose single pixel needs no drawing.
    pub fn next_frame(&mut self, width: u32, height: u32) -> Option<&mut [u8]> {
        let placeholder = width == 0 || height == 0;
        let (w, h) = if placeholder { (1, 1) } else { (width, height) };
        let len = individual_frame_len(width, height) as usize;

        self.sizes[self.frame * 2] = w;
        self.sizes[self.frame * 2 + 1] = h;
        self.offsets[self.frame] = self.cursor as u32;
        self.frame += 1;

        let frame = &mut self.pixels[self.cursor..self.cursor + len];
        self.cursor += len;
        frame.fill(0);
        (!placeholder).then_some(frame)
    }
}

/// Tight bounding box of the visible pixels of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bbox {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Smallest rectangle containing every pixel whose alpha byte is non-zero.
///
/// `stride` is bytes per pixel and `alpha_at` the alpha byte within a pixel.
/// Pixels past the end of `pixels` count as transparent.
#[must_use]
pub fn tight_bbox(
    pixels: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    alpha_at: usize,
) -> Option<Bbox> {
    let mut min = (usize::MAX, usize::MAX);
    let mut max = (0, 0);
    for y in 0..height {
        for x in 0..width {
            let alpha = pixels
                .get((y * width + x) * stride + alpha_at)
                .copied()
                .unwrap_or(0);
            if alpha > 0 {
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
        }
    }
    (min.0 != usize::MAX).then(|| Bbox {
        x: min.0,
        y: min.1,
        width: max.0 - min.0 + 1,
        height: max.1 - min.1 + 1,
    })
}

/// Copies the rows of `bbox` out of a `width`-wide image. Missing source
/// bytes are zero-filled.
#[must_use]
pub fn crop(pixels: &[u8], width: usize, stride: usize, bbox: Bbox) -> Vec<u8> {
    let row_len = bbox.width * stride;
    let mut out = Vec::with_capacity(row_len * bbox.height);
    for y in bbox.y..bbox.y + bbox.height {
        let start = (y * width + bbox.x) * stride;
        match pixels.get(start..start + row_len) {
            Some(row) => out.extend_from_slice(row),
            None => out.resize(out.len() + row_len, 0),
        }
    }
    out
}
