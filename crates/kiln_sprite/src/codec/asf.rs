//! # ASF Sprite Animations
//!
//! ```text
//! [0]   "ASF 1.0" signature, padded to 16
//! [16]  width, height, frame_count, directions, color_count,
//!       interval, left, bottom           (i32 each)
//! [48]  16 reserved bytes
//! [64]  palette: color_count x BGRA
//!       frame table: frame_count x (absolute offset i32, length i32)
//!       RLE frame streams
//! ```
//!
//! Every frame shares the global width/height, so ASF decodes to either layout.

use crate::error::{DecodeError, DecodeResult};
use crate::layout::{check_individual_total, ensure_len, individual_frame_len, IndividualWriter, RGBA_BYTES};
use crate::limits::DecodeLimits;
use crate::palette::Palette;
use crate::reader::ByteReader;
use crate::rle::walk_asf;

/// Signature at byte 0.
pub const MAGIC: &[u8; 7] = b"ASF 1.0";

/// Smallest file that can hold the fixed header.
pub const MIN_LEN: usize = 80;

const FIELDS_OFFSET: usize = 16;
const PALETTE_OFFSET: usize = 64;

/// Location of one frame's RLE stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrameSpan {
    offset: usize,
    len: usize,
}

/// Parsed ASF header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsfHeader {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Total frames across all directions.
    pub frame_count: u32,
    /// Facing directions.
    pub directions: u32,
    /// Stored palette entries.
    pub color_count: u32,
    /// Milliseconds per frame.
    pub interval: u32,
    /// Horizontal anchor inset.
    pub left: i32,
    /// Vertical anchor inset.
    pub bottom: i32,
    /// Frames in one direction's loop, at least 1.
    pub frames_per_direction: u32,
    palette: Palette,
    frames: Vec<FrameSpan>,
}

/// Returns true if `bytes` starts with the ASF signature.
#[inline]
#[must_use]
pub fn is_asf(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

/// Parses the header, palette and frame table.
///
/// # Errors
///
/// `Truncated`, `BadMagic`, `FrameTooLarge`, `ImpossibleFrameCount` or
/// `PaletteTooLarge` for malformed input.
pub fn parse(bytes: &[u8], limits: &DecodeLimits) -> DecodeResult<AsfHeader> {
    if bytes.len() < MIN_LEN {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: MIN_LEN,
            len: bytes.len(),
        });
    }
    if !is_asf(bytes) {
        return Err(DecodeError::BadMagic);
    }

    let mut reader = ByteReader::at(bytes, FIELDS_OFFSET);
    let width = reader.read_i32()?;
    let height = reader.read_i32()?;
    let frame_count = reader.read_i32()?;
    let directions = reader.read_i32()?;
    let color_count = reader.read_i32()?;
    let interval = reader.read_i32()?;
    let left = reader.read_i32()?;
    let bottom = reader.read_i32()?;

    limits.check_dimensions(width.into(), height.into())?;
    limits.check_frame_count(frame_count.into())?;
    limits.check_palette(color_count.into())?;
    let (width, height, frame_count) = (width as u32, height as u32, frame_count as u32);
    let color_count = color_count as u32;

    let mut reader = ByteReader::at(bytes, PALETTE_OFFSET);
    let palette = Palette::from_bgra(reader.read_slice(color_count as usize)?);

    let table_fits = reader.remaining() / 8;
    if frame_count as usize > table_fits {
        return Err(DecodeError::ImpossibleFrameCount {
            count: frame_count.into(),
            max: table_fits as i64,
        });
    }
    let mut frames = Vec::with_capacity(frame_count as usize);
    for _ in 0..frame_count {
        let offset = reader.read_i32()?;
        let len = reader.read_i32()?;
        frames.push(FrameSpan {
            offset: offset.max(0) as usize,
            len: len.max(0) as usize,
        });
    }

    let header = AsfHeader {
        width,
        height,
        frame_count,
        directions: directions.max(0) as u32,
        color_count,
        interval: interval.max(0) as u32,
        left,
        bottom,
        frames_per_direction: frames_per_direction(frame_count, directions.max(0) as u32),
        palette,
        frames,
    };
    check_individual_total(header.individual_total())?;
    Ok(header)
}

pub(crate) fn frames_per_direction(frame_count: u32, directions: u32) -> u32 {
    if directions > 0 {
        (frame_count / directions).max(1)
    } else {
        frame_count.max(1)
    }
}

impl AsfHeader {
    /// Decoded palette.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Pixels in one frame.
    #[inline]
    #[must_use]
    pub const fn pixels_per_frame(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes needed by [`decode_canvas`].
    #[inline]
    #[must_use]
    pub const fn canvas_output_len(&self) -> usize {
        self.pixels_per_frame() * RGBA_BYTES * self.frame_count as usize
    }

    /// Pixel bytes needed by [`decode_individual`].
    #[inline]
    #[must_use]
    pub fn individual_output_len(&self) -> usize {
        self.individual_total() as usize
    }

    fn individual_total(&self) -> u64 {
        individual_frame_len(self.width, self.height) * u64::from(self.frame_count)
    }

    /// RLE stream of frame `index`, clipped to the input.
    pub(crate) fn frame_stream<'a>(&self, bytes: &'a [u8], index: usize) -> &'a [u8] {
        let Some(span) = self.frames.get(index) else {
            return &[];
        };
        let start = span.offset.min(bytes.len());
        let end = span.offset.saturating_add(span.len).min(bytes.len());
        &bytes[start..end]
    }

    fn draw_frame(&self, bytes: &[u8], index: usize, frame: &mut [u8]) {
        let palette = &self.palette;
        walk_asf(self.frame_stream(bytes, index), self.pixels_per_frame(), |pixel, colour, alpha| {
            let [r, g, b, _] = palette.get(colour);
            frame[pixel * RGBA_BYTES..(pixel + 1) * RGBA_BYTES].copy_from_slice(&[r, g, b, alpha]);
        });
    }
}

/// Decodes every frame at full size into `out`.
///
/// # Errors
///
/// `OutputTooSmall` if `out` is shorter than [`AsfHeader::canvas_output_len`].
pub fn decode_canvas(bytes: &[u8], header: &AsfHeader, out: &mut [u8]) -> DecodeResult<u32> {
    let required = header.canvas_output_len();
    ensure_len("pixel", required, out.len())?;
    let frame_len = header.pixels_per_frame() * RGBA_BYTES;
    if frame_len == 0 {
        return Ok(header.frame_count);
    }
    for (index, frame) in out[..required].chunks_exact_mut(frame_len).enumerate() {
        frame.fill(0);
        header.draw_frame(bytes, index, frame);
    }
    Ok(header.frame_count)
}

/// Decodes every frame into the individual layout.
///
/// # Errors
///
/// `OutputTooSmall` if any of the three buffers is shorter than the header requires.
pub fn decode_individual(
    bytes: &[u8],
    header: &AsfHeader,
    pixels: &mut [u8],
    sizes: &mut [u32],
    offsets: &mut [u32],
) -> DecodeResult<u32> {
    let mut writer = IndividualWriter::new(
        pixels,
        sizes,
        offsets,
        header.individual_output_len(),
        header.frame_count as usize,
    )?;
    for index in 0..header.frame_count as usize {
        if let Some(frame) = writer.next_frame(header.width, header.height) {
            header.draw_frame(bytes, index, frame);
        }
    }
    Ok(header.frame_count)
}
