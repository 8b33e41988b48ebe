//! # MPC / SHD Tile Packs
//!
//! ```text
//! [0]   "MPC File Ver" or "SHD File Ver"
//! [64]  data_length_sum, width, height, frame_count, direction,
//!       color_count, interval (u32 each), bottom (i32)
//! [128] palette: color_count x BGRA
//!       frame offsets: frame_count x u32, relative to the frame data start
//!       frames: data_len u32, width u32, height u32, 8 reserved, RLE stream
//! ```
//!
//! Frames carry their own size, so only the individual layout applies.
//! A frame whose header is cut off or whose size is zero or over the limit
//! decodes as a 1x1 transparent placeholder instead of failing the file.

use crate::error::{DecodeError, DecodeResult};
use crate::layout::{check_individual_total, individual_frame_len, IndividualWriter, RGBA_BYTES};
use crate::limits::DecodeLimits;
use crate::palette::Palette;
use crate::reader::ByteReader;
use crate::rle::walk_mpc;

/// Tile pack signature.
pub const MPC_MAGIC: &[u8; 12] = b"MPC File Ver";

/// Shadow pack signature; same layout.
pub const SHD_MAGIC: &[u8; 12] = b"SHD File Ver";

/// Smallest file that can hold the fixed header.
pub const MIN_LEN: usize = 160;

const FIELDS_OFFSET: usize = 64;
const PALETTE_OFFSET: usize = 128;
const FRAME_HEADER_LEN: usize = 20;
/// Pixel rows below the anchor reserved for the tile baseline.
const TILE_BASELINE: i64 = 16;

/// One frame's size and stream location. Zero size marks a placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MpcFrame {
    pub width: u32,
    pub height: u32,
    start: usize,
    end: usize,
}

impl MpcFrame {
    const PLACEHOLDER: Self = Self {
        width: 0,
        height: 0,
        start: 0,
        end: 0,
    };

    #[inline]
    pub const fn is_placeholder(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RLE stream clipped to the input. A length running past the end keeps
    /// whatever bytes are present.
    pub fn stream<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        let end = self.end.min(bytes.len());
        let start = self.start.min(end);
        &bytes[start..end]
    }
}

/// Parsed MPC or SHD header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpcHeader {
    /// True for the shadow variant.
    pub shadow: bool,
    /// Sum of frame data lengths as stored.
    pub data_length_sum: u32,
    /// Pack-wide width.
    pub global_width: u32,
    /// Pack-wide height.
    pub global_height: u32,
    /// Frame count.
    pub frame_count: u32,
    /// Facing directions.
    pub direction: u32,
    /// Stored palette entries.
    pub color_count: u32,
    /// Milliseconds per frame.
    pub interval: u32,
    /// Horizontal anchor: half the global width.
    pub left: i32,
    /// Vertical anchor re-based against the tile baseline.
    pub bottom: i32,
    /// Frames in one direction's loop, at least 1.
    pub frames_per_direction: u32,
    /// RGBA bytes for all frames in the individual layout.
    pub total_pixel_bytes: usize,
    palette: Palette,
    frames: Vec<MpcFrame>,
}

/// Returns true if `bytes` starts with either pack signature.
#[inline]
#[must_use]
pub fn is_mpc(bytes: &[u8]) -> bool {
    bytes.starts_with(MPC_MAGIC) || bytes.starts_with(SHD_MAGIC)
}

/// Parses the header, palette and per-frame sizes.
///
/// # Errors
///
/// `Truncated`, `BadMagic`, `FrameTooLarge` (global size), `PaletteTooLarge`
/// or `ImpossibleFrameCount` for malformed input.
pub fn parse(bytes: &[u8], limits: &DecodeLimits) -> DecodeResult<MpcHeader> {
    if bytes.len() < MIN_LEN {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: MIN_LEN,
            len: bytes.len(),
        });
    }
    if !is_mpc(bytes) {
        return Err(DecodeError::BadMagic);
    }

    let mut reader = ByteReader::at(bytes, FIELDS_OFFSET);
    let data_length_sum = reader.read_u32()?;
    let global_width = reader.read_u32()?;
    let global_height = reader.read_u32()?;
    let frame_count = reader.read_u32()?;
    let direction = reader.read_u32()?;
    let color_count = reader.read_u32()?;
    let interval = reader.read_u32()?;
    let raw_bottom = reader.read_i32()?;

    limits.check_dimensions(global_width.into(), global_height.into())?;
    limits.check_frame_count(frame_count.into())?;
    limits.check_palette(color_count.into())?;

    let mut reader = ByteReader::at(bytes, PALETTE_OFFSET);
    let palette = Palette::from_bgra(reader.read_slice(color_count as usize)?);

    let table_fits = reader.remaining() / 4;
    if frame_count as usize > table_fits {
        return Err(DecodeError::ImpossibleFrameCount {
            count: frame_count.into(),
            max: table_fits as i64,
        });
    }
    let data_start = reader.position() + frame_count as usize * 4;
    let mut frames = Vec::with_capacity(frame_count as usize);
    let mut total = 0u64;
    for _ in 0..frame_count {
        let relative = reader.read_u32()? as usize;
        let frame = read_frame(bytes, data_start.saturating_add(relative), limits);
        total += individual_frame_len(frame.width, frame.height);
        frames.push(frame);
    }

    let height = i64::from(global_height);
    let bottom = if height >= TILE_BASELINE {
        height - TILE_BASELINE - i64::from(raw_bottom)
    } else {
        TILE_BASELINE - height - i64::from(raw_bottom)
    };

    Ok(MpcHeader {
        shadow: bytes.starts_with(SHD_MAGIC),
        data_length_sum,
        global_width,
        global_height,
        frame_count,
        direction,
        color_count,
        interval,
        left: (global_width / 2) as i32,
        bottom: bottom.clamp(i32::MIN.into(), i32::MAX.into()) as i32,
        frames_per_direction: super::asf::frames_per_direction(frame_count, direction),
        total_pixel_bytes: check_individual_total(total)?,
        palette,
        frames,
    })
}

fn read_frame(bytes: &[u8], start: usize, limits: &DecodeLimits) -> MpcFrame {
    let mut reader = ByteReader::at(bytes, start);
    let (Ok(data_len), Ok(width), Ok(height)) = (reader.read_u32(), reader.read_u32(), reader.read_u32()) else {
        return MpcFrame::PLACEHOLDER;
    };
    if width == 0 || height == 0 || !limits.dimensions_fit(width.into(), height.into()) {
        return MpcFrame::PLACEHOLDER;
    }
    MpcFrame {
        width,
        height,
        start: start + FRAME_HEADER_LEN,
        end: start.saturating_add(data_len as usize),
    }
}

impl MpcHeader {
    /// Decoded palette.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Size of frame `index`, `(0, 0)` for placeholders.
    #[must_use]
    pub fn frame_size(&self, index: usize) -> Option<(u32, u32)> {
        self.frames.get(index).map(|f| (f.width, f.height))
    }

    pub(crate) fn frames(&self) -> &[MpcFrame] {
        &self.frames
    }
}

/// Decodes every frame into the individual layout.
///
/// # Errors
///
/// `OutputTooSmall` if any of the three buffers is shorter than the header requires.
pub fn decode_individual(
    bytes: &[u8],
    header: &MpcHeader,
    pixels: &mut [u8],
    sizes: &mut [u32],
    offsets: &mut [u32],
) -> DecodeResult<u32> {
    let mut writer = IndividualWriter::new(
        pixels,
        sizes,
        offsets,
        header.total_pixel_bytes,
        header.frame_count as usize,
    )?;
    let palette = &header.palette;
    for frame in &header.frames {
        let Some(out) = writer.next_frame(frame.width, frame.height) else {
            continue;
        };
        walk_mpc(frame.stream(bytes), frame.pixel_count(), |pixel, index| {
            out[pixel * RGBA_BYTES..(pixel + 1) * RGBA_BYTES].copy_from_slice(&palette.get(index));
        });
    }
    Ok(header.frame_count)
}
