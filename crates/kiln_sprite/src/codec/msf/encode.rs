//! MSF encoding.

use serde::{Deserialize, Serialize};

use super::{PixelFormat, CHUNK_END, FLAG_LZ4, FLAG_ZSTD, FRAME_ENTRY_LEN, HEADER_LEN, MAGIC_V2, VERSION};
use crate::error::{DecodeError, DecodeResult};
use crate::layout::{crop, tight_bbox, Bbox, RGBA_BYTES};
use crate::palette::{Palette, Rgba};
use crate::writer::ByteWriter;

/// zstd level used for new containers.
const ZSTD_LEVEL: i32 = 3;

/// Frame blob compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Blob stored as-is.
    None,
    /// One zstd frame (flag bit 0).
    #[default]
    Zstd,
    /// LZ4 block with a prepended `u32` size (flag bit 1).
    Lz4,
}

impl Compression {
    /// Header flag bits for this compression.
    #[must_use]
    pub const fn flags(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Zstd => FLAG_ZSTD,
            Self::Lz4 => FLAG_LZ4,
        }
    }

    /// Reads the compression from header flags. Unknown bits are ignored.
    ///
    /// # Errors
    ///
    /// `Decompress` if both compression bits are set.
    pub fn from_flags(flags: u16) -> DecodeResult<Self> {
        match (flags & FLAG_ZSTD != 0, flags & FLAG_LZ4 != 0) {
            (false, false) => Ok(Self::None),
            (true, false) => Ok(Self::Zstd),
            (false, true) => Ok(Self::Lz4),
            (true, true) => Err(DecodeError::Decompress(format!(
                "conflicting compression flags {flags:#06x}"
            ))),
        }
    }
}

/// Container-wide fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsfLayout {
    /// Canvas width.
    pub canvas_width: u16,
    /// Canvas height.
    pub canvas_height: u16,
    /// Facing directions.
    pub directions: u8,
    /// Playback rate.
    pub fps: u8,
    /// Anchor X.
    pub anchor_x: i16,
    /// Anchor Y.
    pub anchor_y: i16,
    /// Blob pixel format.
    pub pixel_format: PixelFormat,
    /// RGBA palette.
    pub palette: Vec<Rgba>,
}

/// One frame already in blob format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MsfFrame {
    /// Left of the box on the canvas.
    pub offset_x: i16,
    /// Top of the box on the canvas.
    pub offset_y: i16,
    /// Box width.
    pub width: u16,
    /// Box height.
    pub height: u16,
    /// `width * height` pixels in the layout's pixel format.
    pub data: Vec<u8>,
}

impl MsfFrame {
    /// A frame with no pixels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a frame from a bounding box on the canvas.
    ///
    /// # Errors
    ///
    /// `FrameTooLarge` if the box does not fit the MSF field widths.
    pub fn from_bbox(bbox: Bbox, data: Vec<u8>) -> DecodeResult<Self> {
        let too_large = || DecodeError::FrameTooLarge {
            width: (bbox.x + bbox.width) as i64,
            height: (bbox.y + bbox.height) as i64,
            max: u32::from(u16::MAX),
        };
        Ok(Self {
            offset_x: i16::try_from(bbox.x).map_err(|_| too_large())?,
            offset_y: i16::try_from(bbox.y).map_err(|_| too_large())?,
            width: u16::try_from(bbox.width).map_err(|_| too_large())?,
            height: u16::try_from(bbox.height).map_err(|_| too_large())?,
            data,
        })
    }
}

/// Full-canvas RGBA frames to be cropped and converted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsfEncodeInput {
    /// Container-wide fields.
    pub layout: MsfLayout,
    /// One `canvas_width * canvas_height * 4` RGBA buffer per frame.
    pub frame_pixels: Vec<Vec<u8>>,
}

/// Crops each frame to its visible pixels, converts it to the layout's
/// pixel format and writes the container.
///
/// Indexed formats pick the nearest palette entry by summed channel
/// distance. Transparent pixels become index 0 (and alpha 0 in
/// `Indexed8Alpha8`), so `Indexed8` palettes should reserve slot 0 as
/// transparent.
///
/// # Errors
///
/// See [`encode_frames`].
pub fn encode(input: &MsfEncodeInput, compression: Compression) -> DecodeResult<Vec<u8>> {
    let layout = &input.layout;
    let width = usize::from(layout.canvas_width);
    let height = usize::from(layout.canvas_height);
    let palette = Palette::from_rgba(&layout.palette);

    let mut frames = Vec::with_capacity(input.frame_pixels.len());
    for pixels in &input.frame_pixels {
        let Some(bbox) = tight_bbox(pixels, width, height, RGBA_BYTES, 3) else {
            frames.push(MsfFrame::empty());
            continue;
        };
        let cropped = crop(pixels, width, RGBA_BYTES, bbox);
        let data = match layout.pixel_format {
            PixelFormat::Rgba8 => cropped,
            PixelFormat::Indexed8 => cropped
                .chunks_exact(RGBA_BYTES)
                .map(|px| if px[3] == 0 { 0 } else { palette.nearest([px[0], px[1], px[2]]) })
                .collect(),
            PixelFormat::Indexed8Alpha8 => cropped
                .chunks_exact(RGBA_BYTES)
                .flat_map(|px| {
                    if px[3] == 0 {
                        [0, 0]
                    } else {
                        [palette.nearest([px[0], px[1], px[2]]), px[3]]
                    }
                })
                .collect(),
        };
        frames.push(MsfFrame::from_bbox(bbox, data)?);
    }
    encode_frames(layout, &frames, compression)
}

/// Writes a container from frames already in blob format.
///
/// # Errors
///
/// `ImpossibleFrameCount` for more than 65535 frames, `PaletteTooLarge` for
/// more than 65535 palette entries, `OutputTooLarge` if the blob passes 4 GiB,
/// `Compress` if zstd fails.
pub fn encode_frames(layout: &MsfLayout, frames: &[MsfFrame], compression: Compression) -> DecodeResult<Vec<u8>> {
    let frame_count = u16::try_from(frames.len()).map_err(|_| DecodeError::ImpossibleFrameCount {
        count: frames.len() as i64,
        max: i64::from(u16::MAX),
    })?;
    let palette_size = u16::try_from(layout.palette.len()).map_err(|_| DecodeError::PaletteTooLarge {
        count: layout.palette.len() as i64,
        max: u32::from(u16::MAX),
    })?;

    let mut blob = Vec::with_capacity(frames.iter().map(|f| f.data.len()).sum());
    let mut table = ByteWriter::with_capacity(frames.len() * FRAME_ENTRY_LEN);
    for frame in frames {
        debug_assert_eq!(
            frame.data.len(),
            usize::from(frame.width) * usize::from(frame.height) * layout.pixel_format.bytes_per_pixel()
        );
        let data_offset = u32::try_from(blob.len()).map_err(|_| DecodeError::OutputTooLarge(blob.len() as u64))?;
        table.write_i16(frame.offset_x);
        table.write_i16(frame.offset_y);
        table.write_u16(frame.width);
        table.write_u16(frame.height);
        table.write_u32(data_offset);
        table.write_u32(frame.data.len() as u32);
        blob.extend_from_slice(&frame.data);
    }

    let payload = match compression {
        Compression::None => blob,
        Compression::Zstd => {
            zstd::bulk::compress(&blob, ZSTD_LEVEL).map_err(|e| DecodeError::Compress(e.to_string()))?
        }
        Compression::Lz4 => lz4_flex::compress_prepend_size(&blob),
    };

    let mut out = ByteWriter::with_capacity(HEADER_LEN + layout.palette.len() * 4 + table.len() + 8 + payload.len());
    out.write_bytes(MAGIC_V2);
    out.write_u16(VERSION);
    out.write_u16(compression.flags());
    out.write_u16(layout.canvas_width);
    out.write_u16(layout.canvas_height);
    out.write_u16(frame_count);
    out.write_u8(layout.directions);
    out.write_u8(layout.fps);
    out.write_i16(layout.anchor_x);
    out.write_i16(layout.anchor_y);
    out.write_bytes(&[0; 4]);
    out.write_u8(layout.pixel_format as u8);
    out.write_u16(palette_size);
    out.write_u8(0);
    out.write_bytes(bytemuck::cast_slice(&layout.palette));
    out.write_bytes(table.as_slice());
    out.write_bytes(CHUNK_END);
    out.write_u32(0);
    out.write_bytes(&payload);

    tracing::trace!(
        frames = frame_count,
        blob = payload.len(),
        total = out.len(),
        "encoded MSF container"
    );
    Ok(out.into_inner())
}

/// Playback rate for a frame interval, 15 fps when the interval is unset.
#[must_use]
pub fn fps_from_interval(interval_ms: u32) -> u8 {
    if interval_ms == 0 {
        15
    } else {
        (1000 / interval_ms).min(255) as u8
    }
}
