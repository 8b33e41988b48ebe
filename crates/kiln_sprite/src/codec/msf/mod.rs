//! # MSF Indexed Sprite Container
//!
//! ```text
//! [0]  "MSF1" | "MSF2"   version u16   flags u16 (bit 0: zstd blob, bit 1: LZ4 blob)
//! [8]  canvas w u16, canvas h u16, frame_count u16, directions u8, fps u8,
//!      anchor x i16, anchor y i16, 4 reserved
//! [24] pixel format u8, palette size u16, reserved u8
//! [28] palette: palette_size x RGBA
//!      frame table: frame_count x (offset x i16, offset y i16, w u16, h u16,
//!                                  data offset u32, data length u32)
//!      extension chunks: id [4] + len u32 + data, terminated by "END\0"
//!      frame blob (raw, one zstd frame, or LZ4 with a prepended u32 size)
//! ```
//!
//! Each frame stores only its tight bounding box. The canvas layout
//! composites it back at its offset; the individual layout returns the box.

mod encode;

pub use encode::{encode, encode_frames, fps_from_interval, Compression, MsfEncodeInput, MsfFrame, MsfLayout};

use std::borrow::Cow;
use std::io::Read;

use crate::error::{DecodeError, DecodeResult};
use crate::layout::{check_individual_total, ensure_len, individual_frame_len, IndividualWriter, RGBA_BYTES};
use crate::limits::DecodeLimits;
use crate::palette::Palette;
use crate::reader::ByteReader;

/// Original container magic.
pub const MAGIC_V1: &[u8; 4] = b"MSF1";
/// Current container magic, written by the encoder.
pub const MAGIC_V2: &[u8; 4] = b"MSF2";
/// Version written by the encoder.
pub const VERSION: u16 = 2;
/// Terminating extension chunk id.
pub const CHUNK_END: &[u8; 4] = b"END\0";
/// Flag bit: the frame blob is a zstd frame.
pub const FLAG_ZSTD: u16 = 1;
/// Flag bit: the frame blob is an LZ4 block with a prepended size.
pub const FLAG_LZ4: u16 = 2;

/// Fixed header length up to the palette.
pub const HEADER_LEN: usize = 28;
/// Bytes per frame table entry.
pub const FRAME_ENTRY_LEN: usize = 16;

/// Upper bound on LZ4 block expansion.
const LZ4_MAX_RATIO: u64 = 255;

/// Per-pixel storage in the frame blob.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Four bytes per pixel, stored verbatim.
    Rgba8 = 0,
    /// One palette index per pixel; the palette entry's alpha applies.
    Indexed8 = 1,
    /// Palette index plus a per-pixel alpha byte.
    Indexed8Alpha8 = 2,
}

impl PixelFormat {
    /// Parses the on-disk tag.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Rgba8),
            1 => Some(Self::Indexed8),
            2 => Some(Self::Indexed8Alpha8),
            _ => None,
        }
    }

    /// Blob bytes per pixel.
    #[inline]
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Indexed8 => 1,
            Self::Indexed8Alpha8 => 2,
        }
    }
}

/// One frame table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MsfFrameEntry {
    /// Left of the bounding box on the canvas.
    pub offset_x: i16,
    /// Top of the bounding box on the canvas.
    pub offset_y: i16,
    /// Box width; 0 for an empty frame.
    pub width: u16,
    /// Box height; 0 for an empty frame.
    pub height: u16,
    /// Offset into the (decompressed) blob.
    pub data_offset: u32,
    /// Stored data length.
    pub data_length: u32,
}

impl MsfFrameEntry {
    /// Returns true if the frame has no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Blob range holding this frame's pixels in `format`.
    fn data_range(&self, format: PixelFormat) -> std::ops::Range<usize> {
        let start = self.data_offset as usize;
        let len = usize::from(self.width) * usize::from(self.height) * format.bytes_per_pixel();
        start..start.saturating_add(len)
    }
}

/// Parsed MSF header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsfHeader {
    /// Container version field.
    pub version: u16,
    /// Frame blob compression.
    pub compression: Compression,
    /// Canvas width.
    pub canvas_width: u16,
    /// Canvas height.
    pub canvas_height: u16,
    /// Frame count.
    pub frame_count: u16,
    /// Facing directions.
    pub directions: u8,
    /// Playback rate.
    pub fps: u8,
    /// Anchor X on the canvas.
    pub anchor_x: i16,
    /// Anchor Y on the canvas.
    pub anchor_y: i16,
    /// Blob pixel format.
    pub pixel_format: PixelFormat,
    /// Stored palette entries.
    pub palette_size: u16,
    /// Frames in one direction's loop, at least 1.
    pub frames_per_direction: u16,
    /// RGBA bytes for all frames in the individual layout.
    pub total_individual_pixel_bytes: usize,
    palette: Palette,
    frames: Vec<MsfFrameEntry>,
    blob_offset: usize,
}

/// Returns true if `bytes` starts with either MSF magic.
#[inline]
#[must_use]
pub fn is_msf(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC_V1) || bytes.starts_with(MAGIC_V2)
}

/// Parses the header, palette, frame table and extension chunks.
///
/// # Errors
///
/// `Truncated`, `BadMagic`, `UnknownPixelFormat`, `FrameTooLarge`,
/// `PaletteTooLarge`, `ImpossibleFrameCount` or `MissingEndChunk`.
pub fn parse(bytes: &[u8], limits: &DecodeLimits) -> DecodeResult<MsfHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: HEADER_LEN,
            len: bytes.len(),
        });
    }
    if !is_msf(bytes) {
        return Err(DecodeError::BadMagic);
    }

    let mut reader = ByteReader::at(bytes, 4);
    let version = reader.read_u16()?;
    let flags = reader.read_u16()?;
    let canvas_width = reader.read_u16()?;
    let canvas_height = reader.read_u16()?;
    let frame_count = reader.read_u16()?;
    let directions = reader.read_u8()?;
    let fps = reader.read_u8()?;
    let anchor_x = reader.read_i16()?;
    let anchor_y = reader.read_i16()?;
    reader.skip(4)?;
    let format_tag = reader.read_u8()?;
    let palette_size = reader.read_u16()?;
    reader.skip(1)?;

    let compression = Compression::from_flags(flags)?;
    let pixel_format = PixelFormat::from_u8(format_tag).ok_or(DecodeError::UnknownPixelFormat(format_tag))?;
    limits.check_dimensions(canvas_width.into(), canvas_height.into())?;
    limits.check_frame_count(frame_count.into())?;
    limits.check_palette(palette_size.into())?;

    let palette = Palette::from_rgba(reader.read_slice(usize::from(palette_size))?);

    let table_fits = reader.remaining() / FRAME_ENTRY_LEN;
    if usize::from(frame_count) > table_fits {
        return Err(DecodeError::ImpossibleFrameCount {
            count: frame_count.into(),
            max: table_fits as i64,
        });
    }
    let mut frames = Vec::with_capacity(usize::from(frame_count));
    let mut total = 0u64;
    for _ in 0..frame_count {
        let entry = MsfFrameEntry {
            offset_x: reader.read_i16()?,
            offset_y: reader.read_i16()?,
            width: reader.read_u16()?,
            height: reader.read_u16()?,
            data_offset: reader.read_u32()?,
            data_length: reader.read_u32()?,
        };
        limits.check_dimensions(entry.width.into(), entry.height.into())?;
        total += individual_frame_len(entry.width.into(), entry.height.into());
        frames.push(entry);
    }

    let blob_offset = skip_extension_chunks(&mut reader)?;

    Ok(MsfHeader {
        version,
        compression,
        canvas_width,
        canvas_height,
        frame_count,
        directions,
        fps,
        anchor_x,
        anchor_y,
        pixel_format,
        palette_size,
        frames_per_direction: super::asf::frames_per_direction(frame_count.into(), directions.into()) as u16,
        total_individual_pixel_bytes: check_individual_total(total)?,
        palette,
        frames,
        blob_offset,
    })
}

/// Walks `id + len + data` chunks and returns the offset just past `END\0`.
fn skip_extension_chunks(reader: &mut ByteReader<'_>) -> DecodeResult<usize> {
    loop {
        let (Ok(id), Ok(len)) = (reader.read_array::<4>(), reader.read_u32()) else {
            return Err(DecodeError::MissingEndChunk);
        };
        if &id == CHUNK_END {
            return Ok(reader.position());
        }
        tracing::trace!(chunk = ?id, len, "skipping MSF extension chunk");
        reader.skip(len as usize).map_err(|_| DecodeError::MissingEndChunk)?;
    }
}

impl MsfHeader {
    /// Decoded palette.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Frame table.
    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[MsfFrameEntry] {
        &self.frames
    }

    /// Offset of the frame blob in the file.
    #[inline]
    #[must_use]
    pub const fn blob_offset(&self) -> usize {
        self.blob_offset
    }

    /// Bytes needed by [`decode_canvas`].
    #[inline]
    #[must_use]
    pub const fn canvas_output_len(&self) -> usize {
        self.canvas_width as usize * self.canvas_height as usize * RGBA_BYTES * self.frame_count as usize
    }

    /// Largest blob extent the frame table references.
    fn blob_extent(&self) -> u64 {
        self.frames
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| {
                let range = f.data_range(self.pixel_format);
                range.end as u64
            })
            .max()
            .unwrap_or(0)
    }

    /// Largest blob a decompressor may produce. A valid blob never holds
    /// more bytes than its frames decode to.
    fn blob_capacity(&self) -> u64 {
        self.blob_extent().min(self.total_individual_pixel_bytes as u64)
    }

    /// Frame blob, decompressed when flagged.
    ///
    /// # Errors
    ///
    /// `Decompress` if the stream is corrupt or inflates past what the frame
    /// table can reference.
    pub fn blob<'a>(&self, bytes: &'a [u8]) -> DecodeResult<Cow<'a, [u8]>> {
        let raw = bytes.get(self.blob_offset..).unwrap_or(&[]);
        match self.compression {
            Compression::None => Ok(Cow::Borrowed(raw)),
            Compression::Zstd => self.inflate_zstd(raw).map(Cow::Owned),
            Compression::Lz4 => self.inflate_lz4(raw).map(Cow::Owned),
        }
    }

    fn inflate_zstd(&self, raw: &[u8]) -> DecodeResult<Vec<u8>> {
        let capacity = self.blob_capacity();
        let declared = zstd::zstd_safe::get_frame_content_size(raw)
            .map_err(|_| DecodeError::Decompress("blob is not a zstd frame".into()))?;
        if let Some(declared) = declared.filter(|&d| d > capacity) {
            return Err(DecodeError::Decompress(format!(
                "declared size {declared} exceeds frame table extent {capacity}"
            )));
        }

        let mut out = Vec::with_capacity(declared.unwrap_or(0) as usize);
        zstd::stream::read::Decoder::with_buffer(raw)
            .map_err(|e| DecodeError::Decompress(e.to_string()))?
            .single_frame()
            .take(capacity + 1)
            .read_to_end(&mut out)
            .map_err(|e| DecodeError::Decompress(e.to_string()))?;
        if out.len() as u64 > capacity {
            return Err(DecodeError::Decompress(format!(
                "zstd frame inflates past frame table extent {capacity}"
            )));
        }
        Ok(out)
    }

    fn inflate_lz4(&self, raw: &[u8]) -> DecodeResult<Vec<u8>> {
        let declared = ByteReader::new(raw)
            .read_u32()
            .map_err(|_| DecodeError::Decompress("missing size prefix".into()))?;
        let capacity = self.blob_capacity();
        if u64::from(declared) > capacity {
            return Err(DecodeError::Decompress(format!(
                "declared size {declared} exceeds frame table extent {capacity}"
            )));
        }
        let reachable = (raw.len() as u64).saturating_mul(LZ4_MAX_RATIO);
        if u64::from(declared) > reachable {
            return Err(DecodeError::Decompress(format!(
                "declared size {declared} unreachable from {} compressed bytes",
                raw.len()
            )));
        }
        lz4_flex::decompress_size_prepended(raw).map_err(|e| DecodeError::Decompress(e.to_string()))
    }
}

/// Writes one row of blob pixels into RGBA. `src` and `dst` cover the same pixels.
fn paint_row(format: PixelFormat, palette: &Palette, src: &[u8], dst: &mut [u8]) {
    match format {
        PixelFormat::Rgba8 => dst.copy_from_slice(src),
        PixelFormat::Indexed8 => {
            for (&index, px) in src.iter().zip(dst.chunks_exact_mut(RGBA_BYTES)) {
                let colour = palette.get(index);
                if colour[3] > 0 {
                    px.copy_from_slice(&colour);
                }
            }
        }
        PixelFormat::Indexed8Alpha8 => {
            for (pair, px) in src.chunks_exact(2).zip(dst.chunks_exact_mut(RGBA_BYTES)) {
                let alpha = pair[1];
                if alpha > 0 {
                    let [r, g, b, _] = palette.get(pair[0]);
                    px.copy_from_slice(&[r, g, b, alpha]);
                }
            }
        }
    }
}

/// Decodes every frame composited onto its canvas.
///
/// Pixels falling outside the canvas are clipped.
///
/// # Errors
///
/// `OutputTooSmall` if `out` is shorter than [`MsfHeader::canvas_output_len`],
/// `Decompress` if the blob cannot be inflated.
pub fn decode_canvas(bytes: &[u8], header: &MsfHeader, out: &mut [u8]) -> DecodeResult<u32> {
    let required = header.canvas_output_len();
    ensure_len("pixel", required, out.len())?;
    let blob = header.blob(bytes)?;

    let cw = usize::from(header.canvas_width);
    let ch = usize::from(header.canvas_height);
    let frame_len = cw * ch * RGBA_BYTES;
    let bpp = header.pixel_format.bytes_per_pixel();

    for (index, entry) in header.frames.iter().enumerate() {
        let canvas = &mut out[index * frame_len..(index + 1) * frame_len];
        canvas.fill(0);
        if entry.is_empty() {
            continue;
        }
        let Some(src) = blob.get(entry.data_range(header.pixel_format)) else {
            tracing::debug!(frame = index, "MSF frame data outside blob, left transparent");
            continue;
        };

        let fw = i64::from(entry.width);
        let (ox, oy) = (i64::from(entry.offset_x), i64::from(entry.offset_y));
        // Visible columns of the box, in box coordinates.
        let x0 = (-ox).max(0);
        let x1 = fw.min(cw as i64 - ox);
        if x0 >= x1 {
            continue;
        }
        for y in 0..i64::from(entry.height) {
            let cy = oy + y;
            if cy < 0 || cy >= ch as i64 {
                continue;
            }
            let src_row = &src[((y * fw + x0) as usize) * bpp..((y * fw + x1) as usize) * bpp];
            let dst_start = ((cy * cw as i64 + ox + x0) as usize) * RGBA_BYTES;
            let dst_row = &mut canvas[dst_start..dst_start + (x1 - x0) as usize * RGBA_BYTES];
            paint_row(header.pixel_format, &header.palette, src_row, dst_row);
        }
    }
    Ok(u32::from(header.frame_count))
}

/// Decodes every frame at its bounding-box size into the individual layout.
///
/// # Errors
///
/// `OutputTooSmall` if any buffer is shorter than the header requires,
/// `Decompress` if the blob cannot be inflated.
pub fn decode_individual(
    bytes: &[u8],
    header: &MsfHeader,
    pixels: &mut [u8],
    sizes: &mut [u32],
    offsets: &mut [u32],
) -> DecodeResult<u32> {
    let mut writer = IndividualWriter::new(
        pixels,
        sizes,
        offsets,
        header.total_individual_pixel_bytes,
        usize::from(header.frame_count),
    )?;
    let blob = header.blob(bytes)?;
    for (index, entry) in header.frames.iter().enumerate() {
        let Some(out) = writer.next_frame(entry.width.into(), entry.height.into()) else {
            continue;
        };
        match blob.get(entry.data_range(header.pixel_format)) {
            Some(src) => paint_row(header.pixel_format, &header.palette, src, out),
            None => tracing::debug!(frame = index, "MSF frame data outside blob, left transparent"),
        }
    }
    Ok(u32::from(header.frame_count))
}
