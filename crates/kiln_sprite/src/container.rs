//! # Unified Container API
//!
//! Two-phase protocol: parse the header, size the output buffers from it,
//! then decode.
//!
//! ```text
//! parse_header(bytes) ──► SpriteHeader ──► canvas_output_len()     ──► decode_frames(bytes, out)
//!                                     └──► individual_output_len() ──► decode_individual_frames(bytes, px, sizes, offsets)
//! ```
//!
//! Every entry point has a `try_` form returning [`DecodeError`]. The plain
//! forms collapse failures to `None` / `0` and log them at debug level.
//! Undersized output buffers are a caller bug: the plain forms panic with
//! the required and actual sizes.

use std::fmt;

use crate::codec::asf::{self, AsfHeader};
use crate::codec::mpc::{self, MpcHeader};
use crate::codec::msf::{self, MsfHeader};
use crate::error::{DecodeError, DecodeResult};
use crate::limits::DecodeLimits;

/// Which container a byte stream holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Legacy sprite animation.
    Asf,
    /// Legacy tile or shadow pack.
    Mpc,
    /// Indexed-palette container.
    Msf,
}

impl ContainerKind {
    /// Identifies the container from its magic bytes.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if asf::is_asf(bytes) {
            Some(Self::Asf)
        } else if mpc::is_mpc(bytes) {
            Some(Self::Mpc)
        } else if msf::is_msf(bytes) {
            Some(Self::Msf)
        } else {
            None
        }
    }

    /// Conventional lower-case file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Asf => "asf",
            Self::Mpc => "mpc",
            Self::Msf => "msf",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asf => "ASF",
            Self::Mpc => "MPC",
            Self::Msf => "MSF",
        })
    }
}

/// Parsed header of any supported container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpriteHeader {
    /// ASF header.
    Asf(AsfHeader),
    /// MPC / SHD header.
    Mpc(MpcHeader),
    /// MSF header.
    Msf(MsfHeader),
}

impl SpriteHeader {
    /// Container kind.
    #[must_use]
    pub const fn kind(&self) -> ContainerKind {
        match self {
            Self::Asf(_) => ContainerKind::Asf,
            Self::Mpc(_) => ContainerKind::Mpc,
            Self::Msf(_) => ContainerKind::Msf,
        }
    }

    /// Total frames.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        match self {
            Self::Asf(h) => h.frame_count,
            Self::Mpc(h) => h.frame_count,
            Self::Msf(h) => h.frame_count.into(),
        }
    }

    /// Facing directions.
    #[must_use]
    pub fn directions(&self) -> u32 {
        match self {
            Self::Asf(h) => h.directions,
            Self::Mpc(h) => h.direction,
            Self::Msf(h) => h.directions.into(),
        }
    }

    /// Frames in one direction's loop, at least 1.
    #[must_use]
    pub fn frames_per_direction(&self) -> u32 {
        match self {
            Self::Asf(h) => h.frames_per_direction,
            Self::Mpc(h) => h.frames_per_direction,
            Self::Msf(h) => h.frames_per_direction.into(),
        }
    }

    /// Milliseconds per frame. MSF stores a rate, converted here; 0 when unset.
    #[must_use]
    pub fn interval_ms(&self) -> u32 {
        match self {
            Self::Asf(h) => h.interval,
            Self::Mpc(h) => h.interval,
            Self::Msf(h) if h.fps > 0 => 1000 / u32::from(h.fps),
            Self::Msf(_) => 0,
        }
    }

    /// Global width and height. For MPC this is the pack size, not a frame size.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        match self {
            Self::Asf(h) => (h.width, h.height),
            Self::Mpc(h) => (h.global_width, h.global_height),
            Self::Msf(h) => (h.canvas_width.into(), h.canvas_height.into()),
        }
    }

    /// Anchor point as `(left, bottom)` for the legacy formats, `(x, y)` for MSF.
    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        match self {
            Self::Asf(h) => (h.left, h.bottom),
            Self::Mpc(h) => (h.left, h.bottom),
            Self::Msf(h) => (h.anchor_x.into(), h.anchor_y.into()),
        }
    }

    /// Bytes needed by the canvas layout, `None` where it is unsupported.
    #[must_use]
    pub fn canvas_output_len(&self) -> Option<usize> {
        match self {
            Self::Asf(h) => Some(h.canvas_output_len()),
            Self::Mpc(_) => None,
            Self::Msf(h) => Some(h.canvas_output_len()),
        }
    }

    /// Pixel bytes needed by the individual layout.
    #[must_use]
    pub fn individual_output_len(&self) -> usize {
        match self {
            Self::Asf(h) => h.individual_output_len(),
            Self::Mpc(h) => h.total_pixel_bytes,
            Self::Msf(h) => h.total_individual_pixel_bytes,
        }
    }

    /// `u32` entries needed in the frame size table.
    #[must_use]
    pub fn size_table_len(&self) -> usize {
        self.frame_count() as usize * 2
    }

    /// Decodes `bytes` (the stream this header came from) into the canvas layout.
    ///
    /// # Errors
    ///
    /// `UnsupportedLayout` for MPC, `OutputTooSmall` for a short buffer,
    /// `Decompress` for a corrupt MSF blob.
    pub fn decode_canvas(&self, bytes: &[u8], out: &mut [u8]) -> DecodeResult<u32> {
        match self {
            Self::Asf(h) => asf::decode_canvas(bytes, h, out),
            Self::Mpc(_) => Err(DecodeError::UnsupportedLayout("MPC")),
            Self::Msf(h) => msf::decode_canvas(bytes, h, out),
        }
    }

    /// Decodes `bytes` into the individual layout.
    ///
    /// # Errors
    ///
    /// `OutputTooSmall` for a short buffer, `Decompress` for a corrupt MSF blob.
    pub fn decode_individual(
        &self,
        bytes: &[u8],
        pixels: &mut [u8],
        sizes: &mut [u32],
        offsets: &mut [u32],
    ) -> DecodeResult<u32> {
        match self {
            Self::Asf(h) => asf::decode_individual(bytes, h, pixels, sizes, offsets),
            Self::Mpc(h) => mpc::decode_individual(bytes, h, pixels, sizes, offsets),
            Self::Msf(h) => msf::decode_individual(bytes, h, pixels, sizes, offsets),
        }
    }
}

/// Container decoder bound to a set of [`DecodeLimits`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteDecoder {
    limits: DecodeLimits,
}

impl SpriteDecoder {
    /// Creates a decoder with the given limits.
    #[must_use]
    pub const fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    /// Active limits.
    #[inline]
    #[must_use]
    pub const fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Detects the container and parses its header.
    ///
    /// # Errors
    ///
    /// `BadMagic` for unknown containers, otherwise the format's parse errors.
    pub fn try_parse_header(&self, bytes: &[u8]) -> DecodeResult<SpriteHeader> {
        match ContainerKind::detect(bytes) {
            Some(ContainerKind::Asf) => asf::parse(bytes, &self.limits).map(SpriteHeader::Asf),
            Some(ContainerKind::Mpc) => mpc::parse(bytes, &self.limits).map(SpriteHeader::Mpc),
            Some(ContainerKind::Msf) => msf::parse(bytes, &self.limits).map(SpriteHeader::Msf),
            None if bytes.len() < 4 => Err(DecodeError::Truncated {
                offset: 0,
                needed: 4,
                len: bytes.len(),
            }),
            None => Err(DecodeError::BadMagic),
        }
    }

    /// Parses a header, `None` on malformed input.
    #[must_use]
    pub fn parse_header(&self, bytes: &[u8]) -> Option<SpriteHeader> {
        self.try_parse_header(bytes)
            .map_err(|err| tracing::debug!(%err, len = bytes.len(), "rejected sprite header"))
            .ok()
    }

    /// Parses and decodes every frame into the canvas layout.
    ///
    /// # Errors
    ///
    /// Parse errors, then [`SpriteHeader::decode_canvas`] errors.
    pub fn try_decode_frames(&self, bytes: &[u8], out: &mut [u8]) -> DecodeResult<u32> {
        self.try_parse_header(bytes)?.decode_canvas(bytes, out)
    }

    /// Decodes into the canvas layout, returning the frame count or 0.
    ///
    /// # Panics
    ///
    /// If `out` is shorter than [`SpriteHeader::canvas_output_len`].
    pub fn decode_frames(&self, bytes: &[u8], out: &mut [u8]) -> u32 {
        sentinel(self.try_decode_frames(bytes, out))
    }

    /// Parses and decodes every frame into the individual layout.
    ///
    /// # Errors
    ///
    /// Parse errors, then [`SpriteHeader::decode_individual`] errors.
    pub fn try_decode_individual_frames(
        &self,
        bytes: &[u8],
        pixels: &mut [u8],
        sizes: &mut [u32],
        offsets: &mut [u32],
    ) -> DecodeResult<u32> {
        self.try_parse_header(bytes)?
            .decode_individual(bytes, pixels, sizes, offsets)
    }

    /// Decodes into the individual layout, returning the frame count or 0.
    ///
    /// # Panics
    ///
    /// If any output buffer is shorter than the header requires.
    pub fn decode_individual_frames(
        &self,
        bytes: &[u8],
        pixels: &mut [u8],
        sizes: &mut [u32],
        offsets: &mut [u32],
    ) -> u32 {
        sentinel(self.try_decode_individual_frames(bytes, pixels, sizes, offsets))
    }
}

fn sentinel(result: DecodeResult<u32>) -> u32 {
    match result {
        Ok(frames) => frames,
        Err(DecodeError::OutputTooSmall {
            what,
            required,
            actual,
        }) => panic!("{what} buffer too small for decode: need {required}, got {actual}"),
        Err(err) => {
            tracing::debug!(%err, "sprite decode failed");
            0
        }
    }
}

/// [`SpriteDecoder::parse_header`] with default limits.
#[must_use]
pub fn parse_header(bytes: &[u8]) -> Option<SpriteHeader> {
    SpriteDecoder::default().parse_header(bytes)
}

/// [`SpriteDecoder::try_parse_header`] with default limits.
///
/// # Errors
///
/// See [`SpriteDecoder::try_parse_header`].
pub fn try_parse_header(bytes: &[u8]) -> DecodeResult<SpriteHeader> {
    SpriteDecoder::default().try_parse_header(bytes)
}

/// [`SpriteDecoder::decode_frames`] with default limits.
///
/// # Panics
///
/// If `out` is shorter than the header requires.
pub fn decode_frames(bytes: &[u8], out: &mut [u8]) -> u32 {
    SpriteDecoder::default().decode_frames(bytes, out)
}

/// [`SpriteDecoder::try_decode_frames`] with default limits.
///
/// # Errors
///
/// See [`SpriteDecoder::try_decode_frames`].
pub fn try_decode_frames(bytes: &[u8], out: &mut [u8]) -> DecodeResult<u32> {
    SpriteDecoder::default().try_decode_frames(bytes, out)
}

/// [`SpriteDecoder::decode_individual_frames`] with default limits.
///
/// # Panics
///
/// If any output buffer is shorter than the header requires.
pub fn decode_individual_frames(bytes: &[u8], pixels: &mut [u8], sizes: &mut [u32], offsets: &mut [u32]) -> u32 {
    SpriteDecoder::default().decode_individual_frames(bytes, pixels, sizes, offsets)
}

/// [`SpriteDecoder::try_decode_individual_frames`] with default limits.
///
/// # Errors
///
/// See [`SpriteDecoder::try_decode_individual_frames`].
pub fn try_decode_individual_frames(
    bytes: &[u8],
    pixels: &mut [u8],
    sizes: &mut [u32],
    offsets: &mut [u32],
) -> DecodeResult<u32> {
    SpriteDecoder::default().try_decode_individual_frames(bytes, pixels, sizes, offsets)
}
