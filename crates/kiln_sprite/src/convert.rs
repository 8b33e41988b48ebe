//! # Legacy to MSF Conversion
//!
//! Both legacy formats already store palette indices, so conversion never
//! quantises: RLE runs are expanded straight into an `Indexed8Alpha8`
//! plane and the source palette is copied across.
//!
//! - ASF frames are cropped to their visible pixels and keep their place on
//!   the canvas through the frame offset. Canvas decodes of the result
//!   match the ASF decode byte for byte.
//! - MPC frames keep their own size at offset `(0, 0)`, so individual
//!   decodes of the result match the MPC decode byte for byte.

use crate::codec::asf::{self, AsfHeader};
use crate::codec::msf::{encode_frames, fps_from_interval, Compression, MsfFrame, MsfLayout, PixelFormat};
use crate::codec::mpc::{self, MpcHeader};
use crate::container::ContainerKind;
use crate::error::{DecodeError, DecodeResult};
use crate::layout::{crop, tight_bbox, Bbox};
use crate::limits::DecodeLimits;
use crate::palette::Palette;
use crate::rle::{walk_asf, walk_mpc};

/// Bytes per pixel in an `Indexed8Alpha8` plane.
const PLANE_STRIDE: usize = 2;

/// Converts an ASF file with default limits.
///
/// # Errors
///
/// See [`asf_to_msf_with`].
pub fn asf_to_msf(bytes: &[u8], compression: Compression) -> DecodeResult<Vec<u8>> {
    asf_to_msf_with(bytes, &DecodeLimits::default(), compression)
}

/// Converts an ASF file to an MSF container.
///
/// # Errors
///
/// Any ASF parse error, or `FrameTooLarge` if the canvas does not fit the
/// MSF header fields.
pub fn asf_to_msf_with(bytes: &[u8], limits: &DecodeLimits, compression: Compression) -> DecodeResult<Vec<u8>> {
    let header = asf::parse(bytes, limits)?;
    let layout = asf_layout(&header)?;
    let (width, height) = (header.width as usize, header.height as usize);

    let mut plane = vec![0u8; header.pixels_per_frame() * PLANE_STRIDE];
    let mut frames = Vec::with_capacity(header.frame_count as usize);
    for index in 0..header.frame_count as usize {
        plane.fill(0);
        walk_asf(header.frame_stream(bytes, index), header.pixels_per_frame(), |pixel, colour, alpha| {
            plane[pixel * PLANE_STRIDE] = colour;
            plane[pixel * PLANE_STRIDE + 1] = alpha;
        });
        let frame = match tight_bbox(&plane, width, height, PLANE_STRIDE, 1) {
            Some(bbox) => MsfFrame::from_bbox(bbox, crop(&plane, width, PLANE_STRIDE, bbox))?,
            None => MsfFrame::empty(),
        };
        frames.push(frame);
    }

    tracing::debug!(
        frames = header.frame_count,
        width = header.width,
        height = header.height,
        "converting ASF to MSF"
    );
    encode_frames(&layout, &frames, compression)
}

fn asf_layout(header: &AsfHeader) -> DecodeResult<MsfLayout> {
    let too_large = || DecodeError::FrameTooLarge {
        width: header.width.into(),
        height: header.height.into(),
        max: u32::from(u16::MAX),
    };
    Ok(MsfLayout {
        canvas_width: u16::try_from(header.width).map_err(|_| too_large())?,
        canvas_height: u16::try_from(header.height).map_err(|_| too_large())?,
        directions: header.directions.min(255) as u8,
        fps: fps_from_interval(header.interval),
        anchor_x: clamp_i16(header.left),
        anchor_y: clamp_i16(header.bottom),
        pixel_format: PixelFormat::Indexed8Alpha8,
        palette: header.palette().entries().to_vec(),
    })
}

/// Converts an MPC or SHD file with default limits.
///
/// # Errors
///
/// See [`mpc_to_msf_with`].
pub fn mpc_to_msf(bytes: &[u8], compression: Compression) -> DecodeResult<Vec<u8>> {
    mpc_to_msf_with(bytes, &DecodeLimits::default(), compression)
}

/// Converts an MPC or SHD file to an MSF container.
///
/// Placeholder frames become empty frames, which decode to the same 1x1
/// transparent pixel.
///
/// # Errors
///
/// Any MPC parse error, or `FrameTooLarge` if a size does not fit the MSF
/// header fields.
pub fn mpc_to_msf_with(bytes: &[u8], limits: &DecodeLimits, compression: Compression) -> DecodeResult<Vec<u8>> {
    let header = mpc::parse(bytes, limits)?;
    let layout = mpc_layout(&header)?;
    let palette = header.palette();

    let mut frames = Vec::with_capacity(header.frame_count as usize);
    for frame in header.frames() {
        if frame.is_placeholder() {
            frames.push(MsfFrame::empty());
            continue;
        }
        let bbox = Bbox {
            x: 0,
            y: 0,
            width: frame.width as usize,
            height: frame.height as usize,
        };
        let data = mpc_plane(frame.stream(bytes), frame.pixel_count(), palette);
        frames.push(MsfFrame::from_bbox(bbox, data)?);
    }

    tracing::debug!(
        frames = header.frame_count,
        shadow = header.shadow,
        "converting MPC to MSF"
    );
    encode_frames(&layout, &frames, compression)
}

fn mpc_plane(stream: &[u8], pixel_count: usize, palette: &Palette) -> Vec<u8> {
    let mut plane = vec![0u8; pixel_count * PLANE_STRIDE];
    walk_mpc(stream, pixel_count, |pixel, index| {
        plane[pixel * PLANE_STRIDE] = index;
        plane[pixel * PLANE_STRIDE + 1] = palette.get(index)[3];
    });
    plane
}

fn mpc_layout(header: &MpcHeader) -> DecodeResult<MsfLayout> {
    let too_large = || DecodeError::FrameTooLarge {
        width: header.global_width.into(),
        height: header.global_height.into(),
        max: u32::from(u16::MAX),
    };
    Ok(MsfLayout {
        canvas_width: u16::try_from(header.global_width).map_err(|_| too_large())?,
        canvas_height: u16::try_from(header.global_height).map_err(|_| too_large())?,
        directions: header.direction.min(255) as u8,
        fps: fps_from_interval(header.interval),
        anchor_x: clamp_i16(header.left),
        anchor_y: clamp_i16(header.bottom),
        pixel_format: PixelFormat::Indexed8Alpha8,
        palette: header.palette().entries().to_vec(),
    })
}

/// Converts any legacy container with default limits.
///
/// # Errors
///
/// See [`to_msf_with`].
pub fn to_msf(bytes: &[u8], compression: Compression) -> DecodeResult<Vec<u8>> {
    to_msf_with(bytes, &DecodeLimits::default(), compression)
}

/// Detects the container and converts it.
///
/// # Errors
///
/// `BadMagic` for unknown input, `UnsupportedLayout("MSF")` for input that
/// is already MSF, otherwise as the format-specific converter.
pub fn to_msf_with(bytes: &[u8], limits: &DecodeLimits, compression: Compression) -> DecodeResult<Vec<u8>> {
    match ContainerKind::detect(bytes) {
        Some(ContainerKind::Asf) => asf_to_msf_with(bytes, limits, compression),
        Some(ContainerKind::Mpc) => mpc_to_msf_with(bytes, limits, compression),
        Some(ContainerKind::Msf) => Err(DecodeError::UnsupportedLayout("MSF")),
        None => Err(DecodeError::BadMagic),
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}
