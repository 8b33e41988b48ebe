//! # Batch Conversion
//!
//! File-level driver for [`kiln_sprite::convert`]: one file, or every
//! `.asf` / `.mpc` under a directory tree mirrored into an output tree with
//! the `.msf` extension. A failing file is recorded and the walk continues.

use std::fs;
use std::path::{Path, PathBuf};

use kiln_sprite::{
    to_msf_with, Compression, ContainerKind, DecodeError, DecodeLimits, PixelFormat, SpriteDecoder, SpriteHeader,
};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors from file conversion and verification.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The container could not be parsed, decoded or converted.
    #[error("{path}: {source}")]
    Decode {
        /// File that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: DecodeError,
    },

    /// Directory traversal failed.
    #[error("walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A verified file is not the container it was expected to be.
    #[error("{path}: expected {expected}, found {found}")]
    WrongKind {
        /// File that failed.
        path: PathBuf,
        /// Container required.
        expected: ContainerKind,
        /// Container found.
        found: ContainerKind,
    },

    /// Converted output does not decode to the source pixels.
    #[error("{path}: decoded pixels differ from {source_path} ({differing} bytes)")]
    PixelMismatch {
        /// Converted file.
        path: PathBuf,
        /// Source file.
        source_path: PathBuf,
        /// Count of differing bytes, including any length difference.
        differing: usize,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BatchError + '_ {
    move |source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn decode_error(path: &Path) -> impl FnOnce(DecodeError) -> BatchError + '_ {
    move |source| BatchError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

/// Outcome of [`convert_path`].
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// `(source, written)` pairs.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// Files that failed, with the reason.
    pub failed: Vec<BatchError>,
    /// Total bytes read from converted sources.
    pub input_bytes: u64,
    /// Total bytes written.
    pub output_bytes: u64,
}

impl ConvertReport {
    /// Output size as a fraction of input size, 0 when nothing was converted.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Returns true for paths with a convertible extension.
#[must_use]
pub fn is_convertible(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("asf") || ext.eq_ignore_ascii_case("mpc"))
}

/// Converts one file, returning `(input bytes, output bytes)`.
///
/// # Errors
///
/// `Io` if either file fails, `Decode` if the input is not a legacy container.
pub fn convert_file(
    input: &Path,
    output: &Path,
    limits: &DecodeLimits,
    compression: Compression,
) -> BatchResult<(u64, u64)> {
    let bytes = fs::read(input).map_err(io_error(input))?;
    let msf = to_msf_with(&bytes, limits, compression).map_err(decode_error(input))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(output, &msf).map_err(io_error(output))?;
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        from = bytes.len(),
        to = msf.len(),
        "converted"
    );
    Ok((bytes.len() as u64, msf.len() as u64))
}

/// Converts `input` to MSF.
///
/// A file input is written to `output`, or into it when `output` is an
/// existing directory. A directory input is walked recursively and mirrored
/// under `output`.
///
/// # Errors
///
/// A file input returns its conversion error. A directory input only fails
/// if the walk itself fails; per-file errors land in [`ConvertReport::failed`].
pub fn convert_path(
    input: &Path,
    output: &Path,
    limits: &DecodeLimits,
    compression: Compression,
) -> BatchResult<ConvertReport> {
    let mut report = ConvertReport::default();

    if !input.is_dir() {
        let target = if output.is_dir() {
            output.join(msf_name(input))
        } else {
            output.to_path_buf()
        };
        let (from, to) = convert_file(input, &target, limits, compression)?;
        report.input_bytes = from;
        report.output_bytes = to;
        report.converted.push((input.to_path_buf(), target));
        return Ok(report);
    }

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_convertible(path) {
            continue;
        }
        let relative = path.strip_prefix(input).unwrap_or(path);
        let target = output.join(relative).with_extension("msf");
        match convert_file(path, &target, limits, compression) {
            Ok((from, to)) => {
                report.input_bytes += from;
                report.output_bytes += to;
                report.converted.push((path.to_path_buf(), target));
            }
            Err(err) => {
                tracing::warn!(%err, "conversion failed");
                report.failed.push(err);
            }
        }
    }

    tracing::info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        "batch conversion finished"
    );
    Ok(report)
}

fn msf_name(input: &Path) -> PathBuf {
    let mut name = PathBuf::from(input.file_name().unwrap_or(input.as_os_str()));
    name.set_extension("msf");
    name
}

/// What [`verify_msf`] found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsfSummary {
    /// Container version field.
    pub version: u16,
    /// Blob compression.
    pub compression: Compression,
    /// Canvas width and height.
    pub canvas: (u16, u16),
    /// Frame count.
    pub frame_count: u32,
    /// Frames per direction.
    pub frames_per_direction: u32,
    /// Playback rate.
    pub fps: u8,
    /// Blob pixel format.
    pub pixel_format: PixelFormat,
    /// Stored palette entries.
    pub palette_size: u16,
    /// Frames with no visible pixels.
    pub empty_frames: usize,
    /// RGBA bytes decoded in the individual layout.
    pub decoded_bytes: usize,
}

/// Parses and fully decodes an MSF file. With `source`, also checks that
/// the file decodes to the same pixels as the ASF or MPC it came from.
///
/// ASF sources are compared in the canvas layout, MPC sources in the
/// individual layout.
///
/// # Errors
///
/// `Io`, `Decode` or `WrongKind` for unreadable files, `PixelMismatch` if a
/// source is given and the pixels differ.
pub fn verify_msf(path: &Path, source: Option<&Path>, limits: &DecodeLimits) -> BatchResult<MsfSummary> {
    let decoder = SpriteDecoder::new(*limits);
    let bytes = fs::read(path).map_err(io_error(path))?;
    let header = decoder.try_parse_header(&bytes).map_err(decode_error(path))?;
    let SpriteHeader::Msf(msf) = &header else {
        return Err(BatchError::WrongKind {
            path: path.to_path_buf(),
            expected: ContainerKind::Msf,
            found: header.kind(),
        });
    };

    let (individual, _, _) = decode_individual(&header, &bytes).map_err(decode_error(path))?;
    let summary = MsfSummary {
        version: msf.version,
        compression: msf.compression,
        canvas: (msf.canvas_width, msf.canvas_height),
        frame_count: header.frame_count(),
        frames_per_direction: header.frames_per_direction(),
        fps: msf.fps,
        pixel_format: msf.pixel_format,
        palette_size: msf.palette_size,
        empty_frames: msf.frames().iter().filter(|f| f.is_empty()).count(),
        decoded_bytes: individual.len(),
    };

    let Some(source_path) = source else {
        return Ok(summary);
    };
    let source_bytes = fs::read(source_path).map_err(io_error(source_path))?;
    let source_header = decoder
        .try_parse_header(&source_bytes)
        .map_err(decode_error(source_path))?;
    let (expected, got) = match source_header.kind() {
        ContainerKind::Asf => (
            decode_canvas(&source_header, &source_bytes).map_err(decode_error(source_path))?,
            decode_canvas(&header, &bytes).map_err(decode_error(path))?,
        ),
        ContainerKind::Mpc => (
            flatten(decode_individual(&source_header, &source_bytes).map_err(decode_error(source_path))?),
            flatten(decode_individual(&header, &bytes).map_err(decode_error(path))?),
        ),
        ContainerKind::Msf => {
            return Err(BatchError::WrongKind {
                path: source_path.to_path_buf(),
                expected: ContainerKind::Asf,
                found: ContainerKind::Msf,
            })
        }
    };

    let differing = byte_difference(&expected, &got);
    if differing > 0 {
        return Err(BatchError::PixelMismatch {
            path: path.to_path_buf(),
            source_path: source_path.to_path_buf(),
            differing,
        });
    }
    Ok(summary)
}

fn decode_canvas(header: &SpriteHeader, bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let len = header
        .canvas_output_len()
        .ok_or(DecodeError::UnsupportedLayout("MPC"))?;
    let mut out = vec![0; len];
    header.decode_canvas(bytes, &mut out)?;
    Ok(out)
}

type Individual = (Vec<u8>, Vec<u32>, Vec<u32>);

fn decode_individual(header: &SpriteHeader, bytes: &[u8]) -> Result<Individual, DecodeError> {
    let mut pixels = vec![0; header.individual_output_len()];
    let mut sizes = vec![0; header.size_table_len()];
    let mut offsets = vec![0; header.frame_count() as usize];
    header.decode_individual(bytes, &mut pixels, &mut sizes, &mut offsets)?;
    Ok((pixels, sizes, offsets))
}

/// Pixels plus both tables as one byte string, so a single diff covers all three.
fn flatten((mut pixels, sizes, offsets): Individual) -> Vec<u8> {
    pixels.extend(sizes.iter().chain(&offsets).flat_map(|v| v.to_le_bytes()));
    pixels
}

fn byte_difference(a: &[u8], b: &[u8]) -> usize {
    let shared = a.iter().zip(b).filter(|(x, y)| x != y).count();
    shared + a.len().abs_diff(b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_convertible() {
        assert!(is_convertible(Path::new("a/b/hero.asf")));
        assert!(is_convertible(Path::new("TILE.MPC")));
        assert!(!is_convertible(Path::new("hero.msf")));
        assert!(!is_convertible(Path::new("asf")));
    }

    #[test]
    fn test_msf_name() {
        assert_eq!(msf_name(Path::new("/data/npc/guard.asf")), PathBuf::from("guard.msf"));
    }

    #[test]
    fn test_byte_difference() {
        assert_eq!(byte_difference(&[1, 2, 3], &[1, 2, 3]), 0);
        assert_eq!(byte_difference(&[1, 2, 3], &[1, 9, 3, 4]), 2);
    }

    #[test]
    fn test_report_ratio() {
        let report = ConvertReport {
            input_bytes: 200,
            output_bytes: 50,
            ..ConvertReport::default()
        };
        assert!((report.ratio() - 0.25).abs() < f64::EPSILON);
        assert!(ConvertReport::default().ratio().abs() < f64::EPSILON);
    }
}
