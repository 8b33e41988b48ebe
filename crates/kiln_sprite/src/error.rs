//! # Decode Errors

use thiserror::Error;

/// Why a container was rejected or could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ends before a required field.
    #[error("input truncated: need {needed} bytes at offset {offset}, have {len}")]
    Truncated {
        /// Offset of the field.
        offset: usize,
        /// Bytes the field needs.
        needed: usize,
        /// Total input length.
        len: usize,
    },

    /// The leading bytes match no known container.
    #[error("unrecognised container magic")]
    BadMagic,

    /// The declared frame count is negative, above the limit, or the frame
    /// table does not fit in the input.
    #[error("impossible frame count {count} (at most {max})")]
    ImpossibleFrameCount {
        /// Declared count.
        count: i64,
        /// Largest count that would have been accepted.
        max: i64,
    },

    /// A frame or canvas dimension is negative or above the limit.
    #[error("frame size {width}x{height} exceeds limit {max}")]
    FrameTooLarge {
        /// Declared width.
        width: i64,
        /// Declared height.
        height: i64,
        /// Configured maximum edge length.
        max: u32,
    },

    /// The palette declares more entries than allowed.
    #[error("palette of {count} entries exceeds limit {max}")]
    PaletteTooLarge {
        /// Declared entry count.
        count: i64,
        /// Configured maximum.
        max: u32,
    },

    /// MSF pixel-format tag is not one of the known formats.
    #[error("unknown pixel format tag {0}")]
    UnknownPixelFormat(u8),

    /// The MSF frame blob failed to decompress.
    #[error("frame blob decompression failed: {0}")]
    Decompress(String),

    /// The MSF frame blob failed to compress.
    #[error("frame blob compression failed: {0}")]
    Compress(String),

    /// The container cannot be decoded into the requested layout.
    #[error("{0} containers do not support the canvas layout")]
    UnsupportedLayout(&'static str),

    /// A caller-provided output buffer is shorter than the header requires.
    #[error("{what} buffer too small: need {required}, got {actual}")]
    OutputTooSmall {
        /// Which buffer.
        what: &'static str,
        /// Elements required.
        required: usize,
        /// Elements provided.
        actual: usize,
    },

    /// MSF extension chunks run off the end of the input without `END\0`.
    #[error("extension chunks end without an END chunk")]
    MissingEndChunk,

    /// Individual-layout output would not be addressable with 32-bit offsets.
    #[error("decoded output of {0} bytes exceeds the 32-bit offset range")]
    OutputTooLarge(u64),
}

/// Result type for sprite operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
