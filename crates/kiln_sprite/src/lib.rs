//! # KILN Sprite
//!
//! Decoders for the runtime's sprite and tile containers, plus an encoder
//! for the indexed-palette MSF format:
//! - **ASF** - legacy sprite animations, every frame the same size
//! - **MPC / SHD** - legacy tile and shadow packs, per-frame sizes
//! - **MSF** - palette + frame table + raw, zstd (flag bit 0) or LZ4 (flag bit 1) blob
//!
//! ## Decode Protocol
//!
//! 1. [`parse_header`] reads only the header and reports the buffer sizes
//! 2. The caller allocates those buffers once
//! 3. [`decode_frames`] / [`decode_individual_frames`] fill them
//!
//! Malformed input never panics. The `try_` forms return a
//! [`DecodeError`]; the plain forms return `None` / `0`.
//!
//! ## Example
//!
//! ```rust
//! use kiln_sprite::{parse_header, try_parse_header, DecodeError};
//!
//! assert!(parse_header(&[0x41, 0x53, 0x46, 0x20]).is_none());
//! assert_eq!(try_parse_header(&[0xAB; 256]), Err(DecodeError::BadMagic));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod codec;
pub mod container;
pub mod convert;
pub mod error;
pub mod layout;
pub mod limits;
pub mod palette;
pub mod reader;
pub mod rle;
pub mod writer;

pub use codec::asf::AsfHeader;
pub use codec::mpc::MpcHeader;
pub use codec::msf::{
    encode, encode_frames, Compression, MsfEncodeInput, MsfFrame, MsfFrameEntry, MsfHeader, MsfLayout, PixelFormat,
};
pub use container::{
    decode_frames, decode_individual_frames, parse_header, try_decode_frames, try_decode_individual_frames,
    try_parse_header, ContainerKind, SpriteDecoder, SpriteHeader,
};
pub use convert::{asf_to_msf, asf_to_msf_with, mpc_to_msf, mpc_to_msf_with, to_msf, to_msf_with};
pub use error::{DecodeError, DecodeResult};
pub use layout::RGBA_BYTES;
pub use limits::DecodeLimits;
pub use palette::{Palette, Rgba};
