//! Hand-assembled container files.

#![allow(dead_code)]

/// Builds an ASF file. `palette` is BGRA as stored on disk.
pub fn asf(
    width: i32,
    height: i32,
    directions: i32,
    interval: i32,
    anchor: (i32, i32),
    palette: &[[u8; 4]],
    streams: &[Vec<u8>],
) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"ASF 1.0\0\0\0\0\0\0\0\0\0");
    let fields = [
        width,
        height,
        streams.len() as i32,
        directions,
        palette.len() as i32,
        interval,
        anchor.0,
        anchor.1,
    ];
    for field in fields {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&[0; 16]);
    for entry in palette {
        bytes.extend_from_slice(entry);
    }
    let mut offset = bytes.len() + streams.len() * 8;
    for stream in streams {
        bytes.extend_from_slice(&(offset as i32).to_le_bytes());
        bytes.extend_from_slice(&(stream.len() as i32).to_le_bytes());
        offset += stream.len();
    }
    for stream in streams {
        bytes.extend_from_slice(stream);
    }
    if bytes.len() < 80 {
        bytes.resize(80, 0);
    }
    bytes
}

/// One ASF run per pixel: `(index, alpha)`, alpha 0 skips.
pub fn asf_stream(pixels: &[(u8, u8)]) -> Vec<u8> {
    let mut stream = Vec::new();
    for &(index, alpha) in pixels {
        if alpha == 0 {
            stream.extend_from_slice(&[1, 0]);
        } else {
            stream.extend_from_slice(&[1, alpha, index]);
        }
    }
    stream
}

/// An MPC frame: `(width, height, rle)`.
pub type MpcFrameSpec = (u32, u32, Vec<u8>);

/// Builds an MPC (or SHD) file. `palette` is BGRA as stored on disk.
pub fn mpc(shadow: bool, size: (u32, u32), bottom: i32, palette: &[[u8; 4]], frames: &[MpcFrameSpec]) -> Vec<u8> {
    let mut bytes = vec![0u8; 128];
    bytes[..12].copy_from_slice(if shadow { b"SHD File Ver" } else { b"MPC File Ver" });
    let data_sum: u32 = frames.iter().map(|f| 20 + f.2.len() as u32).sum();
    let fields = [data_sum, size.0, size.1, frames.len() as u32, 1, palette.len() as u32, 80];
    for (i, field) in fields.iter().enumerate() {
        bytes[64 + i * 4..68 + i * 4].copy_from_slice(&field.to_le_bytes());
    }
    bytes[92..96].copy_from_slice(&bottom.to_le_bytes());
    for entry in palette {
        bytes.extend_from_slice(entry);
    }
    let mut relative = 0u32;
    for frame in frames {
        bytes.extend_from_slice(&relative.to_le_bytes());
        relative += 20 + frame.2.len() as u32;
    }
    for (width, height, rle) in frames {
        bytes.extend_from_slice(&(20 + rle.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.extend_from_slice(&[0; 8]);
        bytes.extend_from_slice(rle);
    }
    if bytes.len() < 160 {
        bytes.resize(160, 0);
    }
    bytes
}

/// File offset of frame `index`'s header in a file built by [`mpc`].
pub fn mpc_frame_offset(palette_len: usize, frames: &[MpcFrameSpec], index: usize) -> usize {
    let before: usize = frames[..index].iter().map(|f| 20 + f.2.len()).sum();
    128 + palette_len * 4 + frames.len() * 4 + before
}

/// Wraps `data` in a zstd frame of raw blocks, as a third-party encoder may
/// write it: `block` bytes per block, content size in the header or not.
pub fn zstd_frame(data: &[u8], block: usize, content_size: bool) -> Vec<u8> {
    let mut frame = vec![0x28, 0xB5, 0x2F, 0xFD];
    if content_size {
        // Single segment, 4-byte content size.
        frame.push(0xA0);
        frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
    } else {
        // 128 KiB window, no content size.
        frame.push(0x00);
        frame.push(7 << 3);
    }
    let chunks: Vec<&[u8]> = if data.is_empty() { vec![data] } else { data.chunks(block).collect() };
    for (i, chunk) in chunks.iter().enumerate() {
        let last = u32::from(i + 1 == chunks.len());
        let header = ((chunk.len() as u32) << 3) | last;
        frame.extend_from_slice(&header.to_le_bytes()[..3]);
        frame.extend_from_slice(chunk);
    }
    frame
}

/// Re-packs an uncompressed MSF with its blob zstd-compressed under flag bit 0.
pub fn with_zstd_blob(msf: &[u8], blob_offset: usize, block: usize, content_size: bool) -> Vec<u8> {
    let mut bytes = msf[..blob_offset].to_vec();
    let flags = u16::from_le_bytes([bytes[6], bytes[7]]) | 1;
    bytes[6..8].copy_from_slice(&flags.to_le_bytes());
    bytes.extend_from_slice(&zstd_frame(&msf[blob_offset..], block, content_size));
    bytes
}

/// 3x2 walk cycle, two directions of two frames, red/green/blue palette.
pub fn walk_cycle_asf() -> Vec<u8> {
    let palette = [[0, 0, 255, 0], [0, 255, 0, 0], [255, 0, 0, 0]];
    let frames = [
        vec![(0, 255), (0, 0), (1, 255), (0, 0), (2, 128), (0, 0)],
        vec![(0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
        vec![(2, 255), (2, 255), (2, 255), (1, 64), (1, 64), (1, 64)],
        vec![(0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (7, 200)],
    ];
    let streams: Vec<Vec<u8>> = frames.iter().map(|f| asf_stream(f)).collect();
    asf(3, 2, 2, 125, (1, 2), &palette, &streams)
}

/// 40x20 tile pack with a 3x2 frame, a placeholder and a 1x1 frame.
pub fn tile_pack_mpc() -> Vec<u8> {
    let palette = [[10, 20, 30, 0], [40, 50, 60, 0]];
    let frames = [
        (3, 2, vec![0x81, 2, 0, 1, 2, 1, 0, 9]),
        (0, 4, Vec::new()),
        (1, 1, vec![1, 1]),
    ];
    mpc(false, (40, 20), 3, &palette, &frames)
}
