//! # Run-Length Streams
//!
//! The two legacy formats use different run encodings. Both walkers emit
//! only the pixels that carry a palette index; skipped pixels are left to
//! whatever the caller cleared the frame to.
//!
//! | Format | Run header | Meaning |
//! |---|---|---|
//! | ASF | `count, alpha` | `alpha == 0`: skip `count`; else `count` indices drawn with `alpha` |
//! | MPC | `byte > 0x80` | skip `byte - 0x80` |
//! | MPC | `byte <= 0x80` | `byte` literal indices, opaque |
//!
//! Walks stop at the end of the stream or once `pixel_count` pixels are covered.

/// Walks an ASF frame stream, calling `draw(pixel, index, alpha)` per drawn pixel.
pub fn walk_asf(stream: &[u8], pixel_count: usize, mut draw: impl FnMut(usize, u8, u8)) {
    let mut pos = 0;
    let mut pixel = 0;
    while pixel < pixel_count {
        let Some(&[count, alpha]) = stream.get(pos..pos + 2) else {
            break;
        };
        pos += 2;
        let count = usize::from(count);
        if alpha == 0 {
            pixel += count;
            continue;
        }
        let run = count.min(pixel_count - pixel).min(stream.len() - pos);
        for (offset, &index) in stream[pos..pos + run].iter().enumerate() {
            draw(pixel + offset, index, alpha);
        }
        pos += run;
        pixel += run;
    }
}

/// Walks an MPC frame stream, calling `draw(pixel, index)` per drawn pixel.
pub fn walk_mpc(stream: &[u8], pixel_count: usize, mut draw: impl FnMut(usize, u8)) {
    let mut pos = 0;
    let mut pixel = 0;
    while pixel < pixel_count {
        let Some(&byte) = stream.get(pos) else {
            break;
        };
        pos += 1;
        if byte > 0x80 {
            pixel += usize::from(byte - 0x80);
            continue;
        }
        let run = usize::from(byte)
            .min(pixel_count - pixel)
            .min(stream.len() - pos);
        for (offset, &index) in stream[pos..pos + run].iter().enumerate() {
            draw(pixel + offset, index);
        }
        pos += run;
        pixel += run;
    }
}
