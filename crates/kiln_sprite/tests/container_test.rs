//! End-to-end decode and conversion over hand-assembled files.

mod fixtures;

use kiln_sprite::{
    asf_to_msf, decode_frames, decode_individual_frames, mpc_to_msf, parse_header, to_msf, try_decode_frames,
    try_decode_individual_frames, try_parse_header, Compression, ContainerKind, DecodeError, DecodeLimits,
    SpriteDecoder, SpriteHeader,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const CLEAR: [u8; 4] = [0; 4];

struct Individual {
    pixels: Vec<u8>,
    sizes: Vec<u32>,
    offsets: Vec<u32>,
}

fn canvas(bytes: &[u8]) -> Vec<u8> {
    let header = parse_header(bytes).expect("header");
    let mut out = vec![0xA5; header.canvas_output_len().expect("canvas layout")];
    assert_eq!(decode_frames(bytes, &mut out), header.frame_count());
    out
}

fn individual(bytes: &[u8]) -> Individual {
    let header = parse_header(bytes).expect("header");
    let mut result = Individual {
        pixels: vec![0xA5; header.individual_output_len()],
        sizes: vec![0; header.size_table_len()],
        offsets: vec![0; header.frame_count() as usize],
    };
    let frames = decode_individual_frames(bytes, &mut result.pixels, &mut result.sizes, &mut result.offsets);
    assert_eq!(frames, header.frame_count());
    result
}

// =============================================================================
// HEADERS
// =============================================================================

#[test]
fn test_short_input_has_no_header() {
    assert!(parse_header(&[0x41, 0x53, 0x46, 0x20]).is_none());
    assert!(parse_header(&[]).is_none());
    assert!(parse_header(b"ASF 1.0").is_none());
}

#[test]
fn test_asf_header_fields() {
    let bytes = fixtures::walk_cycle_asf();
    let header = parse_header(&bytes).unwrap();
    assert_eq!(header.kind(), ContainerKind::Asf);
    assert_eq!(header.frame_count(), 4);
    assert_eq!(header.directions(), 2);
    assert_eq!(header.frames_per_direction(), 2);
    assert_eq!(header.interval_ms(), 125);
    assert_eq!(header.canvas_size(), (3, 2));
    assert_eq!(header.anchor(), (1, 2));
    assert_eq!(header.canvas_output_len(), Some(4 * 3 * 2 * 4));
    assert_eq!(header.individual_output_len(), 4 * 3 * 2 * 4);
}

#[test]
fn test_parse_header_is_repeatable() {
    for bytes in [fixtures::walk_cycle_asf(), fixtures::tile_pack_mpc()] {
        assert_eq!(parse_header(&bytes), parse_header(&bytes));
    }
}

#[test]
fn test_mpc_header_fields() {
    let bytes = fixtures::tile_pack_mpc();
    let header = parse_header(&bytes).unwrap();
    assert_eq!(header.kind(), ContainerKind::Mpc);
    assert_eq!(header.canvas_size(), (40, 20));
    assert_eq!(header.anchor(), (20, 20 - 16 - 3));
    assert_eq!(header.canvas_output_len(), None);
    assert_eq!(header.individual_output_len(), 24 + 4 + 4);
    let SpriteHeader::Mpc(mpc) = &header else {
        panic!("expected MPC header");
    };
    assert!(!mpc.shadow);
}

#[test]
fn test_shadow_pack_detected() {
    let bytes = fixtures::mpc(true, (8, 8), 0, &[[0, 0, 0, 0]], &[(1, 1, vec![1, 0])]);
    let Some(SpriteHeader::Mpc(header)) = parse_header(&bytes) else {
        panic!("expected MPC header");
    };
    assert!(header.shadow);
}

#[test]
fn test_decoder_limits_apply() {
    let decoder = SpriteDecoder::new(DecodeLimits {
        max_frame_dimension: 2,
        ..DecodeLimits::default()
    });
    let bytes = fixtures::walk_cycle_asf();
    assert!(matches!(
        decoder.try_parse_header(&bytes),
        Err(DecodeError::FrameTooLarge { width: 3, .. })
    ));
    assert_eq!(decoder.decode_frames(&bytes, &mut [0; 96]), 0);
}

// =============================================================================
// DECODE
// =============================================================================

#[test]
fn test_asf_canvas_decode() {
    let out = canvas(&fixtures::walk_cycle_asf());
    let px = |frame: usize, pixel: usize| -> [u8; 4] {
        let i = (frame * 6 + pixel) * 4;
        out[i..i + 4].try_into().unwrap()
    };
    assert_eq!(px(0, 0), RED);
    assert_eq!(px(0, 1), CLEAR);
    assert_eq!(px(0, 2), GREEN);
    assert_eq!(px(0, 4), [0, 0, 255, 128]);
    assert!(out[24..48].iter().all(|&b| b == 0));
    assert_eq!(px(2, 3), [0, 255, 0, 64]);
    // index past the palette keeps its alpha over transparent black
    assert_eq!(px(3, 5), [0, 0, 0, 200]);
}

#[test]
fn test_asf_individual_matches_canvas() {
    let bytes = fixtures::walk_cycle_asf();
    let result = individual(&bytes);
    assert_eq!(result.sizes, vec![3, 2, 3, 2, 3, 2, 3, 2]);
    assert_eq!(result.offsets, vec![0, 24, 48, 72]);
    assert_eq!(result.pixels, canvas(&bytes));
}

#[test]
fn test_mpc_individual_decode() {
    let result = individual(&fixtures::tile_pack_mpc());
    assert_eq!(result.sizes, vec![3, 2, 1, 1, 1, 1]);
    assert_eq!(result.offsets, vec![0, 24, 28]);
    let a = [30, 20, 10, 255];
    let b = [60, 50, 40, 255];
    let expected: Vec<u8> = [CLEAR, a, b, b, a, CLEAR, CLEAR, b].concat();
    assert_eq!(result.pixels, expected);
}

#[test]
fn test_mpc_has_no_canvas_layout() {
    let bytes = fixtures::tile_pack_mpc();
    let mut out = vec![0; 1 << 16];
    assert_eq!(try_decode_frames(&bytes, &mut out), Err(DecodeError::UnsupportedLayout("MPC")));
    assert_eq!(decode_frames(&bytes, &mut out), 0);
}

#[test]
fn test_output_too_small_is_reported() {
    let bytes = fixtures::walk_cycle_asf();
    let mut out = vec![0; 95];
    assert_eq!(
        try_decode_frames(&bytes, &mut out),
        Err(DecodeError::OutputTooSmall {
            what: "pixel",
            required: 96,
            actual: 95
        })
    );

    let mut pixels = vec![0; 96];
    let mut sizes = vec![0; 7];
    let mut offsets = vec![0; 4];
    assert!(matches!(
        try_decode_individual_frames(&bytes, &mut pixels, &mut sizes, &mut offsets),
        Err(DecodeError::OutputTooSmall { what: "frame size", .. })
    ));
}

#[test]
#[should_panic(expected = "need 96, got 10")]
fn test_sentinel_decode_panics_on_short_buffer() {
    let bytes = fixtures::walk_cycle_asf();
    let mut out = vec![0; 10];
    decode_frames(&bytes, &mut out);
}

#[test]
fn test_truncated_prefixes_never_panic() {
    let bytes = fixtures::walk_cycle_asf();
    for len in 0..bytes.len() {
        let prefix = &bytes[..len];
        if let Some(header) = parse_header(prefix) {
            let mut out = vec![0; header.canvas_output_len().unwrap_or(0)];
            decode_frames(prefix, &mut out);
        }
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

#[test]
fn test_asf_to_msf_canvas_is_lossless() {
    let asf = fixtures::walk_cycle_asf();
    let expected = canvas(&asf);
    for compression in [Compression::None, Compression::Zstd, Compression::Lz4] {
        let msf = asf_to_msf(&asf, compression).unwrap();
        assert_eq!(canvas(&msf), expected);
    }
}

#[test]
fn test_asf_to_msf_header() {
    let msf = asf_to_msf(&fixtures::walk_cycle_asf(), Compression::Lz4).unwrap();
    let Some(SpriteHeader::Msf(header)) = parse_header(&msf) else {
        panic!("expected MSF header");
    };
    assert_eq!(header.version, 2);
    assert_eq!(header.compression, Compression::Lz4);
    assert_eq!((header.canvas_width, header.canvas_height), (3, 2));
    assert_eq!(header.fps, 8);
    assert_eq!((header.anchor_x, header.anchor_y), (1, 2));
    assert_eq!(header.directions, 2);
    assert_eq!(header.palette_size, 3);
    assert!(header.frames()[1].is_empty());
    let last = header.frames()[3];
    assert_eq!((last.offset_x, last.offset_y, last.width, last.height), (2, 1, 1, 1));
}

#[test]
fn test_asf_to_msf_individual_frames_are_cropped() {
    let msf = asf_to_msf(&fixtures::walk_cycle_asf(), Compression::None).unwrap();
    let result = individual(&msf);
    assert_eq!(result.sizes, vec![3, 2, 1, 1, 3, 2, 1, 1]);
    assert_eq!(&result.pixels[24..28], &CLEAR);
    assert_eq!(&result.pixels[result.pixels.len() - 4..], &[0, 0, 0, 200]);
}

#[test]
fn test_mpc_to_msf_individual_is_lossless() {
    let mpc = fixtures::tile_pack_mpc();
    let expected = individual(&mpc);
    for compression in [Compression::None, Compression::Zstd, Compression::Lz4] {
        let msf = mpc_to_msf(&mpc, compression).unwrap();
        let header = parse_header(&msf).unwrap();
        assert_eq!(header.canvas_size(), (40, 20));
        let got = individual(&msf);
        assert_eq!(got.sizes, expected.sizes);
        assert_eq!(got.offsets, expected.offsets);
        assert_eq!(got.pixels, expected.pixels);
    }
}

#[test]
fn test_zstd_blob_from_other_encoders_decodes() {
    let asf = fixtures::walk_cycle_asf();
    let raw = asf_to_msf(&asf, Compression::None).unwrap();
    let Some(SpriteHeader::Msf(header)) = parse_header(&raw) else {
        panic!("expected MSF header");
    };
    let expected_canvas = canvas(&asf);
    let expected = individual(&raw);

    for (block, content_size) in [(4096, true), (4096, false), (5, true), (3, false)] {
        let msf = fixtures::with_zstd_blob(&raw, header.blob_offset(), block, content_size);
        let Some(SpriteHeader::Msf(repacked)) = parse_header(&msf) else {
            panic!("expected MSF header");
        };
        assert_eq!(repacked.compression, Compression::Zstd);
        assert_eq!(canvas(&msf), expected_canvas);
        let got = individual(&msf);
        assert_eq!(got.pixels, expected.pixels);
        assert_eq!(got.sizes, expected.sizes);
    }
}

#[test]
fn test_zstd_blob_larger_than_frame_table_rejected() {
    let raw = asf_to_msf(&fixtures::walk_cycle_asf(), Compression::None).unwrap();
    let Some(SpriteHeader::Msf(header)) = parse_header(&raw) else {
        panic!("expected MSF header");
    };
    let mut padded = raw.clone();
    padded.resize(raw.len() + 4096, 0);
    for content_size in [true, false] {
        let msf = fixtures::with_zstd_blob(&padded, header.blob_offset(), 512, content_size);
        let header = parse_header(&msf).unwrap();
        let mut out = vec![0; header.canvas_output_len().unwrap()];
        assert!(matches!(try_decode_frames(&msf, &mut out), Err(DecodeError::Decompress(_))));
        assert_eq!(decode_frames(&msf, &mut out), 0);
    }
}

#[test]
fn test_mpc_frame_length_past_end_of_file() {
    let palette = [[0, 0, 255, 0]];
    let mut rle = vec![16];
    rle.extend_from_slice(&[0; 16]);
    let frames = [(4, 4, rle)];
    let exact = fixtures::mpc(false, (4, 4), 0, &palette, &frames);
    let mut overstated = exact.clone();
    let at = fixtures::mpc_frame_offset(palette.len(), &frames, 0);
    overstated[at..at + 4].copy_from_slice(&10_000u32.to_le_bytes());

    let expected = individual(&exact);
    assert_eq!(&expected.pixels[..4], &RED);
    let got = individual(&overstated);
    assert_eq!(got.pixels, expected.pixels);
    assert_eq!(got.sizes, vec![4, 4]);
}

#[test]
fn test_to_msf_dispatches_by_kind() {
    let asf = fixtures::walk_cycle_asf();
    assert_eq!(
        to_msf(&asf, Compression::Lz4).unwrap(),
        asf_to_msf(&asf, Compression::Lz4).unwrap()
    );
    let mpc = fixtures::tile_pack_mpc();
    assert_eq!(
        to_msf(&mpc, Compression::None).unwrap(),
        mpc_to_msf(&mpc, Compression::None).unwrap()
    );
    assert_eq!(try_parse_header(b"nope").unwrap_err(), DecodeError::BadMagic);
}

#[test]
fn test_container_kind_names() {
    assert_eq!(ContainerKind::Asf.extension(), "asf");
    assert_eq!(ContainerKind::Msf.to_string(), "MSF");
}
