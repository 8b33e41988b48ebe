//! File conversion round trips through a scratch directory, plus the
//! facade wiring every component from one config.

use std::fs;
use std::path::PathBuf;

use kiln::nav::{PathStrategy, TilePos};
use kiln::sprite::{Compression, DecodeLimits};
use kiln::{convert_path, verify_msf, BatchError, KilnConfig};

struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("kiln-{name}-{}", std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).expect("clear stale scratch dir");
        }
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// 2x2, two frames, one opaque red pixel then a half-transparent green one.
fn tiny_asf() -> Vec<u8> {
    let mut bytes = b"ASF 1.0\0\0\0\0\0\0\0\0\0".to_vec();
    for field in [2i32, 2, 2, 1, 2, 100, 1, 1] {
        bytes.extend_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&[0; 16]);
    bytes.extend_from_slice(&[0, 0, 255, 0, 0, 255, 0, 0]);
    let streams: [&[u8]; 2] = [&[1, 255, 0, 3, 0], &[3, 0, 1, 128, 1]];
    let mut offset = bytes.len() + 16;
    for stream in streams {
        bytes.extend_from_slice(&(offset as i32).to_le_bytes());
        bytes.extend_from_slice(&(stream.len() as i32).to_le_bytes());
        offset += stream.len();
    }
    for stream in streams {
        bytes.extend_from_slice(stream);
    }
    bytes
}

/// 32x32 pack with one 2x1 frame.
fn tiny_mpc() -> Vec<u8> {
    let mut bytes = vec![0u8; 128];
    bytes[..12].copy_from_slice(b"MPC File Ver");
    for (i, field) in [23u32, 32, 32, 1, 1, 1, 60].iter().enumerate() {
        bytes[64 + i * 4..68 + i * 4].copy_from_slice(&field.to_le_bytes());
    }
    bytes.extend_from_slice(&[200, 100, 50, 0]);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&23u32.to_le_bytes());
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&[0; 8]);
    bytes.extend_from_slice(&[2, 0, 0]);
    bytes.resize(160, 0);
    bytes
}

#[test]
fn test_convert_single_file_and_verify() {
    let scratch = Scratch::new("single");
    let asf = scratch.0.join("hero.asf");
    fs::write(&asf, tiny_asf()).unwrap();

    let report = convert_path(&asf, &scratch.0, &DecodeLimits::default(), Compression::Zstd).unwrap();
    assert_eq!(report.converted.len(), 1);
    let msf = scratch.0.join("hero.msf");
    assert_eq!(report.converted[0].1, msf);
    assert_eq!(report.output_bytes, fs::metadata(&msf).unwrap().len());

    let summary = verify_msf(&msf, Some(&asf), &DecodeLimits::default()).unwrap();
    assert_eq!(summary.version, 2);
    assert_eq!(summary.compression, Compression::Zstd);
    assert_eq!(summary.canvas, (2, 2));
    assert_eq!(summary.frame_count, 2);
    assert_eq!(summary.fps, 10);
    assert_eq!(summary.empty_frames, 0);
}

#[test]
fn test_convert_tree_mirrors_layout() {
    let scratch = Scratch::new("tree");
    let input = scratch.0.join("in");
    let output = scratch.0.join("out");
    fs::create_dir_all(input.join("npc/guards")).unwrap();
    fs::create_dir_all(input.join("map")).unwrap();
    fs::write(input.join("npc/guards/guard.ASF"), tiny_asf()).unwrap();
    fs::write(input.join("map/grass.mpc"), tiny_mpc()).unwrap();
    fs::write(input.join("map/readme.txt"), b"ignored").unwrap();
    fs::write(input.join("npc/broken.asf"), b"ASF 1.0 but nothing else").unwrap();

    let report = convert_path(&input, &output, &DecodeLimits::default(), Compression::None).unwrap();
    assert_eq!(report.converted.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0], BatchError::Decode { .. }));

    let guard = output.join("npc/guards/guard.msf");
    let grass = output.join("map/grass.msf");
    assert!(guard.is_file());
    assert!(grass.is_file());
    assert!(!output.join("map/readme.msf").exists());

    let summary = verify_msf(&grass, Some(&input.join("map/grass.mpc")), &DecodeLimits::default()).unwrap();
    assert_eq!(summary.compression, Compression::None);
    assert_eq!(summary.canvas, (32, 32));
    assert_eq!(summary.decoded_bytes, 8);
}

#[test]
fn test_verify_rejects_legacy_input() {
    let scratch = Scratch::new("wrong-kind");
    let asf = scratch.0.join("hero.asf");
    fs::write(&asf, tiny_asf()).unwrap();
    assert!(matches!(
        verify_msf(&asf, None, &DecodeLimits::default()),
        Err(BatchError::WrongKind { .. })
    ));
    assert!(matches!(
        verify_msf(&scratch.0.join("missing.msf"), None, &DecodeLimits::default()),
        Err(BatchError::Io { .. })
    ));
}

#[test]
fn test_verify_detects_pixel_mismatch() {
    let scratch = Scratch::new("mismatch");
    let asf = scratch.0.join("hero.asf");
    let other = scratch.0.join("other.asf");
    fs::write(&asf, tiny_asf()).unwrap();
    let mut changed = tiny_asf();
    let last = changed.len() - 1;
    changed[last] = 0;
    fs::write(&other, changed).unwrap();

    let msf = scratch.0.join("hero.msf");
    convert_path(&asf, &msf, &DecodeLimits::default(), Compression::Lz4).unwrap();
    assert!(matches!(
        verify_msf(&msf, Some(&other), &DecodeLimits::default()),
        Err(BatchError::PixelMismatch { differing: 2, .. })
    ));
}

#[test]
fn test_config_builds_every_component() {
    let config = KilnConfig::from_toml_str("[spatial]\ncell_size = 64.0\n").unwrap();

    let finder = config.path_finder(100, 100);
    let path = finder.find_path(TilePos::new(0, 0), TilePos::new(10, 10), PathStrategy::BoundedAStarLarge, 8);
    assert_eq!(path.len(), 11);

    let mut hash = config.spatial_hash();
    hash.upsert(1, 100.0, 100.0, 16.0, 0);
    hash.upsert(2, 110.0, 100.0, 16.0, 1);
    assert_eq!(hash.query_radius(100.0, 100.0, 50.0), vec![1, 2]);
    assert_eq!(hash.detect_all_collisions(), vec![(1, 2)]);

    assert!(config.sprite_decoder().parse_header(&tiny_asf()).is_some());
}
