//! # KILN Convert
//!
//! Converts legacy ASF / MPC containers to MSF and verifies MSF files.
//!
//! ```bash
//! # One file
//! kiln_convert asf/npc/guard.asf msf/npc/guard.msf
//!
//! # A whole tree, uncompressed blobs
//! kiln_convert resources/asf resources/msf --raw
//!
//! # LZ4 blobs instead of zstd
//! kiln_convert resources/asf resources/msf --lz4
//!
//! # Decode check, optionally against the source
//! kiln_convert --verify msf/npc/guard.msf asf/npc/guard.asf
//! ```
//!
//! Logging follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kiln::sprite::Compression;
use kiln::{convert_path, verify_msf, KilnConfig};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Usage:");
    println!("  kiln_convert <input> <output> [--raw | --lz4] [--config <kiln.toml>]");
    println!("  kiln_convert --verify <file.msf> [<source.asf|source.mpc>] [--config <kiln.toml>]");
    println!();
    println!("Options:");
    println!("  --raw            Store frame blobs uncompressed (default: zstd)");
    println!("  --lz4            Store frame blobs as LZ4");
    println!("  --config <path>  Read decode limits from a KILN config file");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         KILN CONVERT                                             ║");
    println!("║         ASF / MPC  ->  MSF                                       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let config_path = take_value(&mut args, "--config").map(PathBuf::from);
    let raw = take_flag(&mut args, "--raw");
    let lz4 = take_flag(&mut args, "--lz4");
    let verify = take_flag(&mut args, "--verify");

    let config = match config_path {
        Some(path) => match KilnConfig::from_toml_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => KilnConfig::default(),
    };

    if verify {
        return match args.as_slice() {
            [msf] => run_verify(Path::new(msf), None, &config),
            [msf, source] => run_verify(Path::new(msf), Some(Path::new(source)), &config),
            _ => {
                print_usage();
                ExitCode::FAILURE
            }
        };
    }

    let [input, output] = args.as_slice() else {
        print_usage();
        return ExitCode::FAILURE;
    };
    let compression = match (raw, lz4) {
        (false, false) => Compression::Zstd,
        (true, false) => Compression::None,
        (false, true) => Compression::Lz4,
        (true, true) => {
            eprintln!("Error: --raw and --lz4 are exclusive");
            return ExitCode::FAILURE;
        }
    };
    run_convert(Path::new(input), Path::new(output), compression, &config)
}

fn take_value(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let i = args.iter().position(|a| a == flag)?;
    args.remove(i);
    (i < args.len()).then(|| args.remove(i))
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn run_convert(input: &Path, output: &Path, compression: Compression, config: &KilnConfig) -> ExitCode {
    if !input.exists() {
        eprintln!("Error: {} does not exist", input.display());
        return ExitCode::FAILURE;
    }
    println!("Converting {} -> {} ({compression:?})", input.display(), output.display());

    let report = match convert_path(input, output, &config.sprite, compression) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("┌─ CONVERSION ─────────────────────────────────────────────────────┐");
    println!("│ Converted:          {}", report.converted.len());
    println!("│ Failed:             {}", report.failed.len());
    println!("│ Input:              {} bytes", report.input_bytes);
    println!("│ Output:             {} bytes ({:.1}%)", report.output_bytes, report.ratio() * 100.0);
    if !report.failed.is_empty() {
        println!("│");
        println!("│ FAILURES:");
        for failure in &report.failed {
            println!("│  - {failure}");
        }
    }
    println!("└──────────────────────────────────────────────────────────────────┘");

    if report.failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_verify(path: &Path, source: Option<&Path>, config: &KilnConfig) -> ExitCode {
    println!("Verifying {}", path.display());
    let summary = match verify_msf(path, source, &config.sprite) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("┌─ MSF INFO ───────────────────────────────────────────────────────┐");
    println!("│ Version:            {}", summary.version);
    println!("│ Compression:        {:?}", summary.compression);
    println!("│ Canvas:             {}x{}", summary.canvas.0, summary.canvas.1);
    println!(
        "│ Frames:             {} ({} per direction, {} empty)",
        summary.frame_count, summary.frames_per_direction, summary.empty_frames
    );
    println!("│ FPS:                {}", summary.fps);
    println!("│ Pixel Format:       {:?}", summary.pixel_format);
    println!("│ Palette:            {} entries", summary.palette_size);
    println!("│ Decoded:            {} bytes", summary.decoded_bytes);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    match source {
        Some(source) => println!("✓ Pixels match {}", source.display()),
        None => println!("✓ Decodes cleanly"),
    }
    ExitCode::SUCCESS
}
