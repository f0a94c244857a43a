// e2e/cli_integration.rs: CLI integration tests (Suite 09)
//
// Drives the `lz4kd` binary as a black box with std::process::Command.
// Covers each raw-block mode, legacy streams, checksum verification and exit
// codes.

#[path = "../tests/common/mod.rs"]
mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use common::{compress, compress_with_history, lorem};
use lz4kd::config::LEGACY_MAGICNUMBER;
use tempfile::TempDir;
use xxhash_rust::xxh32::xxh32;

fn lz4kd_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz4kd"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(lz4kd_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run lz4kd")
}

/// TempDir holding `block.lz4` compressed from ~4 KB of text.
fn block_fixture() -> (TempDir, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let original = "Hello, LZ4!\n".repeat(341).into_bytes();
    fs::write(dir.path().join("block.lz4"), compress(&original)).unwrap();
    (dir, original)
}

// ── 1. Raw block to file ─────────────────────────────────────────────────────

#[test]
fn test_cli_block_to_file() {
    let (dir, original) = block_fixture();
    let size = original.len().to_string();
    let out = run(dir.path(), &["--size", &size, "-o", "out.txt", "block.lz4"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), original);
}

// ── 2. Raw block to stdout ───────────────────────────────────────────────────

#[test]
fn test_cli_block_to_stdout() {
    let (dir, original) = block_fixture();
    let size = original.len().to_string();
    let out = run(dir.path(), &["-q", "--size", &size, "block.lz4"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, original);
    assert!(out.stderr.is_empty(), "quiet run should not print");
}

// ── 3. Checksum verification ─────────────────────────────────────────────────

#[test]
fn test_cli_xxh32_match_and_mismatch() {
    let (dir, original) = block_fixture();
    let size = original.len().to_string();
    let good = format!("{:08x}", xxh32(&original, 0));
    let bad = format!("{:08x}", xxh32(&original, 0) ^ 1);

    let out = run(dir.path(), &["--size", &size, "--xxh32", &good, "-o", "a", "block.lz4"]);
    assert!(out.status.success());

    let out = run(dir.path(), &["--size", &size, "--xxh32", &bad, "-o", "b", "block.lz4"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("xxh32 mismatch"));
}

// ── 4. Partial, fast and in-place modes ──────────────────────────────────────

#[test]
fn test_cli_partial() {
    let (dir, original) = block_fixture();
    let size = original.len().to_string();
    let out = run(dir.path(), &["--size", &size, "--partial", "100", "block.lz4"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, original[..100]);
}

#[test]
fn test_cli_fast_with_trailing_bytes() {
    let (dir, original) = block_fixture();
    let mut block = compress(&original);
    block.extend_from_slice(b"trailer");
    fs::write(dir.path().join("trailing.lz4"), &block).unwrap();

    let size = original.len().to_string();
    let out = run(dir.path(), &["--size", &size, "--fast", "trailing.lz4"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, original);
    assert!(String::from_utf8_lossy(&out.stderr).contains("trailing input bytes ignored"));

    // The safe decoder insists on exact input consumption.
    let out = run(dir.path(), &["--size", &size, "trailing.lz4"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_in_place() {
    let (dir, original) = block_fixture();
    let size = original.len().to_string();
    let out = run(dir.path(), &["--size", &size, "--in-place", "block.lz4"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, original);
}

// ── 5. Dictionary ────────────────────────────────────────────────────────────

#[test]
fn test_cli_dictionary() {
    let dir = TempDir::new().unwrap();
    let dict = lorem(16 * 1024, 3);
    let original = lorem(8 * 1024, 4);
    fs::write(dir.path().join("dict.bin"), &dict).unwrap();
    fs::write(dir.path().join("d.lz4"), compress_with_history(&dict, &original)).unwrap();

    let size = original.len().to_string();
    let out = run(dir.path(), &["--size", &size, "-D", "dict.bin", "d.lz4"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, original);
}

// ── 6. Legacy stream ─────────────────────────────────────────────────────────

#[test]
fn test_cli_legacy() {
    let dir = TempDir::new().unwrap();
    let original = lorem(300_000, 9);
    let mut stream = LEGACY_MAGICNUMBER.to_le_bytes().to_vec();
    for piece in original.chunks(64 * 1024) {
        let block = compress(piece);
        stream.extend_from_slice(&(block.len() as u32).to_le_bytes());
        stream.extend_from_slice(&block);
    }
    fs::write(dir.path().join("s.lz4"), &stream).unwrap();

    let hash = format!("{:08x}", xxh32(&original, 0));
    for workers in ["1", "3"] {
        let out = run(dir.path(), &["--legacy", "-T", workers, "--xxh32", &hash, "-o", "s.out", "s.lz4"]);
        assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
        assert_eq!(fs::read(dir.path().join("s.out")).unwrap(), original);
    }
}

// ── 7. Exit codes ────────────────────────────────────────────────────────────

#[test]
fn test_cli_corrupted_block_exits_1() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.lz4"), [0x10u8, b'x', 0x02, 0x00, 0x50, 1, 2, 3, 4, 5]).unwrap();
    let out = run(dir.path(), &["--size", "64", "bad.lz4"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("lz4kd:"), "{stderr}");
    assert!(stderr.contains("corrupted LZ4 block"), "{stderr}");
}

#[test]
fn test_cli_missing_size_exits_1() {
    let (dir, _) = block_fixture();
    let out = run(dir.path(), &["block.lz4"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--size"));
}

#[test]
fn test_cli_missing_input_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--size", "10", "absent.lz4"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_bad_usage_exits_1() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--size", "10", "--fast", "--in-place", "x"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_version_exits_0() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(lz4kd::version_string()));
}
