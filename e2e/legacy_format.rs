//! E2E Test Suite 10: Legacy Format
//!
//! Validates `decode_legacy_frames` on files written to a temporary
//! directory.  Legacy format uses magic number `0x184C2102` followed by
//! little-endian block sizes, each block decoding to at most 8 MiB.

#[path = "../tests/common/mod.rs"]
mod common;

use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};

use common::{compress, lorem, mixed};
use lz4kd::config::{LEGACY_BLOCKSIZE, LEGACY_MAGICNUMBER};
use lz4kd::io::{decode_legacy_frames, open_dst, open_src};
use tempfile::TempDir;

fn legacy_file(data: &[u8], chunk: usize) -> Vec<u8> {
    let mut out = LEGACY_MAGICNUMBER.to_le_bytes().to_vec();
    for piece in data.chunks(chunk) {
        let block = compress(piece);
        out.extend_from_slice(&(block.len() as u32).to_le_bytes());
        out.extend_from_slice(&block);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. test_legacy_roundtrip
//    32 KB of repetitive data in one block, decoded file to file.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_roundtrip() {
    let dir = TempDir::new().unwrap();
    let lz4_path = dir.path().join("input.bin.lz4");
    let out_path = dir.path().join("output.bin");

    let original: Vec<u8> = b"abcdefghijklmnopqrstuvwxyz".iter().cycle().take(32 * 1024).cloned().collect();
    fs::write(&lz4_path, legacy_file(&original, LEGACY_BLOCKSIZE)).unwrap();

    let mut src = open_src(lz4_path.to_str().unwrap()).unwrap();
    let mut dst = open_dst(out_path.to_str().unwrap()).unwrap();
    let total = decode_legacy_frames(&mut src, &mut dst, 1).expect("legacy decode should succeed");
    drop(dst);

    assert_eq!(total, original.len() as u64);
    assert_eq!(fs::read(&out_path).unwrap(), original, "decompressed content must match original");
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. test_legacy_magic_number
//    The container starts with [0x02, 0x21, 0x4C, 0x18].
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_magic_number() {
    let stream = legacy_file(b"magic", 1024);
    assert_eq!(&stream[..4], &[0x02, 0x21, 0x4C, 0x18]);
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. test_legacy_multi_block_workers
//    Many blocks, decoded with one and with several workers.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_multi_block_workers() {
    let dir = TempDir::new().unwrap();
    let lz4_path = dir.path().join("multi.lz4");
    let original = mixed(3 * 1024 * 1024, 31);
    fs::write(&lz4_path, legacy_file(&original, 128 * 1024)).unwrap();

    for workers in [1usize, 2, 8] {
        let mut src = BufReader::new(fs::File::open(&lz4_path).unwrap());
        let mut out = Vec::new();
        let total = decode_legacy_frames(&mut src, &mut out, workers).unwrap();
        assert_eq!(total, original.len() as u64, "workers={workers}");
        assert!(out == original, "workers={workers}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 4. test_legacy_concatenated_frames
//    Two legacy frames written back to back, as `cat a.lz4 b.lz4` produces.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_concatenated_frames() {
    let dir = TempDir::new().unwrap();
    let lz4_path = dir.path().join("cat.lz4");
    let a = lorem(70_000, 1);
    let b = lorem(90_000, 2);
    {
        let mut w = BufWriter::new(fs::File::create(&lz4_path).unwrap());
        w.write_all(&legacy_file(&a, 50_000)).unwrap();
        w.write_all(&legacy_file(&b, 50_000)).unwrap();
    }

    let mut src = open_src(lz4_path.to_str().unwrap()).unwrap();
    let mut out = Vec::new();
    assert_eq!(decode_legacy_frames(&mut src, &mut out, 2).unwrap(), (a.len() + b.len()) as u64);
    assert_eq!(out, [a, b].concat());
}

// ─────────────────────────────────────────────────────────────────────────────
// 5. test_legacy_rejects_frame_format
//    A modern LZ4 frame (magic 0x184D2204) is not a legacy stream.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_rejects_frame_format() {
    let mut stream = 0x184D_2204u32.to_le_bytes().to_vec();
    stream.extend_from_slice(&[0x64, 0x40, 0xA7]);
    let mut out = Vec::new();
    let err = decode_legacy_frames(&mut stream.as_slice(), &mut out, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

// ─────────────────────────────────────────────────────────────────────────────
// 6. test_legacy_corrupted_block
//    Flipping a byte inside a block body surfaces as InvalidData.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_corrupted_block() {
    let original = lorem(20_000, 40);
    let mut stream = legacy_file(&original, LEGACY_BLOCKSIZE);
    // First token: claim far more literals than the block holds.
    stream[8] = 0xF0;
    stream[9] = 0xFF;

    for workers in [1usize, 4] {
        let mut out = Vec::new();
        let err = decode_legacy_frames(&mut stream.as_slice(), &mut out, workers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData, "workers={workers}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 7. test_legacy_truncated_file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_legacy_truncated_file() {
    let original = lorem(20_000, 41);
    let stream = legacy_file(&original, 4096);
    let mut out = Vec::new();
    let err = decode_legacy_frames(&mut &stream[..stream.len() - 3], &mut out, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}
