//! E2E Test Suite 01: Block One-Shot API
//!
//! Validates the block decoder through the crate-root entry points only:
//! - decompress_safe on hand-assembled and encoder-produced blocks
//! - decompress_safe_partial at arbitrary stopping points
//! - decompress_fast locating block boundaries
//! - external and prefix dictionaries
//! - in-place decoding and decompress_block_to_vec

#[path = "../tests/common/mod.rs"]
mod common;

use common::{compress, compress_with_history, lorem, mixed, noise};
use lz4kd::{
    compress_bound, decompress_block_to_vec, decompress_fast, decompress_in_place,
    decompress_inplace_buffer_size, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
    decompress_safe_with_prefix, DecodeErrorKind, LZ4_MAX_INPUT_SIZE,
};

/// 100 × 'a': one literal, a 94-byte match at offset 1, five literals.
const RLE_A_100: [u8; 11] = [0x1F, b'a', 0x01, 0x00, 0x4B, 0x50, b'a', b'a', b'a', b'a', b'a'];

/// 16 bytes copied from a dictionary, then "XYZ12".
const DICT: &[u8; 16] = b"0123456789abcdef";
const DICT_BLOCK: [u8; 10] = [0x0C, 0x10, 0x00, 0x50, b'X', b'Y', b'Z', b'1', b'2', 0x00];

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: hand-assembled run-length block
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_decompress_rle_block() {
    let mut dst = vec![0u8; 100];
    let n = decompress_safe(&RLE_A_100, &mut dst).expect("valid block");
    assert_eq!(n, 100);
    assert!(dst.iter().all(|&b| b == b'a'));
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: text roundtrip through the test encoder
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_text_roundtrip() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(20);
    let block = compress(&original);
    assert!(block.len() < original.len(), "repetitive text should shrink");

    let mut dst = vec![0u8; original.len()];
    let n = decompress_safe(&block, &mut dst).expect("decompression should succeed");
    assert_eq!(n, original.len());
    assert_eq!(dst, original);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: incompressible input stays within compress_bound
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_incompressible_roundtrip() {
    let original = noise(100_000, 77);
    let block = compress(&original);
    assert!(block.len() <= compress_bound(original.len()));

    let mut dst = vec![0u8; original.len()];
    assert_eq!(decompress_safe(&block, &mut dst), Ok(original.len()));
    assert_eq!(dst, original);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 4: compress_bound
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compress_bound() {
    assert_eq!(compress_bound(0), 16);
    assert!(compress_bound(1000) > 1000);
    assert!(compress_bound(LZ4_MAX_INPUT_SIZE) > LZ4_MAX_INPUT_SIZE);
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 5: partial decoding of the run-length block
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_partial_rle_block() {
    for target in [0usize, 1, 2, 50, 94, 95, 99, 100] {
        let mut dst = vec![0u8; 100];
        let n = decompress_safe_partial(&RLE_A_100, &mut dst, target).expect("partial decode");
        assert_eq!(n, target);
        assert!(dst[..n].iter().all(|&b| b == b'a'));
        assert!(dst[n..].iter().all(|&b| b == 0), "target {target}: wrote past the stop point");
    }
}

#[test]
fn test_partial_large_block() {
    let original = mixed(200_000, 5);
    let block = compress(&original);
    let mut dst = vec![0u8; original.len()];
    let n = decompress_safe_partial(&block, &mut dst, 123_457).unwrap();
    assert_eq!(n, 123_457);
    assert_eq!(dst[..n], original[..n]);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 6: decompress_fast walks a sequence of concatenated blocks
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fast_walks_concatenated_blocks() {
    let chunks: Vec<Vec<u8>> = (0..5u64).map(|i| lorem(5_000 + i as usize * 1_000, i)).collect();
    let mut stream = Vec::new();
    for c in &chunks {
        stream.extend(compress(c));
    }

    let mut pos = 0;
    for c in &chunks {
        let mut dst = vec![0u8; c.len()];
        pos += decompress_fast(&stream[pos..], &mut dst).expect("fast decode");
        assert_eq!(&dst, c);
    }
    assert_eq!(pos, stream.len());
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 7: external dictionary and prefix
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_dictionary_block() {
    let block = &DICT_BLOCK[..9];

    let mut dst = [0u8; 21];
    assert_eq!(decompress_safe_using_dict(block, &mut dst, DICT), Ok(21));
    assert_eq!(&dst, b"0123456789abcdefXYZ12");

    let mut dst = [0u8; 21];
    let err = decompress_safe(block, &mut dst).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::OffsetOutOfBounds);

    let mut buf = DICT.to_vec();
    buf.resize(16 + 21, 0);
    assert_eq!(decompress_safe_with_prefix(&mut buf, 16, block), Ok(21));
    assert_eq!(&buf[16..], b"0123456789abcdefXYZ12");
}

#[test]
fn test_dictionary_roundtrip() {
    let dict = lorem(32 * 1024, 8);
    let original = lorem(64 * 1024, 9);
    let block = compress_with_history(&dict, &original);
    assert!(block.len() < compress(&original).len(), "dictionary should help");

    let mut dst = vec![0u8; original.len()];
    assert_eq!(decompress_safe_using_dict(&block, &mut dst, &dict), Ok(original.len()));
    assert_eq!(dst, original);
}

#[test]
fn test_trailing_byte_rejected() {
    let mut dst = [0u8; 21];
    let err = decompress_safe_using_dict(&DICT_BLOCK, &mut dst, DICT).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::BadTermination);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 8: in-place and allocating helpers
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_in_place_roundtrip() {
    let original = lorem(256 * 1024, 12);
    let block = compress(&original);
    let len = decompress_inplace_buffer_size(original.len());
    let mut buf = vec![0u8; len];
    buf[len - block.len()..].copy_from_slice(&block);

    assert_eq!(decompress_in_place(&mut buf, block.len(), original.len()), Ok(original.len()));
    assert_eq!(buf[..original.len()], original[..]);
}

#[test]
fn test_block_to_vec() {
    let decoded = decompress_block_to_vec(&RLE_A_100, 100).unwrap();
    assert_eq!(decoded, vec![b'a'; 100]);
    assert!(decompress_block_to_vec(&RLE_A_100, 99).is_err());
    assert!(decompress_block_to_vec(&RLE_A_100, 101).is_err());
}
