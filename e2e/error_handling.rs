//! E2E Test Suite 06: Error Handling & Edge Cases
//!
//! Hostile input must produce a `DecompressError`, never a panic, and never a
//! write outside the destination the caller handed in.
//!
//! Coverage:
//! - one hand-built block per error kind
//! - bit flips and truncations of valid blocks, every entry point
//! - random garbage
//! - negative C-style codes

#[path = "../tests/common/mod.rs"]
mod common;

use common::{compress, compress_with_history, lorem, mixed, XorShift};
use lz4kd::{
    decompress_fast, decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
    decompress_safe_with_prefix, DecodeErrorKind, DecompressError,
};

const GUARD: u8 = 0xD7;

fn kind(r: Result<usize, DecompressError>) -> DecodeErrorKind {
    r.expect_err("block should be rejected").kind
}

/// Runs every entry point on `block`, each into the first `cap` bytes of a
/// guarded buffer, and checks the guard afterwards.
fn exercise(block: &[u8], cap: usize, dict: &[u8]) {
    let mut buf = vec![GUARD; cap + 64];
    let _ = decompress_safe(block, &mut buf[..cap]);
    assert!(buf[cap..].iter().all(|&b| b == GUARD), "safe wrote past capacity");

    let mut buf = vec![GUARD; cap + 64];
    let _ = decompress_safe_partial(block, &mut buf[..cap], cap / 2);
    assert!(buf[cap..].iter().all(|&b| b == GUARD), "partial wrote past capacity");

    let mut buf = vec![GUARD; cap + 64];
    let _ = decompress_fast(block, &mut buf[..cap]);
    assert!(buf[cap..].iter().all(|&b| b == GUARD), "fast wrote past capacity");

    let mut buf = vec![GUARD; cap + 64];
    let _ = decompress_safe_using_dict(block, &mut buf[..cap], dict);
    assert!(buf[cap..].iter().all(|&b| b == GUARD), "dict wrote past capacity");
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: each error kind from a minimal block
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_each_error_kind() {
    let mut dst = [0u8; 64];

    // Empty input.
    assert_eq!(kind(decompress_safe(&[], &mut dst)), DecodeErrorKind::TruncatedInput);

    // Match reaching before the start of output.
    let block = [0x10, b'x', 0x02, 0x00, 0x50, b'a', b'b', b'c', b'd', b'e'];
    assert_eq!(kind(decompress_safe(&block, &mut dst)), DecodeErrorKind::OffsetOutOfBounds);

    // Offset zero.
    let block = [0x40, b'a', b'b', b'c', b'd', 0x00, 0x00, 0x60, b'u', b'v', b'w', b'x', b'y', b'z'];
    assert_eq!(kind(decompress_safe(&block, &mut dst)), DecodeErrorKind::OffsetOutOfBounds);

    // Literal length varint running off the input.
    let block = [0xF0, 0xFF, 0xFF];
    assert_eq!(kind(decompress_safe(&block, &mut dst)), DecodeErrorKind::VarIntOverrun);

    // Non-empty block into an empty destination.
    assert_eq!(kind(decompress_safe(&[0x10, b'z'], &mut [])), DecodeErrorKind::EmptyOutput);

    // Literals followed by bytes that are not a complete sequence.
    let block = [0x30, b'a', b'b', b'c', 0x07];
    assert_eq!(kind(decompress_safe(&block, &mut dst)), DecodeErrorKind::BadTermination);

    // Prefix longer than the buffer.
    let mut small = [0u8; 4];
    assert_eq!(
        kind(decompress_safe_with_prefix(&mut small, 5, &[0x00])),
        DecodeErrorKind::InvalidArgument
    );
}

#[test]
fn test_last_literals_rule() {
    // 8 literals, a 4-byte match, then 4 literals: the match ends inside the
    // final five bytes.
    let block = [
        0x80, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', 0x04, 0x00, 0x40, b'w', b'x', b'y', b'z',
    ];
    let mut dst = [0u8; 16];
    assert!(decompress_safe(&block, &mut dst).is_err());
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: error codes
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_error_codes_are_negative() {
    let data = lorem(2000, 3);
    let block = compress(&data);
    let mut dst = vec![0u8; data.len()];
    for cut in 1..block.len() {
        if let Err(e) = decompress_safe(&block[..cut], &mut dst) {
            assert!(e.code() < 0, "cut {cut}: {e}");
            assert_eq!(e.code(), -(e.consumed as i32) - 1);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: bit flips in valid blocks
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bit_flips_never_panic() {
    let dict = lorem(4096, 1);
    let data = mixed(3000, 2);
    let block = compress_with_history(&dict, &data);

    for pos in 0..block.len() {
        for bit in [0u8, 3, 7] {
            let mut bad = block.clone();
            bad[pos] ^= 1 << bit;
            exercise(&bad, data.len(), &dict);
        }
    }
}

#[test]
fn test_truncations_never_panic() {
    let data = mixed(5000, 6);
    let block = compress(&data);
    for cut in 0..block.len() {
        exercise(&block[..cut], data.len(), &[]);
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 4: random garbage
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_random_garbage() {
    let mut rng = XorShift::new(0x5EED);
    let dict = lorem(1000, 4);
    for _ in 0..2000 {
        let len = rng.below(200);
        let garbage: Vec<u8> = (0..len).map(|_| rng.next_u64() as u8).collect();
        let cap = rng.below(400);
        exercise(&garbage, cap, &dict);
    }
}

#[test]
fn test_long_varint_chains() {
    // Thousands of 255 continuation bytes must be bounded by the destination.
    let mut block = vec![0xF0];
    block.extend(std::iter::repeat(0xFF).take(10_000));
    block.push(0x00);
    let mut dst = vec![0u8; 1024];
    assert!(decompress_safe(&block, &mut dst).is_err());
    assert!(decompress_fast(&block, &mut dst).is_err());
}
