// Copy primitives: stripe copies, small-offset replication and the
// overlap-safe byte copy.
//
// Every match-copy test compares against a byte-serial LZ77 reference, and
// checks that nothing beyond the documented overshoot was touched.

use lz4kd::block::copy::{
    copy_match_head, memcpy_using_offset, overlap_copy, wild_copy32, wild_copy8, wild_copy_from,
    wild_copy_within,
};

const GUARD: u8 = 0xEE;

/// Byte-serial match expansion: the semantics every primitive must produce.
fn reference_match(buf: &mut [u8], src: usize, dst: usize, len: usize) {
    for i in 0..len {
        buf[dst + i] = buf[src + i];
    }
}

/// History of `hist` distinct bytes followed by guard-filled room.
fn seeded(hist: usize, room: usize) -> Vec<u8> {
    let mut buf: Vec<u8> = (0..hist).map(|i| (i as u8).wrapping_mul(37).wrapping_add(11)).collect();
    buf.resize(hist + room, GUARD);
    buf
}

// ─────────────────────────────────────────────────────────────────────────────
// wild_copy8 / wild_copy32
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn wild_copy8_copies_whole_stripes() {
    let mut buf = seeded(64, 64);
    wild_copy8(&mut buf, 0, 64, 64 + 13);
    assert_eq!(buf[64..80], buf[0..16]);
    // overshoot stays within one stripe of the end
    assert!(buf[80..].iter().all(|&b| b == GUARD));
}

#[test]
fn wild_copy8_copies_at_least_one_stripe() {
    let mut buf = seeded(16, 16);
    wild_copy8(&mut buf, 0, 16, 16);
    assert_eq!(buf[16..24], buf[0..8]);
    assert_eq!(buf[24], GUARD);
}

#[test]
fn wild_copy32_replicates_offsets_from_16() {
    for offset in [16usize, 17, 23, 31, 32, 40] {
        let len = 100;
        let mut expected = seeded(64, 200);
        reference_match(&mut expected, 64 - offset, 64, len);

        let mut buf = seeded(64, 200);
        wild_copy32(&mut buf, 64 - offset, 64, 64 + len);
        assert_eq!(buf[64..64 + len], expected[64..64 + len], "offset {offset}");
        assert!(buf[64 + len + 31..].iter().all(|&b| b == GUARD), "offset {offset}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// copy_match_head / memcpy_using_offset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn copy_match_head_all_offsets() {
    for offset in 1..=12usize {
        let mut expected = seeded(16, 64);
        reference_match(&mut expected, 16 - offset, 16, 8);

        let mut buf = seeded(16, 64);
        let next = copy_match_head(&mut buf, 16 - offset, 16, offset);
        assert_eq!(buf[16..24], expected[16..24], "offset {offset}");

        let trailing = 24 - next;
        assert!(trailing >= 8, "offset {offset}");
        assert_eq!(trailing % offset, 0, "offset {offset}");
    }
}

#[test]
fn memcpy_using_offset_matches_reference() {
    for offset in 1..16usize {
        for len in [4usize, 7, 8, 9, 18, 33, 100] {
            let mut expected = seeded(16, 200);
            reference_match(&mut expected, 16 - offset, 16, len);

            let mut buf = seeded(16, 200);
            memcpy_using_offset(&mut buf, 16 - offset, 16, 16 + len, offset);
            assert_eq!(buf[16..16 + len], expected[16..16 + len], "offset {offset} len {len}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// overlap_copy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overlap_copy_is_exact() {
    for offset in 1..10usize {
        let mut expected = seeded(10, 40);
        reference_match(&mut expected, 10 - offset, 10, 25);

        let mut buf = seeded(10, 40);
        overlap_copy(&mut buf, 10 - offset, 10, 25);
        assert_eq!(buf, expected, "offset {offset}");
    }
}

#[test]
fn overlap_copy_zero_length_is_noop() {
    let mut buf = seeded(4, 4);
    let before = buf.clone();
    overlap_copy(&mut buf, 0, 4, 0);
    assert_eq!(buf, before);
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal stripe copies
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn wild_copy_from_separate_slice() {
    let from: Vec<u8> = (0u8..64).collect();
    let mut buf = vec![GUARD; 64];
    wild_copy_from::<16>(&from, 3, &mut buf, 0, 20);
    assert_eq!(buf[..32], from[3..35]);
    assert!(buf[32..].iter().all(|&b| b == GUARD));
}

#[test]
fn wild_copy_within_forward_resident_input() {
    // Input sitting just ahead of the output, closer than one stripe.
    let mut buf = vec![0u8; 64];
    for (i, b) in buf[5..45].iter_mut().enumerate() {
        *b = i as u8 + 1;
    }
    wild_copy_within::<8>(&mut buf, 5, 0, 20);
    let expected: Vec<u8> = (1u8..=20).collect();
    assert_eq!(buf[..20], expected[..]);
}
