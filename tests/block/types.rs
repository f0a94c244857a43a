// Block constants, offset tables, decode directives and sizing helpers.
//
//   - Grammar constants match the LZ4 block format
//   - INC32TABLE / DEC64TABLE contents
//   - DecodeConfig presets and with_dict
//   - read_le16 bounds handling
//   - compress_bound and the in-place sizing helpers

use lz4kd::block::types::{
    compress_bound, read_le16, DecodeConfig, DictDirective, EarlyEnd, EndCondition, DEC64TABLE,
    FASTLOOP_SAFE_DISTANCE, INC32TABLE, KB, LASTLITERALS, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE,
    MATCH_SAFEGUARD_DISTANCE, MB, MFLIMIT, MINMATCH, ML_BITS, ML_MASK, RUN_BITS, RUN_MASK,
    WILDCOPYLENGTH,
};
use lz4kd::{decompress_inplace_buffer_size, decompress_inplace_margin};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grammar_constants() {
    assert_eq!(MINMATCH, 4);
    assert_eq!(WILDCOPYLENGTH, 8);
    assert_eq!(LASTLITERALS, 5);
    assert_eq!(MFLIMIT, 12);
    assert_eq!(MATCH_SAFEGUARD_DISTANCE, 12);
    assert_eq!(FASTLOOP_SAFE_DISTANCE, 64);
}

#[test]
fn token_field_widths() {
    assert_eq!(ML_BITS, 4);
    assert_eq!(ML_MASK, 15);
    assert_eq!(RUN_BITS, 4);
    assert_eq!(RUN_MASK, 15);
}

#[test]
fn size_units_and_limits() {
    assert_eq!(KB, 1024);
    assert_eq!(MB, 1024 * 1024);
    assert_eq!(LZ4_DISTANCE_MAX, 65_535);
    assert_eq!(LZ4_MAX_INPUT_SIZE, 2_113_929_216);
}

// ─────────────────────────────────────────────────────────────────────────────
// Offset tables
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn inc32table_values() {
    assert_eq!(INC32TABLE, [0, 1, 2, 1, 0, 4, 4, 4]);
}

#[test]
fn dec64table_values() {
    assert_eq!(DEC64TABLE, [0, 0, 0, -1, -4, 1, 2, 3]);
}

#[test]
fn tables_widen_small_offsets_to_multiples() {
    // After the 8-byte head copy the source trails the destination by a
    // multiple of the offset that is at least 8.
    for offset in 1..8usize {
        let trailing = (offset as isize - INC32TABLE[offset] as isize + DEC64TABLE[offset] + 8) as usize;
        assert!(trailing >= 8, "offset {offset}");
        assert_eq!(trailing % offset, 0, "offset {offset}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecodeConfig
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn config_presets() {
    assert_eq!(DecodeConfig::SAFE.end, EndCondition::OnInputSize);
    assert_eq!(DecodeConfig::SAFE.early_end, EarlyEnd::FullBlock);
    assert_eq!(DecodeConfig::SAFE.dict, DictDirective::NoDict);
    assert!(DecodeConfig::SAFE.end_on_input());
    assert!(!DecodeConfig::SAFE.partial());

    assert!(DecodeConfig::SAFE_PARTIAL.partial());
    assert!(DecodeConfig::SAFE_PARTIAL.end_on_input());

    assert!(!DecodeConfig::FAST.end_on_input());
    assert!(!DecodeConfig::FAST.partial());
}

#[test]
fn config_with_dict_keeps_other_axes() {
    let cfg = DecodeConfig::SAFE_PARTIAL.with_dict(DictDirective::UsingExtDict);
    assert_eq!(cfg.dict, DictDirective::UsingExtDict);
    assert_eq!(cfg.early_end, EarlyEnd::Partial);
    assert_eq!(cfg.end, EndCondition::OnInputSize);
    assert_eq!(
        cfg,
        DecodeConfig::new(EndCondition::OnInputSize, EarlyEnd::Partial, DictDirective::UsingExtDict)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// read_le16
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn read_le16_little_endian() {
    assert_eq!(read_le16(&[0x34, 0x12], 0), Some(0x1234));
    assert_eq!(read_le16(&[0x00, 0xFF, 0xFF], 1), Some(0xFFFF));
}

#[test]
fn read_le16_out_of_bounds() {
    assert_eq!(read_le16(&[0x01], 0), None);
    assert_eq!(read_le16(&[0x01, 0x02], 1), None);
    assert_eq!(read_le16(&[0x01, 0x02], usize::MAX), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sizing helpers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compress_bound_values() {
    assert_eq!(compress_bound(0), 16);
    assert_eq!(compress_bound(255), 255 + 1 + 16);
    assert_eq!(compress_bound(8 * MB), 8 * MB + 8 * MB / 255 + 16);
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
}

#[test]
fn inplace_sizing() {
    assert_eq!(decompress_inplace_margin(0), 32);
    assert_eq!(decompress_inplace_margin(256), 33);
    assert_eq!(decompress_inplace_buffer_size(1 << 16), (1 << 16) + 256 + 32);
}
