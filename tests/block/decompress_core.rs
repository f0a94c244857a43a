// Core engine: decompress_generic across configurations and input sources.
//
//   - Degenerate empty-output rules per configuration
//   - Window validation (InvalidArgument)
//   - Offset validity boundary, offset zero, prefix and external history
//   - Variable-length extension boundaries
//   - Last-literals and termination rules
//   - Resident (in-place) input source
//   - Output-size-bounded configuration returns input consumed

use lz4kd::block::decompress_core::{decompress_generic, OutputWindow, ResidentSource, SliceSource};
use lz4kd::block::types::{DecodeConfig, DictDirective};
use lz4kd::{DecodeErrorKind, DecompressError};

use crate::common::{compress, lorem, noise, push_sequence};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

// token 0x50 (ll=5, no match), literals "Hello"
const BLOCK_HELLO: &[u8] = &[0x50, b'H', b'e', b'l', b'l', b'o'];

// Single 0x00 token: empty block
const BLOCK_EMPTY: &[u8] = &[0x00];

fn run(src: &[u8], dst: &mut [u8], cfg: DecodeConfig) -> Result<usize, DecompressError> {
    decompress_generic(SliceSource(src), OutputWindow::new(dst), &[], cfg)
}

fn kind(r: Result<usize, DecompressError>) -> DecodeErrorKind {
    r.expect_err("decoding should fail").kind
}

/// `lit_len` distinct literals, a match of `match_len` at `offset`, then
/// `tail` final literals.
fn block_with_match(lit_len: usize, offset: u16, match_len: usize, tail: usize) -> (Vec<u8>, Vec<u8>) {
    let literals = noise(lit_len, 7);
    let trailer = noise(tail, 8);
    let mut block = Vec::new();
    push_sequence(&mut block, &literals, Some((offset, match_len)));
    push_sequence(&mut block, &trailer, None);
    (block, [literals, trailer].concat())
}

// ─────────────────────────────────────────────────────────────────────────────
// Empty output
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_output_accepts_only_the_empty_block() {
    assert_eq!(run(BLOCK_EMPTY, &mut [], DecodeConfig::SAFE), Ok(0));
    assert_eq!(kind(run(&[0x10], &mut [], DecodeConfig::SAFE)), DecodeErrorKind::EmptyOutput);
    assert_eq!(kind(run(&[0x00, 0x00], &mut [], DecodeConfig::SAFE)), DecodeErrorKind::EmptyOutput);
    assert_eq!(kind(run(&[], &mut [], DecodeConfig::SAFE)), DecodeErrorKind::EmptyOutput);
}

#[test]
fn empty_output_partial_is_always_zero() {
    assert_eq!(run(BLOCK_HELLO, &mut [], DecodeConfig::SAFE_PARTIAL), Ok(0));
    assert_eq!(run(&[], &mut [], DecodeConfig::SAFE_PARTIAL), Ok(0));
}

#[test]
fn empty_output_fast_consumes_one_token() {
    assert_eq!(run(BLOCK_EMPTY, &mut [], DecodeConfig::FAST), Ok(1));
    assert_eq!(kind(run(&[0x10, b'A'], &mut [], DecodeConfig::FAST)), DecodeErrorKind::EmptyOutput);
}

#[test]
fn empty_input_with_capacity_is_truncated() {
    let mut dst = [0u8; 8];
    assert_eq!(kind(run(&[], &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::TruncatedInput);
}

// ─────────────────────────────────────────────────────────────────────────────
// Window validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn inconsistent_windows_rejected() {
    let mut buf = [0u8; 16];
    let bad = [(4, 2, 16), (0, 8, 4), (0, 0, 17)];
    for (low, start, end) in bad {
        let window = OutputWindow { buf: &mut buf, low, start, end };
        let r = decompress_generic(SliceSource(BLOCK_HELLO), window, &[], DecodeConfig::SAFE);
        assert_eq!(kind(r), DecodeErrorKind::InvalidArgument, "({low}, {start}, {end})");
    }
}

#[test]
fn no_dict_requires_low_at_start() {
    let mut buf = [0u8; 16];
    let window = OutputWindow { buf: &mut buf, low: 0, start: 4, end: 16 };
    let r = decompress_generic(SliceSource(BLOCK_HELLO), window, &[], DecodeConfig::SAFE);
    assert_eq!(kind(r), DecodeErrorKind::InvalidArgument);
}

// ─────────────────────────────────────────────────────────────────────────────
// Offsets
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offset_at_low_bound_is_valid() {
    // 64 literals then a match reaching exactly back to byte 0; long enough
    // for the wide-stripe step to be eligible.
    let (block, prefix) = block_with_match(64, 64, 100, 36);
    let mut dst = vec![0u8; 200];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE), Ok(200));
    assert_eq!(dst[..64], prefix[..64]);
    assert_eq!(dst[64..128], prefix[..64]);
    assert_eq!(dst[128..164], prefix[..36]);
    assert_eq!(dst[164..], prefix[64..]);
}

#[test]
fn offset_one_past_low_bound_is_rejected() {
    let (block, _) = block_with_match(64, 65, 100, 36);
    let mut dst = vec![0u8; 200];
    let err = run(&block, &mut dst, DecodeConfig::SAFE).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::OffsetOutOfBounds);
    // token + 1 extension byte + 64 literals + 2 offset bytes
    assert_eq!(err.consumed, 68);
    assert_eq!(err.code(), -69);
}

#[test]
fn offset_zero_is_rejected_in_every_configuration() {
    let (block, _) = block_with_match(16, 0, 8, 12);
    for cfg in [DecodeConfig::SAFE, DecodeConfig::SAFE_PARTIAL, DecodeConfig::FAST] {
        let mut dst = vec![0u8; 36];
        assert_eq!(kind(run(&block, &mut dst, cfg)), DecodeErrorKind::OffsetOutOfBounds, "{cfg:?}");
    }
}

#[test]
fn fast_configuration_still_checks_offsets() {
    let (block, _) = block_with_match(20, 21, 8, 12);
    let mut dst = vec![0u8; 40];
    assert_eq!(kind(run(&block, &mut dst, DecodeConfig::FAST)), DecodeErrorKind::OffsetOutOfBounds);
}

#[test]
fn prefix_window_extends_history() {
    // Output starts after an 8-byte prefix; the match reaches 4 bytes into it.
    let mut block = Vec::new();
    push_sequence(&mut block, b"", Some((4, 8)));
    push_sequence(&mut block, b"tail-literals", None);

    let mut buf = b"PPPPWXYZ".to_vec();
    buf.resize(8 + 21, 0);
    let window = OutputWindow { buf: &mut buf, low: 0, start: 8, end: 29 };
    let cfg = DecodeConfig::SAFE.with_dict(DictDirective::WithPrefix);
    assert_eq!(decompress_generic(SliceSource(&block), window, &[], cfg), Ok(21));
    assert_eq!(&buf[8..], b"WXYZWXYZtail-literals");

    // Same block with the low bound moved up to the output start.
    let mut buf = b"PPPPWXYZ".to_vec();
    buf.resize(8 + 21, 0);
    let window = OutputWindow { buf: &mut buf, low: 8, start: 8, end: 29 };
    assert_eq!(
        kind(decompress_generic(SliceSource(&block), window, &[], cfg)),
        DecodeErrorKind::OffsetOutOfBounds
    );
}

#[test]
fn external_dictionary_split_match() {
    // "abcd", then a 16-byte match starting at the dictionary's first byte
    // and running on into the output.
    let dict = b"0123456789";
    let mut block = Vec::new();
    push_sequence(&mut block, b"abcd", Some((14, 16)));
    push_sequence(&mut block, b"final-bytes!", None);

    let cfg = DecodeConfig::SAFE.with_dict(DictDirective::UsingExtDict);
    let mut dst = [0u8; 32];
    let r = decompress_generic(SliceSource(&block), OutputWindow::new(&mut dst), dict, cfg);
    assert_eq!(r, Ok(32));
    assert_eq!(&dst, b"abcd0123456789abcdabfinal-bytes!");

    // One byte before the dictionary.
    let mut block = Vec::new();
    push_sequence(&mut block, b"abcd", Some((15, 16)));
    push_sequence(&mut block, b"final-bytes!", None);
    let mut dst = [0u8; 32];
    let r = decompress_generic(SliceSource(&block), OutputWindow::new(&mut dst), dict, cfg);
    assert_eq!(kind(r), DecodeErrorKind::OffsetOutOfBounds);
}

#[test]
fn dictionary_ignored_without_ext_dict_directive() {
    let mut block = Vec::new();
    push_sequence(&mut block, b"abcd", Some((14, 16)));
    push_sequence(&mut block, b"final-bytes!", None);
    let mut dst = [0u8; 32];
    let r = decompress_generic(SliceSource(&block), OutputWindow::new(&mut dst), b"0123456789", DecodeConfig::SAFE);
    assert_eq!(kind(r), DecodeErrorKind::OffsetOutOfBounds);
}

// ─────────────────────────────────────────────────────────────────────────────
// Variable-length extensions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn literal_extension_past_limit() {
    let mut dst = [0u8; 100];
    assert_eq!(kind(run(&[0xF0, 255, 255], &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::VarIntOverrun);
}

#[test]
fn literal_extension_exactly_255_continues() {
    // 15 + 255 + 0 = 270 literals: the 255 byte is not the terminator.
    let data = lorem(270, 3);
    let mut block = vec![0xF0, 255, 0];
    block.extend_from_slice(&data);
    let mut dst = vec![0u8; 270];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE), Ok(270));
    assert_eq!(dst, data);
}

#[test]
fn match_extension_past_limit() {
    // Escaped match length whose 255-run reaches into the trailing literal zone.
    let mut block = vec![0x4F, b'a', b'b', b'c', b'd', 0x04, 0x00];
    block.extend_from_slice(&[255; 8]);
    let mut dst = vec![0u8; 4096];
    assert_eq!(kind(run(&block, &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::VarIntOverrun);
}

#[test]
fn literals_cut_short_of_the_next_offset() {
    // Four literals, then an escaped match with nothing left to read.
    let block = [0x4F, b'a', b'b', b'c', b'd', 0x04, 0x00, 255];
    let mut dst = vec![0u8; 600];
    assert_eq!(kind(run(&block, &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::BadTermination);
}

// ─────────────────────────────────────────────────────────────────────────────
// End-of-block rules
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn match_into_last_literals_rejected() {
    // 8 literals, a 10-byte match ending 2 bytes before the end, 5 literals
    // in the input but a 20-byte output.
    let mut block = Vec::new();
    push_sequence(&mut block, b"abcdefgh", Some((8, 10)));
    push_sequence(&mut block, b"vwxyz", None);
    let mut dst = [0u8; 20];
    assert_eq!(kind(run(&block, &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::LastLiteralsViolation);

    // The same block decodes when the output is sized to it.
    let mut dst = [0u8; 23];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE), Ok(23));
    assert_eq!(&dst, b"abcdefghabcdefghabvwxyz");
}

#[test]
fn trailing_input_is_bad_termination() {
    let mut block = BLOCK_HELLO.to_vec();
    block.push(0x00);
    let mut dst = [0u8; 16];
    assert_eq!(kind(run(&block, &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::BadTermination);
}

#[test]
fn output_too_small_is_bad_termination() {
    let mut dst = [0u8; 4];
    assert_eq!(kind(run(BLOCK_HELLO, &mut dst, DecodeConfig::SAFE)), DecodeErrorKind::BadTermination);
}

#[test]
fn larger_capacity_reports_bytes_written() {
    let data = lorem(5000, 11);
    let block = compress(&data);
    let mut dst = vec![0u8; 9000];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE), Ok(5000));
    assert_eq!(dst[..5000], data[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Partial decoding stop rules
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn partial_stops_when_only_an_offset_remains() {
    // Taking the match would leave no token for the sequence after it.
    let block = [0x40u8, b'a', b'b', b'c', b'd', 0x04, 0x00];
    let mut dst = [0u8; 64];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE_PARTIAL), Ok(4));
    assert_eq!(&dst[..4], b"abcd");
}

#[test]
fn partial_takes_trailing_match_that_reaches_target() {
    let block = [0x44u8, b'a', b'b', b'c', b'd', 0x04, 0x00];
    let mut dst = [0u8; 8];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE_PARTIAL), Ok(8));
    assert_eq!(&dst, b"abcdabcd");

    // One byte short of the target: stop after the literals.
    let mut dst = [0u8; 13];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE_PARTIAL), Ok(4));
}

#[test]
fn partial_trailing_match_with_length_extension_stops() {
    // The match length needs an extension byte that is not there.
    let block = [0x4Fu8, b'a', b'b', b'c', b'd', 0x04, 0x00];
    let mut dst = [0u8; 8];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE_PARTIAL), Ok(4));
}

#[test]
fn partial_with_three_bytes_left_continues() {
    let block = [0x40u8, b'a', b'b', b'c', b'd', 0x04, 0x00, 0x00];
    let mut dst = [0u8; 64];
    assert_eq!(run(&block, &mut dst, DecodeConfig::SAFE_PARTIAL), Ok(8));
    assert_eq!(&dst[..8], b"abcdabcd");
}

// ─────────────────────────────────────────────────────────────────────────────
// Output-size-bounded configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fast_returns_input_consumed() {
    let data = lorem(3000, 5);
    let mut block = compress(&data);
    let used = block.len();
    block.extend_from_slice(b"trailing garbage");

    let mut dst = vec![0u8; data.len()];
    assert_eq!(run(&block, &mut dst, DecodeConfig::FAST), Ok(used));
    assert_eq!(dst, data);
}

#[test]
fn fast_rejects_wrong_size() {
    let mut dst = [0u8; 6];
    assert_eq!(kind(run(BLOCK_HELLO, &mut dst, DecodeConfig::FAST)), DecodeErrorKind::BadTermination);
}

#[test]
fn fast_reports_truncation_instead_of_reading_past_input() {
    let data = lorem(3000, 6);
    let block = compress(&data);
    let mut dst = vec![0u8; data.len()];
    for cut in [1, block.len() / 2, block.len() - 1] {
        assert!(run(&block[..cut], &mut dst, DecodeConfig::FAST).is_err(), "cut {cut}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resident input (in-place)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resident_source_decodes_from_buffer_tail() {
    let data = lorem(10_000, 9);
    let block = compress(&data);
    let len = data.len() + (data.len() >> 8) + 32;
    let mut buf = vec![0u8; len];
    buf[len - block.len()..].copy_from_slice(&block);

    let src = ResidentSource { base: len - block.len(), len: block.len() };
    let window = OutputWindow { buf: &mut buf, low: 0, start: 0, end: data.len() };
    assert_eq!(decompress_generic(src, window, &[], DecodeConfig::SAFE), Ok(data.len()));
    assert_eq!(buf[..data.len()], data[..]);
}

#[test]
fn resident_source_partial_stops_before_cut_offset() {
    // The offset field is cut by the end of the resident block.
    let block = [0x44u8, b'a', b'b', b'c', b'd', 0x04];
    let mut buf = vec![0u8; 64];
    buf[58..].copy_from_slice(&block);
    let src = ResidentSource { base: 58, len: 6 };
    let window = OutputWindow { buf: &mut buf, low: 0, start: 0, end: 16 };
    assert_eq!(decompress_generic(src, window, &[], DecodeConfig::SAFE_PARTIAL), Ok(4));
    assert_eq!(&buf[..4], b"abcd");

    let window = OutputWindow { buf: &mut buf, low: 0, start: 0, end: 16 };
    let r = decompress_generic(src, window, &[], DecodeConfig::SAFE);
    assert_eq!(kind(r), DecodeErrorKind::BadTermination);
}
