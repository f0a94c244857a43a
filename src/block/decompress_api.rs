//! Public LZ4 block decompression API.
//!
//! Every entry point builds a [`DecodeConfig`] and an [`OutputWindow`] from
//! the caller's slices and runs the shared engine:
//!
//!   - One-shot decompression: [`decompress_safe`], [`decompress_safe_partial`]
//!   - Output-size-bounded decompression: [`decompress_fast`]
//!   - External dictionary: [`decompress_safe_using_dict`],
//!     [`decompress_safe_partial_using_dict`], [`decompress_fast_using_dict`]
//!   - Prefix dictionary: [`decompress_safe_with_prefix`],
//!     [`decompress_fast_with_prefix`]
//!   - In-place decompression: [`decompress_in_place`]
//!   - Allocating convenience: [`decompress_block_to_vec`]
//!
//! # The `fast` family
//!
//! `decompress_fast*` trust the block to end exactly at the expected output
//! size and report how many input bytes that took, which is how callers that
//! store only the original size locate the end of a block.  The input is
//! still a slice: running off its end is reported as an error rather than
//! read, and offsets are validated as in the safe family.

use super::decompress_core::{decompress_generic, OutputWindow, ResidentSource, SliceSource};
use super::error::{DecodeErrorKind, DecompressError};
use super::types::{DecodeConfig, DictDirective};

// ─────────────────────────────────────────────────────────────────────────────
// Sizing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extra room past the decompressed size needed to decode in place
/// (`LZ4_DECOMPRESS_INPLACE_MARGIN`).
pub const fn decompress_inplace_margin(compressed_size: usize) -> usize {
    (compressed_size >> 8) + 32
}

/// Minimum buffer size for [`decompress_in_place`]
/// (`LZ4_DECOMPRESS_INPLACE_BUFFER_SIZE`).
pub const fn decompress_inplace_buffer_size(decompressed_size: usize) -> usize {
    decompressed_size + decompress_inplace_margin(decompressed_size)
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress a full LZ4 block with no dictionary.
///
/// Equivalent to `LZ4_decompress_safe`.  `dst.len()` is the capacity.
/// Returns the number of bytes written into `dst`.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_generic(SliceSource(src), OutputWindow::new(dst), &[], DecodeConfig::SAFE)
}

/// Decompress up to `target_output_size` bytes from an LZ4 block.
///
/// Equivalent to `LZ4_decompress_safe_partial`.  At most
/// `min(target_output_size, dst.len())` bytes are written; the block need not
/// be valid beyond that point.  Returns the number of bytes written.
pub fn decompress_safe_partial(
    src: &[u8],
    dst: &mut [u8],
    target_output_size: usize,
) -> Result<usize, DecompressError> {
    let end = target_output_size.min(dst.len());
    let window = OutputWindow { buf: dst, low: 0, start: 0, end };
    decompress_generic(SliceSource(src), window, &[], DecodeConfig::SAFE_PARTIAL)
}

/// Decompress a block whose decoded size is exactly `dst.len()`.
///
/// Equivalent to `LZ4_decompress_fast`.  Returns the number of input bytes
/// the block occupied.
pub fn decompress_fast(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    decompress_generic(SliceSource(src), OutputWindow::new(dst), &[], DecodeConfig::FAST)
}

// ─────────────────────────────────────────────────────────────────────────────
// External dictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Full-block decode where `dict` logically precedes `dst`.
///
/// Equivalent to `LZ4_decompress_safe_usingDict`.  An empty `dict` behaves
/// like [`decompress_safe`].
pub fn decompress_safe_using_dict(src: &[u8], dst: &mut [u8], dict: &[u8]) -> Result<usize, DecompressError> {
    let cfg = DecodeConfig::SAFE.with_dict(DictDirective::UsingExtDict);
    decompress_generic(SliceSource(src), OutputWindow::new(dst), dict, cfg)
}

/// Partial decode with an external dictionary.
///
/// Equivalent to `LZ4_decompress_safe_partial_usingDict`.
pub fn decompress_safe_partial_using_dict(
    src: &[u8],
    dst: &mut [u8],
    target_output_size: usize,
    dict: &[u8],
) -> Result<usize, DecompressError> {
    let end = target_output_size.min(dst.len());
    let window = OutputWindow { buf: dst, low: 0, start: 0, end };
    let cfg = DecodeConfig::SAFE_PARTIAL.with_dict(DictDirective::UsingExtDict);
    decompress_generic(SliceSource(src), window, dict, cfg)
}

/// Output-size-bounded decode with an external dictionary.
///
/// Equivalent to `LZ4_decompress_fast_usingDict`.  Returns input bytes consumed.
pub fn decompress_fast_using_dict(src: &[u8], dst: &mut [u8], dict: &[u8]) -> Result<usize, DecompressError> {
    let cfg = DecodeConfig::FAST.with_dict(DictDirective::UsingExtDict);
    decompress_generic(SliceSource(src), OutputWindow::new(dst), dict, cfg)
}

// ─────────────────────────────────────────────────────────────────────────────
// Prefix dictionary
// ─────────────────────────────────────────────────────────────────────────────

/// Decode `src` into `buf[prefix_len..]`, with `buf[..prefix_len]` as history.
///
/// Covers `LZ4_decompress_safe_withPrefix64k` and the small-prefix variant:
/// any prefix length is accepted, offsets reaching before `buf[0]` are not.
/// Returns the number of bytes written after the prefix.
pub fn decompress_safe_with_prefix(buf: &mut [u8], prefix_len: usize, src: &[u8]) -> Result<usize, DecompressError> {
    let end = buf.len();
    let window = OutputWindow { buf, low: 0, start: prefix_len, end };
    decompress_generic(SliceSource(src), window, &[], DecodeConfig::SAFE.with_dict(DictDirective::WithPrefix))
}

/// Output-size-bounded decode into `buf[prefix_len..]` with prefix history.
///
/// The decoded size must be exactly `buf.len() - prefix_len`.  Returns input
/// bytes consumed.
pub fn decompress_fast_with_prefix(buf: &mut [u8], prefix_len: usize, src: &[u8]) -> Result<usize, DecompressError> {
    let end = buf.len();
    let window = OutputWindow { buf, low: 0, start: prefix_len, end };
    decompress_generic(SliceSource(src), window, &[], DecodeConfig::FAST.with_dict(DictDirective::WithPrefix))
}

// ─────────────────────────────────────────────────────────────────────────────
// In place
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a block stored in the last `compressed_len` bytes of `buf` into
/// `buf[..decompressed_len]`.
///
/// `buf.len()` must be at least
/// [`decompress_inplace_buffer_size`]`(decompressed_len)`, otherwise the
/// output could overtake unread input and the call is refused.  Returns the
/// number of bytes written.
pub fn decompress_in_place(
    buf: &mut [u8],
    compressed_len: usize,
    decompressed_len: usize,
) -> Result<usize, DecompressError> {
    let len = buf.len();
    if compressed_len > len || len < decompress_inplace_buffer_size(decompressed_len) {
        return Err(DecompressError::new(DecodeErrorKind::InvalidArgument, 0));
    }
    let src = ResidentSource { base: len - compressed_len, len: compressed_len };
    let window = OutputWindow { buf, low: 0, start: 0, end: decompressed_len };
    decompress_generic(src, window, &[], DecodeConfig::SAFE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Allocating convenience
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress a block of known original size into a fresh `Vec`.
///
/// Fails with [`DecodeErrorKind::BadTermination`] when the block decodes to
/// fewer than `original_size` bytes.
pub fn decompress_block_to_vec(src: &[u8], original_size: usize) -> Result<Vec<u8>, DecompressError> {
    let mut out = vec![0u8; original_size];
    let written = decompress_safe(src, &mut out)?;
    if written != original_size {
        return Err(DecompressError::new(DecodeErrorKind::BadTermination, src.len()));
    }
    Ok(out)
}
