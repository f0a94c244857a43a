//! Copy primitives used by the block decoder.
//!
//! All helpers operate on a single output buffer addressed by index, so a
//! match source and its destination are always two ranges of the same slice.
//!
//! # Overshoot contract
//!
//! The `wild_copy*` helpers copy whole stripes and stop only once the
//! destination index has reached `end`, so they may write up to one stripe
//! minus one byte past `end`.  They do not check for that slack themselves:
//! the decode loop calling them has already proven that `buf` extends at least
//! that far (and that it is scratch space, later overwritten by the decoder).
//! In debug builds the precondition is asserted.
//!
//! # Overlap contract
//!
//! Stripe copies read a source range that ends before the destination stripe
//! begins, so a match copy with offset `d` may use stripe width `w` only when
//! `d >= w`.  Smaller offsets go through [`memcpy_using_offset`] /
//! [`copy_match_head`], which first widen the effective offset to at least 8.

use super::types::{DEC64TABLE, INC32TABLE, WILDCOPYLENGTH};

#[inline(always)]
fn copy8(buf: &mut [u8], src: usize, dst: usize) {
    buf.copy_within(src..src + 8, dst);
}

#[inline(always)]
fn copy16(buf: &mut [u8], src: usize, dst: usize) {
    buf.copy_within(src..src + 16, dst);
}

/// Copy 8-byte stripes from `src` to `dst` until `dst >= end`.
///
/// Always copies at least one stripe.  Requires `dst - src >= 8` (or a
/// non-overlapping source) and `buf.len() >= end + WILDCOPYLENGTH - 1`.
#[inline(always)]
pub fn wild_copy8(buf: &mut [u8], mut src: usize, mut dst: usize, end: usize) {
    debug_assert!(end.max(dst + 1) + WILDCOPYLENGTH - 1 <= buf.len());
    loop {
        copy8(buf, src, dst);
        src += 8;
        dst += 8;
        if dst >= end {
            break;
        }
    }
}

/// Copy 32-byte stripes from `src` to `dst` until `dst >= end`.
///
/// Each stripe is moved as two 16-byte halves so that offsets in `16..32`
/// replicate correctly.  Requires `dst - src >= 16` and
/// `buf.len() >= end + 31`.
#[inline(always)]
pub fn wild_copy32(buf: &mut [u8], mut src: usize, mut dst: usize, end: usize) {
    debug_assert!(end.max(dst + 1) + 31 <= buf.len());
    loop {
        copy16(buf, src, dst);
        copy16(buf, src + 16, dst + 16);
        src += 32;
        dst += 32;
        if dst >= end {
            break;
        }
    }
}

/// Copy the first 8 bytes of a match whose source starts `offset` bytes
/// before `dst`, and return the source index for the remaining bytes.
///
/// For `offset < 8` the bytes are replicated through the `INC32TABLE` /
/// `DEC64TABLE` adjustment, after which `dst + 8 - returned_src` is a
/// multiple of `offset` and at least 8, so the caller may continue with
/// 8-byte stripes.  `offset` must be non-zero.
#[inline(always)]
pub fn copy_match_head(buf: &mut [u8], mut src: usize, dst: usize, offset: usize) -> usize {
    debug_assert!(offset != 0 && src + offset == dst);
    if offset < 8 {
        buf[dst] = buf[src];
        buf[dst + 1] = buf[src + 1];
        buf[dst + 2] = buf[src + 2];
        buf[dst + 3] = buf[src + 3];
        src += INC32TABLE[offset];
        buf.copy_within(src..src + 4, dst + 4);
        src.wrapping_add_signed(-DEC64TABLE[offset])
    } else {
        copy8(buf, src, dst);
        src + 8
    }
}

/// Replicate a match with a small offset (`1..16`) from `src` into
/// `dst..end`.
///
/// Offsets 1, 2 and 4 build an 8-byte repeating pattern once and stamp it
/// across the destination; other offsets widen the distance with
/// [`copy_match_head`] and finish with [`wild_copy8`].  Writes up to
/// `WILDCOPYLENGTH - 1` bytes past `end` (more for the generic case, which
/// always copies at least two stripes), so only the fast loop calls this.
#[inline(always)]
pub fn memcpy_using_offset(buf: &mut [u8], src: usize, mut dst: usize, end: usize, offset: usize) {
    let pattern: [u8; 8] = match offset {
        1 => [buf[src]; 8],
        2 => {
            let (a, b) = (buf[src], buf[src + 1]);
            [a, b, a, b, a, b, a, b]
        }
        4 => {
            let (a, b, c, d) = (buf[src], buf[src + 1], buf[src + 2], buf[src + 3]);
            [a, b, c, d, a, b, c, d]
        }
        _ => {
            let next = copy_match_head(buf, src, dst, offset);
            wild_copy8(buf, next, dst + 8, end);
            return;
        }
    };

    loop {
        buf[dst..dst + 8].copy_from_slice(&pattern);
        dst += 8;
        if dst >= end {
            break;
        }
    }
}

/// Byte-serial forward copy; correct when `dst..dst+len` interleaves with
/// `src..src+len` (the source is re-read after earlier bytes were written).
#[inline]
pub fn overlap_copy(buf: &mut [u8], src: usize, dst: usize, len: usize) {
    for i in 0..len {
        buf[dst + i] = buf[src + i];
    }
}

/// Copy stripes of `STRIPE` bytes from `from[src..]` into `buf[dst..]` until
/// `dst >= end`.  Literal counterpart of [`wild_copy8`] for a separate input.
#[inline(always)]
pub fn wild_copy_from<const STRIPE: usize>(
    from: &[u8],
    mut src: usize,
    buf: &mut [u8],
    mut dst: usize,
    end: usize,
) {
    loop {
        buf[dst..dst + STRIPE].copy_from_slice(&from[src..src + STRIPE]);
        src += STRIPE;
        dst += STRIPE;
        if dst >= end {
            break;
        }
    }
}

/// Copy stripes of `STRIPE` bytes forward within `buf` until `dst >= end`,
/// for a source that normally lies at or after the destination (input
/// resident in the output buffer).  A corrupt block can make the output
/// overtake the input; the copy then yields garbage but stays in bounds.
#[inline(always)]
pub fn wild_copy_within<const STRIPE: usize>(buf: &mut [u8], mut src: usize, mut dst: usize, end: usize) {
    loop {
        buf.copy_within(src..src + STRIPE, dst);
        src += STRIPE;
        dst += STRIPE;
        if dst >= end {
            break;
        }
    }
}
