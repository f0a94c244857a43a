//! C-ABI shims for the block decoder.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced `liblz4kd.a` exports the bounded-input `LZ4_decompress_*`
//! symbols with their usual C signatures and the negative error convention
//! (`-(consumed) - 1`).  `LZ4_decompress_fast` is not exported: its C
//! signature carries no input length to bound the read.

use std::os::raw::{c_char, c_int};
use std::slice;

use crate::block::decompress_api::{
    decompress_safe, decompress_safe_partial, decompress_safe_using_dict,
};
use crate::block::DecompressError;

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Borrow `len` bytes at `ptr`; `None` for a negative length or a null
/// pointer with a non-zero length.
#[inline(always)]
unsafe fn input<'a>(ptr: *const c_char, len: c_int) -> Option<&'a [u8]> {
    let len = usize::try_from(len).ok()?;
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts(ptr as *const u8, len))
}

#[inline(always)]
unsafe fn output<'a>(ptr: *mut c_char, len: c_int) -> Option<&'a mut [u8]> {
    let len = usize::try_from(len).ok()?;
    if len == 0 {
        return Some(&mut []);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts_mut(ptr as *mut u8, len))
}

#[inline(always)]
fn to_c(result: Result<usize, DecompressError>) -> c_int {
    match result {
        Ok(n) => c_int::try_from(n).unwrap_or(c_int::MAX),
        Err(e) => e.code(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ4_decompress_safe  (lz4.h)
//
// int LZ4_decompress_safe(const char *src, char *dst,
//                         int compressedSize, int dstCapacity);
//
// Returns number of bytes written to dst, or a negative value on error.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn LZ4_decompress_safe(
    src: *const c_char,
    dst: *mut c_char,
    compressed_size: c_int,
    dst_capacity: c_int,
) -> c_int {
    let (Some(s), Some(d)) = (input(src, compressed_size), output(dst, dst_capacity)) else {
        return -1;
    };
    to_c(decompress_safe(s, d))
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ4_decompress_safe_partial  (lz4.h)
//
// int LZ4_decompress_safe_partial(const char *src, char *dst, int srcSize,
//                                 int targetOutputSize, int dstCapacity);
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn LZ4_decompress_safe_partial(
    src: *const c_char,
    dst: *mut c_char,
    src_size: c_int,
    target_output_size: c_int,
    dst_capacity: c_int,
) -> c_int {
    let (Some(s), Some(d)) = (input(src, src_size), output(dst, dst_capacity)) else {
        return -1;
    };
    let Ok(target) = usize::try_from(target_output_size) else {
        return -1;
    };
    to_c(decompress_safe_partial(s, d, target))
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ4_decompress_safe_usingDict  (lz4.h)
//
// int LZ4_decompress_safe_usingDict(const char *src, char *dst,
//                                   int srcSize, int dstCapacity,
//                                   const char *dictStart, int dictSize);
//
// The dictionary is treated as an external window even when it happens to
// end right where `dst` begins.
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub unsafe extern "C" fn LZ4_decompress_safe_usingDict(
    src: *const c_char,
    dst: *mut c_char,
    src_size: c_int,
    dst_capacity: c_int,
    dict_start: *const c_char,
    dict_size: c_int,
) -> c_int {
    let (Some(s), Some(d), Some(dict)) = (
        input(src, src_size),
        output(dst, dst_capacity),
        input(dict_start, dict_size),
    ) else {
        return -1;
    };
    to_c(decompress_safe_using_dict(s, d, dict))
}
