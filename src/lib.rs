// lz4kd: LZ4 block decoder with legacy-frame and C-ABI surfaces

pub mod block;
pub mod cli;
pub mod config;
pub mod io;

#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants ─────────────────────────────────────────────────────────
pub const LZ4KD_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    LZ4KD_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::error::{DecodeErrorKind, DecompressError};
pub use block::types::{compress_bound, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE};
pub use block::decompress_api::{
    decompress_block_to_vec, decompress_fast, decompress_fast_using_dict, decompress_fast_with_prefix,
    decompress_in_place, decompress_inplace_buffer_size, decompress_inplace_margin, decompress_safe,
    decompress_safe_partial, decompress_safe_partial_using_dict, decompress_safe_using_dict,
    decompress_safe_with_prefix,
};
