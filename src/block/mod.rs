//! LZ4 block decompression.
//!
//! Index-based decoding engine for the LZ4 block format: a single sequence
//! grammar decoded by a wide-stripe fast step and a bounds-clamping safe step.

pub mod copy;
pub mod decompress_api;
pub mod decompress_core;
pub mod error;
pub mod types;

// Re-export the most important public API items at the module level.
pub use decompress_api::{
    decompress_block_to_vec, decompress_fast, decompress_fast_using_dict, decompress_fast_with_prefix,
    decompress_in_place, decompress_inplace_buffer_size, decompress_inplace_margin, decompress_safe,
    decompress_safe_partial, decompress_safe_partial_using_dict, decompress_safe_using_dict,
    decompress_safe_with_prefix,
};
pub use decompress_core::{decompress_generic, OutputWindow, ResidentSource, SliceSource, Source};
pub use error::{DecodeErrorKind, DecompressError};
pub use types::{
    compress_bound, DecodeConfig, DictDirective, EarlyEnd, EndCondition, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE,
};
