//! Stream and file I/O around the block decoder.
//!
//! The library decodes single blocks; this module adds the LZ4 legacy frame
//! container and the source/destination plumbing the `lz4kd` binary uses.

pub mod decompress_legacy;
pub mod file_io;

// ── Special I/O sentinel ─────────────────────────────────────────────────────
pub use file_io::STDIO_MARK;

// ── File helpers ─────────────────────────────────────────────────────────────
pub use file_io::{open_dst, open_src, read_src};

// ── Legacy LZ4 frame format decompression ────────────────────────────────────
/// Decode the blocks of one legacy frame (stream positioned after the magic).
pub use decompress_legacy::decode_legacy_stream;

/// Decode a complete legacy stream, magic number included.
pub use decompress_legacy::decode_legacy_frames;
