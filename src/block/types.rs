//! LZ4 block constants, decode directives, and offset lookup tables.
//!
//! Everything the decoder needs to know about the block grammar lives here:
//!   - Common constants (MINMATCH, WILDCOPYLENGTH, LASTLITERALS, …)
//!   - Token field widths and escape values
//!   - `INC32TABLE` / `DEC64TABLE` for small-offset match replication
//!   - The three configuration axes (end condition, early end, dictionary)
//!     and the [`DecodeConfig`] value that combines them

// ─────────────────────────────────────────────────────────────────────────────
// Constants: block grammar
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in an LZ4 block.
pub const MINMATCH: usize = 4;

/// Wildcard-copy granularity (helpers may write up to this many bytes past the
/// logical end of the destination).
pub const WILDCOPYLENGTH: usize = 8;

/// Last N bytes of a block are always emitted as literals.
pub const LASTLITERALS: usize = 5;

/// No match may start within the last MFLIMIT bytes of a block.
pub const MFLIMIT: usize = 12;

/// Ensure 2 × WILDCOPYLENGTH can be written without overflowing the output buffer.
pub const MATCH_SAFEGUARD_DISTANCE: usize = 2 * WILDCOPYLENGTH - MINMATCH;

/// Output slack the fast loop needs before it may use unchecked stripe copies.
pub const FASTLOOP_SAFE_DISTANCE: usize = 64;

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

/// Maximum back-reference distance expressible by the 16-bit offset field.
pub const LZ4_DISTANCE_MAX: usize = 65_535;

/// Largest input the format allows (`LZ4_MAX_INPUT_SIZE`).
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

// ─────────────────────────────────────────────────────────────────────────────
// Small-offset replication tables
// ─────────────────────────────────────────────────────────────────────────────

/// After the first four bytes of an offset-`n` match are copied one by one,
/// the source is advanced by `INC32TABLE[n]` so the next 4-byte read sees a
/// fully-written pattern.
pub const INC32TABLE: [usize; 8] = [0, 1, 2, 1, 0, 4, 4, 4];

/// Correction applied after the second 4-byte copy so that the effective
/// offset becomes a multiple of `n` that is at least 8.
pub const DEC64TABLE: [isize; 8] = [0, 0, 0, -1, -4, 1, 2, 3];

// ─────────────────────────────────────────────────────────────────────────────
// Decode directives
// ─────────────────────────────────────────────────────────────────────────────

/// What bounds the decode loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndCondition {
    /// Stop on input exhaustion or output capacity; every read is validated
    /// against the input end.  Returns bytes written.
    OnInputSize,
    /// Trust the block to terminate exactly at the expected output size.
    /// Returns bytes consumed.
    OnOutputSize,
}

/// Whether the decoder may stop before the block's natural end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EarlyEnd {
    FullBlock,
    /// Stop successfully once the output capacity is filled.
    Partial,
}

/// Describes how previous content is accessible for back-references.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DictDirective {
    /// No preceding content; the low bound is the output start.
    NoDict,
    /// History lives in the same buffer immediately before the output.
    WithPrefix,
    /// History lives in a separate buffer logically preceding the low bound.
    UsingExtDict,
}

/// One instantiation of the decoding engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecodeConfig {
    pub end: EndCondition,
    pub early_end: EarlyEnd,
    pub dict: DictDirective,
}

impl DecodeConfig {
    /// `LZ4_decompress_safe`.
    pub const SAFE: Self = Self::new(EndCondition::OnInputSize, EarlyEnd::FullBlock, DictDirective::NoDict);
    /// `LZ4_decompress_safe_partial`.
    pub const SAFE_PARTIAL: Self = Self::new(EndCondition::OnInputSize, EarlyEnd::Partial, DictDirective::NoDict);
    /// `LZ4_decompress_fast`.
    pub const FAST: Self = Self::new(EndCondition::OnOutputSize, EarlyEnd::FullBlock, DictDirective::NoDict);

    pub const fn new(end: EndCondition, early_end: EarlyEnd, dict: DictDirective) -> Self {
        Self { end, early_end, dict }
    }

    /// Same configuration with a different dictionary directive.
    pub const fn with_dict(self, dict: DictDirective) -> Self {
        Self { dict, ..self }
    }

    #[inline(always)]
    pub fn end_on_input(&self) -> bool {
        self.end == EndCondition::OnInputSize
    }

    #[inline(always)]
    pub fn partial(&self) -> bool {
        self.early_end == EarlyEnd::Partial
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory read helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u16` at `at`, or `None` when fewer than two bytes remain.
#[inline(always)]
pub fn read_le16(bytes: &[u8], at: usize) -> Option<u16> {
    let pair = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([pair[0], pair[1]]))
}

/// Worst-case compressed size of `input_size` bytes (`LZ4_COMPRESSBOUND`).
///
/// Returns 0 when `input_size` exceeds [`LZ4_MAX_INPUT_SIZE`].
pub const fn compress_bound(input_size: usize) -> usize {
    if input_size > LZ4_MAX_INPUT_SIZE {
        0
    } else {
        input_size + input_size / 255 + 16
    }
}
